//! file: core/src/ast/kind.rs
//! description: statement, expression and operator kinds.
//!
//! The statement and expression kinds are closed enums covering the whole
//! Lua grammar. Each kind reports a stable construct name that the lowering
//! engine uses when it rejects a construct it does not handle yet.
//!
use super::node::{Block, CallSuffix, Exp, Var};

#[derive(Debug, Clone, PartialEq)]
pub enum StatKind {
    /// `a, b.c = x, y`
    Assign { targets: Vec<Var>, values: Vec<Exp> },
    /// A prefix expression ending in at least one call suffix.
    Call(PrefixExp),
    Label(String),
    Break,
    Goto(String),
    Do(Block),
    While { cond: Exp, body: Block },
    Repeat { body: Block, cond: Exp },
    If { clauses: Vec<CondClause>, otherwise: Option<Block> },
    NumericFor { var: String, start: Exp, limit: Exp, step: Option<Exp>, body: Block },
    GenericFor { names: Vec<String>, exps: Vec<Exp>, body: Block },
    Function { name: FuncName, body: FuncBody },
    LocalFunction { name: String, body: FuncBody },
    Local { names: Vec<AttName>, values: Vec<Exp> },
}

impl StatKind {
    pub fn construct_name(&self) -> &'static str {
        match self {
            StatKind::Assign { .. } => "assignlist",
            StatKind::Call(_) => "functioncall",
            StatKind::Label(_) => "label",
            StatKind::Break => "breakstmt",
            StatKind::Goto(_) => "gotostmt",
            StatKind::Do(_) => "enclosedblock",
            StatKind::While { .. } => "whileloop",
            StatKind::Repeat { .. } => "repeatloop",
            StatKind::If { .. } => "conditionalchain",
            StatKind::NumericFor { .. } => "numericfor",
            StatKind::GenericFor { .. } => "genericfor",
            StatKind::Function { .. } => "namedfunctiondef",
            StatKind::LocalFunction { .. } => "localnamedfunctiondef",
            StatKind::Local { .. } => "localvarlist",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpKind {
    Nil,
    False,
    True,
    Number(NumberLit),
    Str(String),
    VarArgs,
    Function(FuncBody),
    Prefix(PrefixExp),
    Table(TableConstructor),
    Unary { op: UnaryOperator, operand: Box<Exp> },
    Binary { op: BinaryOperator, lhs: Box<Exp>, rhs: Box<Exp> },
}

impl ExpKind {
    pub fn construct_name(&self) -> &'static str {
        match self {
            ExpKind::Nil => "nilvalue",
            ExpKind::False => "falsevalue",
            ExpKind::True => "truevalue",
            ExpKind::Number(_) => "number",
            ExpKind::Str(_) => "string",
            ExpKind::VarArgs => "elipsis",
            ExpKind::Function(_) => "functiondef",
            ExpKind::Prefix(_) => "prefixexp",
            ExpKind::Table(_) => "tableconstructor",
            ExpKind::Unary { .. } => "operatorUnary",
            ExpKind::Binary { op, .. } => op.construct_name(),
        }
    }
}

/// A variable or parenthesized expression followed by call suffixes.
#[derive(Debug, Clone, PartialEq)]
pub struct PrefixExp {
    pub head: VarOrExp,
    pub calls: Vec<CallSuffix>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum VarOrExp {
    Var(Var),
    Paren(Box<Exp>),
}

/// `root` followed by field/index accesses, e.g. `a.b[c]` or `f().x`.
#[derive(Debug, Clone, PartialEq)]
pub struct VarKind {
    pub root: VarRoot,
    pub suffixes: Vec<VarSuffix>,
}

impl VarKind {
    /// The identifier if this is a bare name with no accesses.
    pub fn as_name(&self) -> Option<&str> {
        match (&self.root, self.suffixes.is_empty()) {
            (VarRoot::Name(name), true) => Some(name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum VarRoot {
    Name(String),
    Paren(Box<Exp>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarSuffix {
    pub calls: Vec<CallSuffix>,
    pub access: Access,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Access {
    Index(Box<Exp>),
    Member(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberClass {
    Int,
    Hex,
    Float,
    HexFloat,
}

/// A numeric literal as written; conversion to a constant happens at lowering.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberLit {
    pub class: NumberClass,
    pub text: String,
}

impl NumberLit {
    pub fn new(class: NumberClass, text: impl Into<String>) -> Self {
        NumberLit { class, text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableConstructor {
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Keyed { key: Exp, value: Exp },
    Named { name: String, value: Exp },
    Positional(Exp),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncBody {
    pub params: Vec<String>,
    pub is_vararg: bool,
    pub body: Block,
}

/// `a.b.c` or `a.b:c` in a function statement.
#[derive(Debug, Clone, PartialEq)]
pub struct FuncName {
    pub path: Vec<String>,
    pub method: Option<String>,
}

/// A local name with its optional `<const>` / `<close>` attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct AttName {
    pub name: String,
    pub attrib: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CondClause {
    pub cond: Exp,
    pub body: Block,
}

/// Represents unary operators in the AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,  // not
    Neg,  // -
    Len,  // #
    BNot, // ~
}

/// Represents binary operators in the AST.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Or,     // or
    And,    // and
    Lt,     // <
    Gt,     // >
    Le,     // <=
    Ge,     // >=
    Eq,     // ==
    Ne,     // ~=
    BOr,    // |
    BXor,   // ~
    BAnd,   // &
    Shl,    // <<
    Shr,    // >>
    Concat, // ..
    Add,    // +
    Sub,    // -
    Mul,    // *
    Div,    // /
    IDiv,   // //
    Mod,    // %
    Pow,    // ^
}

impl BinaryOperator {
    pub fn construct_name(self) -> &'static str {
        use BinaryOperator::*;
        match self {
            Or => "operatorOr",
            And => "operatorAnd",
            Lt | Gt | Le | Ge | Eq | Ne => "operatorComparison",
            BOr | BXor | BAnd | Shl | Shr => "operatorBitwise",
            Concat => "operatorStrcat",
            Add | Sub => "operatorAddSub",
            Mul | Div | IDiv | Mod => "operatorMulDivMod",
            Pow => "operatorPower",
        }
    }
}
