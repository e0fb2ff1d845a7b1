use crate::location::{Located, TextRange};

use super::kind::{ExpKind, StatKind, VarKind};

/// A syntax tree node: a kind plus the source range it was parsed from.
///
/// Nodes built by hand (tests, synthesized code) may have no range; the
/// location resolver reports those as unknown locations.
#[derive(Debug, Clone, PartialEq)]
pub struct AstNode<K> {
    pub kind: K,
    pub range: Option<TextRange>,
}

impl<K> AstNode<K> {
    pub fn new(kind: K, range: Option<TextRange>) -> Self {
        AstNode { kind, range }
    }

    /// Node without source information.
    pub fn synthetic(kind: K) -> Self {
        AstNode { kind, range: None }
    }
}

impl<K> Located for AstNode<K> {
    fn range(&self) -> Option<TextRange> {
        self.range
    }
}

pub type Stat = AstNode<StatKind>;
pub type Exp = AstNode<ExpKind>;
pub type Var = AstNode<VarKind>;

/// A whole compilation unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    pub block: Block,
    pub range: Option<TextRange>,
}

impl Located for Chunk {
    fn range(&self) -> Option<TextRange> {
        self.range
    }
}

/// A statement sequence with an optional trailing `return`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub stats: Vec<Stat>,
    pub ret: Option<RetStat>,
    pub range: Option<TextRange>,
}

impl Located for Block {
    fn range(&self) -> Option<TextRange> {
        self.range
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RetStat {
    pub values: Vec<Exp>,
    pub range: Option<TextRange>,
}

impl Located for RetStat {
    fn range(&self) -> Option<TextRange> {
        self.range
    }
}

/// One `(args)`, `{table}`, `"string"` or `:name(args)` suffix of a call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallSuffix {
    pub method: Option<String>,
    pub args: Args,
    pub range: Option<TextRange>,
}

impl Located for CallSuffix {
    fn range(&self) -> Option<TextRange> {
        self.range
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Args {
    List(Vec<Exp>),
    Table(Box<Exp>),
    Str(Box<Exp>),
}
