use std::collections::HashSet;
use std::fmt;

use super::catalogue::{OpCatalogue, OperandShape, ResultShape, TypeConstraint};
use super::module::{Block, Function, Module};
use super::op::{OpKind, Operation};
use super::value::{AttrKind, BlockId, ValueId, ValueType};
use crate::location::Location;

/// Structural problems found in a module.
#[derive(Debug, Clone, PartialEq)]
pub enum VerifyError {
    /// The module has no `main` function.
    MissingMain,

    DuplicateFunction { name: String },

    /// A function body region without blocks.
    EmptyRegion { function: String },

    EntryBlockArguments { function: String, count: usize },

    /// A block does not end in a terminator.
    MissingTerminator { function: String, block: BlockId },

    TerminatorNotLast { function: String, block: BlockId, loc: Location },

    /// The operation kind is not part of the catalogue the module is checked against.
    UnknownOp { function: String, kind: OpKind, loc: Location },

    OperandCount { function: String, kind: OpKind, expected: usize, actual: usize, loc: Location },

    OperandType { function: String, kind: OpKind, index: usize, actual: ValueType, loc: Location },

    ResultCount { function: String, kind: OpKind, expected: usize, actual: usize, loc: Location },

    ResultType { function: String, kind: OpKind, index: usize, actual: ValueType, loc: Location },

    MissingAttribute { function: String, kind: OpKind, name: &'static str, loc: Location },

    AttributeKind { function: String, kind: OpKind, name: &'static str, actual: AttrKind, loc: Location },

    /// An operand that is not defined before its use.
    UseBeforeDef { function: String, kind: OpKind, value: ValueId, loc: Location },
}

impl VerifyError {
    pub fn location(&self) -> Option<&Location> {
        match self {
            VerifyError::MissingMain
            | VerifyError::DuplicateFunction { .. }
            | VerifyError::EmptyRegion { .. }
            | VerifyError::EntryBlockArguments { .. }
            | VerifyError::MissingTerminator { .. } => None,
            VerifyError::TerminatorNotLast { loc, .. }
            | VerifyError::UnknownOp { loc, .. }
            | VerifyError::OperandCount { loc, .. }
            | VerifyError::OperandType { loc, .. }
            | VerifyError::ResultCount { loc, .. }
            | VerifyError::ResultType { loc, .. }
            | VerifyError::MissingAttribute { loc, .. }
            | VerifyError::AttributeKind { loc, .. }
            | VerifyError::UseBeforeDef { loc, .. } => Some(loc),
        }
    }
}

impl fmt::Display for VerifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerifyError::MissingMain => write!(f, "module has no 'main' function"),
            VerifyError::DuplicateFunction { name } => write!(f, "function '{}' is defined twice", name),
            VerifyError::EmptyRegion { function } => write!(f, "body of '{}' has no blocks", function),
            VerifyError::EntryBlockArguments { function, count } => {
                write!(f, "entry block of '{}' has {} argument(s), expected none", function, count)
            }
            VerifyError::MissingTerminator { function, block } => {
                write!(f, "block {} of '{}' does not end in a terminator", block, function)
            }
            VerifyError::TerminatorNotLast { function, block, .. } => {
                write!(f, "terminator in the middle of block {} of '{}'", block, function)
            }
            VerifyError::UnknownOp { function, kind, .. } => {
                write!(f, "'{}' in '{}' is not a registered operation", kind, function)
            }
            VerifyError::OperandCount { function, kind, expected, actual, .. } => {
                write!(f, "'{}' in '{}' expects {} operand(s), got {}", kind, function, expected, actual)
            }
            VerifyError::OperandType { function, kind, index, actual, .. } => {
                write!(f, "operand #{} of '{}' in '{}' has invalid type {}", index, kind, function, actual)
            }
            VerifyError::ResultCount { function, kind, expected, actual, .. } => {
                write!(f, "'{}' in '{}' expects {} result(s), got {}", kind, function, expected, actual)
            }
            VerifyError::ResultType { function, kind, index, actual, .. } => {
                write!(f, "result #{} of '{}' in '{}' has invalid type {}", index, kind, function, actual)
            }
            VerifyError::MissingAttribute { function, kind, name, .. } => {
                write!(f, "'{}' in '{}' requires attribute '{}'", kind, function, name)
            }
            VerifyError::AttributeKind { function, kind, name, actual, .. } => {
                write!(f, "attribute '{}' of '{}' in '{}' cannot be {}", name, kind, function, actual)
            }
            VerifyError::UseBeforeDef { function, kind, value, .. } => {
                write!(f, "'{}' in '{}' uses {} before its definition", kind, function, value)
            }
        }
    }
}

impl std::error::Error for VerifyError {}

pub type VerifyResult = Result<(), Vec<VerifyError>>;

/// Check `module` against `catalogue`, reporting every problem found.
pub fn verify_module(module: &Module, catalogue: &OpCatalogue) -> VerifyResult {
    ModuleVerifier::new(module, catalogue).verify()
}

pub struct ModuleVerifier<'a> {
    module: &'a Module,
    catalogue: &'a OpCatalogue,
    errors: Vec<VerifyError>,
}

impl<'a> ModuleVerifier<'a> {
    pub fn new(module: &'a Module, catalogue: &'a OpCatalogue) -> Self {
        Self { module, catalogue, errors: Vec::new() }
    }

    pub fn verify(mut self) -> VerifyResult {
        let module = self.module;
        let mut names = HashSet::new();
        for function in &module.functions {
            if !names.insert(function.name.as_str()) {
                self.errors.push(VerifyError::DuplicateFunction { name: function.name.clone() });
            }
        }
        if !names.contains("main") {
            self.errors.push(VerifyError::MissingMain);
        }

        for function in &module.functions {
            self.verify_function(function);
        }

        if self.errors.is_empty() { Ok(()) } else { Err(self.errors) }
    }

    fn verify_function(&mut self, function: &Function) {
        let module = self.module;
        let blocks = match module.region(function.body) {
            Some(region) if !region.blocks.is_empty() => &region.blocks,
            _ => {
                self.errors.push(VerifyError::EmptyRegion { function: function.name.clone() });
                return;
            }
        };

        let mut defined: HashSet<ValueId> = HashSet::new();
        for (index, id) in blocks.iter().enumerate() {
            let Some(block) = module.block(*id) else {
                self.errors.push(VerifyError::EmptyRegion { function: function.name.clone() });
                continue;
            };
            if index == 0 && !block.args.is_empty() {
                self.errors.push(VerifyError::EntryBlockArguments {
                    function: function.name.clone(),
                    count: block.args.len(),
                });
            }
            defined.extend(block.args.iter().copied());
            self.verify_block(&function.name, *id, block, &mut defined);
        }
    }

    fn verify_block(&mut self, function: &str, id: BlockId, block: &Block, defined: &mut HashSet<ValueId>) {
        let module = self.module;
        let ops: Vec<&Operation> = block.ops.iter().filter_map(|op| module.op(*op)).collect();

        let terminated = ops
            .last()
            .and_then(|op| self.catalogue.get(op.kind))
            .is_some_and(|def| def.terminator);
        if !terminated {
            self.errors.push(VerifyError::MissingTerminator { function: function.to_string(), block: id });
        }

        for (index, op) in ops.iter().enumerate() {
            self.verify_op(function, id, op, index + 1 == ops.len(), defined);
            defined.extend(op.results.iter().copied());
        }
    }

    fn verify_op(&mut self, function: &str, block: BlockId, op: &Operation, is_last: bool, defined: &HashSet<ValueId>) {
        let function = function.to_string();
        let loc = op.loc.clone();
        let Some(def) = self.catalogue.get(op.kind) else {
            self.errors.push(VerifyError::UnknownOp { function, kind: op.kind, loc });
            return;
        };

        if def.terminator && !is_last {
            self.errors.push(VerifyError::TerminatorNotLast { function: function.clone(), block, loc: loc.clone() });
        }

        for value in &op.operands {
            if !defined.contains(value) {
                self.errors.push(VerifyError::UseBeforeDef {
                    function: function.clone(),
                    kind: op.kind,
                    value: *value,
                    loc: loc.clone(),
                });
            }
        }

        let operand_types: Vec<Option<ValueType>> =
            op.operands.iter().map(|v| self.module.value_type(*v)).collect();
        match def.operands {
            OperandShape::Fixed(constraints) => {
                if constraints.len() != operand_types.len() {
                    self.errors.push(VerifyError::OperandCount {
                        function: function.clone(),
                        kind: op.kind,
                        expected: constraints.len(),
                        actual: operand_types.len(),
                        loc: loc.clone(),
                    });
                } else {
                    for (index, (constraint, ty)) in constraints.iter().zip(&operand_types).enumerate() {
                        self.check_operand(&function, op, index, *constraint, *ty);
                    }
                }
            }
            OperandShape::Variadic(constraint) => {
                for (index, ty) in operand_types.iter().enumerate() {
                    self.check_operand(&function, op, index, constraint, *ty);
                }
            }
        }

        let result_types: Vec<Option<ValueType>> = op.results.iter().map(|v| self.module.value_type(*v)).collect();
        let expected: Option<&[ValueType]> = match def.results {
            ResultShape::Fixed(types) => Some(types),
            ResultShape::Variadic(_) => None,
        };
        if let Some(types) = expected {
            if types.len() != result_types.len() {
                self.errors.push(VerifyError::ResultCount {
                    function: function.clone(),
                    kind: op.kind,
                    expected: types.len(),
                    actual: result_types.len(),
                    loc: loc.clone(),
                });
            }
        }
        for (index, ty) in result_types.iter().enumerate() {
            let wanted = match def.results {
                ResultShape::Fixed(types) => types.get(index).copied(),
                ResultShape::Variadic(ty) => Some(ty),
            };
            if let (Some(wanted), Some(actual)) = (wanted, ty) {
                if wanted != *actual {
                    self.errors.push(VerifyError::ResultType {
                        function: function.clone(),
                        kind: op.kind,
                        index,
                        actual: *actual,
                        loc: loc.clone(),
                    });
                }
            }
        }

        for spec in def.attributes {
            match op.attribute(spec.name) {
                None => self.errors.push(VerifyError::MissingAttribute {
                    function: function.clone(),
                    kind: op.kind,
                    name: spec.name,
                    loc: loc.clone(),
                }),
                Some(attr) if !spec.kinds.contains(&attr.kind()) => self.errors.push(VerifyError::AttributeKind {
                    function: function.clone(),
                    kind: op.kind,
                    name: spec.name,
                    actual: attr.kind(),
                    loc: loc.clone(),
                }),
                Some(_) => {}
            }
        }
    }

    fn check_operand(&mut self, function: &str, op: &Operation, index: usize, constraint: TypeConstraint, ty: Option<ValueType>) {
        // Unknown values are already reported as use-before-def.
        if let Some(ty) = ty {
            if !constraint.admits(ty) {
                self.errors.push(VerifyError::OperandType {
                    function: function.to_string(),
                    kind: op.kind,
                    index,
                    actual: ty,
                    loc: op.loc.clone(),
                });
            }
        }
    }
}
