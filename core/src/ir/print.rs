//! file: core/src/ir/print.rs
//! description: textual form of a module.
//!
//! The output follows the generic MLIR assembly layout: one operation per
//! line with its operand and result types and a trailing `loc(...)`.
//! Multi-result operations are written `%N:k` and their results used as
//! `%N#i`.
//!
use std::fmt;

use super::module::Module;
use super::op::Operation;
use super::value::{ValueDef, ValueId};
use crate::location::Location;

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "module {{")?;
        for function in &self.functions {
            writeln!(f, "  func @{}() {{", function.name)?;
            let blocks = self.region(function.body).map(|r| r.blocks.as_slice()).unwrap_or_default();
            for id in blocks {
                let Some(block) = self.block(*id) else { continue };
                if block.args.is_empty() {
                    writeln!(f, "  {}:", id)?;
                } else {
                    let args: Vec<String> = block
                        .args
                        .iter()
                        .map(|arg| format!("{}: {}", value_name(self, *arg), type_name(self, *arg)))
                        .collect();
                    writeln!(f, "  {}({}):", id, args.join(", "))?;
                }
                for op in self.block_ops(*id) {
                    writeln!(f, "    {}", OpDisplay { module: self, op })?;
                }
            }
            writeln!(f, "  }} {}", LocDisplay(&function.loc))?;
        }
        write!(f, "}}")
    }
}

struct OpDisplay<'a> {
    module: &'a Module,
    op: &'a Operation,
}

impl fmt::Display for OpDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = self.op;
        match op.results.as_slice() {
            [] => {}
            [single] => write!(f, "{} = ", single)?,
            [first, ..] => write!(f, "{}:{} = ", first, op.results.len())?,
        }
        write!(f, "{}", op.kind)?;

        let operands: Vec<String> = op.operands.iter().map(|v| value_name(self.module, *v)).collect();
        if !operands.is_empty() {
            write!(f, "({})", operands.join(", "))?;
        }
        if !op.attributes.is_empty() {
            let attrs: Vec<String> = op.attributes.iter().map(|(k, v)| format!("{} = {}", k, v)).collect();
            write!(f, " {{{}}}", attrs.join(", "))?;
        }

        let operand_types: Vec<String> = op.operands.iter().map(|v| type_name(self.module, *v)).collect();
        let result_types: Vec<String> = op.results.iter().map(|v| type_name(self.module, *v)).collect();
        write!(f, " : ({}) -> ({}) {}", operand_types.join(", "), result_types.join(", "), LocDisplay(&op.loc))
    }
}

struct LocDisplay<'a>(&'a Location);

impl fmt::Display for LocDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_unknown() {
            write!(f, "loc(unknown)")
        } else {
            write!(f, "loc({:?}:{}:{})", self.0.file, self.0.line, self.0.column)
        }
    }
}

/// `%N` for single-result values and block arguments, `%N#i` for the
/// results of a multi-result operation.
pub fn value_name(module: &Module, value: ValueId) -> String {
    if let Some(ValueDef::OpResult { op, index }) = module.value(value).map(|v| v.def) {
        if let Some(op) = module.op(op) {
            if op.results.len() > 1 {
                return format!("{}#{}", op.results[0], index);
            }
        }
    }
    value.to_string()
}

fn type_name(module: &Module, value: ValueId) -> String {
    module.value_type(value).map_or_else(|| "<invalid>".to_string(), |ty| ty.to_string())
}
