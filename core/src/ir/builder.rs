//! file: core/src/ir/builder.rs
//! description: positioned operation builder with one factory per op kind.
//!
//! Every factory has a fixed operand, attribute and result shape, and
//! returns typed handles (`RefValue` / `PackValue`) so a pack cannot be
//! passed where a single value is expected.
//!
use std::collections::BTreeMap;

use super::catalogue::OpCatalogue;
use super::err::IrError;
use super::module::Module;
use super::op::OpKind;
use super::value::{Attribute, BlockId, NumberValue, PackValue, RefValue, ValueId, ValueType};
use crate::location::Location;

/// Inserts operations at the end of one block.
pub struct OpBuilder<'m> {
    module: &'m mut Module,
    catalogue: &'m OpCatalogue,
    block: BlockId,
}

impl<'m> OpBuilder<'m> {
    pub fn at_end(module: &'m mut Module, catalogue: &'m OpCatalogue, block: BlockId) -> Self {
        OpBuilder { module, catalogue, block }
    }

    pub fn nil(&mut self, loc: Location) -> Result<RefValue, IrError> {
        let results = self.insert(OpKind::Nil, Vec::new(), BTreeMap::new(), &[ValueType::Ref], loc)?;
        single(OpKind::Nil, &results).map(RefValue::new)
    }

    pub fn number(&mut self, value: NumberValue, loc: Location) -> Result<RefValue, IrError> {
        let attributes = BTreeMap::from([("value".to_string(), Attribute::from(value))]);
        let results = self.insert(OpKind::Number, Vec::new(), attributes, &[ValueType::Ref], loc)?;
        single(OpKind::Number, &results).map(RefValue::new)
    }

    pub fn get_or_alloc(&mut self, name: &str, loc: Location) -> Result<RefValue, IrError> {
        let attributes = BTreeMap::from([("var".to_string(), Attribute::Str(name.to_string()))]);
        let results = self.insert(OpKind::GetOrAlloc, Vec::new(), attributes, &[ValueType::Ref], loc)?;
        single(OpKind::GetOrAlloc, &results).map(RefValue::new)
    }

    /// Group values into one pack. A pack operand contributes all of its
    /// values in place.
    pub fn concat(&mut self, items: &[ValueId], loc: Location) -> Result<PackValue, IrError> {
        let results = self.insert(OpKind::Concat, items.to_vec(), BTreeMap::new(), &[ValueType::Pack], loc)?;
        single(OpKind::Concat, &results).map(PackValue::new)
    }

    /// Expand `pack` into exactly `count` values, nil-padded or truncated.
    pub fn unpack(&mut self, pack: PackValue, count: usize, loc: Location) -> Result<Vec<RefValue>, IrError> {
        let types = vec![ValueType::Ref; count];
        let results = self.insert(OpKind::Unpack, vec![pack.id()], BTreeMap::new(), &types, loc)?;
        Ok(results.into_iter().map(RefValue::new).collect())
    }

    pub fn assign(&mut self, target: RefValue, value: RefValue, loc: Location) -> Result<(), IrError> {
        self.insert(OpKind::Assign, vec![target.id(), value.id()], BTreeMap::new(), &[], loc)?;
        Ok(())
    }

    pub fn call(&mut self, callee: RefValue, args: PackValue, loc: Location) -> Result<PackValue, IrError> {
        let results = self.insert(OpKind::Call, vec![callee.id(), args.id()], BTreeMap::new(), &[ValueType::Pack], loc)?;
        single(OpKind::Call, &results).map(PackValue::new)
    }

    pub fn ret(&mut self, loc: Location) -> Result<(), IrError> {
        self.insert(OpKind::Return, Vec::new(), BTreeMap::new(), &[], loc)?;
        Ok(())
    }

    fn insert(
        &mut self,
        kind: OpKind,
        operands: Vec<ValueId>,
        attributes: BTreeMap<String, Attribute>,
        results: &[ValueType],
        loc: Location,
    ) -> Result<Vec<ValueId>, IrError> {
        if self.catalogue.get(kind).is_none() {
            return Err(IrError::UnregisteredOp(kind));
        }
        if self.is_terminated()? {
            return Err(IrError::BlockTerminated { block: self.block, kind });
        }
        log::trace!("emit {} at {}", kind, loc);
        let op = self.module.push_op(self.block, kind, operands, attributes, results, loc)?;
        Ok(self.module.op(op).map(|op| op.results.clone()).unwrap_or_default())
    }

    fn is_terminated(&self) -> Result<bool, IrError> {
        let block = self.module.block(self.block).ok_or(IrError::UnknownBlock(self.block))?;
        Ok(block
            .ops
            .last()
            .and_then(|id| self.module.op(*id))
            .and_then(|op| self.catalogue.get(op.kind))
            .is_some_and(|def| def.terminator))
    }
}

fn single(kind: OpKind, results: &[ValueId]) -> Result<ValueId, IrError> {
    results.first().copied().ok_or(IrError::MissingResult(kind))
}
