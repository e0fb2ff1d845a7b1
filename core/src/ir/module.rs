use std::collections::BTreeMap;

use serde::Serialize;

use super::err::IrError;
use super::op::{OpKind, Operation};
use super::value::{Attribute, BlockId, OpId, RegionId, ValueData, ValueDef, ValueId, ValueType};
use crate::location::Location;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Function {
    pub name: String,
    pub body: RegionId,
    pub loc: Location,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Region {
    pub blocks: Vec<BlockId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub region: RegionId,
    pub args: Vec<ValueId>,
    pub ops: Vec<OpId>,
}

/// A compilation unit. Regions, blocks, operations and values live in flat
/// arenas owned by the module and are addressed by id; nothing is removed
/// once created.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Module {
    pub functions: Vec<Function>,
    regions: Vec<Region>,
    blocks: Vec<Block>,
    ops: Vec<Operation>,
    values: Vec<ValueData>,
}

impl Module {
    pub fn new() -> Self {
        Module::default()
    }

    /// Add a function with an empty body region.
    pub fn add_function(&mut self, name: impl Into<String>, loc: Location) -> RegionId {
        let body = RegionId(self.regions.len());
        self.regions.push(Region::default());
        self.functions.push(Function { name: name.into(), body, loc });
        body
    }

    /// Open the entry block of `region`.
    pub fn add_entry_block(&mut self, region: RegionId) -> Result<BlockId, IrError> {
        let id = BlockId(self.blocks.len());
        let slot = self.regions.get_mut(region.0).ok_or(IrError::UnknownRegion(region))?;
        if !slot.blocks.is_empty() {
            return Err(IrError::RegionPopulated(region));
        }
        slot.blocks.push(id);
        self.blocks.push(Block { region, args: Vec::new(), ops: Vec::new() });
        Ok(id)
    }

    pub fn add_block_argument(&mut self, block: BlockId, ty: ValueType) -> Result<ValueId, IrError> {
        let index = self.blocks.get(block.0).ok_or(IrError::UnknownBlock(block))?.args.len();
        let id = ValueId(self.values.len());
        self.values.push(ValueData { ty, def: ValueDef::BlockArg { block, index } });
        self.blocks[block.0].args.push(id);
        Ok(id)
    }

    /// Append an operation to `block` and create its results. Shape checks
    /// belong to the builder and the verifier, not here.
    pub(crate) fn push_op(
        &mut self,
        block: BlockId,
        kind: OpKind,
        operands: Vec<ValueId>,
        attributes: BTreeMap<String, Attribute>,
        result_types: &[ValueType],
        loc: Location,
    ) -> Result<OpId, IrError> {
        if block.0 >= self.blocks.len() {
            return Err(IrError::UnknownBlock(block));
        }
        if let Some(&unknown) = operands.iter().find(|v| v.0 >= self.values.len()) {
            return Err(IrError::UnknownValue(unknown));
        }
        let op = OpId(self.ops.len());
        let results: Vec<ValueId> = result_types
            .iter()
            .enumerate()
            .map(|(index, &ty)| {
                let id = ValueId(self.values.len());
                self.values.push(ValueData { ty, def: ValueDef::OpResult { op, index } });
                id
            })
            .collect();
        self.ops.push(Operation { kind, block, operands, attributes, results, loc });
        self.blocks[block.0].ops.push(op);
        Ok(op)
    }

    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.iter().find(|f| f.name == name)
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id.0)
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(id.0)
    }

    pub fn op(&self, id: OpId) -> Option<&Operation> {
        self.ops.get(id.0)
    }

    pub fn value(&self, id: ValueId) -> Option<&ValueData> {
        self.values.get(id.0)
    }

    pub fn value_type(&self, id: ValueId) -> Option<ValueType> {
        self.value(id).map(|v| v.ty)
    }

    /// The operation producing `value`, if it is an operation result.
    pub fn defining_op(&self, value: ValueId) -> Option<&Operation> {
        match self.value(value)?.def {
            ValueDef::OpResult { op, .. } => self.op(op),
            ValueDef::BlockArg { .. } => None,
        }
    }

    /// Operations of `block` in program order.
    pub fn block_ops(&self, block: BlockId) -> impl Iterator<Item = &Operation> {
        self.block(block)
            .into_iter()
            .flat_map(|b| b.ops.iter())
            .filter_map(|id| self.op(*id))
    }

    /// The first block of the body of function `name`.
    pub fn entry_block(&self, name: &str) -> Option<BlockId> {
        let function = self.function(name)?;
        self.region(function.body)?.blocks.first().copied()
    }

    /// Every operation in the module, in creation order.
    pub fn ops(&self) -> impl Iterator<Item = &Operation> {
        self.ops.iter()
    }

    pub fn op_count(&self) -> usize {
        self.ops.len()
    }
}
