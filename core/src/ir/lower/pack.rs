//! file: core/src/ir/lower/pack.rs
//! description: single values versus value packs.
//!
//! Every multi-value construct (call arguments, call results, multiple
//! assignment) goes through `pack` and `unpack` here. A `Lowered::Pack` is
//! never used where one value is required without an explicit
//! `adjust_to_one`.
//!
use crate::ir::value::{PackValue, RefValue, ValueId};
use crate::location::Location;

use super::err::LowerError;
use super::function_builder::FunctionBuilder;

/// Result of lowering one expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lowered {
    Value(RefValue),
    /// The full result list of a call.
    Pack(PackValue),
}

impl Lowered {
    pub fn id(self) -> ValueId {
        match self {
            Lowered::Value(value) => value.id(),
            Lowered::Pack(pack) => pack.id(),
        }
    }

    pub fn is_pack(self) -> bool {
        matches!(self, Lowered::Pack(_))
    }
}

/// Emit `lua.concat` over `items`. Only the last item may be a pack; it
/// contributes all of its values.
pub fn pack(fb: &mut FunctionBuilder, items: &[Lowered], loc: Location) -> Result<PackValue, LowerError> {
    if let Some(pos) = items.iter().rev().skip(1).position(|item| item.is_pack()) {
        return Err(LowerError::invariant(
            format!("pack at position {} of {} is not the last item", items.len() - 2 - pos, items.len()),
            Some(loc),
        ));
    }
    let ids: Vec<ValueId> = items.iter().map(|item| item.id()).collect();
    Ok(fb.ops().concat(&ids, loc)?)
}

/// Emit `lua.unpack` producing exactly `count` values.
pub fn unpack(fb: &mut FunctionBuilder, pack: PackValue, count: usize, loc: Location) -> Result<Vec<RefValue>, LowerError> {
    let values = fb.ops().unpack(pack, count, loc.clone())?;
    if values.len() != count {
        return Err(LowerError::invariant(
            format!("unpack produced {} value(s), expected {}", values.len(), count),
            Some(loc),
        ));
    }
    Ok(values)
}

/// Reduce a lowering result to one value; a pack keeps only its first value
/// (nil if it is empty).
pub fn adjust_to_one(fb: &mut FunctionBuilder, lowered: Lowered, loc: Location) -> Result<RefValue, LowerError> {
    match lowered {
        Lowered::Value(value) => Ok(value),
        Lowered::Pack(pack) => {
            let values = unpack(fb, pack, 1, loc.clone())?;
            values
                .first()
                .copied()
                .ok_or_else(|| LowerError::invariant("single-value unpack produced nothing", Some(loc)))
        }
    }
}
