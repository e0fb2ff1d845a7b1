//! file: core/src/ir/lower/lower_stmt.rs
//! description: statement lowering.
//!
//! Assignment lists and call statements are lowered; every other statement
//! kind fails with its construct name.
//!
use crate::ast::{Block, Exp, Stat, StatKind, Var};

use super::err::LowerError;
use super::function_builder::FunctionBuilder;
use super::lower_expr::{lower_explist, lower_prefixexp, lower_var};
use super::pack::{pack, unpack};

pub fn lower_block(fb: &mut FunctionBuilder, block: &Block) -> Result<(), LowerError> {
    for stat in &block.stats {
        lower_stat(fb, stat)?;
    }
    match &block.ret {
        Some(ret) => Err(LowerError::unsupported("retstat", fb.span(ret))),
        None => Ok(()),
    }
}

pub fn lower_stat(fb: &mut FunctionBuilder, stat: &Stat) -> Result<(), LowerError> {
    log::debug!("lowering {} at {}", stat.kind.construct_name(), fb.start_loc(stat));
    match &stat.kind {
        StatKind::Assign { targets, values } => lower_assign(fb, stat, targets, values),
        StatKind::Call(prefix) => {
            // Results are discarded.
            lower_prefixexp(fb, prefix, stat)?;
            Ok(())
        }
        other => Err(LowerError::unsupported(other.construct_name(), fb.span(stat))),
    }
}

/// `t1, ..., tn = e1, ..., em`: cells for the targets, then the values, one
/// pack, one unpack to `n` values and `n` assignments. Extra values are
/// dropped and missing ones are nil, without a diagnostic.
fn lower_assign(fb: &mut FunctionBuilder, stat: &Stat, targets: &[Var], values: &[Exp]) -> Result<(), LowerError> {
    let loc = fb.start_loc(stat);

    let cells = targets.iter().map(|target| lower_var(fb, target)).collect::<Result<Vec<_>, _>>()?;
    let values = lower_explist(fb, values)?;

    let ends_in_pack = values.last().is_some_and(|v| v.is_pack());
    if !ends_in_pack && values.len() != cells.len() {
        log::debug!(
            "assignment at {} has {} target(s) and {} value(s); adjusting to {}",
            loc,
            cells.len(),
            values.len(),
            cells.len()
        );
    }

    let packed = pack(fb, &values, loc.clone())?;
    let unpacked = unpack(fb, packed, cells.len(), loc.clone())?;
    for (cell, value) in cells.into_iter().zip(unpacked) {
        fb.ops().assign(cell, value, loc.clone())?;
    }
    Ok(())
}
