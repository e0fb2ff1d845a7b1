use std::fmt;

use super::op::OpKind;
use super::value::{BlockId, RegionId, ValueId};

/// Misuse of the IR construction API. These are never caused by user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IrError {
    /// An entry block was requested for a region that already has blocks.
    RegionPopulated(RegionId),
    UnknownRegion(RegionId),
    UnknownBlock(BlockId),
    UnknownValue(ValueId),
    /// The catalogue in use does not define this operation.
    UnregisteredOp(OpKind),
    /// A factory did not get the result its operation promises.
    MissingResult(OpKind),
    /// An operation was appended after the block's terminator.
    BlockTerminated { block: BlockId, kind: OpKind },
}

impl fmt::Display for IrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrError::RegionPopulated(region) => {
                write!(f, "region #{} already has an entry block", region.0)
            }
            IrError::UnknownRegion(region) => write!(f, "region #{} does not exist", region.0),
            IrError::UnknownBlock(block) => write!(f, "block {} does not exist", block),
            IrError::UnknownValue(value) => write!(f, "value {} does not exist", value),
            IrError::UnregisteredOp(kind) => write!(f, "operation '{}' is not in the catalogue", kind),
            IrError::MissingResult(kind) => write!(f, "operation '{}' produced no result", kind),
            IrError::BlockTerminated { block, kind } => {
                write!(f, "cannot append '{}' to block {} after its terminator", kind, block)
            }
        }
    }
}

impl std::error::Error for IrError {}
