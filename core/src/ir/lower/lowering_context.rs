//! file: core/src/ir/lower/lowering_context.rs
//! description: per-function state used while lowering a chunk.
//!
//! `SymbolScope` maps bare variable names to the cell allocated for them on
//! first use. `LoweringContext` pairs the scope with the block operations
//! are currently appended to. Both live exactly as long as the lowering of
//! one function.

use std::collections::HashMap;

use crate::ir::value::{BlockId, RefValue};

/// Name to storage-cell mapping of one function.
///
/// Names are declared on first use: the first lookup allocates a cell, later
/// lookups of the same name return that cell. There is no removal and no
/// shadowing.
#[derive(Debug, Clone, Default)]
pub struct SymbolScope {
    cells: HashMap<String, RefValue>,
}

impl SymbolScope {
    pub fn new() -> Self {
        SymbolScope::default()
    }

    pub fn lookup(&self, name: &str) -> Option<RefValue> {
        self.cells.get(name).copied()
    }

    /// Return the cell bound to `name`, calling `alloc` to create and bind
    /// one if there is none yet.
    pub fn resolve_or_declare<E>(
        &mut self,
        name: &str,
        alloc: impl FnOnce() -> Result<RefValue, E>,
    ) -> Result<RefValue, E> {
        if let Some(cell) = self.lookup(name) {
            return Ok(cell);
        }
        let cell = alloc()?;
        self.cells.insert(name.to_string(), cell);
        Ok(cell)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct LoweringContext {
    pub scope: SymbolScope,
    /// Block new operations are appended to.
    pub block: BlockId,
}

impl LoweringContext {
    pub fn new(block: BlockId) -> Self {
        LoweringContext { scope: SymbolScope::new(), block }
    }
}
