use crate::ir::builder::OpBuilder;
use crate::ir::catalogue::OpCatalogue;
use crate::ir::module::Module;
use crate::ir::value::RefValue;
use crate::location::{Located, Location, SourceMap, Span};

use super::err::LowerError;
use super::lowering_context::LoweringContext;

/// Lowering state of one function: the module it writes into, the
/// operation catalogue, source positions, and its scope and block cursor.
pub struct FunctionBuilder<'a, 'src> {
    module: &'a mut Module,
    catalogue: &'a OpCatalogue,
    sources: &'a SourceMap<'src>,
    ctx: LoweringContext,
    name: String,
}

impl<'a, 'src> FunctionBuilder<'a, 'src> {
    /// Add function `name` to `module` and open its entry block.
    pub fn open(
        module: &'a mut Module,
        catalogue: &'a OpCatalogue,
        sources: &'a SourceMap<'src>,
        name: &str,
        loc: Location,
    ) -> Result<Self, LowerError> {
        let body = module.add_function(name, loc.clone());
        let block = module
            .add_entry_block(body)
            .map_err(|err| LowerError::invariant(err.to_string(), Some(loc)))?;
        log::debug!("opened {} of function '{}'", block, name);
        Ok(FunctionBuilder { module, catalogue, sources, ctx: LoweringContext::new(block), name: name.to_string() })
    }

    /// Builder positioned at the end of the current block.
    pub fn ops(&mut self) -> OpBuilder<'_> {
        OpBuilder::at_end(self.module, self.catalogue, self.ctx.block)
    }

    pub fn start_loc(&self, node: &impl Located) -> Location {
        self.sources.start_loc(node)
    }

    pub fn end_loc(&self, node: &impl Located) -> Location {
        self.sources.end_loc(node)
    }

    pub fn span(&self, node: &impl Located) -> Span {
        self.sources.span(node)
    }

    /// The storage cell of `name`, allocated with `lua.get_or_alloc` the
    /// first time the name is seen in this function.
    pub fn resolve_or_declare(&mut self, name: &str, loc: Location) -> Result<RefValue, LowerError> {
        let (module, catalogue, block) = (&mut *self.module, self.catalogue, self.ctx.block);
        self.ctx.scope.resolve_or_declare(name, || {
            log::trace!("declaring '{}' at {}", name, loc);
            OpBuilder::at_end(module, catalogue, block)
                .get_or_alloc(name, loc)
                .map_err(LowerError::from)
        })
    }

    /// Terminate the current block with an implicit `return`.
    pub fn finish(mut self, loc: Location) -> Result<(), LowerError> {
        self.ops().ret(loc)?;
        log::debug!("function '{}' closed with {} variable(s)", self.name, self.ctx.scope.len());
        Ok(())
    }
}
