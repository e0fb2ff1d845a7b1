//! file: core/src/ir/lower/mod.rs
//! description: syntax tree to IR lowering.
//!
//! `lower_chunk` builds a module holding one function, `main`, whose single
//! block contains the lowered statements of the chunk followed by an
//! implicit `return`. The module is verified before it is returned; any
//! unsupported construct or verification failure aborts the whole chunk.
//!
pub mod err;
pub mod function_builder;
pub mod lower_call;
pub mod lower_expr;
pub mod lower_stmt;
pub mod lowering_context;
pub mod pack;

pub use err::LowerError;
pub use function_builder::FunctionBuilder;
pub use lowering_context::{LoweringContext, SymbolScope};
pub use pack::Lowered;

use crate::ast::Chunk;
use crate::ir::catalogue::OpCatalogue;
use crate::ir::module::Module;
use crate::ir::verify::verify_module;
use crate::location::SourceMap;

pub fn lower_chunk(chunk: &Chunk, sources: &SourceMap, catalogue: &OpCatalogue) -> Result<Module, LowerError> {
    let mut module = Module::new();

    let mut main = FunctionBuilder::open(&mut module, catalogue, sources, "main", sources.start_loc(chunk))?;
    lower_stmt::lower_block(&mut main, &chunk.block)?;
    let end = main.end_loc(&chunk.block);
    main.finish(end)?;

    verify_module(&module, catalogue)?;
    log::info!("lowered '{}' into {} operation(s)", sources.file(), module.op_count());
    Ok(module)
}
