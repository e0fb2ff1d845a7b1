pub mod ast;
pub mod error;
pub mod ir;
pub mod location;
pub mod script;

pub use ast::{LuaParser, generate_ast_from_source};
pub use error::{Level, LuairErrorExt};
pub use ir::{LowerError, Module, OpCatalogue, lower_chunk, verify_module};
pub use location::{Location, SourceMap, Span};
pub use script::Script;

pub fn generate_error_report<E: LuairErrorExt + ?Sized>(error: &E) -> String {
    let level = error.level();
    let location = match error.location() {
        Some(loc) => loc.to_string(),
        None => "unknown location".to_string(),
    };
    let message = error.message();

    format!("LUAIR | {} | {} | {}", level, location, message)
}

/// Parse `script` and lower it with the standard operation catalogue.
pub fn compile_script(script: &Script) -> Result<Module, Box<dyn LuairErrorExt>> {
    compile_script_with(script, &OpCatalogue::lua())
}

pub fn compile_script_with(script: &Script, catalogue: &OpCatalogue) -> Result<Module, Box<dyn LuairErrorExt>> {
    let chunk = generate_ast_from_source(script)?;
    let sources = script.source_map();
    lower_chunk(&chunk, &sources, catalogue).map_err(|e| Box::new(e) as Box<dyn LuairErrorExt>)
}
