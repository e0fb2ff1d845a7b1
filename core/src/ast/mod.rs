//! file: core/src/ast/mod.rs
//! description: Lua syntax tree and the `pest` front end that builds it.
//!
//! `generate_ast_from_source` parses a whole script into a `Chunk`. Parse
//! failures are reported as `SyntaxError`s located at the failing position.
//!
pub mod err;
pub mod expr;
pub mod kind;
pub mod node;
pub mod rules;
pub mod stmt;

use pest::Parser;

pub use err::SyntaxError;
pub use kind::*;
pub use node::*;
pub use rules::{LuaParser, Rule};

use crate::error::{Level, LuairErrorExt};
use crate::location::{Location, Span};
use crate::script::Script;

/// Parse `script` into a syntax tree.
pub fn generate_ast_from_source(script: &Script) -> Result<Chunk, Box<dyn LuairErrorExt>> {
    let mut pairs = LuaParser::parse(Rule::chunk, &script.content)
        .map_err(|err| syntax_error_from_pest(err, script))?;
    let ctx = rules::ParseContext::new(script);
    let chunk = ctx.next(&mut pairs, None)?;
    let chunk = stmt::parse_chunk_rule(chunk, &ctx)?;
    log::debug!("parsed '{}' into {} top-level statements", script.name, chunk.block.stats.len());
    Ok(chunk)
}

fn syntax_error_from_pest(err: pest::error::Error<Rule>, script: &Script) -> Box<dyn LuairErrorExt> {
    let ((line, column), end) = match err.line_col {
        pest::error::LineColLocation::Pos(pos) => (pos, pos),
        pest::error::LineColLocation::Span(start, end) => (start, end),
    };
    let location = Location::new(script.name.clone(), line, column);
    let span = Span::new(location.clone(), Location::new(script.name.clone(), end.0, end.1));
    Box::new(SyntaxError::with(
        Level::Error,
        err.variant.message().to_string(),
        "luair.ast.generate_ast_from_source".to_string(),
        Some(location),
        Some(span),
    ))
}
