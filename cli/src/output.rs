//! file: cli/src/output.rs
//! description: console logging, error printing and the op statistics table.
//!
use std::collections::BTreeMap;

use comfy_table::{Cell, Table, presets::UTF8_FULL};
use console::Style;
use log::LevelFilter;
use luair_core::error::Level;
use luair_core::ir::OpKind;
use luair_core::location::{Location, Span};
use luair_core::{LuairErrorExt, Module, generate_error_report};

/// Install the standard-error log backend. `level` comes from the `-v`/`-q`
/// flags; `RUST_LOG` directives, when set, refine it per module.
pub fn init_logger(level: LevelFilter) {
    let installed = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .try_init();
    if installed.is_err() {
        log::warn!("a logger was already installed");
    }
}

pub fn print_error(err: &dyn LuairErrorExt) {
    let style = match err.level() {
        Level::Critical => Style::new().red().bold().underlined(),
        Level::Error => Style::new().red().bold(),
        Level::Warning => Style::new().yellow(),
        Level::Info => Style::new().cyan(),
    };
    eprintln!("{}", style.apply_to(generate_error_report(err)));
    if let Some(span) = err.span() {
        eprintln!("  {} {}", Style::new().dim().apply_to("-->"), span);
    }
}

/// Number of operations of each kind, in catalogue order.
pub fn stats_table(module: &Module) -> Table {
    let mut counts: BTreeMap<OpKind, usize> = BTreeMap::new();
    for op in module.ops() {
        *counts.entry(op.kind).or_default() += 1;
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["operation", "count"]);
    for (kind, count) in &counts {
        table.add_row(vec![Cell::new(kind.mnemonic()), Cell::new(count)]);
    }
    table.add_row(vec![Cell::new("total"), Cell::new(module.op_count())]);
    table
}

/// Failure in the command-line layer itself (arguments, output files).
#[derive(Debug, Clone)]
pub struct OutputError {
    message: String,
}

impl OutputError {
    pub fn new(message: impl Into<String>) -> Self {
        OutputError { message: message.into() }
    }
}

impl std::fmt::Display for OutputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for OutputError {}

impl LuairErrorExt for OutputError {
    fn level(&self) -> Level {
        Level::Error
    }

    fn message(&self) -> String {
        self.message.clone()
    }

    fn issuer(&self) -> String {
        "luair.cli".to_string()
    }

    fn span(&self) -> Option<Span> {
        None
    }

    fn location(&self) -> Option<Location> {
        None
    }
}
