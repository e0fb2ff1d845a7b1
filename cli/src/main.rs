mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Arg, ArgAction, ArgMatches, Command};
use log::LevelFilter;
use luair_core::{LuairErrorExt, Module, Script, compile_script};

use crate::output::OutputError;

fn main() -> ExitCode {
    let cli = Command::new("luair")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Lower Lua scripts to the lua IR dialect");

    let matches = setup_cli(cli).get_matches();
    output::init_logger(log_level(&matches));

    match run(&matches) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::print_error(&*err);
            ExitCode::FAILURE
        }
    }
}

/// Configures the command-line interface.
fn setup_cli(cli: Command) -> Command {
    cli.arg(
        Arg::new("file")
            .help("The Lua script to lower")
            .required(true)
            .value_parser(clap::value_parser!(PathBuf))
            .value_name("FILE")
            .index(1),
    )
    .arg(
        Arg::new("emit")
            .help("Output format of the lowered module")
            .long("emit")
            .value_parser(["text", "json"])
            .default_value("text")
            .value_name("FORMAT"),
    )
    .arg(
        Arg::new("output")
            .help("Write the module to FILE instead of standard output")
            .short('o')
            .long("output")
            .value_parser(clap::value_parser!(PathBuf))
            .value_name("FILE"),
    )
    .arg(
        Arg::new("stats")
            .help("Print a table of emitted operations to standard error")
            .long("stats")
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("verbose")
            .help("Increase log verbosity (-v info, -vv debug, -vvv trace)")
            .short('v')
            .long("verbose")
            .action(ArgAction::Count),
    )
    .arg(
        Arg::new("quiet")
            .help("Disable all logging")
            .short('q')
            .long("quiet")
            .action(ArgAction::SetTrue)
            .conflicts_with("verbose"),
    )
}

fn log_level(matches: &ArgMatches) -> LevelFilter {
    if matches.get_flag("quiet") {
        return LevelFilter::Off;
    }
    match matches.get_count("verbose") {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn run(matches: &ArgMatches) -> Result<(), Box<dyn LuairErrorExt>> {
    let Some(file) = matches.get_one::<PathBuf>("file") else {
        return Err(Box::new(OutputError::new("no input file given")));
    };

    let script = Script::new(file.clone())?;
    log::info!("compiling {}", script.name);
    let module = compile_script(&script)?;

    if matches.get_flag("stats") {
        eprintln!("{}", output::stats_table(&module));
    }

    let rendered = render(&module, matches.get_one::<String>("emit").map(String::as_str))?;
    match matches.get_one::<PathBuf>("output") {
        Some(path) => std::fs::write(path, rendered).map_err(|err| {
            Box::new(OutputError::new(format!("cannot write {}: {}", path.display(), err))) as Box<dyn LuairErrorExt>
        })?,
        None => println!("{}", rendered),
    }
    Ok(())
}

fn render(module: &Module, emit: Option<&str>) -> Result<String, Box<dyn LuairErrorExt>> {
    match emit {
        Some("json") => serde_json::to_string_pretty(module).map_err(|err| {
            Box::new(OutputError::new(format!("cannot serialize module: {}", err))) as Box<dyn LuairErrorExt>
        }),
        _ => Ok(module.to_string()),
    }
}
