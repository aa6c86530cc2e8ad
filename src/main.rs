mod repl;

use std::{fs, path::PathBuf, process};

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use log::{info, LevelFilter};
use wanda_playground::{
    catalog::{self, DEFAULT_EXAMPLE},
    Bridge, RunOptions, Selector,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// log every rewrite step
    #[arg(long, global = true)]
    trace: bool,

    /// raise the log level (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// run a file or a bundled example (the default example when neither is given)
    Run {
        #[arg(value_name = "FILE", conflicts_with = "example")]
        file: Option<PathBuf>,

        #[arg(short, long)]
        example: Option<String>,
    },
    /// list the bundled examples
    List,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    if let Err(err) = dispatch(cli) {
        eprintln!("error: {err:#}");
        process::exit(1);
    }
}

fn init_logging(cli: &Cli) {
    env_logger::Builder::new()
        .filter_level(log_level(cli.trace, cli.verbose))
        .format_timestamp(None)
        .init();
}

/// The rewrite trace is logged at debug level, so `--trace` never goes below it.
fn log_level(trace: bool, verbose: u8) -> LevelFilter {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    if trace {
        level.max(LevelFilter::Debug)
    } else {
        level
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    let bridge = Bridge::with_options(RunOptions { trace: cli.trace })?;

    match cli.command {
        Some(Commands::Run { file, example }) => {
            let source = match (file, example) {
                (Some(file), _) => fs::read_to_string(&file)
                    .with_context(|| format!("cannot read {}", file.display()))?,
                (None, label) => select(label.as_deref().unwrap_or(DEFAULT_EXAMPLE))?,
            };
            println!("{}", bridge.execute(&source)?);
        }
        Some(Commands::List) => {
            for entry in catalog::list_examples() {
                let marker = if entry.label == DEFAULT_EXAMPLE { "*" } else { " " };
                println!("{} {}", marker, entry.label);
            }
        }
        None => repl::start(&bridge)?,
    }

    Ok(())
}

fn select(label: &str) -> Result<String> {
    let mut selector = Selector::new();
    if !selector.select_by_label(label) {
        return Err(anyhow!("no example named {label}"));
    }
    info!("running example {label}");
    Ok(selector.current_source_text().to_string())
}
