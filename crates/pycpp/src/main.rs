//! Command-line front end for the pycpp translator.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use pycpp_core::{TranspileOptions, TranspilePipeline, TypeFallback};

#[derive(Parser)]
#[command(
    name = "pycpp",
    version,
    about = "Translate a typed Python subset into compile-ready C++"
)]
struct Cli {
    /// Python source file to translate
    file: PathBuf,

    /// Write the generated C++ here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Declare untyped bindings as `auto` instead of defaulting to `int`
    #[arg(long)]
    auto_fallback: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let type_fallback = if cli.auto_fallback {
        TypeFallback::Auto
    } else {
        TypeFallback::Int
    };
    let pipeline =
        TranspilePipeline::new().with_options(TranspileOptions { type_fallback });

    let cpp = pipeline.transpile_file(&cli.file)?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, format!("{cpp}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(output = %path.display(), "wrote generated C++");
        }
        None => println!("{cpp}"),
    }
    Ok(())
}

fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
