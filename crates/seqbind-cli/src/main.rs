use anyhow::Result;
use clap::Parser;
use seqbind::BindOptions;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "seqbind")]
#[command(about = "Generate cross-runtime Go binder stubs from a package model", long_about = None)]
struct Cli {
    /// Package model file (JSON)
    #[arg(short, long)]
    input: PathBuf,

    /// Output file path (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Generator config file (TOML)
    #[arg(short, long, env = "SEQBIND_CONFIG")]
    config: Option<PathBuf>,

    /// Descriptor namespace for types
    #[arg(long)]
    namespace: Option<String>,

    /// Import path of the transport package
    #[arg(long)]
    seq_import: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let level = if cli.debug {
        tracing::Level::TRACE
    } else if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(cli.debug)
        .with_writer(std::io::stderr)
        .init();

    let options = BindOptions {
        input: cli.input,
        output: cli.output,
        config: cli.config,
        namespace: cli.namespace,
        seq_import: cli.seq_import,
    };

    let generation = seqbind::run(&options)?;
    if !generation.is_success() {
        eprintln!("{}", generation.errors.format_summary());
        return Ok(ExitCode::FAILURE);
    }

    if options.output.is_none() {
        std::io::stdout().write_all(generation.source.as_bytes())?;
    }
    Ok(ExitCode::SUCCESS)
}
