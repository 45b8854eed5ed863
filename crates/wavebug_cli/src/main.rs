//! wavebug CLI: runs the bug-detection waveform widget in a terminal.
//!
//! Provides `wavebug run` for the interactive TUI, `wavebug render` for an
//! SVG snapshot at a given simulated time, `wavebug trace` for printing the
//! generated bit rows, and `wavebug init` for writing a default
//! `wavebug.toml`.

#![warn(missing_docs)]

mod init;
mod pipeline;
mod render;
mod run;
mod trace;

use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// wavebug: a scanner that finds and fixes an injected fault in a waveform.
#[derive(Parser, Debug)]
#[command(name = "wavebug", version, about = "Bug-detection waveform widget")]
pub struct Cli {
    /// Suppress all log output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to a custom `wavebug.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the interactive terminal widget.
    Run(SimArgs),
    /// Write an SVG snapshot of the widget.
    Render(RenderArgs),
    /// Print the generated bit rows.
    Trace(TraceArgs),
    /// Write a default `wavebug.toml`.
    Init {
        /// Directory to write into (defaults to the current directory).
        dir: Option<String>,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Options shared by every command that builds a simulation.
#[derive(Parser, Debug, Clone, Default)]
pub struct SimArgs {
    /// Fault tick (0-99), overriding the config file.
    #[arg(short, long)]
    pub fault: Option<String>,

    /// Seed for the random bits, overriding the config file.
    #[arg(short, long)]
    pub seed: Option<u64>,
}

/// Arguments for the `wavebug render` subcommand.
#[derive(Parser, Debug)]
pub struct RenderArgs {
    /// Fault and seed overrides.
    #[command(flatten)]
    pub sim: SimArgs,

    /// Simulated time to render at, in milliseconds.
    #[arg(long, default_value_t = 0)]
    pub at_ms: u64,

    /// Output path (stdout if omitted).
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for the `wavebug trace` subcommand.
#[derive(Parser, Debug)]
pub struct TraceArgs {
    /// Fault and seed overrides.
    #[command(flatten)]
    pub sim: SimArgs,

    /// Emit JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Log verbosity level.
    pub verbose: u8,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };
    init_logging(&global);

    let result = match cli.command {
        Command::Run(ref args) => run::run(args, &global),
        Command::Render(ref args) => render::run(args, &global),
        Command::Trace(ref args) => trace::run(args, &global),
        Command::Init { dir, force } => init::run(dir, force),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Log filter for the given flags; `RUST_LOG` is ignored.
fn log_level(global: &GlobalArgs) -> &'static str {
    if global.quiet {
        return "error";
    }
    match global.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Logs go to stderr so they never interleave with the TUI or SVG output.
fn init_logging(global: &GlobalArgs) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(log_level(global)))
        .with_writer(std::io::stderr)
        .init();
}
