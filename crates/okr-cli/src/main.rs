#![forbid(unsafe_code)]

mod cmd;
mod output;
mod tui;

use clap::{CommandFactory, Parser, Subcommand};
use okr_core::config::resolve_config;
use output::{CliError, OutputMode, render_error, resolve_output_mode};
use std::env;
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::{debug, info};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "okr: Objectives & Key Results dashboard",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Dataset file (JSON, YAML, or TOML). Overrides OKR_DATA and config.
    #[arg(long, global = true, value_name = "PATH")]
    data: Option<PathBuf>,

    /// Output format: pretty, text, or json.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags, `FORMAT`, and the terminal.
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Dashboard",
        about = "Open the interactive dashboard",
        long_about = "Open the full-screen dashboard: objective cards, the key-result grid \
                      for the selected objective, and a detail drawer per key result.",
        after_help = "EXAMPLES:\n    # Open on the first (or configured) objective\n    okr ui\n\n    # Open on a specific objective with another dataset\n    okr --data okrs.yaml ui --objective OBJ-2"
    )]
    Ui(cmd::ui::UiArgs),

    #[command(
        next_help_heading = "Read",
        about = "List objectives with status and progress",
        after_help = "EXAMPLES:\n    # Human-readable list\n    okr objectives\n\n    # Only objectives at risk, machine-readable\n    okr objectives --status at-risk --format json"
    )]
    Objectives(cmd::objectives::ObjectivesArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show the key-result grid for one objective",
        long_about = "Show the key-result cards of an objective: stats, status, and a \
                      sparkline of the last six periods.",
        after_help = "EXAMPLES:\n    # Key results of the selected objective\n    okr krs\n\n    # Key results of another objective\n    okr krs --objective OBJ-3"
    )]
    Krs(cmd::krs::KrsArgs),

    #[command(
        next_help_heading = "Read",
        about = "Show the detail drawer for a key result",
        after_help = "EXAMPLES:\n    # Detail for KR-3\n    okr show KR-3\n\n    # Emit machine-readable output\n    okr show KR-3 --json"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Tools",
        about = "Replay a UI event log against the dataset",
        long_about = "Apply a JSON-lines log of objective clicks, open-details clicks, and \
                      drawer closes, then print the resulting selection.",
        after_help = "EXAMPLES:\n    # Final state only\n    okr replay events.jsonl\n\n    # State after every event, read from stdin\n    cat events.jsonl | okr replay - --trace"
    )]
    Replay(cmd::replay::ReplayArgs),

    #[command(
        next_help_heading = "Tools",
        about = "Check a dataset for errors and warnings",
        after_help = "EXAMPLES:\n    # Validate the configured dataset\n    okr validate\n\n    # Fail on warnings too\n    okr --data okrs.json validate --strict"
    )]
    Validate(cmd::validate::ValidateArgs),

    #[command(
        next_help_heading = "Tools",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    # Bash\n    okr completions bash > ~/.local/share/bash-completion/completions/okr"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

impl Commands {
    /// Commands that own the terminal and must not log to it.
    const fn is_interactive(&self) -> bool {
        matches!(self, Self::Ui(_))
    }
}

fn log_writer(interactive: bool) -> BoxMakeWriter {
    if !interactive {
        return BoxMakeWriter::new(io::stderr);
    }
    let Some(path) = env::var_os("OKR_LOG_FILE") else {
        return BoxMakeWriter::new(io::sink);
    };
    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
        Err(err) => {
            eprintln!(
                "warning: cannot open OKR_LOG_FILE {}: {err}",
                PathBuf::from(path).display()
            );
            BoxMakeWriter::new(io::sink)
        }
    }
}

fn init_tracing(interactive: bool, verbose: bool) {
    let filter = EnvFilter::try_from_env("OKR_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "okr=debug,info"
        } else {
            "okr=info,warn"
        })
    });

    let format = env::var("OKR_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());
    let writer = log_writer(interactive);

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(writer))
                .init();
        }
        _ => {
            registry
                .with(
                    fmt::layer()
                        .compact()
                        .with_ansi(!interactive)
                        .with_writer(writer),
                )
                .init();
        }
    }
}

fn run(cli: &Cli, output: OutputMode) -> anyhow::Result<()> {
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    if let Commands::Completions(args) = &cli.command {
        return cmd::completions::run_completions(args.shell, &mut Cli::command());
    }

    let project_root = env::current_dir()?;
    let config = resolve_config(&project_root, cli.data.as_deref())?;
    debug!(dataset = %config.dataset, "resolved configuration");

    match &cli.command {
        Commands::Ui(args) => cmd::ui::run_ui(args, &config),
        Commands::Objectives(args) => cmd::objectives::run_objectives(args, output, &config),
        Commands::Krs(args) => cmd::krs::run_krs(args, output, &config),
        Commands::Show(args) => cmd::show::run_show(args, output, &config),
        Commands::Replay(args) => cmd::replay::run_replay(args, output, &config),
        Commands::Validate(args) => cmd::validate::run_validate(args, output, &config),
        Commands::Completions(_) => Ok(()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.command.is_interactive(), cli.verbose);
    let output = cli.output_mode();

    match run(&cli, output) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            debug!("command failed: {err:?}");
            if render_error(output, &CliError::from_anyhow(&err)).is_err() {
                eprintln!("error: {err:#}");
            }
            ExitCode::FAILURE
        }
    }
}
