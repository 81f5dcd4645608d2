//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;
use trx_core::config;

mod commands;

#[derive(Parser)]
#[command(name = "trx")]
#[command(version)]
#[command(about = "Terminal transcript viewer")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Session (.json) or raw transcript file to view
    file: Option<PathBuf>,

    /// Watch the file for changes and re-render on updates
    #[arg(long)]
    follow: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// View a session or transcript file interactively
    View {
        /// Session (.json) or raw transcript file
        file: PathBuf,

        /// Watch the file for changes and re-render on updates
        #[arg(long)]
        follow: bool,
    },

    /// Print the segmented transcript structure (non-interactive)
    Dump {
        /// Session (.json) or raw transcript file
        file: PathBuf,

        /// Emit the segment structure as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Create a default config file
    Init,
    /// Print the config file path
    Path,
    /// Print the effective configuration
    Show,
}

/// Parses arguments and dispatches to a command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_logging();

    match cli.command {
        Some(Commands::View { file, follow }) => commands::view::run(&file, follow),
        Some(Commands::Dump { file, json }) => commands::dump::run(&file, json),
        Some(Commands::Config { command }) => match command {
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::Path => commands::config::path(),
            ConfigCommands::Show => commands::config::show(),
        },
        // Bare `trx <file>` is a shortcut for `trx view <file>`.
        None => match cli.file {
            Some(file) => commands::view::run(&file, cli.follow),
            None => {
                Cli::command().print_help()?;
                Ok(())
            }
        },
    }
}

/// Initializes file logging when TRX_LOG is set.
///
/// The viewer owns the terminal, so logs go to ${TRX_HOME}/logs. The guard
/// must stay alive for the process lifetime to flush the writer.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_env("TRX_LOG").ok()?;

    let logs_dir = config::paths::logs_dir();
    std::fs::create_dir_all(&logs_dir).ok()?;
    let appender = tracing_appender::rolling::daily(logs_dir, "trx.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();

    tracing::debug!("logging initialized");
    Some(guard)
}
