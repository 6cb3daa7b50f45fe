// command line interface

use crate::{FeedbackLog, Output, Registry, Server, Session, YouTube};
use clap::{ArgAction, Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "vidchat", about = "Ask an AI about a video")]
struct Cli {
    /// resolver config file
    #[arg(
        long,
        short,
        env = "VIDCHAT_CONFIG",
        default_value = "resolvers.toml",
        global = true
    )]
    config: PathBuf,

    /// where feedback gets appended
    #[arg(
        long,
        short,
        env = "VIDCHAT_FEEDBACK_LOG",
        default_value = "feedback.jsonl",
        global = true
    )]
    feedback_log: PathBuf,

    /// preferred transcript language
    #[arg(long, default_value = "en", global = true)]
    lang: String,

    /// write logs to this file (the tui owns the terminal, so it logs nowhere otherwise)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// more logging, repeat for more (-v, -vv, -vvv)
    #[arg(long, short, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// start as http server
    Serve {
        /// port number
        #[arg(long, short, default_value = "3000")]
        port: u16,

        /// host to bind
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// print the collected feedback
    Feedback {
        /// one json object per line instead of a table
        #[arg(long)]
        json: bool,
    },

    /// list configured resolvers
    Resolvers,
}

pub async fn run() -> Result<()> {
    let Cli {
        config,
        feedback_log,
        lang,
        log_file,
        verbose,
        command,
    } = Cli::parse();

    match command {
        Some(Commands::Serve { port, host }) => {
            let _guard = init_logging(verbose, None)?;
            let session = build_session(&config, feedback_log, lang)?;
            Ok(Server::run(session, &host, port).await?)
        }

        Some(Commands::Feedback { json }) => {
            let _guard = init_logging(verbose, None)?;
            let records = FeedbackLog::new(feedback_log).read_all()?;
            if json {
                Output::raw(&records);
            } else {
                Output::pretty(&records);
            }
            Ok(())
        }

        Some(Commands::Resolvers) => {
            let _guard = init_logging(verbose, None)?;
            let registry = Registry::load(&config)?;
            Output::resolvers(&registry);
            Ok(())
        }

        None => {
            // the guard has to outlive the tui so buffered lines reach the file
            let _guard = match log_file.as_deref() {
                Some(path) => init_logging(verbose, Some(path))?,
                None => None,
            };
            let session = build_session(&config, feedback_log, lang)?;
            Ok(crate::tui::run(session).await?)
        }
    }
}

// a bad config is fatal, so this runs before any ui shows up
fn build_session(config: &Path, feedback_log: PathBuf, lang: String) -> Result<Session> {
    let registry = Registry::load(config)?;
    info!(
        resolvers = registry.len(),
        feedback_log = %feedback_log.display(),
        "session ready"
    );
    Ok(Session::new(
        registry,
        YouTube::new(lang),
        FeedbackLog::new(feedback_log),
    ))
}

fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match (verbose, log_file.is_some()) {
        (0, false) => "warn",
        (0, true) | (1, _) => "info",
        (2, _) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            std::fs::create_dir_all(dir).into_diagnostic()?;

            let name = path
                .file_name()
                .ok_or_else(|| miette::miette!("log file needs a file name: {}", path.display()))?;
            let appender = tracing_appender::rolling::never(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
            Ok(None)
        }
    }
}
