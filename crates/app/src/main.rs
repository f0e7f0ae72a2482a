#![forbid(unsafe_code)]

use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use quiz_core::model::QuizId;
use services::{AppServices, Clock, Notifier, StorageSettings, TracingNotifier};

mod cli;
mod config;
mod db;
mod play;

use cli::{Cli, Commands};
use config::{AppConfig, ConfigOverrides};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("quizmaster: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let overrides = ConfigOverrides {
        quizzes_dir: cli.quizzes_dir.clone(),
        database_url: cli.db.clone(),
        shuffle_options: cli.no_shuffle.then_some(false),
    };
    let config = AppConfig::load(cli.config.as_deref(), &overrides)?;
    tracing::debug!(?config, "configuration loaded");

    let database_url = db::normalize_sqlite_url(&config.database_url);
    db::prepare_sqlite_file(&database_url)?;
    let settings = StorageSettings {
        database_url,
        quizzes_dir: config.quizzes_dir,
        shuffle_options: config.shuffle_options,
    };
    let app = AppServices::new_sqlite(&settings, Clock::system(), notifier())
        .await
        .context("failed to open storage")?;

    match cli.command {
        Commands::List => {
            let quizzes = app.catalog().list_quizzes().await;
            if quizzes.is_empty() {
                println!("no quizzes in {}", settings.quizzes_dir.display());
            }
            for quiz in quizzes {
                match quiz.description {
                    Some(description) => println!("{:<20} {} - {description}", quiz.id, quiz.title),
                    None => println!("{:<20} {}", quiz.id, quiz.title),
                }
            }
            Ok(())
        }
        Commands::Play { quiz_id } => {
            let quiz_id = QuizId::new(quiz_id).context("invalid quiz id")?;
            play::run(&app, &quiz_id).await
        }
        Commands::Reset { quiz_id } => {
            let quiz_id = QuizId::new(quiz_id).context("invalid quiz id")?;
            app.sessions().discard_progress(&quiz_id).await?;
            println!("progress for {quiz_id} cleared");
            Ok(())
        }
    }
}

/// Notices go to the terminal when a user is watching, otherwise to the log.
fn notifier() -> Arc<dyn Notifier> {
    if std::io::stdout().is_terminal() {
        Arc::new(play::TerminalNotifier)
    } else {
        Arc::new(TracingNotifier)
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("QUIZMASTER_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
