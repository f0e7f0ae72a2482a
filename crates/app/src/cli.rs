use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level CLI parser for the `quizmaster` binary.
#[derive(Debug, Parser)]
#[command(name = "quizmaster", version, about = "Multiple-choice quizzes with resumable progress")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to ./quizmaster.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database URL or path for saved progress
    #[arg(long, global = true)]
    pub db: Option<String>,

    /// Directory holding <quiz-id>.json files
    #[arg(long, global = true)]
    pub quizzes_dir: Option<PathBuf>,

    /// Keep answer options in file order
    #[arg(long, global = true)]
    pub no_shuffle: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List available quizzes
    List,
    /// Play a quiz, resuming saved progress
    Play {
        /// Quiz id (file name without .json)
        quiz_id: String,
    },
    /// Forget saved progress for a quiz
    Reset {
        /// Quiz id (file name without .json)
        quiz_id: String,
    },
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from([
            "quizmaster",
            "play",
            "capitals",
            "--db",
            "sqlite::memory:",
            "--no-shuffle",
            "-v",
        ])
        .expect("cli should parse");

        assert!(matches!(cli.command, Commands::Play { ref quiz_id } if quiz_id == "capitals"));
        assert_eq!(cli.db.as_deref(), Some("sqlite::memory:"));
        assert!(cli.no_shuffle);
        assert!(cli.verbose);
    }

    #[test]
    fn verbose_and_quiet_conflict() {
        assert!(Cli::try_parse_from(["quizmaster", "-v", "-q", "list"]).is_err());
    }
}
