//! Command-line interface for strictly_arena.

use clap::{Parser, Subcommand};

/// Strictly Arena - tic-tac-toe against a minimax opponent
#[derive(Parser, Debug)]
#[command(name = "strictly_arena")]
#[command(about = "Tic-tac-toe server with accounts and a leaderboard", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP game server
    Serve {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the database file (created if it doesn't exist)
        #[arg(long)]
        db_path: Option<String>,

        /// Keep accounts and scores in memory only
        #[arg(long)]
        in_memory: bool,
    },

    /// Apply database migrations
    Migrate {
        /// Path to the database file
        #[arg(long, default_value = "scores.db")]
        db_path: String,
    },

    /// Print the leaderboard
    Leaderboard {
        /// Path to the database file
        #[arg(long, default_value = "scores.db")]
        db_path: String,
    },

    /// Show the engine's move scores for a board
    Suggest {
        /// Board in compact form, e.g. "XX.OO...."
        board: String,

        /// Mark to move
        #[arg(long, default_value = "X", value_parser = parse_player)]
        player: strictly_arena::Player,
    },

    /// Play the engine against itself and print the game
    Selfplay {
        /// Starting board in compact form
        #[arg(long, default_value = ".........")]
        board: String,

        /// Mark to move first
        #[arg(long, default_value = "X", value_parser = parse_player)]
        first: strictly_arena::Player,
    },
}

fn parse_player(s: &str) -> Result<strictly_arena::Player, String> {
    match s.trim() {
        "X" | "x" => Ok(strictly_arena::Player::X),
        "O" | "o" => Ok(strictly_arena::Player::O),
        other => Err(format!("expected X or O, got '{}'", other)),
    }
}
