//! Strictly Arena - Unified CLI
//!
//! Tic-tac-toe server with accounts, a leaderboard, and engine tools.

#![warn(missing_docs)]

mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use strictly_arena::{
    AppState, Board, GameRepository, InMemoryStore, Player, ScoreLedger, ServerConfig, router,
    score_moves, self_play,
};
use tracing::{info, instrument};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    initialize_tracing();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            db_path,
            in_memory,
        } => {
            let config = match config {
                Some(path) => ServerConfig::from_file(&path)?,
                None => ServerConfig::default(),
            }
            .with_overrides(host, port, db_path);
            run_http_server(config, in_memory).await
        }
        Command::Migrate { db_path } => run_migrate(db_path),
        Command::Leaderboard { db_path } => run_leaderboard(db_path),
        Command::Suggest { board, player } => run_suggest(&board, player),
        Command::Selfplay { board, first } => run_selfplay(&board, first),
    }
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,strictly_arena=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Run the HTTP game server
#[instrument(skip(config), fields(host = %config.host(), port = config.port()))]
async fn run_http_server(config: ServerConfig, in_memory: bool) -> Result<()> {
    let state = if in_memory {
        info!("Using in-memory store; scores are lost on exit");
        AppState::from_store(Arc::new(InMemoryStore::new()))
    } else {
        let repository = GameRepository::new(config.db_path().clone())?;
        repository.run_migrations()?;
        AppState::from_store(Arc::new(repository))
    };

    let app = router(state, *config.cors_permissive());

    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port()))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host(), config.port()))?;
    info!("Server ready at http://{}:{}/", config.host(), config.port());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

#[instrument]
fn run_migrate(db_path: String) -> Result<()> {
    let repository = GameRepository::new(db_path)?;
    let applied = repository.run_migrations()?;
    println!("Applied {} migration(s) to {}", applied, repository.db_path());
    Ok(())
}

#[instrument]
fn run_leaderboard(db_path: String) -> Result<()> {
    let repository = GameRepository::new(db_path)?;
    let records = repository.leaderboard()?;

    println!("{:<20} {:>5} {:>6} {:>5} {:>7}", "Player", "Wins", "Losses", "Draws", "Win %");
    for record in &records {
        println!(
            "{:<20} {:>5} {:>6} {:>5} {:>6.1}%",
            record.username(),
            record.wins(),
            record.losses(),
            record.draws(),
            record.win_rate()
        );
    }
    if records.is_empty() {
        println!("(no players yet)");
    }
    Ok(())
}

#[instrument]
fn run_suggest(board: &str, player: Player) -> Result<()> {
    let board: Board = board.parse()?;
    println!("{}\n", board.display());

    let outcome = strictly_arena::evaluate(&board);
    if outcome.is_terminal() {
        println!("Game is over: {:?}", outcome);
        return Ok(());
    }

    let scores = score_moves(&board, player, player.opponent());
    for (pos, score) in &scores {
        println!("{:<20} {:>4}", pos.to_string(), score);
    }
    if let Some(best) = strictly_arena::select_move(&board, player, player.opponent()) {
        println!("\n{} plays {}", player, best);
    }
    Ok(())
}

#[instrument]
fn run_selfplay(board: &str, first: Player) -> Result<()> {
    let board: Board = board.parse()?;
    let game = self_play(board, first);

    let mut replay = board;
    for (mark, pos) in &game.moves {
        replay.place(*pos, *mark);
        println!("{} plays {}\n{}\n", mark, pos, replay.display());
    }
    match game.outcome.winner_label() {
        Some("draw") => println!("Draw."),
        Some(winner) => println!("{} wins.", winner),
        None => println!("Unfinished."),
    }
    Ok(())
}
