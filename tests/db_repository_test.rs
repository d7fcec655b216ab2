//! Tests for database repository operations.

use diesel::Connection;
use diesel::SqliteConnection;
use diesel_migrations::MigrationHarness;
use tempfile::NamedTempFile;

use strictly_arena::{
    AccountService, Board, GameOutcome, GameRepository, MIGRATIONS, Player, ScoreLedger,
    play_turn,
};

/// Creates a temporary database file with schema applied, returns the file
/// handle (must stay in scope to keep the file alive) and a ready repository.
fn setup_test_db() -> (NamedTempFile, GameRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let mut conn = SqliteConnection::establish(&db_path).expect("Failed to connect");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("Migrations failed");

    let repo = GameRepository::new(db_path).expect("Failed to create repository");
    (db_file, repo)
}

#[test]
fn test_empty_path_rejected() {
    assert!(GameRepository::new("  ".to_string()).is_err());
}

#[test]
fn test_run_migrations_is_idempotent() {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();
    let repo = GameRepository::new(db_path).expect("Failed to create repository");

    assert!(repo.run_migrations().expect("First run failed") > 0);
    assert_eq!(repo.run_migrations().expect("Second run failed"), 0);
}

#[test]
fn test_create_user_opens_zeroed_score() {
    let (_db, repo) = setup_test_db();
    let user = repo.create_user("Alice", "hash").expect("Create failed");
    assert_eq!(user.username(), "Alice");
    assert_eq!(user.password_hash(), "hash");

    let score = repo
        .get_score("Alice")
        .expect("Query failed")
        .expect("Score row missing");
    assert_eq!((*score.wins(), *score.losses(), *score.draws()), (0, 0, 0));
}

#[test]
fn test_create_user_duplicate_name_fails() {
    let (_db, repo) = setup_test_db();
    repo.create_user("Bob", "hash").expect("First create failed");
    let err = repo
        .create_user("Bob", "other")
        .expect_err("Duplicate name should fail");
    assert!(err.is_duplicate(), "Unexpected error kind: {err}");
    assert_eq!(repo.list_users().expect("List failed").len(), 1);
}

#[test]
fn test_get_user_found_and_missing() {
    let (_db, repo) = setup_test_db();
    repo.create_user("Carol", "hash").expect("Create failed");

    let found = repo.get_user("Carol").expect("Query failed");
    assert_eq!(found.expect("User missing").username(), "Carol");
    assert!(repo.get_user("NoSuchUser").expect("Query failed").is_none());
}

#[test]
fn test_list_users_empty() {
    let (_db, repo) = setup_test_db();
    let users = repo.list_users().expect("List failed");
    assert!(users.is_empty());
}

#[test]
fn test_record_outcome_increments_one_counter() {
    let (_db, repo) = setup_test_db();
    repo.create_user("Dave", "hash").expect("Create failed");

    repo.record_outcome("Dave", GameOutcome::Win).expect("Record failed");
    repo.record_outcome("Dave", GameOutcome::Win).expect("Record failed");
    let record = repo
        .record_outcome("Dave", GameOutcome::Draw)
        .expect("Record failed")
        .expect("Record missing");

    assert_eq!((*record.wins(), *record.losses(), *record.draws()), (2, 0, 1));
    assert_eq!(record.total(), 3);
}

#[test]
fn test_record_outcome_unknown_user() {
    let (_db, repo) = setup_test_db();
    let record = repo
        .record_outcome("Ghost", GameOutcome::Loss)
        .expect("Record failed");
    assert!(record.is_none());
    assert!(repo.get_leaderboard().expect("Query failed").is_empty());
}

#[test]
fn test_leaderboard_order() {
    let (_db, repo) = setup_test_db();
    for name in ["Erin", "Frank", "Grace", "Hank"] {
        repo.create_user(name, "hash").expect("Create failed");
    }
    // Frank: 2 wins. Erin and Hank: 1 win, Hank has a draw. Grace: nothing.
    for (name, outcome) in [
        ("Frank", GameOutcome::Win),
        ("Frank", GameOutcome::Win),
        ("Erin", GameOutcome::Win),
        ("Erin", GameOutcome::Loss),
        ("Hank", GameOutcome::Win),
        ("Hank", GameOutcome::Draw),
    ] {
        repo.record_outcome(name, outcome).expect("Record failed");
    }

    let names: Vec<String> = repo
        .get_leaderboard()
        .expect("Query failed")
        .iter()
        .map(|r| r.username().clone())
        .collect();
    assert_eq!(names, ["Frank", "Hank", "Erin", "Grace"]);
}

#[test]
fn test_register_and_login_through_service() {
    let (_db, repo) = setup_test_db();
    let service = AccountService::new(std::sync::Arc::new(repo.clone()));

    service.register("Ivy", "secret").expect("Register failed");
    assert!(service.register("Ivy", "again").is_err());
    service.login("Ivy", "secret").expect("Login failed");
    assert!(service.login("Ivy", "wrong").is_err());

    let stored = repo
        .get_user("Ivy")
        .expect("Query failed")
        .expect("User missing");
    assert_ne!(stored.password_hash(), "secret");
}

#[test]
fn test_finished_turn_recorded_once() {
    let (_db, repo) = setup_test_db();
    repo.create_user("Jack", "hash").expect("Create failed");
    let ledger: &dyn ScoreLedger = &repo;

    let board: Board = "XX.OO...X".parse().expect("Invalid board");
    let report = play_turn(board, Player::X, Some("Jack"), ledger).expect("Turn failed");
    assert!(report.outcome().is_terminal());

    let score = ledger
        .score("Jack")
        .expect("Query failed")
        .expect("Score row missing");
    assert_eq!((*score.wins(), *score.losses(), *score.draws()), (0, 1, 0));
}
