//! HTTP API: accounts, moves against the computer, and the leaderboard.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tracing::{debug, error, info, instrument, warn};

use crate::accounts::{AccountError, AccountErrorKind, AccountService, AccountStore};
use crate::db::{DbError, ScoreRecord};
use crate::games::tictactoe::{Board, Player};
use crate::ledger::ScoreLedger;
use crate::turn::play_turn;

const INDEX_HTML: &str = include_str!("../templates/index.html");

/// Shared handler state: the injected account store and score ledger.
#[derive(Clone)]
pub struct AppState {
    accounts: AccountService,
    ledger: Arc<dyn ScoreLedger>,
}

impl AppState {
    /// Creates handler state from separate collaborators.
    #[instrument(skip_all)]
    pub fn new(accounts: Arc<dyn AccountStore>, ledger: Arc<dyn ScoreLedger>) -> Self {
        info!("Creating server state");
        Self {
            accounts: AccountService::new(accounts),
            ledger,
        }
    }

    /// Creates handler state from one store serving both roles.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: AccountStore + ScoreLedger + 'static,
    {
        Self::new(store.clone(), store)
    }
}

/// Request body for `/register` and `/login`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    /// Account name.
    #[serde(default)]
    pub username: String,
    /// Plain-text password.
    #[serde(default)]
    pub password: String,
}

/// Request body for `/move`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRequest {
    /// Player to credit; anonymous play when absent.
    #[serde(default)]
    pub username: Option<String>,
    /// Board with the human's latest move applied.
    pub board: Board,
    /// The human's mark.
    #[serde(default = "default_player")]
    pub player: Player,
}

fn default_player() -> Player {
    Player::X
}

/// Response body for `/move`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveResponse {
    /// Board after the computer's reply.
    pub board: Board,
    /// `"X"`, `"O"`, `"draw"`, or `null` while in progress.
    pub winner: Option<String>,
    /// Index the computer played, if it moved.
    pub computer_move: Option<usize>,
    /// Full leaderboard.
    pub scores: Vec<ScoreRecord>,
}

/// Plain acknowledgement body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable message.
    pub message: String,
}

/// Error rendered as `{"error": "..."}` with an HTTP status.
#[derive(Debug, Clone, Display)]
#[display("{} ({})", message, status)]
pub struct ApiError {
    /// Response status.
    pub status: StatusCode,
    /// Message shown to the client.
    pub message: String,
}

impl ApiError {
    /// 400 with the given message.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// 500 with the given message.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection, "Rejected request body");
        Self::bad_request(rejection.body_text())
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        error!(error = %err, "Storage failure");
        Self::internal("Database error")
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        match &err.kind {
            AccountErrorKind::Store(db) => db.clone().into(),
            AccountErrorKind::Hashing(_) => {
                error!(error = %err, "Password hashing failure");
                Self::internal("Password hashing failed")
            }
            kind => Self::bad_request(kind.to_string()),
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState, cors_permissive: bool) -> Router {
    let app = Router::new()
        .route("/", get(index))
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/move", post(make_move))
        .route("/leaderboard", get(leaderboard))
        .layer(ServiceBuilder::new().map_request(log_request))
        .with_state(state);

    if cors_permissive {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

fn log_request(req: Request) -> Request {
    info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
    req
}

/// Runs CPU-bound or blocking work off the async executor.
async fn blocking<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await.map_err(|e| {
        error!(error = %e, "Blocking task failed");
        ApiError::internal("Internal error")
    })?
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

#[instrument(skip_all)]
async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(req) = payload?;
    debug!(username = %req.username, "Register request");

    blocking(move || {
        state.accounts.register(&req.username, &req.password)?;
        Ok(())
    })
    .await?;

    Ok(Json(MessageResponse {
        message: "User registered successfully".to_string(),
    }))
}

#[instrument(skip_all)]
async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let Json(req) = payload?;
    debug!(username = %req.username, "Login request");

    blocking(move || {
        state.accounts.login(&req.username, &req.password)?;
        Ok(())
    })
    .await?;

    Ok(Json(MessageResponse {
        message: "Login successful".to_string(),
    }))
}

#[instrument(skip_all)]
async fn make_move(
    State(state): State<AppState>,
    payload: Result<Json<MoveRequest>, JsonRejection>,
) -> Result<Json<MoveResponse>, ApiError> {
    let Json(req) = payload?;
    let username = req
        .username
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string);
    debug!(username = ?username, board = %req.board.compact(), player = %req.player, "Move request");

    let response = blocking(move || {
        let report = play_turn(req.board, req.player, username.as_deref(), state.ledger.as_ref())?;
        let scores = state.ledger.leaderboard()?;
        Ok(MoveResponse {
            board: *report.board(),
            winner: report.outcome().winner_label().map(str::to_string),
            computer_move: report.computer_move().map(|pos| pos.to_index()),
            scores,
        })
    })
    .await?;

    Ok(Json(response))
}

#[instrument(skip_all)]
async fn leaderboard(State(state): State<AppState>) -> Result<Json<Vec<ScoreRecord>>, ApiError> {
    let scores = blocking(move || Ok(state.ledger.leaderboard()?)).await?;
    Ok(Json(scores))
}
