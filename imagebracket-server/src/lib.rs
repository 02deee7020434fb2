//! Shared types and HTTP API for the image bracket server.

use std::sync::Arc;

use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Json;
use axum::routing::{get, post};
use imagebracket_engine::{BracketResult, Tournament};
use imagebracket_types::{Entrant, MatchView, TournamentStatus};
use serde::{Deserialize, Serialize};
use tracing::debug;

mod error;

pub use error::ApiError;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UploadRequest {
    pub filenames: Vec<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct UploadResponse {
    pub uploaded: Vec<Entrant>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VoteRequest {
    /// Entrant id of the chosen image. Missing is treated as invalid.
    #[serde(default)]
    pub winner: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct VoteResponse {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub champion: Option<Entrant>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

type AppState = Arc<Tournament>;

/// Runs a tournament call on the blocking pool; the store is synchronous.
async fn blocking<T, F>(tournament: &AppState, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&Tournament) -> BracketResult<T> + Send + 'static,
{
    let tournament = tournament.clone();
    Ok(tokio::task::spawn_blocking(move || f(&tournament)).await??)
}

async fn upload_handler(
    State(tournament): State<AppState>,
    body: Result<Json<UploadRequest>, JsonRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let Json(req) = body?;
    let uploaded =
        blocking(&tournament, move |t| t.register_entrants(req.filenames.as_slice())).await?;
    debug!("Uploaded {} images", uploaded.len());
    Ok(Json(UploadResponse { uploaded }))
}

async fn entrants_handler(
    State(tournament): State<AppState>,
) -> Result<Json<Vec<Entrant>>, ApiError> {
    Ok(Json(blocking(&tournament, Tournament::list_entrants).await?))
}

async fn generate_matches_handler(
    State(tournament): State<AppState>,
) -> Result<Json<Vec<MatchView>>, ApiError> {
    Ok(Json(blocking(&tournament, Tournament::build_bracket_views).await?))
}

async fn vote_handler(
    State(tournament): State<AppState>,
    Path(match_id): Path<String>,
    body: Result<Json<VoteRequest>, JsonRejection>,
) -> Result<Json<VoteResponse>, ApiError> {
    let Json(req) = body?;
    let advancement = blocking(&tournament, move |t| t.record_vote(&match_id, &req.winner)).await?;
    let response = match advancement.champion {
        Some(champion) => VoteResponse {
            message: "Final winner decided".to_string(),
            champion: Some(champion),
        },
        None => VoteResponse {
            message: "Vote registered".to_string(),
            champion: None,
        },
    };
    Ok(Json(response))
}

async fn matches_handler(
    State(tournament): State<AppState>,
) -> Result<Json<Vec<MatchView>>, ApiError> {
    Ok(Json(blocking(&tournament, Tournament::list_matches).await?))
}

async fn status_handler(
    State(tournament): State<AppState>,
) -> Result<Json<TournamentStatus>, ApiError> {
    Ok(Json(blocking(&tournament, Tournament::status).await?))
}

async fn reset_handler(State(tournament): State<AppState>) -> Result<&'static str, ApiError> {
    blocking(&tournament, Tournament::reset).await?;
    Ok("Tournament reset.")
}

/// Build the HTTP API router over the given tournament.
pub fn build_router(tournament: Arc<Tournament>) -> Router {
    Router::new()
        .route("/upload", post(upload_handler))
        .route("/entrants", get(entrants_handler))
        .route("/generate-matches", post(generate_matches_handler))
        .route("/vote/{match_id}", post(vote_handler))
        .route("/matches", get(matches_handler))
        .route("/status", get(status_handler))
        .route("/reset-db", post(reset_handler))
        .with_state(tournament)
}
