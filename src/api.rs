//! HTTP endpoints exposing the session engine.
//!
//! Thin translation layer: every handler calls one registry operation and
//! maps its typed error onto a status code with a JSON envelope. No game
//! logic lives here.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::GameError;
use crate::state::SessionRegistry;
use crate::types::{Question, QuestionKind, SessionId};

pub fn router(registry: Arc<SessionRegistry>) -> Router {
    Router::new()
        .route("/api/games", post(start_new_game))
        .route("/api/games/{session_id}", get(get_game_status))
        .route("/api/games/{session_id}/answers", post(submit_answer))
        .route("/api/games/{session_id}/question", get(get_current_question))
        .route("/api/questions", get(list_questions))
        .route("/api/questions/random", get(random_question))
        .with_state(registry)
}

#[derive(Debug, Deserialize)]
pub struct StartGameRequest {
    pub session_id: SessionId,
    pub player_name: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    pub participant: String,
    pub answer: String,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let status = match self {
            GameError::Configuration => StatusCode::SERVICE_UNAVAILABLE,
            GameError::NotFound(_) => StatusCode::NOT_FOUND,
            GameError::Conflict(_) | GameError::InvalidState { .. } | GameError::AlreadyAnswered(_) => {
                StatusCode::CONFLICT
            }
            GameError::UnknownParticipant(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

async fn start_new_game(
    State(registry): State<Arc<SessionRegistry>>,
    Json(request): Json<StartGameRequest>,
) -> Result<impl IntoResponse, GameError> {
    let status = registry
        .create(request.session_id, vec![request.player_name])
        .await?;
    Ok(Json(status))
}

async fn get_game_status(
    State(registry): State<Arc<SessionRegistry>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, GameError> {
    Ok(Json(registry.status(&session_id).await?))
}

async fn submit_answer(
    State(registry): State<Arc<SessionRegistry>>,
    Path(session_id): Path<String>,
    Json(request): Json<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, GameError> {
    let status = registry
        .submit_answer(&session_id, &request.participant, &request.answer)
        .await?;
    Ok(Json(status))
}

async fn get_current_question(
    State(registry): State<Arc<SessionRegistry>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, GameError> {
    Ok(Json(registry.current_question(&session_id).await?))
}

#[derive(Debug, Deserialize)]
pub struct QuestionFilter {
    pub kind: Option<QuestionKind>,
    pub difficulty: Option<u8>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct QuestionList {
    questions: Vec<Question>,
}

async fn list_questions(
    State(registry): State<Arc<SessionRegistry>>,
    Query(filter): Query<QuestionFilter>,
) -> impl IntoResponse {
    let questions = registry.bank().filtered(
        filter.kind,
        filter.difficulty,
        filter.limit.unwrap_or(10),
    );
    Json(QuestionList { questions })
}

async fn random_question(
    State(registry): State<Arc<SessionRegistry>>,
    Query(filter): Query<QuestionFilter>,
) -> Response {
    let mut rng = rand::rng();
    match registry
        .bank()
        .random(filter.kind, filter.difficulty, &mut rng)
    {
        Some(question) => Json(question).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorBody {
                error: "no questions match the given filters".to_string(),
            }),
        )
            .into_response(),
    }
}
