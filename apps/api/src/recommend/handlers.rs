use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::recommend::Session;
use crate::selection::{options, Action, SelectionState};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct SetValueRequest {
    pub value: String,
}

#[derive(Serialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

/// What a front end renders: the three facets, the moods valid for the
/// current genre, and the recommendation texts. Candidates without a text
/// part are skipped per item rather than failing the view.
#[derive(Serialize)]
pub struct SessionView {
    pub genre: String,
    pub mood: String,
    pub level: String,
    pub available_moods: Vec<String>,
    pub recommendations: Vec<String>,
}

impl SessionView {
    fn of(selection: &SelectionState) -> Self {
        SessionView {
            genre: selection.genre.clone(),
            mood: selection.mood.clone(),
            level: selection.level.clone(),
            available_moods: selection
                .available_moods()
                .iter()
                .map(|m| m.to_string())
                .collect(),
            recommendations: selection
                .recommendations
                .iter()
                .filter_map(|c| c.text())
                .map(String::from)
                .collect(),
        }
    }
}

async fn lookup(state: &AppState, id: Uuid) -> Result<Arc<Session>, AppError> {
    state
        .sessions
        .get(id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), AppError> {
    let session_id = state.sessions.create().await;
    Ok((StatusCode::CREATED, Json(CreateSessionResponse { session_id })))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = lookup(&state, id).await?;
    Ok(Json(SessionView::of(&session.snapshot().await)))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Session {id} not found")))
    }
}

/// Dispatches a facet action, then runs the automatic trigger if the
/// selection is now fully set. Same controller function as the manual
/// endpoint; a fetch failure surfaces as the response after the facet change
/// has already been applied.
async fn set_facet(state: AppState, id: Uuid, action: Action) -> Result<Json<SessionView>, AppError> {
    let session = lookup(&state, id).await?;
    let selection = session.dispatch(action).await;
    if selection.is_complete() {
        session.refresh(state.source.as_ref()).await?;
    }
    Ok(Json(SessionView::of(&session.snapshot().await)))
}

/// POST /api/v1/sessions/:id/genre
pub async fn handle_set_genre(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetValueRequest>,
) -> Result<Json<SessionView>, AppError> {
    set_facet(state, id, Action::SetGenre(req.value)).await
}

/// POST /api/v1/sessions/:id/mood
pub async fn handle_set_mood(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetValueRequest>,
) -> Result<Json<SessionView>, AppError> {
    set_facet(state, id, Action::SetMood(req.value)).await
}

/// POST /api/v1/sessions/:id/level
pub async fn handle_set_level(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SetValueRequest>,
) -> Result<Json<SessionView>, AppError> {
    set_facet(state, id, Action::SetLevel(req.value)).await
}

/// POST /api/v1/sessions/:id/recommendations — the manual trigger.
pub async fn handle_fetch_recommendations(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let session = lookup(&state, id).await?;
    session.refresh(state.source.as_ref()).await?;
    Ok(Json(SessionView::of(&session.snapshot().await)))
}

/// GET /api/v1/options/genres
pub async fn handle_list_genres() -> Json<Vec<&'static str>> {
    Json(options::GENRES.to_vec())
}

/// GET /api/v1/options/levels
pub async fn handle_list_levels() -> Json<Vec<&'static str>> {
    Json(options::LEVELS.to_vec())
}

/// GET /api/v1/options/moods/:genre
pub async fn handle_list_moods(Path(genre): Path<String>) -> Json<Vec<&'static str>> {
    Json(options::moods_for(&genre).to_vec())
}
