use axum::{extract::State, http::StatusCode, Json};

use crate::db::Resource;
use crate::error::{AppError, AppResult};
use crate::extract::{ResourceId, ValidatedJson};
use crate::models::team::*;
use crate::AppState;

fn store_error(err: crate::db::StoreError) -> AppError {
    AppError::from_store(err, Team::ENTITY)
}

pub async fn create_team(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<TeamPayload>,
) -> AppResult<(StatusCode, Json<Team>)> {
    let team = state.teams.create(&body).await.map_err(store_error)?;
    tracing::debug!(team_id = %team.id, "Team created");
    Ok((StatusCode::CREATED, Json(team)))
}

pub async fn list_teams(State(state): State<AppState>) -> AppResult<Json<Vec<Team>>> {
    let teams = state.teams.list().await.map_err(store_error)?;
    Ok(Json(teams))
}

pub async fn get_team(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> AppResult<Json<Team>> {
    let team = state.teams.get(id).await.map_err(store_error)?;
    Ok(Json(team))
}

/// Full replacement: every required field is resent, omitted optionals become null.
pub async fn update_team(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    ValidatedJson(body): ValidatedJson<TeamPayload>,
) -> AppResult<Json<Team>> {
    let team = state.teams.replace(id, &body).await.map_err(store_error)?;
    Ok(Json(team))
}

pub async fn delete_team(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> AppResult<StatusCode> {
    state.teams.delete(id).await.map_err(store_error)?;
    tracing::debug!(team_id = %id, "Team deleted");
    Ok(StatusCode::NO_CONTENT)
}
