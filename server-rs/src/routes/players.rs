use axum::{extract::State, http::StatusCode, Json};

use crate::db::Resource;
use crate::error::{AppError, AppResult};
use crate::extract::{ResourceId, ValidatedJson};
use crate::models::player::*;
use crate::AppState;

fn store_error(err: crate::db::StoreError) -> AppError {
    AppError::from_store(err, Player::ENTITY)
}

/// `team_id` is stored as given; the team is not looked up.
pub async fn create_player(
    State(state): State<AppState>,
    ValidatedJson(body): ValidatedJson<PlayerPayload>,
) -> AppResult<(StatusCode, Json<Player>)> {
    let player = state.players.create(&body).await.map_err(store_error)?;
    tracing::debug!(player_id = %player.id, team_id = %player.team_id, "Player created");
    Ok((StatusCode::CREATED, Json(player)))
}

pub async fn list_players(State(state): State<AppState>) -> AppResult<Json<Vec<Player>>> {
    let players = state.players.list().await.map_err(store_error)?;
    Ok(Json(players))
}

pub async fn get_player(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> AppResult<Json<Player>> {
    let player = state.players.get(id).await.map_err(store_error)?;
    Ok(Json(player))
}

pub async fn update_player(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
    ValidatedJson(body): ValidatedJson<PlayerPayload>,
) -> AppResult<Json<Player>> {
    let player = state.players.replace(id, &body).await.map_err(store_error)?;
    Ok(Json(player))
}

pub async fn delete_player(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> AppResult<StatusCode> {
    state.players.delete(id).await.map_err(store_error)?;
    tracing::debug!(player_id = %id, "Player deleted");
    Ok(StatusCode::NO_CONTENT)
}
