use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::api::routes::hubs::ExpandParams;
use crate::api::state::AppState;
use crate::api::{ApiError, Entity, PageParams};

#[derive(Debug, Deserialize)]
pub struct ListChampionshipsParams {
    pub game: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MatchTypeParams {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

pub async fn list_championships(
    State(state): State<AppState>,
    Query(params): Query<ListChampionshipsParams>,
    Query(page): Query<PageParams>,
) -> Result<Json<Value>, ApiError> {
    let championships = state
        .api
        .championships(&params.game, params.kind.as_deref(), page.into())
        .await?;
    Ok(Json(championships))
}

pub async fn get_championship(
    State(state): State<AppState>,
    Path(championship_id): Path<String>,
    Query(params): Query<ExpandParams>,
) -> Result<Json<Value>, ApiError> {
    let championship = state
        .api
        .championship(&championship_id, params.expanded.as_deref())
        .await
        .map_err(ApiError::lookup(Entity::Championship, &championship_id))?;
    Ok(Json(championship))
}

pub async fn championship_matches(
    State(state): State<AppState>,
    Path(championship_id): Path<String>,
    Query(params): Query<MatchTypeParams>,
    Query(page): Query<PageParams>,
) -> Result<Json<Value>, ApiError> {
    let matches = state
        .api
        .championship_matches(&championship_id, params.kind.as_deref(), page.into())
        .await
        .map_err(ApiError::lookup(Entity::Championship, &championship_id))?;
    Ok(Json(matches))
}

pub async fn championship_leaderboards(
    State(state): State<AppState>,
    Path(championship_id): Path<String>,
    Query(page): Query<PageParams>,
) -> Result<Json<Value>, ApiError> {
    let leaderboards = state
        .api
        .championship_leaderboards(&championship_id, page.into())
        .await
        .map_err(ApiError::lookup(Entity::Championship, &championship_id))?;
    Ok(Json(leaderboards))
}

pub async fn get_leaderboard(
    State(state): State<AppState>,
    Path(leaderboard_id): Path<String>,
    Query(page): Query<PageParams>,
) -> Result<Json<Value>, ApiError> {
    let leaderboard = state
        .api
        .leaderboard(&leaderboard_id, page.into())
        .await
        .map_err(ApiError::lookup(Entity::Leaderboard, &leaderboard_id))?;
    Ok(Json(leaderboard))
}
