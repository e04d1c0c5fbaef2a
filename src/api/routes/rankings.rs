use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::api::state::AppState;
use crate::api::{ApiError, Entity, PageParams};

#[derive(Debug, Deserialize)]
pub struct RankingParams {
    pub country: Option<String>,
}

pub async fn region_rankings(
    State(state): State<AppState>,
    Path((game, region)): Path<(String, String)>,
    Query(params): Query<RankingParams>,
    Query(page): Query<PageParams>,
) -> Result<Json<Value>, ApiError> {
    let rankings = state
        .api
        .region_rankings(&game, &region, params.country.as_deref(), page.into())
        .await?;
    Ok(Json(rankings))
}

/// Position of one player on a regional ladder.
pub async fn player_ranking(
    State(state): State<AppState>,
    Path((game, region, player_id)): Path<(String, String, String)>,
    Query(params): Query<RankingParams>,
    Query(page): Query<PageParams>,
) -> Result<Json<Value>, ApiError> {
    let ranking = state
        .api
        .player_ranking(
            &game,
            &region,
            &player_id,
            params.country.as_deref(),
            page.limit,
        )
        .await
        .map_err(ApiError::lookup(Entity::Player, &player_id))?;
    Ok(Json(ranking))
}
