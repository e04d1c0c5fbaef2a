use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::api::state::AppState;
use crate::api::{ApiError, Entity, PageParams};

#[derive(Debug, Deserialize)]
pub struct ExpandParams {
    pub expanded: Option<String>,
}

pub async fn get_hub(
    State(state): State<AppState>,
    Path(hub_id): Path<String>,
    Query(params): Query<ExpandParams>,
) -> Result<Json<Value>, ApiError> {
    let hub = state
        .api
        .hub(&hub_id, params.expanded.as_deref())
        .await
        .map_err(ApiError::lookup(Entity::Hub, &hub_id))?;
    Ok(Json(hub))
}

pub async fn hub_rules(
    State(state): State<AppState>,
    Path(hub_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let rules = state
        .api
        .hub_rules(&hub_id)
        .await
        .map_err(ApiError::lookup(Entity::Hub, &hub_id))?;
    Ok(Json(rules))
}

pub async fn hub_stats(
    State(state): State<AppState>,
    Path(hub_id): Path<String>,
    Query(page): Query<PageParams>,
) -> Result<Json<Value>, ApiError> {
    let stats = state
        .api
        .hub_stats(&hub_id, page.into())
        .await
        .map_err(ApiError::lookup(Entity::Hub, &hub_id))?;
    Ok(Json(stats))
}
