use axum::extract::{Path, State};
use axum::Json;
use serde_json::Value;

use crate::api::state::AppState;
use crate::api::{ApiError, Entity};

pub async fn get_match(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let details = state
        .api
        .match_details(&match_id)
        .await
        .map_err(ApiError::lookup(Entity::Match, &match_id))?;
    Ok(Json(details))
}
