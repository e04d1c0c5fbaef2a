//! Locally computed endpoints: skill bands, smurf checks, bulk lookups,
//! comparisons and the aggregated profile.

use axum::extract::{Path, Query, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::aggregate::{self, BulkEntry, ComparedPlayer, ProfileOutcome, SmurfCheckError};
use crate::api::state::AppState;
use crate::api::{ApiError, Entity};
use crate::models::{EloLevel, SmurfReport, REFERENCE_GAME};

#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub message: &'static str,
}

pub async fn home() -> Json<StatusMessage> {
    Json(StatusMessage {
        message: "Faceit App is running!",
    })
}

pub async fn elo_level(Path(elo): Path<i64>) -> Json<EloLevel> {
    Json(EloLevel::from_elo(Some(elo)))
}

pub async fn smurf_check(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<SmurfReport>, ApiError> {
    match aggregate::smurf_check(&state.api, &player_id).await {
        Ok(report) => Ok(Json(report)),
        Err(SmurfCheckError::Upstream(e)) => Err(ApiError::lookup(Entity::Player, &player_id)(e)),
        Err(e @ SmurfCheckError::Stats(_)) => Err(ApiError::Upstream {
            status: e.status_code(),
            message: e.to_string(),
        }),
    }
}

/// Every `key=value` for `key` in a raw query string, in order. Empty
/// values are kept.
fn repeated_param(query: Option<&str>, key: &str) -> Vec<String> {
    form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .collect()
}

fn required_ids(query: Option<&str>) -> Result<Vec<String>, ApiError> {
    let ids = repeated_param(query, "ids");
    if ids.is_empty() {
        return Err(ApiError::BadRequest(
            "at least one 'ids' query parameter is required".to_string(),
        ));
    }
    Ok(ids)
}

pub async fn bulk_lookup(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<BulkEntry>>, ApiError> {
    let ids = required_ids(query.as_deref())?;
    Ok(Json(aggregate::bulk_lookup(&state.api, &ids).await))
}

pub async fn compare_players(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Json<Vec<ComparedPlayer>>, ApiError> {
    let ids = required_ids(query.as_deref())?;
    let game = repeated_param(query.as_deref(), "game")
        .into_iter()
        .find(|game| !game.is_empty())
        .unwrap_or_else(|| REFERENCE_GAME.to_string());
    Ok(Json(aggregate::compare(&state.api, &ids, &game).await))
}

#[derive(Debug, Deserialize)]
pub struct FullProfileParams {
    pub nickname_or_url: String,
}

pub async fn full_profile(
    State(state): State<AppState>,
    Query(params): Query<FullProfileParams>,
) -> Result<Response, ApiError> {
    let outcome = aggregate::full_profile(&state.api, &params.nickname_or_url).await?;
    let status = match outcome {
        ProfileOutcome::Found(_) => StatusCode::OK,
        ProfileOutcome::NotFound { .. } => StatusCode::NOT_FOUND,
    };
    Ok((status, Json(outcome)).into_response())
}
