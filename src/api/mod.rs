//! REST API endpoints.
//!
//! Axum-based HTTP façade. Every route forwards to the FACEIT Data API, some
//! fan out to several upstream endpoints and merge the answers.

pub mod routes;
pub mod state;

use axum::{
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};

use crate::upstream::{Page, UpstreamError};
use state::AppState;

/// Entity kinds with their own "not found" shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Player,
    Match,
    Hub,
    Championship,
    Leaderboard,
}

impl Entity {
    pub fn label(&self) -> &'static str {
        match self {
            Entity::Player => "Player",
            Entity::Match => "Match",
            Entity::Hub => "Hub",
            Entity::Championship => "Championship",
            Entity::Leaderboard => "Leaderboard",
        }
    }

    pub fn id_field(&self) -> &'static str {
        match self {
            Entity::Player => "player_id",
            Entity::Match => "match_id",
            Entity::Hub => "hub_id",
            Entity::Championship => "championship_id",
            Entity::Leaderboard => "leaderboard_id",
        }
    }
}

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{} not found.", .entity.label())]
    NotFound { entity: Entity, id: String },

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Error mapper for entity lookups: upstream 404 becomes a domain
    /// "not found" carrying the requested id.
    pub fn lookup(entity: Entity, id: &str) -> impl FnOnce(UpstreamError) -> ApiError + '_ {
        move |err| {
            if err.is_not_found() {
                ApiError::NotFound {
                    entity,
                    id: id.to_string(),
                }
            } else {
                ApiError::from(err)
            }
        }
    }
}

impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match err {
            UpstreamError::InvalidUrl(_) | UpstreamError::InvalidToken => {
                ApiError::Internal(err.to_string())
            }
            other => ApiError::Upstream {
                status: other.status_code(),
                message: other.to_string(),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut body = Map::new();
        body.insert("error".to_string(), Value::String(self.to_string()));

        let status = match &self {
            ApiError::NotFound { entity, id } => {
                body.insert(entity.id_field().to_string(), Value::String(id.clone()));
                StatusCode::NOT_FOUND
            }
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream { status, .. } => {
                body.insert("upstream_status".to_string(), json!(status));
                if *status == 504 {
                    StatusCode::GATEWAY_TIMEOUT
                } else {
                    StatusCode::BAD_GATEWAY
                }
            }
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(Value::Object(body))).into_response()
    }
}

/// `offset`/`limit` query parameters, forwarded verbatim.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

impl From<PageParams> for Page {
    fn from(params: PageParams) -> Self {
        Page {
            offset: params.offset,
            limit: params.limit,
        }
    }
}

/// CORS layer for the configured origin; `*` allows any.
pub fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origin == "*" {
        return layer.allow_origin(Any);
    }
    match HeaderValue::from_str(origin) {
        Ok(value) => layer.allow_origin(value),
        Err(_) => {
            tracing::warn!("Invalid CORS origin '{}', allowing any", origin);
            layer.allow_origin(Any)
        }
    }
}

/// Build the full router.
pub fn build_router(state: AppState) -> Router {
    use routes::{analysis, championships, hubs, matches, players, rankings};

    Router::new()
        .route("/", get(analysis::home))
        // Players
        .route("/search/", get(players::search_player))
        .route("/search", get(players::search_player))
        .route("/search/players", get(players::search_players))
        .route("/player/:player_id", get(players::get_player))
        .route("/player/:player_id/stats/:game", get(players::player_stats))
        .route("/player/:player_id/bans", get(players::player_bans))
        .route("/player/:player_id/history", get(players::player_history))
        .route("/player/:player_id/hubs", get(players::player_hubs))
        // Matches and hubs
        .route("/matches/:match_id", get(matches::get_match))
        .route("/hubs/:hub_id", get(hubs::get_hub))
        .route("/hubs/:hub_id/rules", get(hubs::hub_rules))
        .route("/hubs/:hub_id/stats", get(hubs::hub_stats))
        // Rankings
        .route(
            "/rankings/games/:game/regions/:region",
            get(rankings::region_rankings),
        )
        .route(
            "/rankings/games/:game/regions/:region/players/:player_id",
            get(rankings::player_ranking),
        )
        // Championships and leaderboards
        .route("/championships", get(championships::list_championships))
        .route(
            "/championships/:championship_id",
            get(championships::get_championship),
        )
        .route(
            "/championships/:championship_id/matches",
            get(championships::championship_matches),
        )
        .route(
            "/leaderboards/championships/:championship_id",
            get(championships::championship_leaderboards),
        )
        .route(
            "/leaderboards/:leaderboard_id",
            get(championships::get_leaderboard),
        )
        // Analysis
        .route("/elo-level/:elo", get(analysis::elo_level))
        .route("/smurf-check/:player_id", get(analysis::smurf_check))
        .route("/bulk/", post(analysis::bulk_lookup))
        .route("/bulk", post(analysis::bulk_lookup))
        .route("/compare/", post(analysis::compare_players))
        .route("/compare", post(analysis::compare_players))
        .route("/full-profile/", get(analysis::full_profile))
        .route("/full-profile", get(analysis::full_profile))
        .layer(cors_layer(&state.config.server.cors_origin))
        .with_state(state)
}
