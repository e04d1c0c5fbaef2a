use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::aggregate;
use crate::api::state::AppState;
use crate::api::{ApiError, Entity, PageParams};
use crate::models::DEFAULT_HISTORY_LIMIT;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub nickname: String,
}

/// Nickname, Steam URL or ID lookup.
pub async fn search_player(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>, ApiError> {
    let player = aggregate::resolve_player(&state.api, &params.nickname)
        .await
        .map_err(ApiError::lookup(Entity::Player, &params.nickname))?;
    Ok(Json(player))
}

#[derive(Debug, Deserialize)]
pub struct SearchPlayersParams {
    pub nickname: String,
    pub game: Option<String>,
    pub country: Option<String>,
}

pub async fn search_players(
    State(state): State<AppState>,
    Query(params): Query<SearchPlayersParams>,
    Query(page): Query<PageParams>,
) -> Result<Json<Value>, ApiError> {
    let results = state
        .api
        .search_players(
            &params.nickname,
            params.game.as_deref(),
            params.country.as_deref(),
            page.into(),
        )
        .await?;
    Ok(Json(results))
}

pub async fn get_player(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let player = state
        .api
        .player(&player_id)
        .await
        .map_err(ApiError::lookup(Entity::Player, &player_id))?;
    Ok(Json(player))
}

pub async fn player_stats(
    State(state): State<AppState>,
    Path((player_id, game)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let stats = state
        .api
        .player_stats(&player_id, &game)
        .await
        .map_err(ApiError::lookup(Entity::Player, &player_id))?;
    Ok(Json(stats))
}

pub async fn player_bans(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let bans = state
        .api
        .player_bans(&player_id)
        .await
        .map_err(ApiError::lookup(Entity::Player, &player_id))?;
    Ok(Json(bans))
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    pub game: String,
    pub limit: Option<u32>,
}

pub async fn player_history(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Value>, ApiError> {
    let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let history = state
        .api
        .player_history(&player_id, &params.game, limit)
        .await
        .map_err(ApiError::lookup(Entity::Player, &player_id))?;
    Ok(Json(history))
}

pub async fn player_hubs(
    State(state): State<AppState>,
    Path(player_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let hubs = state
        .api
        .player_hubs(&player_id)
        .await
        .map_err(ApiError::lookup(Entity::Player, &player_id))?;
    Ok(Json(hubs))
}

#[cfg(test)]
mod tests {
    use crate::api::routes::test_support::{app, get_json};
    use crate::upstream::mock::MockUpstream;
    use axum::http::StatusCode;
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_search_by_nickname() {
        let mock = Arc::new(
            MockUpstream::new().with("/players?nickname=shroud", json!({"player_id": "p-1"})),
        );

        let (status, json) = get_json(app(&mock), "/search/?nickname=shroud").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["player_id"], "p-1");
    }

    #[tokio::test]
    async fn test_search_by_steam_url() {
        let mock = Arc::new(MockUpstream::new().with("/players", json!({"player_id": "p-1"})));

        let (status, _) = get_json(
            app(&mock),
            "/search?nickname=https%3A%2F%2Fsteamcommunity.com%2Fid%2Fjohnny123%2F",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(mock.calls()[0].query_value("game_player_id"), Some("johnny123"));
    }

    #[tokio::test]
    async fn test_search_requires_nickname() {
        let mock = Arc::new(MockUpstream::new());

        let (status, _) = get_json(app(&mock), "/search/").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_search_players_forwards_filters() {
        let mock = Arc::new(MockUpstream::new().with("/search/players", json!({"items": []})));

        let (status, _) = get_json(
            app(&mock),
            "/search/players?nickname=s1&game=cs2&country=ua&offset=5&limit=10",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            mock.calls()[0].path_and_query(),
            "/search/players?nickname=s1&game=cs2&country=ua&offset=5&limit=10"
        );
    }

    #[tokio::test]
    async fn test_unknown_player_is_404_with_id() {
        let mock = Arc::new(MockUpstream::new());

        let (status, json) = get_json(app(&mock), "/player/nope").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json, json!({"error": "Player not found.", "player_id": "nope"}));
    }

    #[tokio::test]
    async fn test_player_stats_passthrough() {
        let mock = Arc::new(
            MockUpstream::new().with("/players/p-1/stats/cs2", json!({"lifetime": {"Matches": "5"}})),
        );

        let (status, json) = get_json(app(&mock), "/player/p-1/stats/cs2").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["lifetime"]["Matches"], "5");
    }

    #[tokio::test]
    async fn test_history_default_limit() {
        let mock = Arc::new(MockUpstream::new().with("/players/p-1/history", json!({"items": []})));

        let (status, _) = get_json(app(&mock), "/player/p-1/history?game=cs2").await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = get_json(app(&mock), "/player/p-1/history?game=cs2&limit=5").await;
        assert_eq!(status, StatusCode::OK);

        let limits: Vec<Option<String>> = mock
            .calls()
            .iter()
            .map(|c| c.query_value("limit").map(str::to_string))
            .collect();
        assert_eq!(limits, vec![Some("50".to_string()), Some("5".to_string())]);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_bad_gateway() {
        let mock = Arc::new(MockUpstream::new().with_status("/players/p-1/bans", 401, "Unauthorized"));

        let (status, json) = get_json(app(&mock), "/player/p-1/bans").await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["upstream_status"], 401);
    }

    #[tokio::test]
    async fn test_player_hubs() {
        let mock = Arc::new(MockUpstream::new().with("/players/p-1/hubs", json!({"items": [1, 2]})));

        let (status, json) = get_json(app(&mock), "/player/p-1/hubs").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["items"].as_array().unwrap().len(), 2);
    }
}
