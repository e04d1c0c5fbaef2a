//! Endpoint catalogue for the FACEIT Data API v4.

use std::sync::Arc;

use serde_json::Value;

use super::{Upstream, UpstreamError, UpstreamRequest};
use crate::models::PlayerLookup;

/// Offset/limit pair forwarded verbatim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Page {
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

impl UpstreamRequest {
    fn page(self, page: Page) -> Self {
        self.opt_param("offset", page.offset)
            .opt_param("limit", page.limit)
    }
}

/// Typed access to the upstream endpoints, over any [`Upstream`].
#[derive(Clone)]
pub struct FaceitApi {
    upstream: Arc<dyn Upstream>,
}

impl FaceitApi {
    pub fn new(upstream: Arc<dyn Upstream>) -> Self {
        Self { upstream }
    }

    pub fn backend_name(&self) -> &'static str {
        self.upstream.name()
    }

    /// `GET /players?nickname=` or `GET /players?game=&game_player_id=`.
    pub async fn lookup_player(&self, lookup: &PlayerLookup) -> Result<Value, UpstreamError> {
        let request = lookup
            .query()
            .into_iter()
            .fold(UpstreamRequest::new(["players"]), |req, (k, v)| {
                req.param(k, v)
            });
        self.upstream.get(request).await
    }

    pub async fn search_players(
        &self,
        nickname: &str,
        game: Option<&str>,
        country: Option<&str>,
        page: Page,
    ) -> Result<Value, UpstreamError> {
        let request = UpstreamRequest::new(["search", "players"])
            .param("nickname", nickname)
            .opt_param("game", game)
            .opt_param("country", country)
            .page(page);
        self.upstream.get(request).await
    }

    pub async fn player(&self, player_id: &str) -> Result<Value, UpstreamError> {
        self.upstream
            .get(UpstreamRequest::new(["players", player_id]))
            .await
    }

    pub async fn player_stats(&self, player_id: &str, game: &str) -> Result<Value, UpstreamError> {
        self.upstream
            .get(UpstreamRequest::new(["players", player_id, "stats", game]))
            .await
    }

    pub async fn player_bans(&self, player_id: &str) -> Result<Value, UpstreamError> {
        self.upstream
            .get(UpstreamRequest::new(["players", player_id, "bans"]))
            .await
    }

    pub async fn player_history(
        &self,
        player_id: &str,
        game: &str,
        limit: u32,
    ) -> Result<Value, UpstreamError> {
        let request = UpstreamRequest::new(["players", player_id, "history"])
            .param("game", game)
            .param("limit", limit);
        self.upstream.get(request).await
    }

    pub async fn player_hubs(&self, player_id: &str) -> Result<Value, UpstreamError> {
        self.upstream
            .get(UpstreamRequest::new(["players", player_id, "hubs"]))
            .await
    }

    pub async fn match_details(&self, match_id: &str) -> Result<Value, UpstreamError> {
        self.upstream
            .get(UpstreamRequest::new(["matches", match_id]))
            .await
    }

    pub async fn hub(&self, hub_id: &str, expanded: Option<&str>) -> Result<Value, UpstreamError> {
        let request = UpstreamRequest::new(["hubs", hub_id]).opt_param("expanded", expanded);
        self.upstream.get(request).await
    }

    pub async fn hub_rules(&self, hub_id: &str) -> Result<Value, UpstreamError> {
        self.upstream
            .get(UpstreamRequest::new(["hubs", hub_id, "rules"]))
            .await
    }

    pub async fn hub_stats(&self, hub_id: &str, page: Page) -> Result<Value, UpstreamError> {
        let request = UpstreamRequest::new(["hubs", hub_id, "stats"]).page(page);
        self.upstream.get(request).await
    }

    pub async fn region_rankings(
        &self,
        game: &str,
        region: &str,
        country: Option<&str>,
        page: Page,
    ) -> Result<Value, UpstreamError> {
        let request = UpstreamRequest::new(["rankings", "games", game, "regions", region])
            .opt_param("country", country)
            .page(page);
        self.upstream.get(request).await
    }

    pub async fn player_ranking(
        &self,
        game: &str,
        region: &str,
        player_id: &str,
        country: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Value, UpstreamError> {
        let request = UpstreamRequest::new([
            "rankings", "games", game, "regions", region, "players", player_id,
        ])
        .opt_param("country", country)
        .opt_param("limit", limit);
        self.upstream.get(request).await
    }

    pub async fn championships(
        &self,
        game: &str,
        kind: Option<&str>,
        page: Page,
    ) -> Result<Value, UpstreamError> {
        let request = UpstreamRequest::new(["championships"])
            .param("game", game)
            .opt_param("type", kind)
            .page(page);
        self.upstream.get(request).await
    }

    pub async fn championship(
        &self,
        championship_id: &str,
        expanded: Option<&str>,
    ) -> Result<Value, UpstreamError> {
        let request = UpstreamRequest::new(["championships", championship_id])
            .opt_param("expanded", expanded);
        self.upstream.get(request).await
    }

    pub async fn championship_matches(
        &self,
        championship_id: &str,
        kind: Option<&str>,
        page: Page,
    ) -> Result<Value, UpstreamError> {
        let request = UpstreamRequest::new(["championships", championship_id, "matches"])
            .opt_param("type", kind)
            .page(page);
        self.upstream.get(request).await
    }

    pub async fn championship_leaderboards(
        &self,
        championship_id: &str,
        page: Page,
    ) -> Result<Value, UpstreamError> {
        let request =
            UpstreamRequest::new(["leaderboards", "championships", championship_id]).page(page);
        self.upstream.get(request).await
    }

    pub async fn leaderboard(&self, leaderboard_id: &str, page: Page) -> Result<Value, UpstreamError> {
        let request = UpstreamRequest::new(["leaderboards", leaderboard_id]).page(page);
        self.upstream.get(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::mock::MockUpstream;
    use serde_json::json;

    #[tokio::test]
    async fn test_nickname_lookup_query() {
        let mock = Arc::new(MockUpstream::new().with("/players", json!({"player_id": "p1"})));
        let api = FaceitApi::new(mock.clone());

        let body = api
            .lookup_player(&PlayerLookup::resolve("shroud"))
            .await
            .unwrap();
        assert_eq!(body["player_id"], "p1");

        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].query_value("nickname"), Some("shroud"));
        assert_eq!(calls[0].query_value("game"), None);
    }

    #[tokio::test]
    async fn test_steam_lookup_query() {
        let mock = Arc::new(MockUpstream::new().with("/players", json!({"player_id": "p1"})));
        let api = FaceitApi::new(mock.clone());

        api.lookup_player(&PlayerLookup::resolve(
            "https://steamcommunity.com/profiles/76561198000000000",
        ))
        .await
        .unwrap();

        let calls = mock.calls();
        assert_eq!(calls[0].query_value("game"), Some("cs2"));
        assert_eq!(
            calls[0].query_value("game_player_id"),
            Some("76561198000000000")
        );
        assert_eq!(calls[0].query_value("nickname"), None);
    }

    #[tokio::test]
    async fn test_optional_params_only_when_supplied() {
        let mock = Arc::new(MockUpstream::new().with("/search/players", json!({"items": []})));
        let api = FaceitApi::new(mock.clone());

        api.search_players(
            "s1mple",
            None,
            Some("ua"),
            Page {
                offset: Some(20),
                limit: None,
            },
        )
        .await
        .unwrap();

        let call = &mock.calls()[0];
        assert_eq!(
            call.query,
            vec![
                ("nickname".to_string(), "s1mple".to_string()),
                ("country".to_string(), "ua".to_string()),
                ("offset".to_string(), "20".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_ranking_paths() {
        let mock = Arc::new(MockUpstream::new());
        let api = FaceitApi::new(mock.clone());

        let _ = api
            .player_ranking("cs2", "EU", "p1", None, Some(10))
            .await;
        let _ = api.championship_leaderboards("c1", Page::default()).await;

        let paths: Vec<String> = mock.calls().iter().map(|c| c.path()).collect();
        assert_eq!(
            paths,
            vec![
                "/rankings/games/cs2/regions/EU/players/p1",
                "/leaderboards/championships/c1",
            ]
        );
    }
}
