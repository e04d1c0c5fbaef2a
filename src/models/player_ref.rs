//! Player reference resolution.
//!
//! A player reference is whatever the user typed: a FACEIT nickname, a Steam
//! community profile URL (vanity or numeric), or an opaque ID. Resolution
//! never fails; whether the lookup finds anybody is up to upstream.

use std::sync::LazyLock;

use regex::Regex;

use super::REFERENCE_GAME;

/// Marker that identifies a Steam community profile URL.
pub const PROFILE_HOST_MARKER: &str = "steamcommunity.com";

static VANITY_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"steamcommunity\.com/id/([a-zA-Z0-9_]+)/?").expect("vanity path pattern")
});

static NUMERIC_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"steamcommunity\.com/profiles/(\d+)/?").expect("numeric path pattern")
});

/// The upstream query a player reference resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerLookup {
    /// `GET /players?nickname=...`
    Nickname(String),

    /// `GET /players?game=...&game_player_id=...`
    GamePlayerId {
        game: String,
        game_player_id: String,
    },
}

impl PlayerLookup {
    /// Resolve a raw player reference.
    pub fn resolve(reference: &str) -> Self {
        if reference.contains(PROFILE_HOST_MARKER) {
            PlayerLookup::GamePlayerId {
                game: REFERENCE_GAME.to_string(),
                game_player_id: extract_steam_id(reference).to_string(),
            }
        } else {
            PlayerLookup::Nickname(reference.to_string())
        }
    }

    /// The identifier the lookup is keyed on.
    pub fn identifier(&self) -> &str {
        match self {
            PlayerLookup::Nickname(nickname) => nickname,
            PlayerLookup::GamePlayerId { game_player_id, .. } => game_player_id,
        }
    }

    /// Query parameters for the upstream `/players` endpoint.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            PlayerLookup::Nickname(nickname) => vec![("nickname", nickname.clone())],
            PlayerLookup::GamePlayerId {
                game,
                game_player_id,
            } => vec![
                ("game", game.clone()),
                ("game_player_id", game_player_id.clone()),
            ],
        }
    }
}

/// Pull the vanity name or SteamID64 out of a Steam community URL.
///
/// Falls back to the whole input when neither path shape matches.
pub fn extract_steam_id(url: &str) -> &str {
    VANITY_PATH
        .captures(url)
        .or_else(|| NUMERIC_PATH.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(url)
}
