//! Multi-call orchestration: full profiles, bulk lookups, comparisons and
//! smurf checks.
//!
//! Independent upstream calls inside one request run concurrently. Results
//! are keyed by game in ordered maps, so completion order never shows up in
//! the output.

use std::collections::BTreeMap;

use futures::future::join_all;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::{
    EloLevel, PlayerLookup, PlayerProfile, SmurfReport, StatsError, DEFAULT_HISTORY_LIMIT,
    REFERENCE_GAME,
};
use crate::upstream::{FaceitApi, Fetched, UpstreamError, UpstreamFailure};

pub const PLAYER_NOT_FOUND: &str = "Player not found.";

/// Everything known about one player, assembled per request.
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedProfile {
    pub player: PlayerProfile,
    pub stats: BTreeMap<String, Fetched<Value>>,
    pub bans: Fetched<Value>,
    pub match_history: BTreeMap<String, Fetched<Value>>,
    pub hubs: Fetched<Value>,
    pub smurf_flags: Fetched<SmurfReport>,
    pub elo_level: EloLevel,
}

/// Result of a full-profile aggregation.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ProfileOutcome {
    Found(Box<AggregatedProfile>),
    NotFound { error: &'static str },
}

impl ProfileOutcome {
    pub fn not_found() -> Self {
        ProfileOutcome::NotFound {
            error: PLAYER_NOT_FOUND,
        }
    }
}

/// Smurf check failures.
#[derive(Debug, Error)]
pub enum SmurfCheckError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    #[error("Upstream returned unreadable stats: {0}")]
    Stats(#[from] StatsError),
}

impl SmurfCheckError {
    pub fn status_code(&self) -> u16 {
        match self {
            SmurfCheckError::Upstream(e) => e.status_code(),
            SmurfCheckError::Stats(_) => 502,
        }
    }
}

impl From<SmurfCheckError> for Fetched<SmurfReport> {
    fn from(err: SmurfCheckError) -> Self {
        Fetched::Failed(UpstreamFailure {
            error: err.to_string(),
            status: err.status_code(),
        })
    }
}

/// One entry of a bulk lookup.
#[derive(Debug, Clone, Serialize)]
pub struct BulkEntry {
    pub id: String,
    pub result: Fetched<Value>,
}

/// One player in a comparison.
#[derive(Debug, Clone, Serialize)]
pub struct ComparedPlayer {
    pub nickname: Option<String>,
    pub stats: Fetched<Value>,
}

/// Resolve a player reference and fetch the matching profile.
pub async fn resolve_player(api: &FaceitApi, reference: &str) -> Result<Value, UpstreamError> {
    let lookup = PlayerLookup::resolve(reference);
    debug!("Resolved '{}' to lookup key '{}'", reference, lookup.identifier());
    api.lookup_player(&lookup).await
}

/// Resolve a reference to a profile that carries a `player_id`.
///
/// `Ok(None)` when upstream has nobody under that reference.
async fn find_profile(
    api: &FaceitApi,
    reference: &str,
) -> Result<Option<PlayerProfile>, UpstreamError> {
    match resolve_player(api, reference).await {
        Ok(value) => Ok(PlayerProfile::from_value(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Smurf heuristic over a player's reference-game stats.
pub async fn smurf_check(api: &FaceitApi, player_id: &str) -> Result<SmurfReport, SmurfCheckError> {
    let stats = api.player_stats(player_id, REFERENCE_GAME).await?;
    let report = SmurfReport::from_stats(&stats)?;
    if report.is_suspicious() {
        info!("Player {} flagged: {}", player_id, report.flags.join("; "));
    }
    Ok(report)
}

/// Build the composite profile for a nickname, Steam URL or ID.
///
/// Only the initial lookup can end the aggregation early; every later
/// sub-call failure is embedded in place.
pub async fn full_profile(
    api: &FaceitApi,
    reference: &str,
) -> Result<ProfileOutcome, UpstreamError> {
    let Some(player) = find_profile(api, reference).await? else {
        info!("No player found for '{}'", reference);
        return Ok(ProfileOutcome::not_found());
    };
    let player_id = player.player_id.clone();
    let games = player.game_keys();
    info!(
        "Aggregating profile {} across {} games",
        player_id,
        games.len()
    );

    let id = player_id.as_str();
    let stats = join_all(games.iter().map(|game| async move {
        (game.clone(), Fetched::from(api.player_stats(id, game).await))
    }));
    let history = join_all(games.iter().map(|game| async move {
        let result = api.player_history(id, game, DEFAULT_HISTORY_LIMIT).await;
        (game.clone(), Fetched::from(result))
    }));
    let (stats, match_history, bans, hubs) =
        tokio::join!(stats, history, api.player_bans(id), api.player_hubs(id));

    let stats: BTreeMap<String, Fetched<Value>> = stats.into_iter().collect();
    let match_history: BTreeMap<String, Fetched<Value>> = match_history.into_iter().collect();

    let smurf_flags = match stats.get(REFERENCE_GAME) {
        Some(Fetched::Ok(reference_stats)) => match SmurfReport::from_stats(reference_stats) {
            Ok(report) => Fetched::Ok(report),
            Err(e) => SmurfCheckError::from(e).into(),
        },
        Some(Fetched::Failed(failure)) => Fetched::Failed(failure.clone()),
        None => match smurf_check(api, id).await {
            Ok(report) => Fetched::Ok(report),
            Err(e) => e.into(),
        },
    };

    let elo_level = EloLevel::from_elo(player.elo_for(REFERENCE_GAME));
    debug!("Player {} classified as {}", player_id, elo_level.level);

    Ok(ProfileOutcome::Found(Box::new(AggregatedProfile {
        player,
        stats,
        bans: bans.into(),
        match_history,
        hubs: hubs.into(),
        smurf_flags,
        elo_level,
    })))
}

/// Look up every reference; output order and length match the input.
pub async fn bulk_lookup(api: &FaceitApi, ids: &[String]) -> Vec<BulkEntry> {
    join_all(ids.iter().map(|id| async move {
        BulkEntry {
            id: id.clone(),
            result: resolve_player(api, id).await.into(),
        }
    }))
    .await
}

/// Stats for `game` for every reference that resolves to a player.
///
/// References that do not resolve are left out of the result.
pub async fn compare(api: &FaceitApi, ids: &[String], game: &str) -> Vec<ComparedPlayer> {
    let compared = join_all(ids.iter().map(|id| async move {
        let player = match find_profile(api, id).await {
            Ok(Some(player)) => player,
            Ok(None) => {
                warn!("Compare: '{}' did not resolve to a player, skipping", id);
                return None;
            }
            Err(e) => {
                warn!("Compare: lookup for '{}' failed, skipping: {}", id, e);
                return None;
            }
        };
        let player_id = player.player_id.as_str();
        let stats = api.player_stats(player_id, game).await.into();
        Some(ComparedPlayer {
            nickname: player.nickname.clone(),
            stats,
        })
    }))
    .await;

    compared.into_iter().flatten().collect()
}
