//! View over the upstream player profile.
//!
//! The payload is kept as received and serialized back unchanged. Only the
//! handful of fields read locally are pulled out, and those reads are
//! lenient: a field of an unexpected type counts as absent.

use serde::{Serialize, Serializer};
use serde_json::Value;

/// FACEIT player profile.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerProfile {
    pub player_id: String,
    pub nickname: Option<String>,
    raw: Value,
}

impl PlayerProfile {
    /// Interpret an upstream payload as a profile.
    ///
    /// Returns `None` for payloads that do not carry a string `player_id`,
    /// which is how upstream error bodies look.
    pub fn from_value(raw: Value) -> Option<Self> {
        let player_id = raw.get("player_id")?.as_str()?.to_string();
        let nickname = raw
            .get("nickname")
            .and_then(Value::as_str)
            .map(str::to_string);
        Some(Self {
            player_id,
            nickname,
            raw,
        })
    }

    /// Game keys the player has a profile section for, in sorted order.
    pub fn game_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .raw
            .get("games")
            .and_then(Value::as_object)
            .map(|games| games.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// `games.<game>.faceit_elo`, accepting integers, floats (truncated) and
    /// numeric strings.
    pub fn elo_for(&self, game: &str) -> Option<i64> {
        let elo = self.raw.get("games")?.get(game)?.get("faceit_elo")?;
        match elo {
            Value::Number(n) => n.as_i64().or_else(|| float_to_elo(n.as_f64()?)),
            Value::String(s) => {
                let s = s.trim();
                s.parse::<i64>()
                    .ok()
                    .or_else(|| float_to_elo(s.parse::<f64>().ok()?))
            }
            _ => None,
        }
    }
}

fn float_to_elo(n: f64) -> Option<i64> {
    n.is_finite().then(|| n.trunc() as i64)
}

impl Serialize for PlayerProfile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}
