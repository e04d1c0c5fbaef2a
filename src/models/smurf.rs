//! Smurf-account heuristic over lifetime match statistics.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub const MATCHES_KEY: &str = "Matches";
pub const KD_RATIO_KEY: &str = "K/D Ratio";
pub const HEADSHOT_KEY: &str = "Average Headshots %";

/// Fewer lifetime matches than this combined with a high K/D is suspicious.
pub const LOW_MATCH_THRESHOLD: u64 = 30;
pub const HIGH_KD_THRESHOLD: f64 = 1.5;
pub const HIGH_HEADSHOT_THRESHOLD: f64 = 50.0;

pub const LOW_MATCHES_HIGH_KD_FLAG: &str = "High KD with low matches - Possible smurf";
pub const HIGH_HEADSHOT_FLAG: &str = "Unusually high headshot percentage";

/// A stat field was present but not numeric.
#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    #[error("Malformed stat '{field}': {value}")]
    Malformed { field: &'static str, value: String },
}

/// Heuristic output plus the inputs that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmurfReport {
    pub flags: Vec<String>,
    pub kd: f64,
    pub hs: f64,
    pub matches: u64,
}

impl SmurfReport {
    /// Apply the thresholds to already-parsed lifetime numbers.
    pub fn evaluate(matches: u64, kd: f64, hs: f64) -> Self {
        let mut flags = Vec::new();
        if matches < LOW_MATCH_THRESHOLD && kd > HIGH_KD_THRESHOLD {
            flags.push(LOW_MATCHES_HIGH_KD_FLAG.to_string());
        }
        if hs > HIGH_HEADSHOT_THRESHOLD {
            flags.push(HIGH_HEADSHOT_FLAG.to_string());
        }
        Self {
            flags,
            kd,
            hs,
            matches,
        }
    }

    /// Run the heuristic over an upstream stats payload (`{"lifetime": {...}}`).
    ///
    /// Missing fields default to zero; present but unparseable ones are errors.
    pub fn from_stats(stats: &Value) -> Result<Self, StatsError> {
        let empty = Map::new();
        let lifetime = stats
            .get("lifetime")
            .and_then(Value::as_object)
            .unwrap_or(&empty);
        Self::from_lifetime(lifetime)
    }

    pub fn from_lifetime(lifetime: &Map<String, Value>) -> Result<Self, StatsError> {
        let matches = read_count(lifetime, MATCHES_KEY)?;
        let kd = read_number(lifetime, KD_RATIO_KEY, false)?;
        let hs = read_number(lifetime, HEADSHOT_KEY, true)?;
        Ok(Self::evaluate(matches, kd, hs))
    }

    pub fn is_suspicious(&self) -> bool {
        !self.flags.is_empty()
    }
}

fn present<'a>(lifetime: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    lifetime.get(field).filter(|v| !v.is_null())
}

fn malformed(field: &'static str, value: &Value) -> StatsError {
    StatsError::Malformed {
        field,
        value: value.to_string(),
    }
}

fn read_count(lifetime: &Map<String, Value>, field: &'static str) -> Result<u64, StatsError> {
    let Some(value) = present(lifetime, field) else {
        return Ok(0);
    };
    match value {
        Value::Number(n) => n.as_u64().or_else(|| whole_count(n.as_f64()?)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .ok_or_else(|| malformed(field, value))
}

/// `10.0` counts as 10; fractional or negative floats do not.
fn whole_count(n: f64) -> Option<u64> {
    (n.is_finite() && n >= 0.0 && n.fract() == 0.0 && n <= u64::MAX as f64).then(|| n as u64)
}

fn read_number(
    lifetime: &Map<String, Value>,
    field: &'static str,
    percentage: bool,
) -> Result<f64, StatsError> {
    let Some(value) = present(lifetime, field) else {
        return Ok(0.0);
    };
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let s = s.trim();
            let s = if percentage {
                s.trim_end_matches('%').trim_end()
            } else {
                s
            };
            s.parse::<f64>().ok()
        }
        _ => None,
    }
    .filter(|n| n.is_finite())
    .ok_or_else(|| malformed(field, value))
}
