//! Core data models: player references, profiles, skill bands and the smurf
//! heuristic.

mod player_ref;
mod profile;
mod skill;
mod smurf;

pub use player_ref::*;
pub use profile::*;
pub use skill::*;
pub use smurf::*;

/// Game that identity lookups, smurf checks and skill bands are scoped to.
pub const REFERENCE_GAME: &str = "cs2";

/// Match history page size when the caller does not pass `limit`.
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;
