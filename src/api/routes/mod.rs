//! Route handlers, grouped by upstream area.

pub mod analysis;
pub mod championships;
pub mod hubs;
pub mod matches;
pub mod players;
pub mod rankings;
