//! # FACEIT Finder
//!
//! HTTP façade over the FACEIT Data API with player profile aggregation.
//!
//! ## Architecture
//!
//! - **models**: Player references, profile views, skill bands, smurf heuristic
//! - **upstream**: FACEIT API transport and endpoint catalogue
//! - **aggregate**: Multi-call orchestration (full profile, bulk, compare)
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod aggregate;
pub mod api;
pub mod config;
pub mod models;
pub mod upstream;

pub use models::*;
