//! Ember Match - matching core for the Ember dating platform
//!
//! This library implements the three pillars of the matching pipeline:
//! eligibility filtering (who may be shown to whom), compatibility scoring
//! for confirmed matches, and the daily recommendation products (one
//! deterministic daily pick plus up to ten ranked standouts per seeker per
//! day). It is consumed by an outer service layer; no transport or storage
//! engine lives here, only contracts for them.

pub mod clock;
pub mod config;
pub mod core;
pub mod logging;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use crate::clock::{Clock, FixedClock, SystemClock};
pub use crate::config::Settings;
pub use crate::core::{
    distance::haversine_distance, CandidateFinder, CompatibilityScorer, Recommender,
};
pub use crate::models::{
    DailyPick, Interest, Match, MatchQuality, Standout, StandoutsResult, UserProfile,
};
