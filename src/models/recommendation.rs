use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::UserProfile;

/// Raised when a recommendation value would violate its invariants.
#[derive(Debug, Error)]
pub enum RecommendationError {
    #[error("rank must be 1-{max}, got: {got}", max = Standout::MAX_PER_DAY)]
    RankOutOfRange { got: usize },

    #[error("score must be 0-100, got: {got}")]
    ScoreOutOfRange { got: i64 },

    #[error("reason cannot be blank")]
    BlankReason,
}

/// One deterministic recommended candidate for a seeker on a calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyPick {
    pub user: UserProfile,
    pub date: NaiveDate,
    pub reason: String,
    /// Whether the seeker already viewed today's pick.
    pub already_seen: bool,
}

impl DailyPick {
    pub fn new(
        user: UserProfile,
        date: NaiveDate,
        reason: String,
        already_seen: bool,
    ) -> Result<Self, RecommendationError> {
        if reason.trim().is_empty() {
            return Err(RecommendationError::BlankReason);
        }
        Ok(Self {
            user,
            date,
            reason,
            already_seen,
        })
    }
}

/// One ranked standout candidate for a seeker on a calendar date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Standout {
    pub id: Uuid,
    pub seeker_id: Uuid,
    pub standout_user_id: Uuid,
    pub featured_date: NaiveDate,
    /// 1-based rank within the day's batch.
    pub rank: usize,
    /// Heuristic score, 0-100.
    pub score: u8,
    pub reason: String,
    pub created_at: DateTime<Utc>,
    pub interacted_at: Option<DateTime<Utc>>,
}

impl Standout {
    /// Cap on standouts per seeker per day.
    pub const MAX_PER_DAY: usize = 10;

    pub fn create(
        seeker_id: Uuid,
        standout_user_id: Uuid,
        featured_date: NaiveDate,
        rank: usize,
        score: i64,
        reason: String,
        created_at: DateTime<Utc>,
    ) -> Result<Self, RecommendationError> {
        if rank < 1 || rank > Self::MAX_PER_DAY {
            return Err(RecommendationError::RankOutOfRange { got: rank });
        }
        if !(0..=100).contains(&score) {
            return Err(RecommendationError::ScoreOutOfRange { got: score });
        }
        if reason.trim().is_empty() {
            return Err(RecommendationError::BlankReason);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            seeker_id,
            standout_user_id,
            featured_date,
            rank,
            score: score as u8,
            reason,
            created_at,
            interacted_at: None,
        })
    }

    pub fn has_interacted(&self) -> bool {
        self.interacted_at.is_some()
    }
}

/// Outcome of a standouts query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandoutsResult {
    pub standouts: Vec<Standout>,
    /// How many eligible candidates were considered before ranking.
    pub total_candidates: usize,
    pub from_cache: bool,
    pub message: Option<String>,
}

impl StandoutsResult {
    pub fn of(standouts: Vec<Standout>, total_candidates: usize, from_cache: bool) -> Self {
        Self {
            standouts,
            total_candidates,
            from_cache,
            message: None,
        }
    }

    pub fn empty(message: impl Into<String>) -> Self {
        Self {
            standouts: Vec::new(),
            total_candidates: 0,
            from_cache: false,
            message: Some(message.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.standouts.is_empty()
    }

    pub fn count(&self) -> usize {
        self.standouts.len()
    }
}
