use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Block, Standout, SwipeDecision, UserProfile};

/// Cached daily-pick association. Stores the picked user's identity, never a
/// position in a candidate list, so later pool changes cannot shift a pick
/// that was already made.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredPick {
    pub seeker_id: Uuid,
    pub date: NaiveDate,
    pub picked_user_id: Uuid,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

/// Read access to user profiles. Owned by the profile service.
pub trait UserDirectory: Send + Sync {
    fn find_by_id(&self, id: Uuid) -> Option<UserProfile>;
    fn all(&self) -> Vec<UserProfile>;
    fn all_active(&self) -> Vec<UserProfile>;
}

/// Like/pass decision edges.
pub trait SwipeStorage: Send + Sync {
    fn record(&self, decision: SwipeDecision);
    fn exists(&self, from: Uuid, to: Uuid) -> bool;
    /// Everyone `user` has already liked or passed on.
    fn decided_user_ids(&self, user: Uuid) -> HashSet<Uuid>;
    /// All like edges pointing at `user`, timestamps included.
    fn likes_received(&self, user: Uuid) -> Vec<SwipeDecision>;
}

/// Block edges. Blocking hides both users from each other regardless of
/// direction.
pub trait BlockStorage: Send + Sync {
    fn record(&self, block: Block);
    fn is_blocked(&self, a: Uuid, b: Uuid) -> bool;
    fn blocked_partners(&self, user: Uuid) -> HashSet<Uuid>;
}

/// Per-(seeker, date) daily-pick cache plus viewed markers.
pub trait DailyPickStorage: Send + Sync {
    fn get_pick(&self, seeker: Uuid, date: NaiveDate) -> Option<StoredPick>;
    fn save_pick(&self, pick: StoredPick);
    fn mark_viewed(&self, seeker: Uuid, date: NaiveDate);
    fn has_viewed(&self, seeker: Uuid, date: NaiveDate) -> bool;
    /// Delete viewed markers dated strictly before `cutoff`; returns how many
    /// were removed.
    fn delete_viewed_before(&self, cutoff: NaiveDate) -> usize;
}

/// Per-(seeker, date) standout batches plus interaction markers.
pub trait StandoutStorage: Send + Sync {
    fn get_standouts(&self, seeker: Uuid, date: NaiveDate) -> Option<Vec<Standout>>;
    fn save_standouts(&self, seeker: Uuid, date: NaiveDate, standouts: Vec<Standout>);
    /// Stamp `at` on the matching standout in the day's batch. The caller
    /// supplies the timestamp so time stays behind the clock seam.
    fn mark_interacted(
        &self,
        seeker: Uuid,
        standout_user: Uuid,
        date: NaiveDate,
        at: DateTime<Utc>,
    );
    /// Delete batches dated strictly before `cutoff`; returns how many were
    /// removed.
    fn delete_before(&self, cutoff: NaiveDate) -> usize;
}
