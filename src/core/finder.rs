use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

use chrono::{FixedOffset, NaiveDate};
use uuid::Uuid;

use crate::clock::Clock;
use crate::core::distance;
use crate::models::UserProfile;
use crate::services::{BlockStorage, SwipeStorage, UserDirectory};

/// Eligibility filtering for a seeker.
///
/// Returns the profiles a seeker may currently be shown: active, mutually
/// gender- and age-compatible, within both users' distance limits, not yet
/// decided on, and not blocked in either direction. Candidates with a known
/// distance come first, nearest first.
pub struct CandidateFinder {
    users: Arc<dyn UserDirectory>,
    swipes: Arc<dyn SwipeStorage>,
    blocks: Arc<dyn BlockStorage>,
    clock: Arc<dyn Clock>,
    time_zone: FixedOffset,
}

impl CandidateFinder {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        swipes: Arc<dyn SwipeStorage>,
        blocks: Arc<dyn BlockStorage>,
        clock: Arc<dyn Clock>,
        time_zone: FixedOffset,
    ) -> Self {
        Self {
            users,
            swipes,
            blocks,
            clock,
            time_zone,
        }
    }

    /// Candidates for a seeker looked up by id. An unknown seeker yields an
    /// empty list, same as an ineligible one.
    pub fn find_for_user(&self, seeker_id: Uuid) -> Vec<UserProfile> {
        match self.users.find_by_id(seeker_id) {
            Some(seeker) => self.find_candidates(&seeker),
            None => {
                tracing::debug!(%seeker_id, "seeker not found, no candidates");
                Vec::new()
            }
        }
    }

    /// Candidates for an already-loaded seeker profile.
    pub fn find_candidates(&self, seeker: &UserProfile) -> Vec<UserProfile> {
        let today = self.clock.today_in(self.time_zone);
        let decided = self.swipes.decided_user_ids(seeker.id);
        let blocked = self.blocks.blocked_partners(seeker.id);

        let mut candidates: Vec<UserProfile> = self
            .users
            .all_active()
            .into_iter()
            .filter(|candidate| is_eligible(seeker, candidate, today, &decided, &blocked))
            .collect();

        candidates.sort_by(|a, b| compare_by_distance(seeker, a, b));

        tracing::debug!(
            seeker_id = %seeker.id,
            count = candidates.len(),
            "candidate search complete"
        );
        candidates
    }
}

fn is_eligible(
    seeker: &UserProfile,
    candidate: &UserProfile,
    today: NaiveDate,
    decided: &HashSet<Uuid>,
    blocked: &HashSet<Uuid>,
) -> bool {
    if candidate.id == seeker.id {
        return false;
    }
    if !candidate.is_active() {
        tracing::debug!(candidate_id = %candidate.id, "rejected: not active");
        return false;
    }
    if !mutual_gender_interest(seeker, candidate) {
        tracing::debug!(candidate_id = %candidate.id, "rejected: gender preferences");
        return false;
    }
    if !mutual_age_compatible(seeker, candidate, today) {
        tracing::debug!(candidate_id = %candidate.id, "rejected: age range");
        return false;
    }
    if !within_distance(seeker, candidate) {
        tracing::debug!(candidate_id = %candidate.id, "rejected: distance");
        return false;
    }
    if decided.contains(&candidate.id) {
        tracing::debug!(candidate_id = %candidate.id, "rejected: already decided");
        return false;
    }
    if blocked.contains(&candidate.id) {
        tracing::debug!(candidate_id = %candidate.id, "rejected: blocked");
        return false;
    }
    true
}

/// Both sides must declare the other's gender in their interested-in set.
/// An empty or missing declaration means interested in no one.
fn mutual_gender_interest(seeker: &UserProfile, candidate: &UserProfile) -> bool {
    let seeker_wants = match candidate.gender {
        Some(g) => seeker.interested_in.contains(&g),
        None => false,
    };
    let candidate_wants = match seeker.gender {
        Some(g) => candidate.interested_in.contains(&g),
        None => false,
    };
    seeker_wants && candidate_wants
}

/// Each user's age must fall within the other's declared range.
fn mutual_age_compatible(seeker: &UserProfile, candidate: &UserProfile, today: NaiveDate) -> bool {
    let seeker_age = seeker.age(today);
    let candidate_age = candidate.age(today);

    (seeker.min_age..=seeker.max_age).contains(&candidate_age)
        && (candidate.min_age..=candidate.max_age).contains(&seeker_age)
}

/// Distance must not exceed the smaller of the two search radii. A missing
/// location on either side skips the check rather than failing it.
fn within_distance(seeker: &UserProfile, candidate: &UserProfile) -> bool {
    match distance::distance_between(seeker, candidate) {
        Some(km) => {
            let limit = seeker.max_distance_km.min(candidate.max_distance_km);
            km <= f64::from(limit)
        }
        None => true,
    }
}

/// Known distances first, nearest first; ties and unknowns fall back to id
/// so the order stays deterministic.
fn compare_by_distance(seeker: &UserProfile, a: &UserProfile, b: &UserProfile) -> Ordering {
    let da = distance::distance_between(seeker, a);
    let db = distance::distance_between(seeker, b);
    match (da, db) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.id.cmp(&b.id))
}
