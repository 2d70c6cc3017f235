use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{Datelike, Duration, FixedOffset, NaiveDate};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::{MatchingSettings, StandoutWeights, WeightsError};
use crate::core::finder::CandidateFinder;
use crate::core::quality::{score_lifestyle, MISSING_INTERESTS_PENALTY, NEUTRAL_SCORE};
use crate::core::{distance, interests};
use crate::models::{DailyPick, RecommendationError, Standout, StandoutsResult, UserProfile};
use crate::services::{
    BlockStorage, CacheKey, DailyPickStorage, MemoCache, StandoutStorage, StoredPick, SwipeStorage,
    UserDirectory,
};

/// Standouts from the previous N days are excluded to keep batches fresh.
const DIVERSITY_DAYS: u32 = 3;

const NO_CANDIDATES_MESSAGE: &str = "No standouts available. Try adjusting your preferences!";
const ALL_RECENT_MESSAGE: &str = "Check back tomorrow for fresh standouts!";

/// Daily pick and standouts for a seeker.
///
/// The daily pick is deterministic: the selection seed comes from the
/// seeker's id and the calendar date only, so two concurrent first requests
/// that race past the cache still choose the same candidate, and the
/// last-writer-wins save is benign. Once saved, a pick is resolved by the
/// stored candidate's identity, so later pool changes cannot shift it.
pub struct Recommender {
    finder: CandidateFinder,
    users: Arc<dyn UserDirectory>,
    swipes: Arc<dyn SwipeStorage>,
    blocks: Arc<dyn BlockStorage>,
    picks: Arc<dyn DailyPickStorage>,
    standouts: Arc<dyn StandoutStorage>,
    cache: MemoCache,
    clock: Arc<dyn Clock>,
    time_zone: FixedOffset,
    matching: MatchingSettings,
    weights: StandoutWeights,
}

impl Recommender {
    /// Rejects weight tables that are negative or do not sum to 1.0.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        finder: CandidateFinder,
        users: Arc<dyn UserDirectory>,
        swipes: Arc<dyn SwipeStorage>,
        blocks: Arc<dyn BlockStorage>,
        picks: Arc<dyn DailyPickStorage>,
        standouts: Arc<dyn StandoutStorage>,
        clock: Arc<dyn Clock>,
        matching: MatchingSettings,
        weights: StandoutWeights,
    ) -> Result<Self, WeightsError> {
        weights.validate()?;
        Ok(Self {
            finder,
            users,
            swipes,
            blocks,
            picks,
            standouts,
            cache: MemoCache::default(),
            clock,
            time_zone: matching.user_time_zone(),
            matching,
            weights,
        })
    }

    fn today(&self) -> NaiveDate {
        self.clock.today_in(self.time_zone)
    }

    /// Today's pick for a seeker, or `None` when no candidate is available.
    ///
    /// An empty pool is not cached: a later call the same day re-attempts,
    /// so newly eligible candidates can still surface.
    pub fn daily_pick(
        &self,
        seeker: &UserProfile,
    ) -> Result<Option<DailyPick>, RecommendationError> {
        let today = self.today();
        let key = CacheKey::daily_pick(seeker.id, today);

        let stored = self
            .cache
            .get::<StoredPick>(&key)
            .or_else(|| self.picks.get_pick(seeker.id, today));
        if let Some(stored) = stored {
            return self.resolve_pick(seeker, stored);
        }

        let candidates = self.eligible_candidates(seeker);
        if candidates.is_empty() {
            tracing::debug!(seeker_id = %seeker.id, "no daily pick candidates");
            return Ok(None);
        }

        let mut rng = ChaCha8Rng::from_seed(pick_seed(seeker.id, today, None));
        let picked = candidates[rng.gen_range(0..candidates.len())].clone();

        let mut reason_rng = ChaCha8Rng::from_seed(pick_seed(seeker.id, today, Some(picked.id)));
        let reason = self.pick_reason(seeker, &picked, &mut reason_rng, today);

        let stored = StoredPick {
            seeker_id: seeker.id,
            date: today,
            picked_user_id: picked.id,
            reason: reason.clone(),
            created_at: self.clock.now(),
        };
        self.picks.save_pick(stored.clone());
        if let Err(err) = self.cache.set(&key, &stored) {
            tracing::warn!("failed to memoize daily pick: {}", err);
        }

        tracing::info!(seeker_id = %seeker.id, picked_id = %picked.id, "daily pick selected");
        let already_seen = self.picks.has_viewed(seeker.id, today);
        DailyPick::new(picked, today, reason, already_seen).map(Some)
    }

    /// A stored pick refers to its candidate by identity. If that user is
    /// gone, the pick is simply unresolvable; no re-pick, no error.
    fn resolve_pick(
        &self,
        seeker: &UserProfile,
        stored: StoredPick,
    ) -> Result<Option<DailyPick>, RecommendationError> {
        match self.users.find_by_id(stored.picked_user_id) {
            Some(user) => {
                let already_seen = self.picks.has_viewed(seeker.id, stored.date);
                DailyPick::new(user, stored.date, stored.reason, already_seen).map(Some)
            }
            None => {
                tracing::debug!(
                    seeker_id = %seeker.id,
                    picked_id = %stored.picked_user_id,
                    "cached pick no longer resolvable"
                );
                Ok(None)
            }
        }
    }

    /// Finder output with decided and blocked ids stripped again. The finder
    /// already excludes both; this keeps the pick safe even against a stale
    /// finder view.
    fn eligible_candidates(&self, seeker: &UserProfile) -> Vec<UserProfile> {
        let decided = self.swipes.decided_user_ids(seeker.id);
        let blocked = self.blocks.blocked_partners(seeker.id);
        self.finder
            .find_candidates(seeker)
            .into_iter()
            .filter(|c| !decided.contains(&c.id) && !blocked.contains(&c.id))
            .collect()
    }

    fn pick_reason(
        &self,
        seeker: &UserProfile,
        picked: &UserProfile,
        rng: &mut ChaCha8Rng,
        today: NaiveDate,
    ) -> String {
        let mut reasons: Vec<&'static str> = Vec::new();

        if let Some(km) = distance::distance_between(seeker, picked) {
            if km < self.matching.nearby_distance_km {
                reasons.push("Lives nearby!");
            } else if km < self.matching.close_distance_km {
                reasons.push("Close enough for coffee!");
            }
        }

        let age_diff = seeker.age(today).abs_diff(picked.age(today));
        if age_diff <= self.matching.similar_age_diff {
            reasons.push("Similar age");
        } else if age_diff <= self.matching.compatible_age_diff {
            reasons.push("Age-appropriate match");
        }

        if same_some(seeker.looking_for, picked.looking_for) {
            reasons.push("Looking for the same thing");
        }
        if same_some(seeker.wants_kids, picked.wants_kids) {
            reasons.push("Same stance on kids");
        }
        if same_some(seeker.drinking, picked.drinking) {
            reasons.push("Compatible drinking habits");
        }
        if same_some(seeker.smoking, picked.smoking) {
            reasons.push("Compatible smoking habits");
        }

        let shared = seeker.interests.intersection(&picked.interests).count();
        if shared >= self.matching.min_shared_interests {
            reasons.push("Many shared interests!");
        } else if shared >= 1 {
            reasons.push("Some shared interests");
        }

        if reasons.is_empty() {
            reasons.extend([
                "Our algorithm thinks you might click!",
                "Something different today!",
                "Expand your horizons!",
                "Why not give them a chance?",
                "Could be a pleasant surprise!",
            ]);
        }

        reasons[rng.gen_range(0..reasons.len())].to_string()
    }

    pub fn mark_daily_pick_viewed(&self, seeker_id: Uuid) {
        self.picks.mark_viewed(seeker_id, self.today());
    }

    pub fn has_viewed_daily_pick(&self, seeker_id: Uuid) -> bool {
        self.picks.has_viewed(seeker_id, self.today())
    }

    /// Delete viewed markers dated strictly before `cutoff`; returns how
    /// many were removed. `cutoff = today` is a no-op; `today + 1` purges
    /// today's markers too.
    pub fn cleanup_viewed_before(&self, cutoff: NaiveDate) -> usize {
        let removed = self.picks.delete_viewed_before(cutoff);
        tracing::info!(%cutoff, removed, "cleaned up daily pick view markers");
        removed
    }

    /// Today's ranked standouts, up to ten, cached per (seeker, date).
    pub fn standouts(&self, seeker: &UserProfile) -> Result<StandoutsResult, RecommendationError> {
        let today = self.today();
        let key = CacheKey::standouts(seeker.id, today);

        let cached = self
            .cache
            .get::<Vec<Standout>>(&key)
            .or_else(|| self.standouts.get_standouts(seeker.id, today));
        if let Some(batch) = cached {
            if !batch.is_empty() {
                let count = batch.len();
                return Ok(StandoutsResult::of(batch, count, true));
            }
        }

        let candidates = self.finder.find_candidates(seeker);
        if candidates.is_empty() {
            return Ok(StandoutsResult::empty(NO_CANDIDATES_MESSAGE));
        }

        let recent = self.recent_standout_ids(seeker.id, today);
        let mut scored: Vec<(UserProfile, i64, String)> = candidates
            .iter()
            .filter(|c| !recent.contains(&c.id))
            .map(|c| {
                let (score, reason) = self.score_standout(seeker, c, today);
                (c.clone(), score, reason)
            })
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.id.cmp(&b.0.id)));
        scored.truncate(Standout::MAX_PER_DAY);

        if scored.is_empty() {
            return Ok(StandoutsResult::empty(ALL_RECENT_MESSAGE));
        }

        let now = self.clock.now();
        let mut batch = Vec::with_capacity(scored.len());
        for (rank, (candidate, score, reason)) in scored.into_iter().enumerate() {
            batch.push(Standout::create(
                seeker.id,
                candidate.id,
                today,
                rank + 1,
                score,
                reason,
                now,
            )?);
        }

        self.standouts
            .save_standouts(seeker.id, today, batch.clone());
        if let Err(err) = self.cache.set(&key, &batch) {
            tracing::warn!("failed to memoize standouts: {}", err);
        }

        tracing::info!(seeker_id = %seeker.id, count = batch.len(), "standouts generated");
        Ok(StandoutsResult::of(batch, candidates.len(), false))
    }

    /// Record that the seeker acted on one of today's standouts.
    pub fn mark_interacted(&self, seeker_id: Uuid, standout_user_id: Uuid) {
        let today = self.today();
        self.standouts
            .mark_interacted(seeker_id, standout_user_id, today, self.clock.now());
        // Drop the memoized batch so the marker is visible on the next read
        self.cache.invalidate(&CacheKey::standouts(seeker_id, today));
    }

    /// Map standouts to live profiles, silently omitting entries whose
    /// target no longer resolves.
    pub fn resolve_users(&self, standouts: &[Standout]) -> HashMap<Uuid, UserProfile> {
        standouts
            .iter()
            .filter_map(|s| {
                self.users
                    .find_by_id(s.standout_user_id)
                    .map(|u| (s.standout_user_id, u))
            })
            .collect()
    }

    fn recent_standout_ids(&self, seeker_id: Uuid, today: NaiveDate) -> HashSet<Uuid> {
        let mut recent = HashSet::new();
        for days_back in 1..=DIVERSITY_DAYS {
            if let Some(date) = today.checked_sub_days(chrono::Days::new(u64::from(days_back))) {
                if let Some(batch) = self.standouts.get_standouts(seeker_id, date) {
                    recent.extend(batch.into_iter().map(|s| s.standout_user_id));
                }
            }
        }
        recent
    }

    /// Lightweight composite score, 0-100, with a short reason. Cheaper than
    /// the full match-quality computation, which needs an established match.
    fn score_standout(
        &self,
        seeker: &UserProfile,
        candidate: &UserProfile,
        today: NaiveDate,
    ) -> (i64, String) {
        let km = distance::distance_between(seeker, candidate);
        let distance_score = match km {
            Some(km) if seeker.max_distance_km > 0 => {
                (1.0 - km / f64::from(seeker.max_distance_km)).max(0.0)
            }
            _ => NEUTRAL_SCORE,
        };

        let age_diff = seeker.age(today).abs_diff(candidate.age(today));
        let avg_range = (f64::from(seeker.max_age.saturating_sub(seeker.min_age))
            + f64::from(candidate.max_age.saturating_sub(candidate.min_age)))
            / 2.0;
        let age_score = if avg_range > 0.0 {
            (1.0 - f64::from(age_diff) / avg_range).max(0.0)
        } else {
            NEUTRAL_SCORE
        };

        let interest_match = interests::compare(&seeker.interests, &candidate.interests);
        let interest_score = if seeker.interests.is_empty() && candidate.interests.is_empty() {
            NEUTRAL_SCORE
        } else if seeker.interests.is_empty() || candidate.interests.is_empty() {
            MISSING_INTERESTS_PENALTY
        } else {
            interest_match.overlap_ratio
        };

        let lifestyle_score = score_lifestyle(seeker, candidate);
        let completeness_score = completeness_score(candidate);
        let activity_score = self.activity_score(candidate);

        let composite = distance_score * self.weights.distance
            + age_score * self.weights.age
            + interest_score * self.weights.interest
            + lifestyle_score * self.weights.lifestyle
            + completeness_score * self.weights.completeness
            + activity_score * self.weights.activity;
        let score = (composite * 100.0).round() as i64;

        let reason = self.standout_reason(seeker, candidate, &interest_match, km, lifestyle_score);
        (score, reason)
    }

    fn standout_reason(
        &self,
        seeker: &UserProfile,
        candidate: &UserProfile,
        interest_match: &interests::InterestMatch,
        km: Option<f64>,
        lifestyle: f64,
    ) -> String {
        if interest_match.shared_count >= self.matching.min_shared_interests {
            return "Many shared interests".to_string();
        }
        if interest_match.shared_count >= 1 {
            return "Shared interests".to_string();
        }
        if matches!(km, Some(km) if km < self.matching.nearby_distance_km) {
            return "Lives nearby".to_string();
        }
        if lifestyle >= 0.75 {
            return "Compatible lifestyle".to_string();
        }
        if same_some(seeker.looking_for, candidate.looking_for) {
            return "Same relationship goals".to_string();
        }
        "Top match for you".to_string()
    }

    /// Recently updated profiles rank higher; no update timestamp is
    /// neutral.
    fn activity_score(&self, candidate: &UserProfile) -> f64 {
        let updated_at = match candidate.updated_at {
            Some(at) => at,
            None => return NEUTRAL_SCORE,
        };
        let since = self.clock.now() - updated_at;
        if since < Duration::zero() {
            return NEUTRAL_SCORE;
        }
        match since.num_hours() {
            0 => 1.0,
            1..=23 => 0.9,
            24..=71 => 0.7,
            72..=167 => 0.5,
            168..=719 => 0.3,
            _ => 0.1,
        }
    }
}

fn same_some<T: PartialEq>(a: Option<T>, b: Option<T>) -> bool {
    matches!((a, b), (Some(x), Some(y)) if x == y)
}

/// Seed from stable inputs only: seeker id, epoch day, and (for the reason
/// stream) the picked id. Same seeker and date always produce the same
/// stream, across restarts.
fn pick_seed(seeker: Uuid, date: NaiveDate, picked: Option<Uuid>) -> [u8; 32] {
    let mut seed = [0u8; 32];
    seed[..16].copy_from_slice(seeker.as_bytes());
    seed[16..24].copy_from_slice(&i64::from(date.num_days_from_ce()).to_le_bytes());
    if let Some(picked) = picked {
        for (dst, src) in seed[..16].iter_mut().zip(picked.as_bytes()) {
            *dst ^= src;
        }
        seed[24] = 1;
    }
    seed
}

/// Fraction of optional profile sections that are filled in.
fn completeness_score(candidate: &UserProfile) -> f64 {
    let sections: [bool; 8] = [
        candidate.gender.is_some(),
        !candidate.interested_in.is_empty(),
        candidate.has_location(),
        candidate.smoking.is_some() && candidate.drinking.is_some(),
        candidate.wants_kids.is_some(),
        candidate.looking_for.is_some(),
        !candidate.interests.is_empty(),
        candidate.pace.is_some(),
    ];
    let filled = sections.iter().filter(|&&s| s).count();
    filled as f64 / sections.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_seed_is_stable() {
        let seeker = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(pick_seed(seeker, date, None), pick_seed(seeker, date, None));
    }

    #[test]
    fn test_pick_seed_varies_by_date_and_seeker() {
        let seeker = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let next = date.succ_opt().unwrap();
        assert_ne!(pick_seed(seeker, date, None), pick_seed(seeker, next, None));
        assert_ne!(
            pick_seed(seeker, date, None),
            pick_seed(Uuid::new_v4(), date, None)
        );
    }

    #[test]
    fn test_reason_seed_differs_from_pick_seed() {
        let seeker = Uuid::new_v4();
        let picked = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_ne!(
            pick_seed(seeker, date, None),
            pick_seed(seeker, date, Some(picked))
        );
    }

    #[test]
    fn test_completeness_score_range() {
        use crate::models::UserState;
        use std::collections::BTreeSet;

        let empty = UserProfile {
            id: Uuid::new_v4(),
            name: "Test".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1995, 3, 1).unwrap(),
            gender: None,
            interested_in: vec![],
            location: None,
            max_distance_km: 50,
            min_age: 20,
            max_age: 40,
            smoking: None,
            drinking: None,
            wants_kids: None,
            looking_for: None,
            interests: BTreeSet::new(),
            pace: None,
            state: UserState::Active,
            updated_at: None,
        };
        assert_eq!(completeness_score(&empty), 0.0);
    }
}
