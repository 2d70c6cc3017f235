use std::sync::Arc;

use chrono::{Duration, FixedOffset, NaiveDate};
use uuid::Uuid;

use crate::clock::Clock;
use crate::config::{MatchingSettings, QualityWeights, WeightsError};
use crate::core::{distance, interests};
use crate::models::{
    CommunicationStyle, DepthPreference, Match, MatchQuality, PacePreferences, QualityError,
    UserProfile, WantsKids, DISTANCE_UNKNOWN,
};
use crate::services::{SwipeStorage, UserDirectory};

/// Score when one side declared interests and the other declared none.
pub const MISSING_INTERESTS_PENALTY: f64 = 0.3;
/// Score used whenever a dimension has no information to go on.
pub const NEUTRAL_SCORE: f64 = 0.5;
/// Highlights are computed in full, then truncated to this many.
pub const MAX_HIGHLIGHTS: usize = 5;

const WILDCARD_SCORE: u32 = 20;
const MID_DISTANCE_KM: f64 = 15.0;

/// Computes a `MatchQuality` breakdown for a confirmed match, from one
/// user's perspective. Scores are symmetric; highlight wording is not.
pub struct CompatibilityScorer {
    users: Arc<dyn UserDirectory>,
    swipes: Arc<dyn SwipeStorage>,
    clock: Arc<dyn Clock>,
    time_zone: FixedOffset,
    weights: QualityWeights,
    matching: MatchingSettings,
}

impl CompatibilityScorer {
    /// Rejects weight tables that are negative or do not sum to 1.0;
    /// a misconfigured scorer must not be constructable.
    pub fn new(
        users: Arc<dyn UserDirectory>,
        swipes: Arc<dyn SwipeStorage>,
        clock: Arc<dyn Clock>,
        weights: QualityWeights,
        matching: MatchingSettings,
    ) -> Result<Self, WeightsError> {
        weights.validate()?;
        Ok(Self {
            users,
            swipes,
            clock,
            time_zone: matching.user_time_zone(),
            weights,
            matching,
        })
    }

    pub fn compute(
        &self,
        matched: &Match,
        perspective_user_id: Uuid,
    ) -> Result<MatchQuality, QualityError> {
        let other_user_id = matched
            .other_user(perspective_user_id)
            .ok_or(QualityError::NotInMatch(perspective_user_id, matched.id))?;

        let me = self
            .users
            .find_by_id(perspective_user_id)
            .ok_or(QualityError::UserNotFound(perspective_user_id))?;
        let them = self
            .users
            .find_by_id(other_user_id)
            .ok_or(QualityError::UserNotFound(other_user_id))?;

        let today = self.clock.today_in(self.time_zone);

        let (distance_km, distance_score) = score_distance(&me, &them);
        let age_difference = age_difference(&me, &them, today);
        let age_score = score_age(age_difference, &me, &them, self.matching.similar_age_diff);

        let interest_match = interests::compare(&me.interests, &them.interests);
        let interest_score = score_interests(&interest_match, &me, &them);
        let mut shared_interests: Vec<String> = interest_match
            .shared
            .iter()
            .map(|i| i.display_name().to_string())
            .collect();
        shared_interests.sort();

        let lifestyle_matches = lifestyle_matches(&me, &them);
        let lifestyle_score = score_lifestyle(&me, &them);

        let time_between_likes = self.time_between_likes(perspective_user_id, other_user_id);
        let response_score = score_response(time_between_likes);

        let pace_score = score_pace(me.pace.as_ref(), them.pace.as_ref());
        let pace_sync_level = pace_sync_level(pace_score).to_string();

        let weighted = distance_score * self.weights.distance
            + age_score * self.weights.age
            + interest_score * self.weights.interest
            + lifestyle_score * self.weights.lifestyle
            + pace_score * self.weights.pace
            + response_score * self.weights.response;
        let compatibility_score = (weighted * 100.0).round() as i64;

        let highlights = self.generate_highlights(
            &me,
            &them,
            distance_km,
            age_difference,
            &interest_match,
            &lifestyle_matches,
            pace_score,
            time_between_likes,
        );

        tracing::debug!(
            match_id = %matched.id,
            perspective = %perspective_user_id,
            compatibility_score,
            "match quality computed"
        );

        MatchQuality::new(
            matched.id,
            perspective_user_id,
            other_user_id,
            self.clock.now(),
            distance_score,
            age_score,
            interest_score,
            lifestyle_score,
            pace_score,
            response_score,
            distance_km,
            age_difference,
            shared_interests,
            lifestyle_matches,
            time_between_likes,
            pace_sync_level,
            compatibility_score,
            highlights,
        )
    }

    /// Gap between the two likes that formed the match; zero when either
    /// like is missing from storage.
    fn time_between_likes(&self, me: Uuid, them: Uuid) -> Duration {
        let my_like = self
            .swipes
            .likes_received(them)
            .into_iter()
            .find(|s| s.from == me);
        let their_like = self
            .swipes
            .likes_received(me)
            .into_iter()
            .find(|s| s.from == them);

        match (my_like, their_like) {
            (Some(a), Some(b)) => {
                let first = a.created_at.min(b.created_at);
                let second = a.created_at.max(b.created_at);
                second - first
            }
            _ => Duration::zero(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn generate_highlights(
        &self,
        me: &UserProfile,
        them: &UserProfile,
        distance_km: f64,
        age_difference: u8,
        interest_match: &interests::InterestMatch,
        lifestyle_matches: &[String],
        pace_score: f64,
        time_between_likes: Duration,
    ) -> Vec<String> {
        let mut highlights = Vec::new();

        // Distance
        if distance_km >= 0.0 {
            if distance_km < self.matching.nearby_distance_km {
                highlights.push(format!("Lives nearby ({distance_km:.1} km away)"));
            } else if distance_km < MID_DISTANCE_KM {
                highlights.push(format!("{distance_km:.0} km away"));
            }
        }

        // Shared relationship goal
        if let (Some(mine), Some(theirs)) = (me.looking_for, them.looking_for) {
            if mine == theirs {
                highlights.push(format!(
                    "Both looking for {}",
                    mine.display_name().to_lowercase()
                ));
            }
        }

        // Age
        if age_difference <= self.matching.similar_age_diff {
            highlights.push("Similar age".to_string());
        }

        // Interests
        match interest_match.shared_count {
            0 => {}
            1 => highlights.push(format!(
                "You both enjoy {}",
                interest_match.shared[0].display_name()
            )),
            n => highlights.push(format!(
                "You share {} interests: {}",
                n,
                interests::format_shared_interests(&interest_match.shared)
            )),
        }

        // Lifestyle (goal highlight may already be present)
        for item in lifestyle_matches {
            if !highlights.contains(item) {
                highlights.push(item.clone());
            }
        }

        // Pace
        if pace_score >= 0.95 {
            highlights.push("Total Pace Sync! ⚡".to_string());
        } else if pace_score >= 0.8 {
            highlights.push("Great communication sync".to_string());
        }

        // Response time
        if time_between_likes > Duration::zero() && time_between_likes < Duration::hours(24) {
            highlights.push("Quick mutual interest!".to_string());
        }

        highlights.truncate(MAX_HIGHLIGHTS);
        highlights
    }
}

/// Distance score plus the raw kilometers for display. Missing locations
/// score neutral and report the unknown sentinel.
fn score_distance(me: &UserProfile, them: &UserProfile) -> (f64, f64) {
    match distance::distance_between(me, them) {
        Some(km) => {
            let limit = f64::from(me.max_distance_km.min(them.max_distance_km));
            let score = if km <= 1.0 {
                1.0
            } else if limit <= 0.0 || km >= limit {
                0.0
            } else {
                1.0 - km / limit
            };
            (km, score.clamp(0.0, 1.0))
        }
        None => (DISTANCE_UNKNOWN, NEUTRAL_SCORE),
    }
}

fn age_difference(me: &UserProfile, them: &UserProfile, today: NaiveDate) -> u8 {
    me.age(today).abs_diff(them.age(today))
}

/// 1.0 within `similar_age_diff` years; beyond that, decays linearly against
/// the average of the two declared age ranges.
fn score_age(age_diff: u8, me: &UserProfile, them: &UserProfile, similar_age_diff: u8) -> f64 {
    if age_diff <= similar_age_diff {
        return 1.0;
    }

    let my_range = me.max_age.saturating_sub(me.min_age) as u32;
    let their_range = them.max_age.saturating_sub(them.min_age) as u32;
    let avg_range = (my_range + their_range) / 2;
    if avg_range == 0 {
        return 1.0;
    }

    (1.0 - f64::from(age_diff) / f64::from(avg_range)).max(0.0)
}

fn score_interests(
    interest_match: &interests::InterestMatch,
    me: &UserProfile,
    them: &UserProfile,
) -> f64 {
    if me.interests.is_empty() && them.interests.is_empty() {
        return NEUTRAL_SCORE;
    }
    if me.interests.is_empty() || them.interests.is_empty() {
        return MISSING_INTERESTS_PENALTY;
    }
    interest_match.overlap_ratio
}

/// Fraction of mutually-declared lifestyle fields that agree; neutral when
/// no field is declared on both sides.
pub(crate) fn score_lifestyle(me: &UserProfile, them: &UserProfile) -> f64 {
    let mut total = 0u32;
    let mut matches = 0u32;

    if let (Some(a), Some(b)) = (me.smoking, them.smoking) {
        total += 1;
        if a == b {
            matches += 1;
        }
    }
    if let (Some(a), Some(b)) = (me.drinking, them.drinking) {
        total += 1;
        if a == b {
            matches += 1;
        }
    }
    if let (Some(a), Some(b)) = (me.wants_kids, them.wants_kids) {
        total += 1;
        if kids_stances_compatible(a, b) {
            matches += 1;
        }
    }
    if let (Some(a), Some(b)) = (me.looking_for, them.looking_for) {
        total += 1;
        if a == b {
            matches += 1;
        }
    }

    if total == 0 {
        NEUTRAL_SCORE
    } else {
        f64::from(matches) / f64::from(total)
    }
}

/// `Open` is compatible with every stance; `Someday` and `HasKids` are
/// compatible with each other.
pub(crate) fn kids_stances_compatible(a: WantsKids, b: WantsKids) -> bool {
    if a == b || a == WantsKids::Open || b == WantsKids::Open {
        return true;
    }
    matches!(
        (a, b),
        (WantsKids::Someday, WantsKids::HasKids) | (WantsKids::HasKids, WantsKids::Someday)
    )
}

fn lifestyle_matches(me: &UserProfile, them: &UserProfile) -> Vec<String> {
    let mut matches = Vec::new();

    if let (Some(a), Some(b)) = (me.smoking, them.smoking) {
        if a == b {
            match a {
                crate::models::Smoking::Never => matches.push("Both non-smokers".to_string()),
                crate::models::Smoking::Sometimes => {
                    matches.push("Both occasional smokers".to_string())
                }
                crate::models::Smoking::Regularly => {}
            }
        }
    }
    if let (Some(a), Some(b)) = (me.drinking, them.drinking) {
        if a == b {
            match a {
                crate::models::Drinking::Never => matches.push("Neither drinks".to_string()),
                crate::models::Drinking::Socially => {
                    matches.push("Both social drinkers".to_string())
                }
                crate::models::Drinking::Regularly => {}
            }
        }
    }
    if let (Some(a), Some(b)) = (me.wants_kids, them.wants_kids) {
        if a == b {
            matches.push("Same stance on kids".to_string());
        } else if kids_stances_compatible(a, b) {
            matches.push("Compatible on kids".to_string());
        }
    }
    if let (Some(a), Some(b)) = (me.looking_for, them.looking_for) {
        if a == b {
            matches.push(format!(
                "Both looking for {}",
                a.display_name().to_lowercase()
            ));
        }
    }

    matches
}

/// Each of the four pace dimensions contributes up to 25 points: 25 for an
/// exact match, 15 for adjacent choices, 5 otherwise, and a flat 20 when
/// either side picked a wildcard value. Neutral 0.5 when either side has no
/// pace preferences.
fn score_pace(a: Option<&PacePreferences>, b: Option<&PacePreferences>) -> f64 {
    let (a, b) = match (a, b) {
        (Some(a), Some(b)) => (a, b),
        _ => return NEUTRAL_SCORE,
    };

    let mut score = 0u32;
    score += dimension_score(
        a.messaging_frequency as u32,
        b.messaging_frequency as u32,
        false,
    );
    score += dimension_score(
        a.time_to_first_date as u32,
        b.time_to_first_date as u32,
        false,
    );

    let comm_wildcard = a.communication_style == CommunicationStyle::MixOfEverything
        || b.communication_style == CommunicationStyle::MixOfEverything;
    score += dimension_score(
        a.communication_style as u32,
        b.communication_style as u32,
        comm_wildcard,
    );

    let depth_wildcard = a.depth_preference == DepthPreference::DependsOnVibe
        || b.depth_preference == DepthPreference::DependsOnVibe;
    score += dimension_score(
        a.depth_preference as u32,
        b.depth_preference as u32,
        depth_wildcard,
    );

    f64::from(score) / 100.0
}

fn dimension_score(a: u32, b: u32, has_wildcard: bool) -> u32 {
    if has_wildcard {
        return WILDCARD_SCORE;
    }
    match a.abs_diff(b) {
        0 => 25,
        1 => 15,
        _ => 5,
    }
}

fn pace_sync_level(score: f64) -> &'static str {
    if score >= 0.95 {
        "Perfect Sync"
    } else if score >= 0.8 {
        "Good Sync"
    } else if score >= 0.6 {
        "Fair Sync"
    } else if score >= 0.4 {
        "Pace Lag"
    } else {
        "Mismatched Pace"
    }
}

/// Hour-bucketed score for how quickly the mutual like formed. Zero gap
/// means the timing is unknown, not instantaneous.
fn score_response(time_between: Duration) -> f64 {
    if time_between <= Duration::zero() {
        return NEUTRAL_SCORE;
    }
    match time_between.num_hours() {
        0 => 1.0,
        1..=23 => 0.9,
        24..=71 => 0.7,
        72..=167 => 0.5,
        168..=719 => 0.3,
        _ => 0.1,
    }
}
