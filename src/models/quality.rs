use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Raised when a `MatchQuality` value would violate its invariants.
/// These are programming errors in the scorer, not business conditions.
#[derive(Debug, Error)]
pub enum QualityError {
    #[error("{name} must be 0.0-1.0, got: {value}")]
    ScoreOutOfRange { name: &'static str, value: f64 },

    #[error("compatibility must be 0-100, got: {0}")]
    CompatibilityOutOfRange(i64),

    #[error("distance_km must be -1 (unknown) or non-negative, got: {0}")]
    BadDistance(f64),

    #[error("reason cannot be blank")]
    BlankReason,

    #[error("user not found: {0}")]
    UserNotFound(Uuid),

    #[error("user {0} is not part of match {1}")]
    NotInMatch(Uuid, Uuid),
}

/// Immutable compatibility breakdown for a confirmed match, computed from
/// one user's perspective (highlight wording is directional; scores are not).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchQuality {
    pub match_id: Uuid,
    pub perspective_user_id: Uuid,
    pub other_user_id: Uuid,
    pub computed_at: DateTime<Utc>,

    // Individual scores, each 0.0-1.0
    pub distance_score: f64,
    pub age_score: f64,
    pub interest_score: f64,
    pub lifestyle_score: f64,
    pub pace_score: f64,
    pub response_score: f64,

    // Raw data
    /// Kilometers between the pair, or -1.0 when either location is unknown.
    pub distance_km: f64,
    pub age_difference: u8,
    pub shared_interests: Vec<String>,
    pub lifestyle_matches: Vec<String>,
    /// Gap between the two likes that formed the match; zero when unknown.
    #[serde(with = "duration_seconds")]
    pub time_between_likes: Duration,

    // Aggregates
    pub pace_sync_level: String,
    /// Overall weighted compatibility, 0-100.
    pub compatibility_score: u8,
    pub highlights: Vec<String>,
}

/// Serialize `chrono::Duration` as whole seconds.
mod duration_seconds {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.num_seconds())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = i64::deserialize(deserializer)?;
        Ok(Duration::seconds(secs))
    }
}

impl MatchQuality {
    /// Validates all invariants before construction: per-dimension scores in
    /// [0, 1], compatibility in [0, 100], distance -1 or non-negative.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        match_id: Uuid,
        perspective_user_id: Uuid,
        other_user_id: Uuid,
        computed_at: DateTime<Utc>,
        distance_score: f64,
        age_score: f64,
        interest_score: f64,
        lifestyle_score: f64,
        pace_score: f64,
        response_score: f64,
        distance_km: f64,
        age_difference: u8,
        shared_interests: Vec<String>,
        lifestyle_matches: Vec<String>,
        time_between_likes: Duration,
        pace_sync_level: String,
        compatibility_score: i64,
        highlights: Vec<String>,
    ) -> Result<Self, QualityError> {
        validate_score(distance_score, "distance_score")?;
        validate_score(age_score, "age_score")?;
        validate_score(interest_score, "interest_score")?;
        validate_score(lifestyle_score, "lifestyle_score")?;
        validate_score(pace_score, "pace_score")?;
        validate_score(response_score, "response_score")?;

        if !(0..=100).contains(&compatibility_score) {
            return Err(QualityError::CompatibilityOutOfRange(compatibility_score));
        }
        if distance_km < 0.0 && distance_km != DISTANCE_UNKNOWN {
            return Err(QualityError::BadDistance(distance_km));
        }

        Ok(Self {
            match_id,
            perspective_user_id,
            other_user_id,
            computed_at,
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
            compatibility_score: compatibility_score as u8,
            highlights,
        })
    }

    /// Star rating, 1-5, from the fixed compatibility breakpoints.
    pub fn star_rating(&self) -> u8 {
        match self.compatibility_score {
            90..=100 => 5,
            75..=89 => 4,
            60..=74 => 3,
            40..=59 => 2,
            _ => 1,
        }
    }

    pub fn compatibility_label(&self) -> &'static str {
        match self.compatibility_score {
            90..=100 => "Excellent Match",
            75..=89 => "Great Match",
            60..=74 => "Good Match",
            40..=59 => "Fair Match",
            _ => "Low Compatibility",
        }
    }

    /// First highlight truncated for list views, or the label when there are
    /// no highlights.
    pub fn short_summary(&self) -> String {
        match self.highlights.first() {
            Some(first) if first.chars().count() > 40 => {
                let head: String = first.chars().take(37).collect();
                format!("{head}...")
            }
            Some(first) => first.clone(),
            None => self.compatibility_label().to_string(),
        }
    }
}

/// Sentinel for "distance unknown" (a location was missing).
pub const DISTANCE_UNKNOWN: f64 = -1.0;

fn validate_score(score: f64, name: &'static str) -> Result<(), QualityError> {
    if !(0.0..=1.0).contains(&score) {
        return Err(QualityError::ScoreOutOfRange { name, value: score });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quality(compatibility: i64) -> MatchQuality {
        MatchQuality::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            Utc::now(),
            0.8,
            0.9,
            0.5,
            0.5,
            0.5,
            0.5,
            3.2,
            1,
            vec![],
            vec![],
            Duration::zero(),
            "Good Sync".to_string(),
            compatibility,
            vec![],
        )
        .unwrap()
    }

    #[test]
    fn test_star_breakpoints() {
        assert_eq!(quality(95).star_rating(), 5);
        assert_eq!(quality(90).star_rating(), 5);
        assert_eq!(quality(75).star_rating(), 4);
        assert_eq!(quality(60).star_rating(), 3);
        assert_eq!(quality(40).star_rating(), 2);
        assert_eq!(quality(39).star_rating(), 1);
    }

    #[test]
    fn test_compatibility_labels() {
        assert_eq!(quality(92).compatibility_label(), "Excellent Match");
        assert_eq!(quality(80).compatibility_label(), "Great Match");
        assert_eq!(quality(65).compatibility_label(), "Good Match");
        assert_eq!(quality(45).compatibility_label(), "Fair Match");
        assert_eq!(quality(10).compatibility_label(), "Low Compatibility");
    }

    #[test]
    fn test_score_out_of_range_rejected() {
        let result = MatchQuality::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            Utc::now(),
            1.5, // invalid
            0.5,
            0.5,
            0.5,
            0.5,
            0.5,
            0.0,
            0,
            vec![],
            vec![],
            Duration::zero(),
            "Fair Sync".to_string(),
            50,
            vec![],
        );
        assert!(matches!(
            result,
            Err(QualityError::ScoreOutOfRange { name: "distance_score", .. })
        ));
    }

    #[test]
    fn test_unknown_distance_sentinel_accepted() {
        let result = MatchQuality::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            Utc::now(),
            0.5,
            0.5,
            0.5,
            0.5,
            0.5,
            0.5,
            DISTANCE_UNKNOWN,
            0,
            vec![],
            vec![],
            Duration::zero(),
            "Fair Sync".to_string(),
            50,
            vec![],
        );
        assert!(result.is_ok());
    }

    #[test]
    fn test_short_summary_truncates() {
        let mut q = quality(70);
        q.highlights = vec!["a".repeat(50)];
        let summary = q.short_summary();
        assert_eq!(summary.chars().count(), 40);
        assert!(summary.ends_with("..."));

        q.highlights.clear();
        assert_eq!(q.short_summary(), "Good Match");
    }
}
