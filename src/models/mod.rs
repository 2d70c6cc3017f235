pub mod domain;
pub mod quality;
pub mod recommendation;

pub use domain::{
    Block, CommunicationStyle, Decision, DepthPreference, Drinking, Gender, Interest, Location,
    LookingFor, Match, MessagingFrequency, PacePreferences, Smoking, SwipeDecision,
    TimeToFirstDate, UserProfile, UserState, WantsKids,
};
pub use quality::{MatchQuality, QualityError, DISTANCE_UNKNOWN};
pub use recommendation::{DailyPick, RecommendationError, Standout, StandoutsResult};
