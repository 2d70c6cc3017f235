pub mod distance;
pub mod finder;
pub mod interests;
pub mod quality;
pub mod selector;

pub use finder::CandidateFinder;
pub use quality::CompatibilityScorer;
pub use selector::Recommender;
