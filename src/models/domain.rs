use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Declared gender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Woman,
    Man,
    NonBinary,
}

/// Profile activation state. Only `Active` profiles surface as candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserState {
    Incomplete,
    Active,
    Paused,
    Banned,
}

/// Predefined interest tags, organized by category.
///
/// Declaration order is canonical: `BTreeSet<Interest>` iterates in this
/// order, and shared-interest prose formatting shows the first three tags in
/// this order, so reordering variants changes user-visible output.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Interest {
    // Outdoors
    Hiking,
    Camping,
    Fishing,
    Cycling,
    Running,
    Climbing,
    // Arts & culture
    Movies,
    Music,
    Concerts,
    ArtGalleries,
    Theater,
    Photography,
    Reading,
    Writing,
    // Food & drink
    Cooking,
    Baking,
    Wine,
    CraftBeer,
    Coffee,
    Foodie,
    // Sports & fitness
    Gym,
    Yoga,
    Basketball,
    Soccer,
    Tennis,
    Swimming,
    Golf,
    // Games & tech
    VideoGames,
    BoardGames,
    Coding,
    Tech,
    Podcasts,
    // Social
    Travel,
    Dancing,
    Volunteering,
    Pets,
    Dogs,
    Cats,
    Nightlife,
}

impl Interest {
    /// Maximum number of interests a profile may declare. Enforced when a
    /// profile is deserialized.
    pub const MAX_PER_USER: usize = 10;

    pub fn display_name(&self) -> &'static str {
        match self {
            Interest::Hiking => "Hiking",
            Interest::Camping => "Camping",
            Interest::Fishing => "Fishing",
            Interest::Cycling => "Cycling",
            Interest::Running => "Running",
            Interest::Climbing => "Climbing",
            Interest::Movies => "Movies",
            Interest::Music => "Music",
            Interest::Concerts => "Concerts",
            Interest::ArtGalleries => "Art Galleries",
            Interest::Theater => "Theater",
            Interest::Photography => "Photography",
            Interest::Reading => "Reading",
            Interest::Writing => "Writing",
            Interest::Cooking => "Cooking",
            Interest::Baking => "Baking",
            Interest::Wine => "Wine",
            Interest::CraftBeer => "Craft Beer",
            Interest::Coffee => "Coffee",
            Interest::Foodie => "Foodie",
            Interest::Gym => "Gym",
            Interest::Yoga => "Yoga",
            Interest::Basketball => "Basketball",
            Interest::Soccer => "Soccer",
            Interest::Tennis => "Tennis",
            Interest::Swimming => "Swimming",
            Interest::Golf => "Golf",
            Interest::VideoGames => "Video Games",
            Interest::BoardGames => "Board Games",
            Interest::Coding => "Coding",
            Interest::Tech => "Tech",
            Interest::Podcasts => "Podcasts",
            Interest::Travel => "Travel",
            Interest::Dancing => "Dancing",
            Interest::Volunteering => "Volunteering",
            Interest::Pets => "Pets",
            Interest::Dogs => "Dogs",
            Interest::Cats => "Cats",
            Interest::Nightlife => "Nightlife",
        }
    }
}

/// Smoking habits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Smoking {
    Never,
    Sometimes,
    Regularly,
}

impl Smoking {
    pub fn display_name(&self) -> &'static str {
        match self {
            Smoking::Never => "Never",
            Smoking::Sometimes => "Sometimes",
            Smoking::Regularly => "Regularly",
        }
    }
}

/// Drinking habits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Drinking {
    Never,
    Socially,
    Regularly,
}

impl Drinking {
    pub fn display_name(&self) -> &'static str {
        match self {
            Drinking::Never => "Never",
            Drinking::Socially => "Socially",
            Drinking::Regularly => "Regularly",
        }
    }
}

/// Stance on having children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WantsKids {
    No,
    Open,
    Someday,
    HasKids,
}

impl WantsKids {
    pub fn display_name(&self) -> &'static str {
        match self {
            WantsKids::No => "Don't want",
            WantsKids::Open => "Open to it",
            WantsKids::Someday => "Want someday",
            WantsKids::HasKids => "Have kids",
        }
    }
}

/// Relationship goals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookingFor {
    Casual,
    ShortTerm,
    LongTerm,
    Marriage,
    Unsure,
}

impl LookingFor {
    pub fn display_name(&self) -> &'static str {
        match self {
            LookingFor::Casual => "Something casual",
            LookingFor::ShortTerm => "Short-term dating",
            LookingFor::LongTerm => "Long-term relationship",
            LookingFor::Marriage => "Marriage",
            LookingFor::Unsure => "Not sure yet",
        }
    }
}

/// How often a user wants to message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessagingFrequency {
    Rarely,
    Often,
    Constantly,
    NoPreference,
}

/// How soon a user wants a first date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeToFirstDate {
    Quickly,
    FewDays,
    Weeks,
    Months,
    NoPreference,
}

/// Preferred channel mix for early conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommunicationStyle {
    TextOnly,
    VoiceNotes,
    VideoCalls,
    InPersonOnly,
    MixOfEverything,
}

/// Preferred conversation depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthPreference {
    SmallTalk,
    DeepChat,
    Existential,
    DependsOnVibe,
}

/// Communication and dating pace preferences. A profile either has the full
/// set or none (`Option<PacePreferences>` on the profile).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacePreferences {
    pub messaging_frequency: MessagingFrequency,
    pub time_to_first_date: TimeToFirstDate,
    pub communication_style: CommunicationStyle,
    pub depth_preference: DepthPreference,
}

/// Geographic coordinates in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// User profile as the matching core reads it. Owned by the profile service;
/// read-only here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub birth_date: NaiveDate,
    pub gender: Option<Gender>,
    /// Genders this user wants to see. Empty means interested in no one,
    /// not everyone.
    #[serde(default)]
    pub interested_in: Vec<Gender>,
    #[serde(default)]
    pub location: Option<Location>,
    pub max_distance_km: u16,
    pub min_age: u8,
    pub max_age: u8,
    #[serde(default)]
    pub smoking: Option<Smoking>,
    #[serde(default)]
    pub drinking: Option<Drinking>,
    #[serde(default)]
    pub wants_kids: Option<WantsKids>,
    #[serde(default)]
    pub looking_for: Option<LookingFor>,
    #[serde(default, deserialize_with = "bounded_interests")]
    pub interests: BTreeSet<Interest>,
    #[serde(default)]
    pub pace: Option<PacePreferences>,
    pub state: UserState,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn bounded_interests<'de, D>(deserializer: D) -> Result<BTreeSet<Interest>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let interests = BTreeSet::<Interest>::deserialize(deserializer)?;
    if interests.len() > Interest::MAX_PER_USER {
        return Err(serde::de::Error::custom(format!(
            "a profile may declare at most {} interests, got {}",
            Interest::MAX_PER_USER,
            interests.len()
        )));
    }
    Ok(interests)
}

impl UserProfile {
    /// Age in whole years on the given date. Returns 0 when the birth date
    /// is in the future (treated as unknown by the filters).
    pub fn age(&self, today: NaiveDate) -> u8 {
        today
            .years_since(self.birth_date)
            .map(|years| years.min(u8::MAX as u32) as u8)
            .unwrap_or(0)
    }

    pub fn has_location(&self) -> bool {
        self.location
            .map(|loc| loc.latitude.is_finite() && loc.longitude.is_finite())
            .unwrap_or(false)
    }

    pub fn is_active(&self) -> bool {
        self.state == UserState::Active
    }
}

/// A swipe verdict on another user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Like,
    Pass,
}

/// A directed like/pass edge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwipeDecision {
    pub from: Uuid,
    pub to: Uuid,
    pub decision: Decision,
    pub created_at: DateTime<Utc>,
}

/// An exclusion edge between two users. Visibility is blocked in both
/// directions regardless of who created it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub user_a: Uuid,
    pub user_b: Uuid,
    pub created_at: DateTime<Utc>,
}

/// A confirmed mutual match between two users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub id: Uuid,
    pub user_a: Uuid,
    pub user_b: Uuid,
    pub matched_at: DateTime<Utc>,
}

impl Match {
    /// The counterpart of `user_id` in this match, or `None` if the id is
    /// not part of the match.
    pub fn other_user(&self, user_id: Uuid) -> Option<Uuid> {
        if user_id == self.user_a {
            Some(self.user_b)
        } else if user_id == self.user_b {
            Some(self.user_a)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interest_declaration_order() {
        // BTreeSet iteration must follow declaration order
        let set: BTreeSet<Interest> = [
            Interest::Travel,
            Interest::Hiking,
            Interest::Coffee,
            Interest::Movies,
        ]
        .into_iter()
        .collect();

        let ordered: Vec<Interest> = set.into_iter().collect();
        assert_eq!(
            ordered,
            vec![
                Interest::Hiking,
                Interest::Movies,
                Interest::Coffee,
                Interest::Travel
            ]
        );
    }

    #[test]
    fn test_age_from_birth_date() {
        let profile = sample_profile();
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(profile.age(today), 29);

        // Day before the birthday
        let before = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        assert_eq!(profile.age(before), 28);
    }

    #[test]
    fn test_future_birth_date_is_unknown_age() {
        let mut profile = sample_profile();
        profile.birth_date = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(profile.age(today), 0);
    }

    #[test]
    fn test_interest_cap_enforced_on_deserialize() {
        let mut profile = serde_json::json!({
            "id": Uuid::new_v4(),
            "name": "Test",
            "birth_date": "1995-03-01",
            "max_distance_km": 50,
            "min_age": 18,
            "max_age": 99,
            "state": "active",
            "interests": [
                "hiking", "camping", "fishing", "cycling", "running",
                "climbing", "movies", "music", "concerts", "art_galleries"
            ]
        });

        // Exactly at the cap is fine
        let ok: UserProfile = serde_json::from_value(profile.clone()).unwrap();
        assert_eq!(ok.interests.len(), Interest::MAX_PER_USER);

        profile["interests"]
            .as_array_mut()
            .unwrap()
            .push("theater".into());
        assert!(serde_json::from_value::<UserProfile>(profile).is_err());
    }

    #[test]
    fn test_match_other_user() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let m = Match {
            id: Uuid::new_v4(),
            user_a: a,
            user_b: b,
            matched_at: Utc::now(),
        };
        assert_eq!(m.other_user(a), Some(b));
        assert_eq!(m.other_user(b), Some(a));
        assert_eq!(m.other_user(Uuid::new_v4()), None);
    }

    fn sample_profile() -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            name: "Test".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1995, 3, 1).unwrap(),
            gender: Some(Gender::Woman),
            interested_in: vec![Gender::Man],
            location: None,
            max_distance_km: 50,
            min_age: 21,
            max_age: 35,
            smoking: None,
            drinking: None,
            wants_kids: None,
            looking_for: None,
            interests: BTreeSet::new(),
            pace: None,
            state: UserState::Active,
            updated_at: None,
        }
    }
}
