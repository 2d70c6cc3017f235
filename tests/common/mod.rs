#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use ember_match::clock::FixedClock;
use ember_match::config::{MatchingSettings, QualityWeights, StandoutWeights};
use ember_match::core::{CandidateFinder, CompatibilityScorer, Recommender};
use ember_match::models::{Gender, Interest, Location, UserProfile, UserState};
use ember_match::services::{
    InMemoryBlockStorage, InMemoryDailyPickStorage, InMemoryStandoutStorage, InMemorySwipeStorage,
    InMemoryUserDirectory,
};

pub const TODAY: (i32, u32, u32) = (2024, 6, 15);

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(TODAY.0, TODAY.1, TODAY.2, 12, 0, 0)
        .unwrap()
}

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(TODAY.0, TODAY.1, TODAY.2).unwrap()
}

pub fn profile(name: &str, gender: Gender, interested_in: &[Gender]) -> UserProfile {
    UserProfile {
        id: Uuid::new_v4(),
        name: name.to_string(),
        birth_date: NaiveDate::from_ymd_opt(1995, 3, 1).unwrap(),
        gender: Some(gender),
        interested_in: interested_in.to_vec(),
        location: None,
        max_distance_km: 100,
        min_age: 18,
        max_age: 99,
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

pub fn with_interests(mut user: UserProfile, interests: &[Interest]) -> UserProfile {
    user.interests = interests.iter().copied().collect();
    user
}

pub fn at(mut user: UserProfile, latitude: f64, longitude: f64) -> UserProfile {
    user.location = Some(Location {
        latitude,
        longitude,
    });
    user
}

pub struct World {
    pub users: Arc<InMemoryUserDirectory>,
    pub swipes: Arc<InMemorySwipeStorage>,
    pub blocks: Arc<InMemoryBlockStorage>,
    pub picks: Arc<InMemoryDailyPickStorage>,
    pub standouts: Arc<InMemoryStandoutStorage>,
}

impl World {
    pub fn new() -> Self {
        Self {
            users: Arc::new(InMemoryUserDirectory::new()),
            swipes: Arc::new(InMemorySwipeStorage::new()),
            blocks: Arc::new(InMemoryBlockStorage::new()),
            picks: Arc::new(InMemoryDailyPickStorage::new()),
            standouts: Arc::new(InMemoryStandoutStorage::new()),
        }
    }

    pub fn finder_at(&self, instant: DateTime<Utc>) -> CandidateFinder {
        CandidateFinder::new(
            self.users.clone(),
            self.swipes.clone(),
            self.blocks.clone(),
            Arc::new(FixedClock(instant)),
            FixedOffset::east_opt(0).unwrap(),
        )
    }

    pub fn finder(&self) -> CandidateFinder {
        self.finder_at(now())
    }

    pub fn scorer(&self) -> CompatibilityScorer {
        CompatibilityScorer::new(
            self.users.clone(),
            self.swipes.clone(),
            Arc::new(FixedClock(now())),
            QualityWeights::default(),
            MatchingSettings::default(),
        )
        .unwrap()
    }

    pub fn recommender_at(&self, instant: DateTime<Utc>) -> Recommender {
        Recommender::new(
            self.finder_at(instant),
            self.users.clone(),
            self.swipes.clone(),
            self.blocks.clone(),
            self.picks.clone(),
            self.standouts.clone(),
            Arc::new(FixedClock(instant)),
            MatchingSettings::default(),
            StandoutWeights::default(),
        )
        .unwrap()
    }

    pub fn recommender(&self) -> Recommender {
        self.recommender_at(now())
    }
}
