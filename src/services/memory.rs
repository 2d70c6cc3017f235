//! In-memory storage backends.
//!
//! Reference implementations of the storage contracts, suitable for tests
//! and single-process deployments. All state lives behind `RwLock`ed maps;
//! a poisoned lock is recovered by taking the inner value, since every
//! write here is a plain map mutation that cannot leave partial state.

use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::models::{Block, Decision, Standout, SwipeDecision, UserProfile};
use crate::services::storage::{
    BlockStorage, DailyPickStorage, StandoutStorage, StoredPick, SwipeStorage, UserDirectory,
};

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

/// Profile directory backed by a map.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<Uuid, UserProfile>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: UserProfile) {
        write(&self.users).insert(user.id, user);
    }

    pub fn remove(&self, id: Uuid) -> Option<UserProfile> {
        write(&self.users).remove(&id)
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn find_by_id(&self, id: Uuid) -> Option<UserProfile> {
        read(&self.users).get(&id).cloned()
    }

    fn all(&self) -> Vec<UserProfile> {
        let mut users: Vec<UserProfile> = read(&self.users).values().cloned().collect();
        // Deterministic enumeration order for stable downstream selection
        users.sort_by_key(|u| u.id);
        users
    }

    fn all_active(&self) -> Vec<UserProfile> {
        let mut users: Vec<UserProfile> = read(&self.users)
            .values()
            .filter(|u| u.is_active())
            .cloned()
            .collect();
        users.sort_by_key(|u| u.id);
        users
    }
}

/// Swipe edges keyed by (from, to).
#[derive(Debug, Default)]
pub struct InMemorySwipeStorage {
    swipes: RwLock<HashMap<(Uuid, Uuid), SwipeDecision>>,
}

impl InMemorySwipeStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SwipeStorage for InMemorySwipeStorage {
    fn record(&self, decision: SwipeDecision) {
        write(&self.swipes).insert((decision.from, decision.to), decision);
    }

    fn exists(&self, from: Uuid, to: Uuid) -> bool {
        read(&self.swipes).contains_key(&(from, to))
    }

    fn decided_user_ids(&self, user: Uuid) -> HashSet<Uuid> {
        read(&self.swipes)
            .keys()
            .filter(|(from, _)| *from == user)
            .map(|(_, to)| *to)
            .collect()
    }

    fn likes_received(&self, user: Uuid) -> Vec<SwipeDecision> {
        read(&self.swipes)
            .values()
            .filter(|s| s.to == user && s.decision == Decision::Like)
            .cloned()
            .collect()
    }
}

/// Undirected block edges, stored with the pair normalized.
#[derive(Debug, Default)]
pub struct InMemoryBlockStorage {
    blocks: RwLock<HashMap<(Uuid, Uuid), Block>>,
}

impl InMemoryBlockStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(a: Uuid, b: Uuid) -> (Uuid, Uuid) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }
}

impl BlockStorage for InMemoryBlockStorage {
    fn record(&self, block: Block) {
        write(&self.blocks).insert(Self::key(block.user_a, block.user_b), block);
    }

    fn is_blocked(&self, a: Uuid, b: Uuid) -> bool {
        read(&self.blocks).contains_key(&Self::key(a, b))
    }

    fn blocked_partners(&self, user: Uuid) -> HashSet<Uuid> {
        read(&self.blocks)
            .keys()
            .filter_map(|(a, b)| {
                if *a == user {
                    Some(*b)
                } else if *b == user {
                    Some(*a)
                } else {
                    None
                }
            })
            .collect()
    }
}

/// Daily-pick cache plus viewed markers.
#[derive(Debug, Default)]
pub struct InMemoryDailyPickStorage {
    picks: RwLock<HashMap<(Uuid, NaiveDate), StoredPick>>,
    viewed: RwLock<HashSet<(Uuid, NaiveDate)>>,
}

impl InMemoryDailyPickStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DailyPickStorage for InMemoryDailyPickStorage {
    fn get_pick(&self, seeker: Uuid, date: NaiveDate) -> Option<StoredPick> {
        read(&self.picks).get(&(seeker, date)).cloned()
    }

    fn save_pick(&self, pick: StoredPick) {
        write(&self.picks).insert((pick.seeker_id, pick.date), pick);
    }

    fn mark_viewed(&self, seeker: Uuid, date: NaiveDate) {
        write(&self.viewed).insert((seeker, date));
    }

    fn has_viewed(&self, seeker: Uuid, date: NaiveDate) -> bool {
        read(&self.viewed).contains(&(seeker, date))
    }

    fn delete_viewed_before(&self, cutoff: NaiveDate) -> usize {
        let mut viewed = write(&self.viewed);
        let before = viewed.len();
        viewed.retain(|(_, date)| *date >= cutoff);
        before - viewed.len()
    }
}

/// Standout batches plus interaction markers.
#[derive(Debug, Default)]
pub struct InMemoryStandoutStorage {
    batches: RwLock<HashMap<(Uuid, NaiveDate), Vec<Standout>>>,
}

impl InMemoryStandoutStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StandoutStorage for InMemoryStandoutStorage {
    fn get_standouts(&self, seeker: Uuid, date: NaiveDate) -> Option<Vec<Standout>> {
        read(&self.batches).get(&(seeker, date)).cloned()
    }

    fn save_standouts(&self, seeker: Uuid, date: NaiveDate, standouts: Vec<Standout>) {
        write(&self.batches).insert((seeker, date), standouts);
    }

    fn mark_interacted(
        &self,
        seeker: Uuid,
        standout_user: Uuid,
        date: NaiveDate,
        at: DateTime<Utc>,
    ) {
        let mut batches = write(&self.batches);
        if let Some(batch) = batches.get_mut(&(seeker, date)) {
            for standout in batch.iter_mut() {
                if standout.standout_user_id == standout_user && standout.interacted_at.is_none() {
                    standout.interacted_at = Some(at);
                }
            }
        }
    }

    fn delete_before(&self, cutoff: NaiveDate) -> usize {
        let mut batches = write(&self.batches);
        let before = batches.len();
        batches.retain(|(_, date), _| *date >= cutoff);
        before - batches.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn test_block_is_direction_insensitive() {
        let storage = InMemoryBlockStorage::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        storage.record(Block {
            user_a: a,
            user_b: b,
            created_at: Utc::now(),
        });

        assert!(storage.is_blocked(a, b));
        assert!(storage.is_blocked(b, a));
        assert!(storage.blocked_partners(a).contains(&b));
        assert!(storage.blocked_partners(b).contains(&a));
    }

    #[test]
    fn test_decided_ids_cover_likes_and_passes() {
        let storage = InMemorySwipeStorage::new();
        let me = Uuid::new_v4();
        let liked = Uuid::new_v4();
        let passed = Uuid::new_v4();

        storage.record(SwipeDecision {
            from: me,
            to: liked,
            decision: Decision::Like,
            created_at: Utc::now(),
        });
        storage.record(SwipeDecision {
            from: me,
            to: passed,
            decision: Decision::Pass,
            created_at: Utc::now(),
        });

        let decided = storage.decided_user_ids(me);
        assert!(decided.contains(&liked));
        assert!(decided.contains(&passed));
        assert_eq!(decided.len(), 2);
    }

    #[test]
    fn test_viewed_cleanup_counts() {
        let storage = InMemoryDailyPickStorage::new();
        let seeker = Uuid::new_v4();
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let yesterday = today.pred_opt().unwrap();

        storage.mark_viewed(seeker, yesterday);
        storage.mark_viewed(seeker, today);

        assert_eq!(storage.delete_viewed_before(today), 1);
        assert!(storage.has_viewed(seeker, today));
        assert!(!storage.has_viewed(seeker, yesterday));
    }

    #[test]
    fn test_mark_interacted_sets_timestamp() {
        let storage = InMemoryStandoutStorage::new();
        let seeker = Uuid::new_v4();
        let target = Uuid::new_v4();
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

        let standout = Standout::create(
            seeker,
            target,
            date,
            1,
            80,
            "Top match for you".to_string(),
            Utc::now(),
        )
        .unwrap();
        storage.save_standouts(seeker, date, vec![standout]);

        let stamp = Utc.with_ymd_and_hms(2024, 6, 15, 18, 30, 0).unwrap();
        storage.mark_interacted(seeker, target, date, stamp);
        let batch = storage.get_standouts(seeker, date).unwrap();
        assert_eq!(batch[0].interacted_at, Some(stamp));
    }

    #[test]
    fn test_standout_cleanup_counts() {
        let storage = InMemoryStandoutStorage::new();
        let seeker = Uuid::new_v4();
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let yesterday = today.pred_opt().unwrap();

        for date in [yesterday, today] {
            let standout = Standout::create(
                seeker,
                Uuid::new_v4(),
                date,
                1,
                70,
                "Top match for you".to_string(),
                Utc::now(),
            )
            .unwrap();
            storage.save_standouts(seeker, date, vec![standout]);
        }

        assert_eq!(storage.delete_before(today), 1);
        assert!(storage.get_standouts(seeker, today).is_some());
        assert!(storage.get_standouts(seeker, yesterday).is_none());
    }
}
