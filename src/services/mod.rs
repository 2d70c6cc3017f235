pub mod cache;
pub mod memory;
pub mod storage;

pub use cache::{CacheKey, MemoCache};
pub use memory::{
    InMemoryBlockStorage, InMemoryDailyPickStorage, InMemoryStandoutStorage, InMemorySwipeStorage,
    InMemoryUserDirectory,
};
pub use storage::{
    BlockStorage, DailyPickStorage, StandoutStorage, StoredPick, SwipeStorage, UserDirectory,
};
