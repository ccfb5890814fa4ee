//! Pair-keyed mutual exclusion for relationship mutations.
//!
//! # Invariants
//! - Friendship keys are unordered: `(a, b)` and `(b, a)` share one lock.
//! - Attendance keys are `(user, event)` and never collide with friendship.
//! - Idle entries are dropped once no caller holds them.

use crate::model::event::EventId;
use crate::model::user::UserId;
use dashmap::DashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Identifies the relationship a mutation touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairKey {
    Friendship(UserId, UserId),
    Attendance(UserId, EventId),
}

impl PairKey {
    /// Unordered friendship key.
    pub fn friendship(a: UserId, b: UserId) -> Self {
        Self::Friendship(a.min(b), a.max(b))
    }

    pub fn attendance(user: UserId, event: EventId) -> Self {
        Self::Attendance(user, event)
    }
}

/// Registry of per-pair locks, shared across threads via `Arc`.
#[derive(Debug, Default)]
pub struct PairLocks {
    locks: DashMap<PairKey, Arc<Mutex<()>>>,
}

impl PairLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` while holding the lock for `key`.
    ///
    /// A poisoned lock is recovered: the guarded value is `()`, so a panic in
    /// another holder leaves nothing to repair here.
    pub fn with_lock<T, F>(&self, key: PairKey, f: F) -> T
    where
        F: FnOnce() -> T,
    {
        let lock = Arc::clone(self.locks.entry(key).or_default().value());
        let result = {
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
            f()
        };
        drop(lock);
        self.locks
            .remove_if(&key, |_, lock| Arc::strong_count(lock) == 1);
        result
    }

    #[cfg(test)]
    fn tracked_pairs(&self) -> usize {
        self.locks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{PairKey, PairLocks};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn friendship_key_is_unordered() {
        assert_eq!(PairKey::friendship(3, 7), PairKey::friendship(7, 3));
        assert_ne!(PairKey::friendship(3, 7), PairKey::attendance(3, 7));
    }

    #[test]
    fn entries_are_released_after_use() {
        let locks = PairLocks::new();
        let value = locks.with_lock(PairKey::friendship(1, 2), || 42);
        assert_eq!(value, 42);
        assert_eq!(locks.tracked_pairs(), 0);
    }

    #[test]
    fn same_pair_is_serialized_across_threads() {
        let locks = Arc::new(PairLocks::new());
        let inside = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let locks = Arc::clone(&locks);
                let inside = Arc::clone(&inside);
                let max_seen = Arc::clone(&max_seen);
                thread::spawn(move || {
                    let (a, b) = if i % 2 == 0 { (1, 2) } else { (2, 1) };
                    locks.with_lock(PairKey::friendship(a, b), || {
                        let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                        max_seen.fetch_max(now, Ordering::SeqCst);
                        thread::yield_now();
                        inside.fetch_sub(1, Ordering::SeqCst);
                    });
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("worker thread should not panic");
        }
        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }
}
