use std::sync::Arc;
use std::time::Duration;

use futures::lock::{Mutex, OwnedMutexGuard};
use moka::future::Cache;

/// Serializes validate-then-persist per user within this process.
///
/// The cache has no size bound: evicting an entry while a request holds it
/// would hand the next caller a fresh mutex. Entries go after `idle` without
/// an acquisition, so a request must not hold a lock longer than that.
#[derive(Clone)]
pub struct UserLocks {
    locks: Cache<u64, Arc<Mutex<()>>>,
}

impl UserLocks {
    pub fn new(idle: Duration) -> Self {
        Self {
            locks: Cache::builder().time_to_idle(idle).build(),
        }
    }

    pub async fn acquire(&self, user_id: u64) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .get_with(user_id, async { Arc::new(Mutex::new(())) })
            .await;
        lock.lock_owned().await
    }
}

impl Default for UserLocks {
    fn default() -> Self {
        Self::new(Duration::from_secs(600))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn same_user_waits_other_user_does_not() {
        let locks = UserLocks::default();
        let held = locks.acquire(1).await;

        // different user is free
        let _other = locks.acquire(2).await;

        let lock = locks.locks.get(&1).await.unwrap();
        assert!(lock.try_lock().is_none());

        drop(held);
        assert!(lock.try_lock().is_some());
    }

    #[actix_web::test]
    async fn held_lock_survives_many_users() {
        let locks = UserLocks::default();
        let held = locks.acquire(0).await;

        for user_id in 1..=2_000 {
            drop(locks.acquire(user_id).await);
        }
        locks.locks.run_pending_tasks().await;

        let lock = locks.locks.get(&0).await.unwrap();
        assert!(lock.try_lock().is_none());
        drop(held);
    }
}
