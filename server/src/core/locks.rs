use crate::entities::ConversationKey;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, instrument};

/// In-process write locks, one per conversation key.
///
/// Two senders resolving the same (pair, advertisement) queue on the same
/// mutex, so the insert-or-select of the conversation row never races with
/// itself. Entries are dropped once nobody holds or waits on them.
pub struct ConversationLocks {
    locks: DashMap<ConversationKey, Arc<Mutex<()>>>,
}

/// Held lock on one conversation key. Dropping it releases the mutex and
/// prunes the map entry, also when the owning future is cancelled.
pub struct ConversationGuard<'a> {
    locks: &'a ConversationLocks,
    key: ConversationKey,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for ConversationGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        self.locks.prune(&self.key);
    }
}

impl ConversationLocks {
    pub fn new() -> Self {
        ConversationLocks {
            locks: DashMap::new(),
        }
    }

    #[instrument(skip(self))]
    pub async fn acquire(&self, key: ConversationKey) -> ConversationGuard<'_> {
        // clone the Arc out so the shard lock is released before awaiting
        let lock = self
            .locks
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        // built before the await: a waiter cancelled while queued still prunes
        let mut held = ConversationGuard {
            locks: self,
            key,
            guard: None,
        };
        held.guard = Some(lock.lock_owned().await);
        held
    }

    fn prune(&self, key: &ConversationKey) {
        // map entry + nobody else = 1 strong reference
        let removed = self
            .locks
            .remove_if(key, |_, lock| Arc::strong_count(lock) == 1);
        if removed.is_some() {
            debug!("Released conversation lock entry");
        }
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

impl Default for ConversationLocks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_dropping_guard_removes_idle_entry() {
        let locks = ConversationLocks::new();
        let guard = locks.acquire(ConversationKey::new(2, 1, None)).await;
        assert_eq!(locks.len(), 1);
        drop(guard);
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_same_key_is_serialized() {
        let locks = Arc::new(ConversationLocks::new());
        let guard = locks.acquire(ConversationKey::new(1, 2, Some(1))).await;

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(ConversationKey::new(2, 1, Some(1))).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        waiter.await.unwrap();
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_different_keys_do_not_block() {
        let locks = ConversationLocks::new();
        let first = locks.acquire(ConversationKey::new(1, 2, None)).await;
        let second = tokio::time::timeout(
            Duration::from_millis(100),
            locks.acquire(ConversationKey::new(1, 2, Some(3))),
        )
        .await;
        assert!(second.is_ok());
        drop(second);
        drop(first);
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_aborted_holder_leaves_no_entry() {
        let locks = Arc::new(ConversationLocks::new());
        let (held_tx, held_rx) = tokio::sync::oneshot::channel();

        let holder = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(ConversationKey::new(1, 2, None)).await;
                let _ = held_tx.send(());
                tokio::time::sleep(Duration::from_secs(60)).await;
            })
        };

        held_rx.await.unwrap();
        assert_eq!(locks.len(), 1);

        holder.abort();
        assert!(holder.await.unwrap_err().is_cancelled());
        assert!(locks.is_empty());
    }

    #[tokio::test]
    async fn test_aborted_waiter_leaves_no_entry() {
        let locks = Arc::new(ConversationLocks::new());
        let guard = locks.acquire(ConversationKey::new(1, 2, None)).await;

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(ConversationKey::new(2, 1, None)).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        waiter.abort();
        assert!(waiter.await.unwrap_err().is_cancelled());

        drop(guard);
        assert!(locks.is_empty());
    }
}
