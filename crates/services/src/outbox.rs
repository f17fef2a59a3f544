//! Retry queue for best-effort profile saves.
//!
//! A failed save is never surfaced to the user; the in-memory value stays
//! authoritative and the latest record per key is queued here for retry on
//! the next persistence opportunity. Only the newest record per key is kept,
//! so a late retry can never roll an older value forward.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::warn;

use storage::repository::{ProfileKey, ProfileRecord, ProfileRepository};

#[derive(Clone, Default)]
pub struct SaveOutbox {
    pending: Arc<Mutex<HashMap<ProfileKey, ProfileRecord>>>,
}

impl SaveOutbox {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a record for retry, replacing any older pending record for the
    /// same key.
    pub fn enqueue(&self, key: ProfileKey, record: ProfileRecord) {
        let mut guard = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        guard.insert(key, record);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retry every pending save against `repo`. Records that fail again are
    /// re-queued. Returns the number flushed successfully.
    pub async fn drain(&self, repo: &dyn ProfileRepository) -> usize {
        let entries: Vec<(ProfileKey, ProfileRecord)> = {
            let mut guard = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
            guard.drain().collect()
        };

        let mut flushed = 0;
        for (key, record) in entries {
            match repo.save_profile(&key, &record).await {
                Ok(()) => flushed += 1,
                Err(err) => {
                    warn!(key = %key, error = %err, "retrying save later");
                    self.enqueue(key, record);
                }
            }
        }
        flushed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devenglish_core::model::LevelId;
    use storage::repository::InMemoryProfileRepository;

    #[tokio::test]
    async fn drain_flushes_pending_records() {
        let outbox = SaveOutbox::new();
        let repo = InMemoryProfileRepository::new();

        let key = ProfileKey::for_user("ana");
        let mut record = ProfileRecord::default();
        record.level_progress.set(LevelId::Basico, 30.0);
        outbox.enqueue(key.clone(), record);
        assert_eq!(outbox.len(), 1);

        let flushed = outbox.drain(&repo).await;
        assert_eq!(flushed, 1);
        assert!(outbox.is_empty());
        assert_eq!(repo.record_count().unwrap(), 1);
    }

    #[tokio::test]
    async fn newer_record_replaces_older_pending_one() {
        let outbox = SaveOutbox::new();
        let repo = InMemoryProfileRepository::new();
        let key = ProfileKey::for_user("ana");

        let mut older = ProfileRecord::default();
        older.level_progress.set(LevelId::Basico, 10.0);
        outbox.enqueue(key.clone(), older);

        let mut newer = ProfileRecord::default();
        newer.level_progress.set(LevelId::Basico, 50.0);
        outbox.enqueue(key.clone(), newer);
        assert_eq!(outbox.len(), 1);

        outbox.drain(&repo).await;
        let stored = repo.load_profile(&key).await.unwrap().unwrap();
        assert_eq!(stored.level_progress.get(LevelId::Basico), 50.0);
    }
}
