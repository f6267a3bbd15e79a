use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::r#trait::{PersistenceError, PersistenceGateway, Snapshot};

/// In-memory gateway for tests/dev.
///
/// Keeps the last saved snapshot and counts saves. Saves can be switched to
/// fail to exercise the log-and-continue path.
#[derive(Debug, Default)]
pub struct InMemoryGateway {
    stored: Mutex<Option<Snapshot>>,
    saves: AtomicUsize,
    fail_saves: AtomicBool,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a snapshot already stored (as if loaded from disk).
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            stored: Mutex::new(Some(snapshot)),
            ..Self::default()
        }
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn last_saved(&self) -> Option<Snapshot> {
        self.stored.lock().ok().and_then(|s| s.clone())
    }
}

impl PersistenceGateway for InMemoryGateway {
    fn load(&self) -> Result<Snapshot, PersistenceError> {
        let stored = self
            .stored
            .lock()
            .map_err(|_| PersistenceError::Unavailable("lock poisoned".to_string()))?;
        stored.clone().ok_or(PersistenceError::Missing)
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(PersistenceError::Unavailable("saves disabled".to_string()));
        }

        let mut stored = self
            .stored
            .lock()
            .map_err(|_| PersistenceError::Unavailable("lock poisoned".to_string()))?;
        *stored = Some(snapshot.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
