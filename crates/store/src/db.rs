use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::warn;

use crate::model::Store;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("store serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Owner of the durable store file.
///
/// All persistence goes through this type: readers get a whole-store
/// snapshot via [`Database::load`], and every mutation runs through
/// [`Database::update`], which serializes the load-mutate-save sequence
/// behind one lock so concurrent writers cannot discard each other's work.
pub struct Database {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted aggregate.
    ///
    /// A missing file is created as an empty store. An unreadable or corrupt
    /// file degrades to an empty store with a logged warning, keeping reads
    /// available; it is never a hard failure.
    pub async fn load(&self) -> Store {
        match fs::read(&self.path).await {
            Ok(bytes) => self.parse(&bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => self.create_empty().await,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "store unreadable, serving empty");
                Store::default()
            }
        }
    }

    /// Persist the whole aggregate with atomic replace semantics.
    pub async fn save(&self, store: &Store) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        self.save_locked(store).await
    }

    /// Run one mutation as a single critical section: load a private copy,
    /// apply `f`, and persist the result. An error from `f` aborts the
    /// sequence and nothing is written; a persist failure means the mutation
    /// was not applied.
    pub async fn update<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Store) -> Result<T, E>,
        E: From<StoreError>,
    {
        let _guard = self.write_lock.lock().await;
        let mut store = self.read_snapshot().await;
        let out = f(&mut store)?;
        self.save_locked(&store).await.map_err(E::from)?;
        Ok(out)
    }

    /// Read without touching the lock. Used inside `update`, which already
    /// holds it, and by `load` on the happy path.
    async fn read_snapshot(&self) -> Store {
        match fs::read(&self.path).await {
            Ok(bytes) => self.parse(&bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Store::default(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "store unreadable, serving empty");
                Store::default()
            }
        }
    }

    fn parse(&self, bytes: &[u8]) -> Store {
        serde_json::from_slice(bytes).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "store corrupt, serving empty");
            Store::default()
        })
    }

    async fn create_empty(&self) -> Store {
        let _guard = self.write_lock.lock().await;
        // Another task may have created the file while we waited.
        if let Ok(bytes) = fs::read(&self.path).await {
            return self.parse(&bytes);
        }
        let store = Store::default();
        if let Err(e) = self.save_locked(&store).await {
            warn!(path = %self.path.display(), error = %e, "failed to persist empty store");
        }
        store
    }

    /// Temp-write-then-rename so a concurrent reader never observes a
    /// partially written aggregate. Caller must hold `write_lock`.
    async fn save_locked(&self, store: &Store) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(store)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, &bytes).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}
