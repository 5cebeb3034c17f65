//! Library repository: owns the previous/current index snapshots.

use crate::core::store::StateStore;
use crate::models::library::LibraryIndex;
use crate::Result;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Snapshots {
    previous: Option<LibraryIndex>,
    current: Option<LibraryIndex>,
}

/// In-memory view of the persisted library index.
///
/// `current` is `None` until the first successful sync has been stored.
#[derive(Debug)]
pub struct LibraryRepository {
    store: Arc<StateStore>,
    snapshots: RwLock<Snapshots>,
}

impl LibraryRepository {
    /// Open the repository, loading the last persisted snapshot.
    pub fn open(store: Arc<StateStore>) -> Result<Self> {
        let current = store.library_index()?;
        tracing::debug!(
            keys = current.as_ref().map(LibraryIndex::len),
            "Loaded library index"
        );
        Ok(Self {
            store,
            snapshots: RwLock::new(Snapshots {
                previous: None,
                current,
            }),
        })
    }

    pub async fn current(&self) -> Option<LibraryIndex> {
        self.snapshots.read().await.current.clone()
    }

    pub async fn previous(&self) -> Option<LibraryIndex> {
        self.snapshots.read().await.previous.clone()
    }

    /// Replace the current snapshot with `next`.
    ///
    /// The new index is persisted before the in-memory snapshots move; if
    /// persisting fails nothing changes. Returns the displaced snapshot.
    pub async fn replace(&self, next: LibraryIndex) -> Result<Option<LibraryIndex>> {
        let mut snapshots = self.snapshots.write().await;
        self.store.set_library_index(&next)?;
        let displaced = snapshots.current.replace(next);
        snapshots.previous = displaced.clone();
        Ok(displaced)
    }
}
