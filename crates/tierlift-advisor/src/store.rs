//! Loaded artifacts and their atomic replacement.

use std::sync::{Arc, PoisonError, RwLock};

use tierlift_core::TierStandards;
use tierlift_training::classifier::TrainedClassifier;

/// The artifacts served at request time. Either may be absent until loaded.
#[derive(Debug, Clone, Default)]
pub struct Artifacts {
    pub standards: Option<Arc<TierStandards>>,
    pub classifier: Option<Arc<TrainedClassifier>>,
}

impl Artifacts {
    #[must_use]
    pub fn new(standards: Option<TierStandards>, classifier: Option<TrainedClassifier>) -> Self {
        Self {
            standards: standards.map(Arc::new),
            classifier: classifier.map(Arc::new),
        }
    }
}

/// Holds the current [`Artifacts`] snapshot.
///
/// Readers clone the snapshot pointer and keep using it for the whole
/// request; [`ArtifactStore::publish`] swaps in a fully built replacement.
#[derive(Debug, Default)]
pub struct ArtifactStore {
    current: RwLock<Arc<Artifacts>>,
}

impl ArtifactStore {
    #[must_use]
    pub fn new(artifacts: Artifacts) -> Self {
        Self {
            current: RwLock::new(Arc::new(artifacts)),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Arc<Artifacts> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn publish(&self, artifacts: Artifacts) {
        let next = Arc::new(artifacts);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = next;
    }

    /// Replaces the snapshot with one derived from the current snapshot.
    ///
    /// The write lock is held while `f` runs, so no concurrent
    /// [`ArtifactStore::publish`] or `update` is lost.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&Artifacts) -> Artifacts,
    {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Arc::new(f(&current));
    }
}
