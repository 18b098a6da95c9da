use crate::domain::model::Property;
use arc_swap::ArcSwap;
use std::sync::Arc;

/// Holds the list of properties currently being served.
///
/// Replacement swaps the whole list behind an `Arc`, so a reader holds either
/// the previous list or the new one and never a mix of both.
#[derive(Debug)]
pub struct SnapshotStore {
    current: ArcSwap<Vec<Property>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Installs `properties` as the snapshot seen by every later read.
    pub fn replace(&self, properties: Vec<Property>) {
        self.current.store(Arc::new(properties));
    }

    /// The current snapshot. Stays valid while a replace happens.
    pub fn all(&self) -> Arc<Vec<Property>> {
        self.current.load_full()
    }

    /// First property whose slug matches. With duplicate slugs upstream, which
    /// one is "first" follows the order the query API returned them in.
    pub fn find_by_slug(&self, slug: &str) -> Option<Property> {
        self.current
            .load()
            .iter()
            .find(|property| property.slug() == slug)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.current.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
