//! Replace-on-upload session state.
//!
//! A session holds at most one dataset. Uploading a new file replaces it
//! wholesale; computations work on an `Arc` snapshot so a replace never
//! changes data underneath a running analysis.

use std::sync::Arc;

use tracing::info;

use crate::domain::Dataset;

#[derive(Debug, Default)]
pub struct Session {
    current: Option<Loaded>,
    generation: u64,
}

#[derive(Debug)]
struct Loaded {
    dataset: Arc<Dataset>,
    source: String,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Swap in a new dataset. The previous one is dropped from the session,
    /// never merged.
    pub fn replace(&mut self, dataset: Dataset, source: impl Into<String>) -> Arc<Dataset> {
        let dataset = Arc::new(dataset);
        let source = source.into();
        self.generation += 1;
        info!(
            source = %source,
            rows = dataset.len(),
            generation = self.generation,
            "session dataset replaced"
        );
        self.current = Some(Loaded {
            dataset: Arc::clone(&dataset),
            source,
        });
        dataset
    }

    /// Handle to the current dataset, if any.
    pub fn snapshot(&self) -> Option<Arc<Dataset>> {
        self.current.as_ref().map(|l| Arc::clone(&l.dataset))
    }

    pub fn source(&self) -> Option<&str> {
        self.current.as_ref().map(|l| l.source.as_str())
    }

    /// Bumped on every `replace`; `0` means nothing was ever loaded.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether results computed at `generation` still describe the loaded dataset.
    pub fn is_current(&self, generation: u64) -> bool {
        self.current.is_some() && self.generation == generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawRecord;

    fn dataset_of(stores: &[&str]) -> Dataset {
        Dataset::new(
            stores
                .iter()
                .map(|s| RawRecord {
                    store: s.to_string(),
                    ..RawRecord::default()
                })
                .collect(),
        )
    }

    #[test]
    fn starts_empty() {
        let session = Session::new();
        assert!(session.snapshot().is_none());
        assert!(session.source().is_none());
        assert_eq!(session.generation(), 0);
        assert!(!session.is_current(0));
    }

    #[test]
    fn replace_discards_previous_dataset() {
        let mut session = Session::new();
        session.replace(dataset_of(&["A", "B"]), "first.csv");
        session.replace(dataset_of(&["C"]), "second.csv");

        let snapshot = session.snapshot().unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.rows[0].store, "C");
        assert_eq!(session.source(), Some("second.csv"));
        assert_eq!(session.generation(), 2);
    }

    #[test]
    fn earlier_snapshots_stay_valid() {
        let mut session = Session::new();
        session.replace(dataset_of(&["A", "B"]), "first.csv");
        let held = session.snapshot().unwrap();

        session.replace(dataset_of(&["C"]), "second.csv");
        assert_eq!(held.len(), 2);
        assert!(!session.is_current(1));
        assert!(session.is_current(2));
        assert_eq!(held.rows[0].store, "A");
    }
}
