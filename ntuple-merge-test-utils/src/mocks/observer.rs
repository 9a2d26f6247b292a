//! Observer that records every event

use ntuple_merge_core::{MergeEvent, MergeObserver};
use std::sync::Mutex;

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<MergeEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events seen so far
    pub fn events(&self) -> Vec<MergeEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Number of recorded events matching `predicate`
    pub fn count(&self, predicate: impl Fn(&MergeEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| predicate(e)).count()
    }

    /// Whether any recorded event matches `predicate`
    pub fn saw(&self, predicate: impl Fn(&MergeEvent) -> bool) -> bool {
        self.count(predicate) > 0
    }
}

impl MergeObserver for RecordingObserver {
    fn report(&self, event: MergeEvent) {
        self.events.lock().unwrap().push(event);
    }
}
