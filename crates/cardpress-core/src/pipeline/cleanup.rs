//! Accumulator for intermediate artifacts pending deletion.
//!
//! Every pointer-backed artifact the job produces is recorded here the
//! moment it exists, so the generator can delete all of them on any
//! exit path, including failures in later stages.

use crate::pipeline::traits::ArtifactStorage;
use std::sync::Mutex;

#[derive(Default)]
pub struct ArtifactTracker {
    keys: Mutex<Vec<String>>,
}

impl ArtifactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, key: impl Into<String>) {
        self.keys.lock().expect("artifact tracker poisoned").push(key.into());
    }

    pub fn keys(&self) -> Vec<String> {
        self.keys.lock().expect("artifact tracker poisoned").clone()
    }

    /// Best-effort delete of everything recorded so far
    pub async fn cleanup(&self, storage: &dyn ArtifactStorage) {
        let keys = self.keys();
        if keys.is_empty() {
            return;
        }
        log::info!("Cleaning up {} intermediate artifacts", keys.len());
        storage.cleanup_keys_best_effort(&keys).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let tracker = ArtifactTracker::new();
        tracker.record("temp_0_a.pdf");
        tracker.record("temp_600_a.pdf");
        assert_eq!(tracker.keys(), vec!["temp_0_a.pdf", "temp_600_a.pdf"]);
    }
}
