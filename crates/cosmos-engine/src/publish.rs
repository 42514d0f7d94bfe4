//! The shared slot through which the stepper thread hands snapshots to
//! readers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::snapshot::UniverseSnapshot;

/// Holds the most recent [`UniverseSnapshot`] and a publish count.
///
/// The stepper replaces the whole `Arc` on each publish. Readers clone the
/// `Arc` under the lock and never see a partially built grid.
#[derive(Default)]
pub struct SnapshotSlot {
    latest: Mutex<Option<Arc<UniverseSnapshot>>>,
    published: AtomicU64,
}

impl SnapshotSlot {
    /// An empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current snapshot.
    pub fn publish(&self, snapshot: UniverseSnapshot) {
        let arc = Arc::new(snapshot);
        *self.latest.lock().unwrap_or_else(PoisonError::into_inner) = Some(arc);
        self.published.fetch_add(1, Ordering::Release);
    }

    /// The most recent snapshot, or `None` before the first publish.
    pub fn latest(&self) -> Option<Arc<UniverseSnapshot>> {
        self.latest
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Snapshots published so far.
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::simulator::UniverseSimulator;

    fn snapshot_at(time_step: u64) -> UniverseSnapshot {
        let cfg = EngineConfig {
            seed: Some(1),
            ..EngineConfig::default()
        };
        let mut s = UniverseSimulator::new(cfg).unwrap().snapshot();
        s.time_step = time_step;
        s
    }

    #[test]
    fn empty_until_first_publish() {
        let slot = SnapshotSlot::new();
        assert!(slot.latest().is_none());
        assert_eq!(slot.published(), 0);
    }

    #[test]
    fn publish_replaces_and_counts() {
        let slot = SnapshotSlot::new();
        slot.publish(snapshot_at(3));
        let held = slot.latest().unwrap();
        slot.publish(snapshot_at(4));
        assert_eq!(slot.latest().map(|s| s.time_step), Some(4));
        assert_eq!(slot.published(), 2);
        // A reader's Arc outlives the replacement.
        assert_eq!(held.time_step, 3);
    }

    #[test]
    fn concurrent_readers_see_whole_snapshots() {
        let slot = Arc::new(SnapshotSlot::new());
        let writer = {
            let slot = Arc::clone(&slot);
            std::thread::spawn(move || {
                for i in 1..=200 {
                    slot.publish(snapshot_at(i));
                }
            })
        };
        let mut last = 0;
        while last < 200 {
            if let Some(s) = slot.latest() {
                assert!(s.time_step >= last);
                assert_eq!(s.grid.len(), 1);
                last = s.time_step;
            }
        }
        writer.join().unwrap();
        assert_eq!(slot.published(), 200);
    }
}
