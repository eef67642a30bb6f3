use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

use crate::types::FacilityId;

/// per-facility advisory locks
///
/// held across load, check and commit so concurrent writers against the same
/// facility aggregate run one after another. different facilities never contend.
#[derive(Debug, Default)]
pub struct FacilityLocks {
    locks: DashMap<FacilityId, Arc<Mutex<()>>>,
}

impl FacilityLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// lock handle for a facility; lock it for the duration of the critical section
    pub fn handle(&self, facility_id: FacilityId) -> Arc<Mutex<()>> {
        self.locks
            .entry(facility_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    #[test]
    fn test_same_facility_shares_a_lock() {
        let locks = FacilityLocks::new();
        let facility = Uuid::new_v4();

        let a = locks.handle(facility);
        let b = locks.handle(facility);
        assert!(Arc::ptr_eq(&a, &b));

        let _held = a.lock();
        assert!(b.try_lock().is_none());
        assert!(locks.handle(Uuid::new_v4()).try_lock().is_some());
        assert_eq!(locks.len(), 2);
    }

    #[test]
    fn test_critical_sections_do_not_overlap() {
        let locks = FacilityLocks::new();
        let facility = Uuid::new_v4();
        let inside = AtomicUsize::new(0);
        let max_seen = AtomicUsize::new(0);

        std::thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    let lock = locks.handle(facility);
                    let _held = lock.lock();
                    let now = inside.fetch_add(1, Ordering::SeqCst) + 1;
                    max_seen.fetch_max(now, Ordering::SeqCst);
                    std::thread::yield_now();
                    inside.fetch_sub(1, Ordering::SeqCst);
                });
            }
        });

        assert_eq!(max_seen.load(Ordering::SeqCst), 1);
    }
}
