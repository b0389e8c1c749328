//! Controller/coordinator cache (spec §3, §4.2 C6).
//!
//! Plain structs, no interior mutability. Spec §5 says "the controller id
//! and coordinator map are mutated only by the calling thread ... document
//! this; do not add internal locking". Rather than a runtime assertion,
//! the façade methods that touch these caches take `&mut self`, so the
//! borrow checker itself enforces single-threaded sequential access —
//! a misuse that would need a doc comment and a runtime check in the
//! reference implementation is a compile error here.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::types::ControllerRef;

/// Memoises the controller id (spec §3 `ControllerRef`, §4.2 controller
/// refresh). Absence means "must refresh before any controller-bound RPC".
#[derive(Debug, Default)]
pub struct ControllerCache {
    current: Option<ControllerRef>,
}

impl ControllerCache {
    pub fn new() -> Self {
        ControllerCache { current: None }
    }

    pub fn get(&self) -> Option<ControllerRef> {
        self.current
    }

    pub fn set(&mut self, node_id: i32) {
        self.current = Some(ControllerRef {
            node_id,
            refreshed_at: Instant::now(),
        });
    }

    /// Invalidated on `NotControllerError` in a controller-bound response
    /// (spec §4.2).
    pub fn invalidate(&mut self) {
        self.current = None;
    }

    pub fn age(&self) -> Option<Duration> {
        self.current.map(|c| c.refreshed_at.elapsed())
    }
}

/// `groupId -> nodeId` (spec §3 `CoordinatorMap`). Entries are inserted
/// on successful `FindCoordinator` and evicted on `NotCoordinator` (spec
/// §4.2); eviction never triggers an automatic retry, the façade just
/// surfaces the error on the next lookup miss.
#[derive(Debug, Default)]
pub struct CoordinatorCache {
    coordinators: HashMap<String, i32>,
}

impl CoordinatorCache {
    pub fn new() -> Self {
        CoordinatorCache {
            coordinators: HashMap::new(),
        }
    }

    pub fn get(&self, group_id: &str) -> Option<i32> {
        self.coordinators.get(group_id).copied()
    }

    pub fn set(&mut self, group_id: impl Into<String>, node_id: i32) {
        self.coordinators.insert(group_id.into(), node_id);
    }

    pub fn invalidate(&mut self, group_id: &str) {
        self.coordinators.remove(group_id);
    }

    /// Ids for which no coordinator is currently cached; preserves input
    /// order so callers can zip a batched `FindCoordinator` fan-out back
    /// against it.
    pub fn missing<'a>(&self, group_ids: &'a [String]) -> Vec<&'a str> {
        group_ids
            .iter()
            .filter(|id| !self.coordinators.contains_key(id.as_str()))
            .map(String::as_str)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn controller_cache_starts_empty() {
        let cache = ControllerCache::new();
        assert!(cache.get().is_none());
    }

    #[test]
    fn controller_cache_invalidate_clears() {
        let mut cache = ControllerCache::new();
        cache.set(1);
        assert!(cache.get().is_some());
        cache.invalidate();
        assert!(cache.get().is_none());
    }

    #[test]
    fn coordinator_cache_tracks_missing_ids() {
        let mut cache = CoordinatorCache::new();
        cache.set("g1", 2);
        let ids = vec!["g1".to_string(), "g2".to_string()];
        assert_eq!(cache.missing(&ids), vec!["g2"]);
    }

    #[test]
    fn coordinator_cache_invalidate_evicts() {
        let mut cache = CoordinatorCache::new();
        cache.set("g1", 2);
        cache.invalidate("g1");
        assert!(cache.get("g1").is_none());
    }
}
