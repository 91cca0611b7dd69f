// This file is part of Nitrogen.
//
// Nitrogen is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// Nitrogen is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with Nitrogen.  If not, see <http://www.gnu.org/licenses/>.
use crate::disk_cache::DiskCache;
use crate::touch_set::DoubleBufferedSet;
use catalog::Catalog;
use fxhash::FxHashMap;
use map_core::resource::{AvailabilityTest, Resource, ResourceState, Validity};
use map_core::stats::Statistics;
use parking_lot::{Mutex, RwLock};
use std::collections::HashSet;
use std::sync::{
    atomic::{AtomicU32, AtomicU64, Ordering},
    Arc,
};

/// How many ticks a `Ready` resource may go untouched before it becomes an
/// eviction candidate (spec §4.1 Eviction).
const EVICTION_IDLE_TICKS: u64 = 100;

/// How often (in ticks) `tick_render` runs an eviction pass (spec §4.1
/// `tick_render`).
const EVICTION_PERIOD_TICKS: u64 = 31;

/// Priority pinned on map-config and auth resources so they always win the
/// data worker's dispatch order (spec §4.1).
pub const PINNED_PRIORITY: f64 = f64::INFINITY;

/// Name carries no `scheme://` prefix, so it is resolved from the
/// internal-memory tier rather than fetched (spec §4.1 `Initializing`).
pub fn is_internal_memory_name(name: &str) -> bool {
    !name.contains("://") && !name.starts_with("token:")
}

/// Uniform store for all externally fetched blobs and their decoded forms
/// (spec §4.1). Owns the priority queue, state machine dispatch, and
/// eviction; the fetcher bridge and decoders are driven externally by
/// `resource_cache`'s callers via the resources it hands back.
pub struct ResourceCache {
    table: RwLock<FxHashMap<String, Arc<Resource>>>,
    disk: DiskCache,
    internal_memory: Option<Arc<Catalog>>,
    downloads: AtomicU32,
    max_concurrent_downloads: u32,
    max_resources_memory: u64,
    max_resource_processes_per_tick: u32,
    tick: AtomicU64,
    touch_set: DoubleBufferedSet<(String, f64)>,
    failed_avail_set: DoubleBufferedSet<String>,
    /// Working set on the data worker side, refilled from `touch_set` each
    /// time it swaps (spec §4.1 `tick_data`).
    pending_touches: Mutex<Vec<(String, f64)>>,
    /// Resource-lifecycle tallies (spec §8 scenario 4, SPEC_FULL.md's
    /// supplemented `MapStatistics` counters). Driven from inside the cache
    /// itself since eviction, disk hits, and download completion are all
    /// internal state transitions the caller doesn't otherwise observe.
    stats: Mutex<Statistics>,
}

impl ResourceCache {
    pub fn new(
        cache_path: impl Into<std::path::PathBuf>,
        internal_memory: Option<Arc<Catalog>>,
        max_concurrent_downloads: u32,
        max_resources_memory: u64,
        max_resource_processes_per_tick: u32,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            table: RwLock::new(FxHashMap::default()),
            disk: DiskCache::open(cache_path)?,
            internal_memory,
            downloads: AtomicU32::new(0),
            max_concurrent_downloads,
            max_resources_memory,
            max_resource_processes_per_tick,
            tick: AtomicU64::new(0),
            touch_set: DoubleBufferedSet::new(),
            failed_avail_set: DoubleBufferedSet::new(),
            pending_touches: Mutex::new(Vec::new()),
            stats: Mutex::new(Statistics::new()),
        })
    }

    pub fn disk(&self) -> &DiskCache {
        &self.disk
    }

    /// Snapshot of the resource-lifecycle counters (spec §8 scenario 4;
    /// SPEC_FULL.md's supplemented `MapStatistics`).
    pub fn statistics(&self) -> Statistics {
        self.stats.lock().clone()
    }

    pub fn current_tick(&self) -> u64 {
        self.tick.load(Ordering::Relaxed)
    }

    pub fn downloads_in_flight(&self) -> u32 {
        self.downloads.load(Ordering::Relaxed)
    }

    /// Returns the cached resource by name, creating it in `Initializing`
    /// if absent. Always succeeds synchronously (spec §4.1 `get`).
    pub fn get(&self, name: &str, availability_test: Option<AvailabilityTest>) -> Arc<Resource> {
        if let Some(existing) = self.table.read().get(name) {
            return Arc::clone(existing);
        }
        let mut table = self.table.write();
        Arc::clone(
            table
                .entry(name.to_owned())
                .or_insert_with(|| Arc::new(Resource::new(name, availability_test))),
        )
    }

    pub fn validity(&self, name: &str) -> Validity {
        match self.table.read().get(name) {
            Some(r) => r.validity(),
            None => Validity::Invalid,
        }
    }

    /// Render-worker side of `touch`: queue a touch request without taking
    /// any lock shared with the data worker (spec §4.1/§5).
    pub fn touch(&self, name: &str, priority: f64) {
        self.touch_set.push((name.to_owned(), priority));
    }

    pub fn mark_failed_availability(&self, name: &str) {
        self.failed_avail_set.push(name.to_owned());
    }

    /// Runs on the render worker, once per frame: swaps this tick's touch
    /// and failed-avail requests into the data worker's queues, and every
    /// `EVICTION_PERIOD_TICKS` ticks runs an eviction pass (spec §4.1
    /// `tick_render`).
    pub fn tick_render(&self) {
        let tick = self.tick.fetch_add(1, Ordering::Relaxed) + 1;
        self.touch_set.swap_into_locked();
        self.failed_avail_set.swap_into_locked();
        if tick % EVICTION_PERIOD_TICKS == 0 {
            self.run_eviction_pass(tick);
        }
    }

    /// Runs on the data worker: drains queued touches, applies them, then
    /// advances at most `max_resource_processes_per_tick` resources one
    /// step each, highest priority first (spec §4.1 `tick_data`).
    pub fn tick_data(&self) {
        for name in self.failed_avail_set.drain_locked() {
            let _ = self.disk.mark_failed_availability(&name);
        }

        let mut pending = self.pending_touches.lock();
        pending.extend(self.touch_set.drain_locked());
        let tick = self.current_tick();
        for (name, priority) in pending.drain(..) {
            if let Some(res) = self.table.read().get(&name) {
                res.touch(tick, priority);
            }
        }
        drop(pending);

        let candidates = self.dispatch_candidates();
        for res in candidates
            .into_iter()
            .take(self.max_resource_processes_per_tick as usize)
        {
            self.advance(&res);
        }

        self.stats.lock().current_resources = self.resource_count() as u64;
    }

    /// Resources eligible to advance this tick, sorted highest-priority
    /// first (spec §4.1 "Priority tie-breaking during data-worker dispatch").
    fn dispatch_candidates(&self) -> Vec<Arc<Resource>> {
        let table = self.table.read();
        let mut candidates: Vec<Arc<Resource>> = table
            .values()
            .filter(|r| {
                matches!(
                    r.state(),
                    ResourceState::Initializing | ResourceState::Downloaded
                )
            })
            .cloned()
            .collect();
        candidates.sort_by(|a, b| {
            b.priority()
                .partial_cmp(&a.priority())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        candidates
    }

    /// Advance one resource a single step through `Initializing` or
    /// `Downloaded` (spec §4.1 state machine). `Downloading` and beyond are
    /// driven by fetcher completions and external decoders respectively;
    /// this only handles the steps the cache itself is responsible for.
    fn advance(&self, res: &Arc<Resource>) {
        match res.state() {
            ResourceState::Initializing => {
                if is_internal_memory_name(res.name()) {
                    if let Some(catalog) = &self.internal_memory {
                        if catalog.exists(res.name()) {
                            res.set_state(ResourceState::Downloaded);
                            return;
                        }
                    }
                    log::warn!("resource {} has no scheme and no internal source", res.name());
                    res.set_state(ResourceState::ErrorFatal);
                } else if self.disk.read(res.name()).is_some() {
                    self.stats.lock().resources_disk_loaded += 1;
                    res.set_state(ResourceState::Downloaded);
                } else if self.downloads.load(Ordering::Relaxed) < self.max_concurrent_downloads {
                    self.downloads.fetch_add(1, Ordering::Relaxed);
                    res.set_state(ResourceState::Downloading);
                }
                // else: stays Initializing, waiting for download budget.
            }
            ResourceState::Downloaded => {
                // Actual decode is invoked by the caller (it owns the
                // DecoderBridge); nothing to do here but leave the
                // resource available for that call.
            }
            _ => {}
        }
    }

    /// Call once a `Downloading` resource's fetch completes with bytes
    /// successfully retrieved, persisting to the disk tier and releasing
    /// the download slot (spec §4.1 `Downloading -> Downloaded`).
    pub fn on_downloaded(&self, res: &Resource, bytes: &[u8]) -> anyhow::Result<()> {
        self.disk.write(res.name(), bytes)?;
        self.downloads.fetch_sub(1, Ordering::Relaxed);
        res.set_state(ResourceState::Downloaded);
        self.stats.lock().resources_downloaded += 1;
        Ok(())
    }

    /// Call when a `Downloading` resource's fetch fails fatally, releasing
    /// the download slot (spec §4.1/§4.5).
    pub fn on_fetch_failed(&self, res: &Resource) {
        self.downloads.fetch_sub(1, Ordering::Relaxed);
        res.set_state(ResourceState::ErrorFatal);
    }

    /// Call when a `Downloading` resource is redirected, releasing the
    /// download slot and moving it back to `Initializing` to restart
    /// against the new URL. The new `Resource` for the redirect target is
    /// obtained via `get` by the caller, since the name itself changes.
    pub fn on_redirected(&self, res: &Resource) {
        self.downloads.fetch_sub(1, Ordering::Relaxed);
        res.set_state(ResourceState::Initializing);
    }

    fn ram_gpu_use(&self) -> (u64, u64) {
        let table = self.table.read();
        table.values().fold((0u64, 0u64), |(ram, gpu), r| {
            (ram + r.ram_memory_cost(), gpu + r.gpu_memory_cost())
        })
    }

    /// Eviction pass (spec §4.1 Eviction): only runs when memory use
    /// exceeds the budget. Resources not touched for >= 100 ticks are
    /// sorted oldest-first and moved to `Finalizing`; anything that was
    /// *already* `Finalizing` on entry to this pass and is still untouched
    /// is evicted outright. `Downloading` resources are never evicted
    /// (testable property 3).
    ///
    /// Finalizing must survive one full pass before it is eligible for
    /// eviction: it's the `touch`-triggered rescue window back to
    /// `Initializing` (spec §4.1/§4.4 state machine), so a resource just
    /// finalized *this* call is never evicted in the same call — only on a
    /// later pass, once it's had a chance to be touched back to life. The
    /// set of eviction candidates is snapshotted before the finalize loop
    /// runs so the two steps don't collapse into one.
    fn run_eviction_pass(&self, tick: u64) -> usize {
        let (ram, gpu) = self.ram_gpu_use();
        if ram + gpu <= self.max_resources_memory {
            return 0;
        }

        let mut table = self.table.write();

        let already_finalizing: HashSet<String> = table
            .values()
            .filter(|r| r.state() == ResourceState::Finalizing)
            .map(|r| r.name().to_owned())
            .collect();

        let mut to_finalize: Vec<Arc<Resource>> = table
            .values()
            .filter(|r| {
                !matches!(r.state(), ResourceState::Downloading)
                    && r.state() != ResourceState::Finalizing
                    && tick.saturating_sub(r.last_access_tick()) >= EVICTION_IDLE_TICKS
            })
            .cloned()
            .collect();
        to_finalize.sort_by_key(|r| r.last_access_tick());
        for r in &to_finalize {
            r.set_state(ResourceState::Finalizing);
        }

        let to_evict: Vec<String> = already_finalizing
            .into_iter()
            .filter(|name| {
                table.get(name).map_or(false, |r| {
                    r.state() == ResourceState::Finalizing
                        && tick.saturating_sub(r.last_access_tick()) >= EVICTION_IDLE_TICKS
                })
            })
            .collect();

        let mut evicted = 0usize;
        for name in to_evict {
            table.remove(&name);
            evicted += 1;
        }
        if evicted > 0 {
            self.stats.lock().resources_released += evicted as u64;
        }
        evicted
    }

    pub fn resource_count(&self) -> usize {
        self.table.read().len()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use map_core::resource::ResourceState;

    fn cache() -> (ResourceCache, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResourceCache::new(dir.path(), None, 4, 1024, 4).unwrap();
        (cache, dir)
    }

    #[test]
    fn test_get_creates_initializing_resource() {
        let (cache, _dir) = cache();
        let r = cache.get("https://example/tile.bin", None);
        assert_eq!(r.state(), ResourceState::Initializing);
        let r2 = cache.get("https://example/tile.bin", None);
        assert!(Arc::ptr_eq(&r, &r2));
    }

    #[test]
    fn test_internal_memory_name_detection() {
        assert!(is_internal_memory_name("builtin/placeholder.png"));
        assert!(!is_internal_memory_name("https://host/tile.bin"));
        assert!(!is_internal_memory_name("token:abc"));
    }

    #[test]
    fn test_download_slot_respects_concurrency_cap() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ResourceCache::new(dir.path(), None, 1, 1024 * 1024, 8).unwrap();
        let a = cache.get("https://example/a.bin", None);
        let b = cache.get("https://example/b.bin", None);
        cache.touch("https://example/a.bin", 1.0);
        cache.touch("https://example/b.bin", 1.0);
        cache.tick_render();
        cache.tick_data();
        // One of the two should have grabbed the single download slot;
        // the other stays Initializing.
        let states = [a.state(), b.state()];
        let downloading = states
            .iter()
            .filter(|s| **s == ResourceState::Downloading)
            .count();
        assert!(downloading <= 1);
        assert!(cache.downloads_in_flight() <= 1);
    }

    #[test]
    fn test_eviction_skips_downloading_resources() {
        let (cache, _dir) = cache();
        let r = cache.get("https://example/a.bin", None);
        r.set_state(ResourceState::Downloading);
        r.set_memory_cost(2048, 0);
        let evicted = cache.run_eviction_pass(1000);
        assert_eq!(evicted, 0);
        assert_eq!(r.state(), ResourceState::Downloading);
    }

    #[test]
    fn test_eviction_finalizes_then_evicts_stale_ready_resource() {
        let (cache, _dir) = cache();
        let r = cache.get("https://example/a.bin", None);
        r.set_state(ResourceState::Ready);
        r.set_memory_cost(2048, 0);
        r.touch(0, 1.0);

        // First pass, far enough past last access: moves to Finalizing.
        cache.run_eviction_pass(200);
        assert_eq!(r.state(), ResourceState::Finalizing);

        // Second pass: still untouched, now evicted from the table.
        cache.run_eviction_pass(400);
        assert_eq!(cache.resource_count(), 0);
    }

    #[test]
    fn test_eviction_never_removes_a_resource_finalized_this_same_pass() {
        // Spec §4.1: "move each to Finalizing, then evict on the next pass
        // if still untouched" -- a resource must survive one full pass in
        // Finalizing (the touch-rescue window) before it can be evicted.
        let (cache, _dir) = cache();
        let r = cache.get("https://example/a.bin", None);
        r.set_state(ResourceState::Ready);
        r.set_memory_cost(2048, 0);
        r.touch(0, 1.0);

        let evicted = cache.run_eviction_pass(200);
        assert_eq!(evicted, 0);
        assert_eq!(r.state(), ResourceState::Finalizing);
        assert_eq!(cache.resource_count(), 1);
    }

    #[test]
    fn test_eviction_bumps_resources_released_statistic() {
        let (cache, _dir) = cache();
        let r = cache.get("https://example/a.bin", None);
        r.set_state(ResourceState::Ready);
        r.set_memory_cost(2048, 0);
        r.touch(0, 1.0);

        cache.run_eviction_pass(200);
        assert_eq!(cache.statistics().resources_released, 0);
        cache.run_eviction_pass(400);
        assert_eq!(cache.statistics().resources_released, 1);
    }

    #[test]
    fn test_on_downloaded_bumps_resources_downloaded_statistic() {
        let (cache, _dir) = cache();
        let r = cache.get("https://example/a.bin", None);
        cache.on_downloaded(&r, b"payload").unwrap();
        assert_eq!(cache.statistics().resources_downloaded, 1);
    }
}
