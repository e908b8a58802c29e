//! Issue index facade
//!
//! Two read-optimised views over issues owned by an `IssueStore`:
//!
//! - `fast_search(id)` - AVL tree lookup by id
//! - `get_top_urgent(n)` / `get_most_urgent()` - min-heap by (priority, age)
//! - `process_most_urgent()` - move the most urgent issue to In Progress
//! - `force_refresh()` / `refresh_if_needed()` - rebuild from the store
//! - `get_statistics()` - tree/heap shape for diagnostics
//!
//! # Concurrency
//!
//! Single writer, rebuild-and-swap. The published snapshot sits behind
//! `RwLock<Arc<_>>`; readers clone the `Arc` and drop the lock before doing
//! any work. Writers serialize on a separate mutex, build the replacement
//! off to the side, then swap it in.
//!
//! # Invariants
//!
//! - Both structures always come from the same store read
//! - Every read checks staleness first
//! - A tree miss is `Ok(None)`, never an error

use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use chrono::{DateTime, Utc};

use super::clock::{Clock, SystemClock};
use super::config::IndexConfig;
use super::entry::{PriorityEntry, SearchEntry};
use super::errors::{IndexError, IndexResult};
use super::snapshot::IndexSnapshot;
use super::stats::IndexStatistics;
use crate::issue::{IssueId, IssueRecord};
use crate::observability::{
    IndexEvent, IndexMetrics, IndexMetricsSnapshot, Logger, ObservationScope,
};
use crate::store::IssueStore;

/// In-memory secondary index over an authoritative issue store
pub struct IssueIndex<S, C = SystemClock> {
    store: Arc<S>,
    clock: C,
    config: IndexConfig,
    current: RwLock<Arc<IndexSnapshot>>,
    writer: Mutex<()>,
    metrics: IndexMetrics,
}

impl<S: IssueStore> IssueIndex<S, SystemClock> {
    /// Creates an index that has not read the store yet.
    ///
    /// The first read rebuilds it.
    pub fn new(store: Arc<S>, config: IndexConfig) -> Self {
        Self::with_clock(store, config, SystemClock)
    }

    /// Creates an index and builds it from the store immediately
    pub fn open(store: Arc<S>, config: IndexConfig) -> IndexResult<Self> {
        let index = Self::new(store, config);
        index.force_refresh()?;
        Ok(index)
    }
}

impl<S: IssueStore, C: Clock> IssueIndex<S, C> {
    /// Creates an unbuilt index driven by `clock`
    pub fn with_clock(store: Arc<S>, config: IndexConfig, clock: C) -> Self {
        Self {
            store,
            clock,
            config,
            current: RwLock::new(Arc::new(IndexSnapshot::empty())),
            writer: Mutex::new(()),
            metrics: IndexMetrics::new(),
        }
    }

    /// The configuration this index was built with
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// The authoritative store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Current counter values
    pub fn metrics(&self) -> IndexMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Most urgent `count` issues, most urgent first.
    ///
    /// Entries whose record has left the store are skipped.
    pub fn get_top_urgent(&self, count: usize) -> IndexResult<Vec<IssueRecord>> {
        let snapshot = self.fresh_snapshot()?;
        if snapshot.urgent_heap.is_empty() || count == 0 {
            return Ok(Vec::new());
        }

        let ids: Vec<IssueId> = snapshot
            .urgent_heap
            .peek_top(count)
            .into_iter()
            .map(|entry| entry.id)
            .collect();
        let records = self.store.fetch_many(&ids)?;

        if records.len() < ids.len() {
            let missing = (ids.len() - records.len()).to_string();
            Logger::warn(IndexEvent::ResolveMiss.as_str(), &[("missing", missing.as_str())]);
            self.metrics.add_resolve_misses((ids.len() - records.len()) as u64);
        }
        Ok(records)
    }

    /// `get_top_urgent` with the configured default count
    pub fn top_urgent(&self) -> IndexResult<Vec<IssueRecord>> {
        self.get_top_urgent(self.config.default_top_urgent)
    }

    /// Urgency queue entries for the most urgent `count` issues, without
    /// resolving them through the store
    pub fn peek_urgent_entries(&self, count: usize) -> IndexResult<Vec<PriorityEntry>> {
        Ok(self.fresh_snapshot()?.urgent_heap.peek_top(count))
    }

    /// Looks an issue up by id in the search tree, then resolves it.
    pub fn fast_search(&self, id: IssueId) -> IndexResult<Option<IssueRecord>> {
        let snapshot = self.fresh_snapshot()?;
        if !snapshot.search_tree.contains(&SearchEntry::probe(id)) {
            self.metrics.increment_search_misses();
            return Ok(None);
        }

        self.metrics.increment_search_hits();
        self.resolve(id)
    }

    /// The search tree entry for `id`, without a store round trip
    pub fn search_entry(&self, id: IssueId) -> IndexResult<Option<SearchEntry>> {
        let snapshot = self.fresh_snapshot()?;
        Ok(snapshot.search_tree.search(&SearchEntry::probe(id)).cloned())
    }

    /// Every indexed id, ascending
    pub fn indexed_ids(&self) -> IndexResult<Vec<IssueId>> {
        let snapshot = self.fresh_snapshot()?;
        Ok(snapshot.search_tree.in_order().into_iter().map(|entry| entry.id).collect())
    }

    /// Indexed ids whose category equals `category`, ascending
    pub fn ids_in_category(&self, category: &str) -> IndexResult<Vec<IssueId>> {
        let snapshot = self.fresh_snapshot()?;
        Ok(snapshot
            .search_tree
            .in_order()
            .into_iter()
            .filter(|entry| entry.category.as_deref() == Some(category))
            .map(|entry| entry.id)
            .collect())
    }

    /// The single most urgent issue, left in the queue
    pub fn get_most_urgent(&self) -> IndexResult<Option<IssueRecord>> {
        let snapshot = self.fresh_snapshot()?;
        if snapshot.urgent_heap.is_empty() {
            return Ok(None);
        }
        let id = snapshot.urgent_heap.peek()?.id;
        self.resolve(id)
    }

    /// Takes the most urgent issue, marks it In Progress in the store, and
    /// rebuilds both structures.
    ///
    /// Returns the record as stored after the change, or `None` if the queue
    /// is empty or the record has left the store. If the store changed but
    /// the rebuild failed, the error is returned and the index is left stale
    /// so the next read rebuilds.
    pub fn process_most_urgent(&self) -> IndexResult<Option<IssueRecord>> {
        let _guard = self.lock_writer()?;

        let mut snapshot = self.snapshot()?;
        if snapshot.is_stale(self.clock.now(), self.config.staleness_threshold()) {
            self.metrics.increment_lazy_refreshes();
            snapshot = self.rebuild(IndexEvent::LazyRefresh)?;
        }
        if snapshot.urgent_heap.is_empty() {
            return Ok(None);
        }

        // Published snapshots are immutable; extract from a private copy
        let mut queue = snapshot.urgent_heap.clone();
        let entry = queue.extract_min()?;
        let id = entry.id.to_string();

        if !self.store.mark_in_progress(entry.id)? {
            Logger::warn(IndexEvent::UrgentVanished.as_str(), &[("issue", id.as_str())]);
            self.rebuild(IndexEvent::UrgentVanished)?;
            return Ok(None);
        }

        self.metrics.increment_urgent_processed();
        let priority = entry.priority.level().to_string();
        Logger::info(
            IndexEvent::UrgentProcessed.as_str(),
            &[("issue", id.as_str()), ("priority", priority.as_str())],
        );

        // The store already changed; a failed rebuild must not leave the
        // old queue looking fresh
        if let Err(e) = self.rebuild(IndexEvent::UrgentProcessed) {
            self.publish(Arc::new(snapshot.invalidated()))?;
            return Err(e);
        }

        Ok(self.store.fetch(entry.id)?)
    }

    /// Rebuilds both structures from the store now
    pub fn force_refresh(&self) -> IndexResult<()> {
        let _guard = self.lock_writer()?;
        self.metrics.increment_forced_refreshes();
        self.rebuild(IndexEvent::ForcedRefresh)?;
        Ok(())
    }

    /// Rebuilds if the index was never built or has passed the staleness
    /// threshold
    pub fn refresh_if_needed(&self) -> IndexResult<()> {
        self.fresh_snapshot().map(|_| ())
    }

    /// Tree and heap shape of the current snapshot
    pub fn get_statistics(&self) -> IndexResult<IndexStatistics> {
        let snapshot = self.fresh_snapshot()?;
        Ok(IndexStatistics::from_snapshot(&snapshot))
    }

    /// When the published snapshot was built, without triggering a rebuild
    pub fn last_refresh(&self) -> IndexResult<Option<DateTime<Utc>>> {
        Ok(self.snapshot()?.refreshed_at)
    }

    fn resolve(&self, id: IssueId) -> IndexResult<Option<IssueRecord>> {
        let record = self.store.fetch(id)?;
        if record.is_none() {
            self.metrics.increment_resolve_misses();
            let id = id.to_string();
            Logger::warn(IndexEvent::ResolveMiss.as_str(), &[("issue", id.as_str())]);
        }
        Ok(record)
    }

    fn lock_writer(&self) -> IndexResult<MutexGuard<'_, ()>> {
        self.writer.lock().map_err(|_| IndexError::LockPoisoned("writer"))
    }

    fn snapshot(&self) -> IndexResult<Arc<IndexSnapshot>> {
        let current = self.current.read().map_err(|_| IndexError::LockPoisoned("snapshot"))?;
        Ok(Arc::clone(&current))
    }

    fn publish(&self, snapshot: Arc<IndexSnapshot>) -> IndexResult<()> {
        let mut current = self.current.write().map_err(|_| IndexError::LockPoisoned("snapshot"))?;
        *current = snapshot;
        Ok(())
    }

    /// The published snapshot, rebuilt first if stale
    fn fresh_snapshot(&self) -> IndexResult<Arc<IndexSnapshot>> {
        let threshold = self.config.staleness_threshold();
        let snapshot = self.snapshot()?;
        if !snapshot.is_stale(self.clock.now(), threshold) {
            return Ok(snapshot);
        }

        let _guard = self.lock_writer()?;
        // Another reader may have rebuilt while we waited
        let snapshot = self.snapshot()?;
        if !snapshot.is_stale(self.clock.now(), threshold) {
            return Ok(snapshot);
        }

        self.metrics.increment_lazy_refreshes();
        self.rebuild(IndexEvent::LazyRefresh)
    }

    /// Reads the store, builds a new snapshot and publishes it.
    ///
    /// Caller must hold the writer lock. On a store failure the previous
    /// snapshot stays published.
    fn rebuild(&self, trigger: IndexEvent) -> IndexResult<Arc<IndexSnapshot>> {
        let scope = ObservationScope::begin(IndexEvent::Refresh, &[("trigger", trigger.as_str())]);

        let records = match self.store.load_all() {
            Ok(records) => records,
            Err(e) => {
                self.metrics.increment_refresh_failures();
                scope.fail(&e.to_string());
                return Err(e.into());
            }
        };

        let generation = self.snapshot()?.generation + 1;
        let built = IndexSnapshot::build(&records, &self.config, self.clock.now(), generation);
        let snapshot = Arc::new(built);
        self.publish(Arc::clone(&snapshot))?;
        self.metrics.increment_refreshes();

        let issues = snapshot.search_tree.len().to_string();
        let queued = snapshot.urgent_heap.len().to_string();
        let height = snapshot.search_tree.height().to_string();
        let generation = generation.to_string();
        scope.complete(&[
            ("trigger", trigger.as_str()),
            ("issues", issues.as_str()),
            ("queued", queued.as_str()),
            ("height", height.as_str()),
            ("generation", generation.as_str()),
        ]);

        Ok(snapshot)
    }
}
