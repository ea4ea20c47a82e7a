//! Editing session: versioned snapshot replacement with undo and a
//! per-snapshot analysis cache.
//!
//! Readers clone the current `Arc<GraphSnapshot>` and never block writers
//! for longer than the pointer swap. Writers are serialised by the history
//! mutex; a new snapshot is built and validated in full before it is
//! installed, so readers never observe a half-edited graph.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use dagscope_core::errors::{AnalysisError, GraphError};
use dagscope_core::models::{AnalysisQuery, AnalysisReport, GraphDescription, ValidationReport, VariableRole};
use dagscope_core::traits::CancellationToken;
use dagscope_core::DagScopeConfig;
use moka::sync::Cache;
use tracing::{debug, info, info_span, warn};

use crate::analysis;
use crate::graph::dag_enforcement::would_create_cycle;
use crate::graph::{build_validated, IndexedDag, Validated};

/// One immutable, validated graph version.
#[derive(Debug, Clone)]
pub struct GraphSnapshot {
    pub version: u64,
    pub created_at: DateTime<Utc>,
    /// blake3 digest of the canonical description.
    pub fingerprint: String,
    pub graph: IndexedDag,
    pub validation: ValidationReport,
}

impl GraphSnapshot {
    fn new(version: u64, validated: Validated) -> Self {
        Self {
            version,
            created_at: Utc::now(),
            fingerprint: validated.graph.fingerprint(),
            graph: validated.graph,
            validation: validated.report,
        }
    }
}

/// Result of an edit: both snapshots plus what changed.
#[derive(Debug, Clone)]
pub struct EditOutcome {
    pub before: Arc<GraphSnapshot>,
    pub after: Arc<GraphSnapshot>,
    pub edges_removed: usize,
    pub validation: ValidationReport,
}

/// Reports also carry snapshot-specific repair warnings, so equal content
/// at a different version is a different key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    version: u64,
    fingerprint: String,
    query: AnalysisQuery,
}

pub struct DagSession {
    current: RwLock<Arc<GraphSnapshot>>,
    history: Mutex<VecDeque<Arc<GraphSnapshot>>>,
    cache: Cache<CacheKey, Arc<AnalysisReport>>,
    config: DagScopeConfig,
    next_version: AtomicU64,
}

impl DagSession {
    /// Start with an empty graph at version 0.
    pub fn new(config: DagScopeConfig) -> Self {
        let empty = Validated {
            graph: IndexedDag::new(),
            report: ValidationReport {
                valid: true,
                ..ValidationReport::default()
            },
        };
        let cache = Cache::builder()
            .max_capacity(config.session.cache_capacity)
            .build();
        Self {
            current: RwLock::new(Arc::new(GraphSnapshot::new(0, empty))),
            history: Mutex::new(VecDeque::new()),
            cache,
            config,
            next_version: AtomicU64::new(1),
        }
    }

    pub fn from_description(
        desc: &GraphDescription,
        config: DagScopeConfig,
    ) -> Result<Self, GraphError> {
        let session = Self::new(config);
        session.load(desc)?;
        Ok(session)
    }

    pub fn config(&self) -> &DagScopeConfig {
        &self.config
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Arc<GraphSnapshot> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn export(&self) -> GraphDescription {
        self.snapshot().graph.to_description()
    }

    /// Snapshots available to `undo`.
    pub fn history_len(&self) -> usize {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Replace the whole graph. Undoable like any other edit.
    pub fn load(&self, desc: &GraphDescription) -> Result<EditOutcome, GraphError> {
        self.apply("load", |_| {
            Ok((build_validated(desc)?.graph, 0))
        })
    }

    pub fn remove_node(&self, id: &str) -> Result<EditOutcome, GraphError> {
        self.apply("remove_node", |graph| {
            let removal = graph.without_node(id)?;
            Ok((removal.graph, removal.edges_removed))
        })
    }

    pub fn remove_edge(&self, from: &str, to: &str) -> Result<EditOutcome, GraphError> {
        self.apply("remove_edge", |graph| Ok((graph.without_edge(from, to)?, 1)))
    }

    /// Add `from -> to`. An edge that closes a cycle is accepted and shows
    /// up in the validation report.
    pub fn add_edge(&self, from: &str, to: &str) -> Result<EditOutcome, GraphError> {
        self.apply("add_edge", |graph| {
            let source = graph.require(from)?;
            let target = graph.require(to)?;
            if would_create_cycle(graph, source, target) {
                warn!(from, to, "edge will close a cycle");
            }
            Ok((graph.with_edge(from, to)?, 0))
        })
    }

    pub fn set_role(&self, id: &str, role: VariableRole) -> Result<EditOutcome, GraphError> {
        self.apply("set_role", |graph| Ok((graph.with_role(id, role)?, 0)))
    }

    /// Reinstall the snapshot that preceded the last edit, under a new version.
    pub fn undo(&self) -> Option<EditOutcome> {
        let _span = info_span!("dagscope.session", op = "undo").entered();
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = history.pop_back()?;
        let before = self.snapshot();

        let restored = Arc::new(GraphSnapshot {
            version: self.next_version.fetch_add(1, Ordering::SeqCst),
            created_at: Utc::now(),
            fingerprint: previous.fingerprint.clone(),
            graph: previous.graph.clone(),
            validation: previous.validation.clone(),
        });
        self.install(Arc::clone(&restored));
        info!(
            from = before.version,
            to = restored.version,
            remaining = history.len(),
            "undo applied"
        );

        Some(EditOutcome {
            validation: restored.validation.clone(),
            before,
            after: restored,
            edges_removed: 0,
        })
    }

    /// Analyse the current snapshot, serving repeated queries from cache.
    pub fn analyze(&self, query: &AnalysisQuery) -> Result<Arc<AnalysisReport>, AnalysisError> {
        self.analyze_with_token(query, &CancellationToken::new())
    }

    pub fn analyze_with_token(
        &self,
        query: &AnalysisQuery,
        token: &CancellationToken,
    ) -> Result<Arc<AnalysisReport>, AnalysisError> {
        self.analyze_snapshot(&self.snapshot(), query, token)
    }

    fn analyze_snapshot(
        &self,
        snapshot: &GraphSnapshot,
        query: &AnalysisQuery,
        token: &CancellationToken,
    ) -> Result<Arc<AnalysisReport>, AnalysisError> {
        let key = CacheKey {
            version: snapshot.version,
            fingerprint: snapshot.fingerprint.clone(),
            query: query.clone(),
        };
        if let Some(hit) = self.cache.get(&key) {
            debug!(version = snapshot.version, "analysis cache hit");
            return Ok(hit);
        }

        let report = Arc::new(analysis::analyze(
            &snapshot.graph,
            &snapshot.validation,
            query,
            &self.config.analysis,
            token,
        )?);
        // Partial results are not reused.
        if report.adjustment.timed_out || report.butterfly.incomplete {
            return Ok(report);
        }
        if self.snapshot().version == snapshot.version {
            self.cache.insert(key, Arc::clone(&report));
        } else {
            debug!(version = snapshot.version, "snapshot replaced during analysis, not cached");
        }
        Ok(report)
    }

    /// Number of cached reports, after pending cache maintenance.
    pub fn cached_reports(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    fn apply<F>(&self, op: &'static str, edit: F) -> Result<EditOutcome, GraphError>
    where
        F: FnOnce(&IndexedDag) -> Result<(IndexedDag, usize), GraphError>,
    {
        let _span = info_span!("dagscope.session", op).entered();
        let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
        let before = self.snapshot();

        let (edited, edges_removed) = edit(&before.graph)?;
        let validated = build_validated(&edited.to_description())?;
        let after = Arc::new(GraphSnapshot::new(
            self.next_version.fetch_add(1, Ordering::SeqCst),
            validated,
        ));

        history.push_back(Arc::clone(&before));
        while history.len() > self.config.session.undo_depth {
            history.pop_front();
        }
        self.install(Arc::clone(&after));

        info!(
            version = after.version,
            nodes = after.graph.node_count(),
            edges = after.graph.edge_count(),
            edges_removed,
            cycles = after.validation.cycles.len(),
            "snapshot installed"
        );
        Ok(EditOutcome {
            validation: after.validation.clone(),
            before,
            after,
            edges_removed,
        })
    }

    fn install(&self, snapshot: Arc<GraphSnapshot>) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = snapshot;
        self.cache.invalidate_all();
    }
}
