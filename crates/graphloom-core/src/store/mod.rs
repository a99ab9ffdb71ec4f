//! Persisted knowledge-base store
//!
//! One Turtle file per knowledge base. A merge reads the file (a missing
//! file is the empty graph), unions in the new content and rewrites the
//! file wholesale through a temporary sibling plus rename, so a failed
//! write never corrupts the previous state. The whole read-modify-write
//! runs under a store-level mutex: concurrent runs merging into the same
//! base cannot silently drop each other's contribution.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::graph::{GraphStats, MergeReport, TripleGraph, merge, turtle};

/// File-backed store holding one serialized graph
#[derive(Debug)]
pub struct GraphStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl GraphStore {
    /// Open a store at the given path
    ///
    /// The `.ttl` extension is added when the path has none. No I/O
    /// happens until the first load or save.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let mut path = path.into();
        if path.extension().is_none() {
            path.set_extension("ttl");
        }
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    /// The store's file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted graph; a missing file yields the empty graph
    pub fn load(&self) -> Result<TripleGraph> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "No persisted graph yet, starting empty");
            return Ok(TripleGraph::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        turtle::parse(&contents)
    }

    /// Overwrite the persisted graph atomically
    pub fn save(&self, graph: &TripleGraph) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| Error::Store("store lock poisoned".to_string()))?;
        self.save_locked(graph)
    }

    /// Merge `incoming` into the persisted graph and rewrite it
    ///
    /// Load, merge and store happen under one lock so the sequence is
    /// effectively atomic with respect to other users of this store.
    pub fn merge_and_save(&self, incoming: &TripleGraph) -> Result<(TripleGraph, MergeReport)> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| Error::Store("store lock poisoned".to_string()))?;

        let base = self.load()?;
        let (merged, report) = merge(&base, incoming);
        self.save_locked(&merged)?;

        info!(
            path = %self.path.display(),
            base = report.base_size,
            merged = report.merged_size,
            "Knowledge base updated"
        );
        Ok((merged, report))
    }

    /// Statistics for the persisted graph
    pub fn stats(&self) -> Result<GraphStats> {
        Ok(self.load()?.stats())
    }

    fn save_locked(&self, graph: &TripleGraph) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("ttl.tmp");
        fs::write(&tmp, turtle::serialize(graph))?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
