//! JSON-file backed store
//!
//! Keeps the working set in a `MemoryStore` and persists it as a single
//! snapshot document. `flush` writes a sibling temp file and renames it over
//! the target, so a crash mid-write never leaves a truncated store behind.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::error::Result;
use crate::position::PositionHash;
use crate::store::memory::{MemoryStore, Snapshot};
use crate::store::{CommitSummary, StoreStats, TablebaseStore};
use crate::tree::records::{
    FightRecord, LeafExpansion, NoMovesIncident, PathDamage, Transition, TreeNode,
};

#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    memory: MemoryStore,
}

impl JsonFileStore {
    /// Open the store at `path`, loading its snapshot when the file exists
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let memory = if path.exists() {
            let reader = BufReader::new(File::open(&path)?);
            let snapshot: Snapshot = serde_json::from_reader(reader)?;
            tracing::debug!(
                path = %path.display(),
                nodes = snapshot.nodes.len(),
                "Loaded tablebase snapshot"
            );
            MemoryStore::from_snapshot(snapshot)
        } else {
            MemoryStore::new()
        };
        Ok(Self { path, memory })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persist every table to disk
    pub fn flush(&self) -> Result<()> {
        let snapshot = self.memory.snapshot()?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let temp = self.path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(File::create(&temp)?);
            serde_json::to_writer_pretty(&mut writer, &snapshot)?;
            writer.flush()?;
        }
        fs::rename(&temp, &self.path)?;

        tracing::debug!(
            path = %self.path.display(),
            nodes = snapshot.nodes.len(),
            transitions = snapshot.transitions.len(),
            "Flushed tablebase snapshot"
        );
        Ok(())
    }
}

impl TablebaseStore for JsonFileStore {
    fn insert_node(&self, node: TreeNode) -> Result<bool> {
        self.memory.insert_node(node)
    }

    fn node(&self, hash: &PositionHash) -> Result<Option<TreeNode>> {
        self.memory.node(hash)
    }

    fn insert_transition(&self, transition: Transition) -> Result<bool> {
        self.memory.insert_transition(transition)
    }

    fn transitions_from(&self, hash: &PositionHash) -> Result<Vec<Transition>> {
        self.memory.transitions_from(hash)
    }

    fn insert_path(&self, path: PathDamage) -> Result<bool> {
        self.memory.insert_path(path)
    }

    fn paths_into(&self, hash: &PositionHash) -> Result<Vec<PathDamage>> {
        self.memory.paths_into(hash)
    }

    fn frontier(&self, limit: usize) -> Result<Vec<TreeNode>> {
        self.memory.frontier(limit)
    }

    fn commit(&self, expansion: LeafExpansion) -> Result<CommitSummary> {
        self.memory.commit(expansion)
    }

    fn mark_failed(&self, hash: &PositionHash, reason: &str) -> Result<()> {
        self.memory.mark_failed(hash, reason)
    }

    fn record_incident(&self, incident: NoMovesIncident) -> Result<()> {
        self.memory.record_incident(incident)
    }

    fn incidents(&self) -> Result<Vec<NoMovesIncident>> {
        self.memory.incidents()
    }

    fn record_fight(&self, record: FightRecord) -> Result<()> {
        self.memory.record_fight(record)
    }

    fn stats(&self) -> Result<StoreStats> {
        self.memory.stats()
    }
}
