//! In-memory tablebase store
//!
//! Tables live behind one `RwLock`; a leaf commit takes the write lock once,
//! so readers never observe half a leaf.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::core::error::{FightError, Result};
use crate::position::PositionHash;
use crate::store::{CommitSummary, StoreStats, TablebaseStore};
use crate::tree::records::{
    FightRecord, LeafExpansion, NoMovesIncident, PathDamage, PathKey, Transition, TransitionKey,
    TreeNode,
};

/// Flat, ordered copy of every table; the on-disk format of the file store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub nodes: Vec<TreeNode>,
    pub transitions: Vec<Transition>,
    pub paths: Vec<PathDamage>,
    pub incidents: Vec<NoMovesIncident>,
    pub fights: Vec<FightRecord>,
}

#[derive(Debug, Default)]
struct Tables {
    nodes: AHashMap<PositionHash, TreeNode>,
    transitions: AHashMap<TransitionKey, Transition>,
    outgoing: AHashMap<PositionHash, Vec<TransitionKey>>,
    paths: AHashMap<PathKey, PathDamage>,
    incoming: AHashMap<PositionHash, Vec<PathKey>>,
    incidents: Vec<NoMovesIncident>,
    fights: Vec<FightRecord>,
}

impl Tables {
    fn insert_node(&mut self, node: TreeNode) -> bool {
        if self.nodes.contains_key(&node.hash) {
            return false;
        }
        self.nodes.insert(node.hash.clone(), node);
        true
    }

    fn insert_transition(&mut self, transition: Transition) -> bool {
        let key = transition.key();
        if self.transitions.contains_key(&key) {
            return false;
        }
        self.outgoing
            .entry(transition.from.clone())
            .or_default()
            .push(key.clone());
        self.transitions.insert(key, transition);
        true
    }

    fn insert_path(&mut self, path: PathDamage) -> bool {
        let key = path.key();
        if let Some(stored) = self.paths.get_mut(&key) {
            if path.preference(stored) == Ordering::Less {
                *stored = path;
            }
            return false;
        }
        self.incoming
            .entry(path.to.clone())
            .or_default()
            .push(key.clone());
        self.paths.insert(key, path);
        true
    }

    fn node_mut(&mut self, hash: &PositionHash) -> Result<&mut TreeNode> {
        self.nodes.get_mut(hash).ok_or_else(|| FightError::MalformedRecord {
            hash: hash.to_string(),
            reason: "node is not stored".into(),
        })
    }

    fn snapshot(&self) -> Snapshot {
        let mut nodes: Vec<TreeNode> = self.nodes.values().cloned().collect();
        nodes.sort_by(|a, b| a.hash.cmp(&b.hash));

        let mut transitions: Vec<(&TransitionKey, &Transition)> = self.transitions.iter().collect();
        transitions.sort_by(|a, b| a.0.cmp(b.0));

        let mut paths: Vec<(&PathKey, &PathDamage)> = self.paths.iter().collect();
        paths.sort_by(|a, b| a.0.cmp(b.0));

        Snapshot {
            nodes,
            transitions: transitions.into_iter().map(|(_, t)| t.clone()).collect(),
            paths: paths.into_iter().map(|(_, p)| p.clone()).collect(),
            incidents: self.incidents.clone(),
            fights: self.fights.clone(),
        }
    }

    fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut tables = Tables::default();
        for node in snapshot.nodes {
            tables.insert_node(node);
        }
        for transition in snapshot.transitions {
            tables.insert_transition(transition);
        }
        for path in snapshot.paths {
            tables.insert_path(path);
        }
        tables.incidents = snapshot.incidents;
        tables.fights = snapshot.fights;
        tables
    }
}

/// Thread-safe in-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            tables: RwLock::new(Tables::from_snapshot(snapshot)),
        }
    }

    pub fn snapshot(&self) -> Result<Snapshot> {
        Ok(self.read()?.snapshot())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| FightError::Store("table lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| FightError::Store("table lock poisoned".into()))
    }
}

impl TablebaseStore for MemoryStore {
    fn insert_node(&self, node: TreeNode) -> Result<bool> {
        Ok(self.write()?.insert_node(node))
    }

    fn node(&self, hash: &PositionHash) -> Result<Option<TreeNode>> {
        Ok(self.read()?.nodes.get(hash).cloned())
    }

    fn insert_transition(&self, transition: Transition) -> Result<bool> {
        Ok(self.write()?.insert_transition(transition))
    }

    fn transitions_from(&self, hash: &PositionHash) -> Result<Vec<Transition>> {
        let tables = self.read()?;
        let keys = tables.outgoing.get(hash).map(Vec::as_slice).unwrap_or(&[]);
        Ok(keys
            .iter()
            .filter_map(|key| tables.transitions.get(key).cloned())
            .collect())
    }

    fn insert_path(&self, path: PathDamage) -> Result<bool> {
        Ok(self.write()?.insert_path(path))
    }

    fn paths_into(&self, hash: &PositionHash) -> Result<Vec<PathDamage>> {
        let tables = self.read()?;
        let keys = tables.incoming.get(hash).map(Vec::as_slice).unwrap_or(&[]);
        Ok(keys
            .iter()
            .filter_map(|key| tables.paths.get(key).cloned())
            .collect())
    }

    fn frontier(&self, limit: usize) -> Result<Vec<TreeNode>> {
        let tables = self.read()?;
        let open: Vec<&TreeNode> = tables.nodes.values().filter(|n| n.is_frontier()).collect();
        let Some(depth) = open.iter().map(|n| n.depth).min() else {
            return Ok(Vec::new());
        };

        let mut batch: Vec<TreeNode> = open
            .into_iter()
            .filter(|n| n.depth == depth)
            .cloned()
            .collect();
        batch.sort_by(|a, b| a.hash.cmp(&b.hash));
        batch.truncate(limit);
        Ok(batch)
    }

    fn commit(&self, expansion: LeafExpansion) -> Result<CommitSummary> {
        let mut tables = self.write()?;
        // Validate the parent before writing anything so a bad leaf leaves no trace
        tables.node_mut(&expansion.parent)?;

        let mut summary = CommitSummary::default();
        for child in expansion.children {
            summary.new_nodes += tables.insert_node(child) as usize;
        }
        for transition in expansion.transitions {
            summary.new_transitions += tables.insert_transition(transition) as usize;
        }
        for path in expansion.paths {
            summary.new_paths += tables.insert_path(path) as usize;
        }

        let parent = tables.node_mut(&expansion.parent)?;
        match expansion.verdict {
            Some(verdict) => parent.settle(verdict),
            None => parent.expanded = true,
        }
        Ok(summary)
    }

    fn mark_failed(&self, hash: &PositionHash, reason: &str) -> Result<()> {
        let mut tables = self.write()?;
        tables.node_mut(hash)?.failure = Some(reason.to_string());
        Ok(())
    }

    fn record_incident(&self, incident: NoMovesIncident) -> Result<()> {
        self.write()?.incidents.push(incident);
        Ok(())
    }

    fn incidents(&self) -> Result<Vec<NoMovesIncident>> {
        Ok(self.read()?.incidents.clone())
    }

    fn record_fight(&self, record: FightRecord) -> Result<()> {
        self.write()?.fights.push(record);
        Ok(())
    }

    fn stats(&self) -> Result<StoreStats> {
        let tables = self.read()?;
        let mut stats = StoreStats {
            nodes: tables.nodes.len(),
            transitions: tables.transitions.len(),
            paths: tables.paths.len(),
            no_move_incidents: tables.incidents.len(),
            fights: tables.fights.len(),
            ..Default::default()
        };

        for node in tables.nodes.values() {
            stats.expanded_nodes += node.expanded as usize;
            stats.failed_nodes += node.failure.is_some() as usize;
            if node.terminal {
                stats.terminal_nodes += 1;
                match node.winner {
                    Some(side) => stats.wins[side] += 1,
                    None => stats.draws += 1,
                }
            }
        }
        stats.terminal_paths = tables.paths.values().filter(|p| p.is_terminal()).count();

        for fight in &tables.fights {
            match fight.verdict.winner {
                Some(side) => stats.fight_wins[side] += 1,
                None => stats.fight_draws += 1,
            }
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::ledger::DamageLedger;
    use crate::combat::terminal::{TerminalReason, Verdict};
    use crate::core::types::Side;
    use crate::moves::definition::MoveId;
    use crate::position::Position;

    fn hashes() -> (PositionHash, PositionHash) {
        let root = Position::opening();
        let mut child = root.clone();
        child.move_count = 1;
        (root.hash(), child.hash())
    }

    fn transition(from: &PositionHash, to: &PositionHash) -> Transition {
        Transition {
            from: from.clone(),
            to: to.clone(),
            move_id: MoveId::new("jab"),
            side: Side::A,
            hit: true,
            force: 2.0,
            damage: 0.04,
            zones: Vec::new(),
        }
    }

    #[test]
    fn test_duplicate_node_is_a_no_op() {
        let store = MemoryStore::new();
        let (root, _) = hashes();
        assert!(store.insert_node(TreeNode::open(root.clone(), "a".into(), 0)).unwrap());
        assert!(!store.insert_node(TreeNode::open(root.clone(), "b".into(), 0)).unwrap());

        assert_eq!(store.stats().unwrap().nodes, 1);
        assert_eq!(store.node(&root).unwrap().unwrap().position, "a");
    }

    #[test]
    fn test_duplicate_transition_is_a_no_op() {
        let store = MemoryStore::new();
        let (root, child) = hashes();
        assert!(store.insert_transition(transition(&root, &child)).unwrap());
        assert!(!store.insert_transition(transition(&root, &child)).unwrap());
        assert_eq!(store.stats().unwrap().transitions, 1);
        assert_eq!(store.transitions_from(&root).unwrap().len(), 1);
    }

    #[test]
    fn test_colliding_paths_keep_the_preferred_ledger() {
        let (root, child) = hashes();
        let path = |damage: f32, fatigue: f32, verdict: Option<Verdict>| {
            let mut ledger = DamageLedger::fresh();
            ledger.overlays.b.damage = damage;
            ledger.overlays.a.fatigue = fatigue;
            PathDamage {
                to: child.clone(),
                from: root.clone(),
                ledger,
                verdict,
            }
        };
        let guarded = path(0.1, 0.02, None);
        let tired = path(0.1, 0.05, None);
        let hurt = path(0.3, 0.0, None);
        let finished = path(0.0, 0.0, Some(Verdict::new(TerminalReason::CriticalHit, Some(Side::A))));

        for order in [
            [&hurt, &tired, &guarded, &finished],
            [&guarded, &finished, &hurt, &tired],
        ] {
            let store = MemoryStore::new();
            let fresh: Vec<bool> = order
                .iter()
                .map(|p| store.insert_path((*p).clone()).unwrap())
                .collect();
            assert_eq!(fresh, vec![true, false, false, false]);

            let paths = store.paths_into(&child).unwrap();
            assert_eq!(paths, vec![guarded.clone()]);
            assert_eq!(store.stats().unwrap().paths, 1);
        }
    }

    #[test]
    fn test_frontier_takes_shallowest_depth_only() {
        let store = MemoryStore::new();
        let (root, child) = hashes();
        store.insert_node(TreeNode::open(root.clone(), String::new(), 0)).unwrap();
        store.insert_node(TreeNode::open(child, String::new(), 1)).unwrap();

        let frontier = store.frontier(10).unwrap();
        assert_eq!(frontier.len(), 1);
        assert_eq!(frontier[0].hash, root);
    }

    #[test]
    fn test_commit_is_idempotent() {
        let store = MemoryStore::new();
        let (root, child) = hashes();
        store.insert_node(TreeNode::open(root.clone(), String::new(), 0)).unwrap();

        let mut expansion = LeafExpansion::new(root.clone());
        expansion.children.push(TreeNode::open(child.clone(), String::new(), 1));
        expansion.transitions.push(transition(&root, &child));
        expansion.paths.push(PathDamage {
            to: child.clone(),
            from: root.clone(),
            ledger: DamageLedger::fresh(),
            verdict: None,
        });

        let first = store.commit(expansion.clone()).unwrap();
        let second = store.commit(expansion).unwrap();

        assert_eq!(first.new_nodes, 1);
        assert_eq!(second, CommitSummary::default());
        assert!(store.node(&root).unwrap().unwrap().expanded);
        assert_eq!(store.paths_into(&child).unwrap().len(), 1);
    }

    #[test]
    fn test_commit_unknown_parent_writes_nothing() {
        let store = MemoryStore::new();
        let (root, child) = hashes();
        let mut expansion = LeafExpansion::new(root);
        expansion.children.push(TreeNode::open(child, String::new(), 1));

        assert!(matches!(
            store.commit(expansion),
            Err(FightError::MalformedRecord { .. })
        ));
        assert_eq!(store.stats().unwrap().nodes, 0);
    }

    #[test]
    fn test_stats_count_winners() {
        let store = MemoryStore::new();
        let (root, child) = hashes();
        let fallen = Verdict::new(TerminalReason::Fallen, Some(Side::B));
        store
            .insert_node(TreeNode::settled(root, String::new(), 0, fallen))
            .unwrap();
        store
            .insert_node(TreeNode::settled(
                child,
                String::new(),
                1,
                Verdict::new(TerminalReason::Stalemate, None),
            ))
            .unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.terminal_nodes, 2);
        assert_eq!(stats.wins[Side::B], 1);
        assert_eq!(stats.draws, 1);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let store = MemoryStore::new();
        let (root, child) = hashes();
        store.insert_node(TreeNode::open(root.clone(), String::new(), 0)).unwrap();
        store.insert_transition(transition(&root, &child)).unwrap();

        let restored = MemoryStore::from_snapshot(store.snapshot().unwrap());
        assert_eq!(restored.stats().unwrap(), store.stats().unwrap());
        assert_eq!(restored.transitions_from(&root).unwrap().len(), 1);
    }
}
