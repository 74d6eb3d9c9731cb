//! File-backed store and full-pipeline persistence tests

use fight_tablebase::core::config::EngineConfig;
use fight_tablebase::moves::registry::MoveRegistry;
use fight_tablebase::store::{JsonFileStore, TablebaseStore};
use fight_tablebase::{Engine, FightSimulator, Position, TreeExplorer};

#[test]
fn test_file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tablebase.json");
    let engine = Engine::standard().unwrap();

    let before = {
        let store = JsonFileStore::open(&path).unwrap();
        let explorer = TreeExplorer::new(&engine, &store);
        explorer.seed_root(&Position::opening()).unwrap();
        explorer.run(2, 32).unwrap();
        store.flush().unwrap();
        store.stats().unwrap()
    };
    assert!(path.exists());
    assert!(before.transitions > 0);

    let reopened = JsonFileStore::open(&path).unwrap();
    assert_eq!(reopened.stats().unwrap(), before);
}

#[test]
fn test_expansion_resumes_from_stored_frontier() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resume.json");
    let engine = Engine::standard().unwrap();

    {
        let store = JsonFileStore::open(&path).unwrap();
        let explorer = TreeExplorer::new(&engine, &store);
        explorer.seed_root(&Position::opening()).unwrap();
        explorer.expand_batch(1).unwrap();
        store.flush().unwrap();
    }

    let store = JsonFileStore::open(&path).unwrap();
    let explorer = TreeExplorer::new(&engine, &store);
    let frontier = store.frontier(usize::MAX).unwrap();
    assert!(!frontier.is_empty());
    assert!(frontier.iter().all(|node| node.depth == 1));

    let report = explorer.expand_batch(4).unwrap();
    assert_eq!(report.depth, Some(1));
    assert_eq!(report.failed, 0);
}

#[test]
fn test_recommitting_a_leaf_changes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::open(dir.path().join("idempotent.json")).unwrap();
    let engine = Engine::standard().unwrap();
    let explorer = TreeExplorer::new(&engine, &store);

    let root = explorer.seed_root(&Position::opening()).unwrap();
    let node = store.node(&root).unwrap().unwrap();
    let expansion = explorer.expand_leaf(&node).unwrap();

    let first = store.commit(expansion.clone()).unwrap();
    let stats = store.stats().unwrap();
    let second = store.commit(expansion).unwrap();

    assert!(first.new_nodes > 0);
    assert_eq!(second.new_nodes, 0);
    assert_eq!(second.new_transitions, 0);
    assert_eq!(store.stats().unwrap(), stats);
}

#[test]
fn test_fights_are_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fights.json");
    let mut config = EngineConfig::default();
    config.terminal.depth_ceiling = 24;
    let engine = Engine::new(MoveRegistry::standard().unwrap(), config).unwrap();

    {
        let store = JsonFileStore::open(&path).unwrap();
        FightSimulator::new(&engine, &store)
            .run_many(&[7, 8, 9])
            .unwrap();
        store.flush().unwrap();
    }

    let stats = JsonFileStore::open(&path).unwrap().stats().unwrap();
    assert_eq!(stats.fights, 3);
}

#[test]
fn test_corrupt_store_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("corrupt.json");
    std::fs::write(&path, "{ not json").unwrap();
    assert!(JsonFileStore::open(&path).is_err());
}
