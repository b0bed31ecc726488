//! SnapshotScheduler Tests
//!
//! Tests verify:
//! - Periodic ticks reach the store actor and produce snapshot files
//! - Redundant ticks while clean are no-ops
//! - Stop halts the loop: no snapshot requests after acknowledgement

use std::path::Path;
use std::time::{Duration, Instant};

use epochkv::{SnapshotScheduler, SnapshotStore, StoreActor};
use tempfile::TempDir;

const GET_TIMEOUT: Duration = Duration::from_secs(1);
const TICK: Duration = Duration::from_millis(50);

fn snapshot_count(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy().into_owned();
            name.starts_with("state_") && name.ends_with(".json")
        })
        .count()
}

fn wait_for_snapshots(dir: &Path, expected: usize, timeout: Duration) {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if snapshot_count(dir) >= expected {
            return;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    panic!(
        "expected {} snapshot files, found {}",
        expected,
        snapshot_count(dir)
    );
}

// =============================================================================
// Periodic Trigger Tests
// =============================================================================

#[test]
fn test_scheduler_triggers_snapshot_of_dirty_index() {
    let dir = TempDir::new().unwrap();
    let snapshots = SnapshotStore::open(dir.path()).unwrap();
    let (handle, running_store) = StoreActor::new(snapshots).start(GET_TIMEOUT).unwrap();

    handle.put("k", "v", 1).unwrap();
    let running_scheduler = SnapshotScheduler::new(handle.clone(), TICK).start().unwrap();

    wait_for_snapshots(dir.path(), 1, Duration::from_secs(5));

    running_scheduler.stop().unwrap();
    running_store.stop().unwrap();
}

#[test]
fn test_clean_ticks_write_nothing() {
    let dir = TempDir::new().unwrap();
    let snapshots = SnapshotStore::open(dir.path()).unwrap();
    let (handle, running_store) = StoreActor::new(snapshots).start(GET_TIMEOUT).unwrap();

    // No puts: many ticks pass, no snapshots appear.
    let running_scheduler = SnapshotScheduler::new(handle.clone(), TICK).start().unwrap();
    std::thread::sleep(TICK * 6);

    assert_eq!(snapshot_count(dir.path()), 0);

    running_scheduler.stop().unwrap();
    running_store.stop().unwrap();
}

// =============================================================================
// Shutdown Tests
// =============================================================================

#[test]
fn test_no_snapshot_requests_after_stop() {
    let dir = TempDir::new().unwrap();
    let snapshots = SnapshotStore::open(dir.path()).unwrap();
    let (handle, running_store) = StoreActor::new(snapshots).start(GET_TIMEOUT).unwrap();

    handle.put("k", "v1", 1).unwrap();
    let running_scheduler = SnapshotScheduler::new(handle.clone(), TICK).start().unwrap();
    wait_for_snapshots(dir.path(), 1, Duration::from_secs(5));

    running_scheduler.stop().unwrap();

    // Re-dirty the index after the scheduler stopped. With nobody left to
    // request snapshots, no further files may appear.
    handle.put("k", "v2", 2).unwrap();
    let count = snapshot_count(dir.path());
    std::thread::sleep(TICK * 6);
    assert_eq!(snapshot_count(dir.path()), count);

    running_store.stop().unwrap();
}

#[test]
fn test_scheduler_exits_when_actor_is_gone() {
    let dir = TempDir::new().unwrap();
    let snapshots = SnapshotStore::open(dir.path()).unwrap();
    let (handle, running_store) = StoreActor::new(snapshots).start(GET_TIMEOUT).unwrap();

    let running_scheduler = SnapshotScheduler::new(handle, TICK).start().unwrap();
    running_store.stop().unwrap();

    // The next tick's failed send makes the loop exit on its own; stop must
    // still return cleanly.
    std::thread::sleep(TICK * 3);
    running_scheduler.stop().unwrap();
}
