//! Integration test: assignments survive a process restart.
//!
//! Allocates against one allocator, saves, then rebuilds a fresh allocator
//! over the same files and asserts every token resolves to the same record,
//! credentials included.

use std::fs;

use anyhow::Result;
use stickyproxy::{AllocatorConfig, ProxyAllocator, ProxyError};
use tempfile::tempdir;

const POOL: &str = "\
10.0.0.1:8080\n\
10.0.0.2:8080:alice:s3cret\n\
10.0.0.3:1080\n";

#[test]
fn assignments_survive_restart() -> Result<()> {
    let dir = tempdir()?;
    let pool_path = dir.path().join("proxies.txt");
    fs::write(&pool_path, POOL)?;
    let config = AllocatorConfig::new(&pool_path, dir.path().join("assignments.json"));

    let tokens = ["session-a", "session-b", "session-c"];
    let mut originals = Vec::new();
    {
        let allocator = ProxyAllocator::new(config.clone())?;
        allocator.load()?;
        for token in tokens {
            originals.push(allocator.get_proxy(token)?);
        }
        allocator.save()?;
    }

    let restarted = ProxyAllocator::new(config)?;
    restarted.load()?;
    assert_eq!(restarted.assignment_count(), tokens.len());
    for (token, original) in tokens.iter().zip(&originals) {
        let restored = restarted.get_proxy(token)?;
        assert_eq!(&restored, original, "token {} changed records", token);
        assert_eq!(restored.auth().is_some(), original.auth().is_some());
    }
    Ok(())
}

#[test]
fn restored_assignments_still_block_collisions() {
    let dir = tempdir().unwrap();
    let pool_path = dir.path().join("proxies.txt");
    fs::write(&pool_path, "10.0.0.1:8080\n").unwrap();
    let config = AllocatorConfig::new(&pool_path, dir.path().join("assignments.json"));

    {
        let allocator = ProxyAllocator::new(config.clone()).unwrap();
        allocator.get_proxy("holder").unwrap();
        allocator.save().unwrap();
    }

    let restarted = ProxyAllocator::new(config).unwrap();
    restarted.load().unwrap();
    assert!(matches!(
        restarted.get_proxy("newcomer").unwrap_err(),
        ProxyError::PoolExhausted { .. }
    ));
}

#[test]
fn clear_resets_disk_and_memory_together() {
    let dir = tempdir().unwrap();
    let pool_path = dir.path().join("proxies.txt");
    fs::write(&pool_path, "10.0.0.1:8080\n10.0.0.2:8080\n").unwrap();
    let config = AllocatorConfig::new(&pool_path, dir.path().join("assignments.json"));

    let allocator = ProxyAllocator::new(config.clone()).unwrap();
    allocator.get_proxy("a").unwrap();
    allocator.get_proxy("b").unwrap();
    allocator.save().unwrap();

    allocator.clear().unwrap();
    assert_eq!(allocator.assignment_count(), 0);

    let restarted = ProxyAllocator::new(config).unwrap();
    restarted.load().unwrap();
    assert_eq!(restarted.assignment_count(), 0);
}
