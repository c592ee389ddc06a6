// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared helpers for integration tests: Docker detection and stub stores.

#![allow(dead_code)]

use async_trait::async_trait;
use guildcfg::domain::{ConfigPatch, GuildConfig, GuildId, Result, StoreError};
use guildcfg::ports::DurableStore;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

/// Cached result of Docker availability check.
static DOCKER_AVAILABLE: OnceLock<bool> = OnceLock::new();

/// Checks if Docker is available on the system.
///
/// This check is cached after the first call.
pub fn is_docker_available() -> bool {
    *DOCKER_AVAILABLE.get_or_init(|| {
        // Try to run `docker ps` command
        std::process::Command::new("docker")
            .args(["ps"])
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
    })
}

/// Prints a warning message that a test is skipped due to Docker being unavailable.
pub fn print_docker_unavailable_warning(test_name: &str) {
    eprintln!("\n⚠️  SKIPPED: {} - Docker is not available", test_name);
    eprintln!("   To run this test, ensure Docker is installed and running.");
    eprintln!("   Installation: https://docs.docker.com/get-docker/\n");
}

/// Routes `tracing` output to the test harness so failing tests show service logs.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// A durable store that errors on every call and counts how often it was hit.
///
/// Used to prove a code path never touches the durable store.
#[derive(Debug, Default)]
pub struct PoisonedStore {
    loads: AtomicUsize,
    upserts: AtomicUsize,
}

impl PoisonedStore {
    /// Number of `load` calls so far.
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Number of `upsert` calls so far.
    pub fn upserts(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    fn error(op: &str) -> StoreError {
        StoreError::DurableStoreError {
            backend: "poisoned".to_string(),
            message: format!("{} must not be called", op),
            source: None,
        }
    }
}

#[async_trait]
impl DurableStore for PoisonedStore {
    fn name(&self) -> &str {
        "poisoned"
    }

    async fn load(&self, _guild_id: GuildId) -> Result<Option<GuildConfig>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Err(Self::error("load"))
    }

    async fn upsert(&self, _guild_id: GuildId, _patch: &ConfigPatch) -> Result<GuildConfig> {
        self.upserts.fetch_add(1, Ordering::SeqCst);
        Err(Self::error("upsert"))
    }
}
