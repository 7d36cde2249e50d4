//! Detached background tasks
//!
//! Work handed to a [`TaskSpawner`] is never joined by the request that
//! scheduled it and its outcome never reaches that request.

use futures::future::BoxFuture;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Executor for fire-and-forget work
pub trait TaskSpawner: Send + Sync {
    /// Schedule a task. Must return without waiting for it.
    fn spawn(&self, task: BoxFuture<'static, ()>);
}

/// Spawns tasks onto the ambient tokio runtime
#[derive(Clone, Default)]
pub struct TokioSpawner {
    spawned: Arc<AtomicU64>,
}

impl TokioSpawner {
    /// Create a new spawner
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks scheduled so far
    pub fn spawned(&self) -> u64 {
        self.spawned.load(Ordering::Relaxed)
    }
}

impl TaskSpawner for TokioSpawner {
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        self.spawned.fetch_add(1, Ordering::Relaxed);
        tokio::spawn(task);
    }
}
