//! Progress reporting and cooperative cancellation for task runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::priority::TaskPriority;

// ============================================================================
// Progress Types
// ============================================================================

/// Progress callback type for task runs
pub type TaskProgressCallback<'a> = &'a (dyn Fn(&TaskProgress) + Sync + Send);

/// Progress information while draining the task queue
#[derive(Debug, Clone)]
pub struct TaskProgress {
    /// Priority bucket being drained
    pub priority: TaskPriority,
    /// Current task number within the bucket (1-indexed)
    pub current: usize,
    /// Number of tasks in the bucket
    pub total: usize,
    /// Human-readable description of the current task
    pub label: Option<String>,
}

impl TaskProgress {
    /// Create a new progress update
    #[must_use]
    pub fn new(priority: TaskPriority, current: usize, total: usize) -> Self {
        Self {
            priority,
            current,
            total,
            label: None,
        }
    }

    /// Create a progress update with a task label
    #[must_use]
    pub fn with_label(
        priority: TaskPriority,
        current: usize,
        total: usize,
        label: impl Into<String>,
    ) -> Self {
        Self {
            priority,
            current,
            total,
            label: Some(label.into()),
        }
    }

    /// Get the progress percentage (0.0 - 1.0)
    #[must_use]
    pub fn percentage(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            self.current as f32 / self.total as f32
        }
    }
}

// ============================================================================
// Cancellation
// ============================================================================

/// Shared cancellation flag, checked between tasks.
///
/// Clones observe the same flag, so a UI thread can hold one while the export
/// runs with another.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Takes effect before the next task starts.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
