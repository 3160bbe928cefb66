//! Priority-staged task queue.

use std::collections::VecDeque;
use std::fmt;

use super::priority::TaskPriority;
use super::progress::{CancellationToken, TaskProgress, TaskProgressCallback};
use crate::error::{Error, Result};

/// A deferred unit of construction working on a context `C`.
///
/// `complete` receives the scheduler that is running it, so follow-up work can
/// be queued at a later priority.
pub trait Task<C> {
    fn priority(&self) -> TaskPriority;

    /// Label shown in progress updates.
    fn label(&self) -> String;

    fn complete(self: Box<Self>, context: &mut C, scheduler: &mut TaskScheduler<C>) -> Result<()>;
}

/// A [`Task`] backed by a closure.
pub struct FnTask<F> {
    priority: TaskPriority,
    label: String,
    run: F,
}

impl<F> FnTask<F> {
    pub fn new(priority: TaskPriority, label: impl Into<String>, run: F) -> Self {
        Self {
            priority,
            label: label.into(),
            run,
        }
    }
}

impl<C, F> Task<C> for FnTask<F>
where
    F: FnOnce(&mut C, &mut TaskScheduler<C>) -> Result<()>,
{
    fn priority(&self) -> TaskPriority {
        self.priority
    }

    fn label(&self) -> String {
        self.label.clone()
    }

    fn complete(self: Box<Self>, context: &mut C, scheduler: &mut TaskScheduler<C>) -> Result<()> {
        (self.run)(context, scheduler)
    }
}

/// How a [`TaskScheduler::run_all`] pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRunOutcome {
    /// Every bucket drained.
    Completed,
    /// The token was cancelled; remaining tasks were discarded.
    Cancelled,
}

/// Runs tasks bucket by bucket in ascending priority, FIFO within a bucket.
pub struct TaskScheduler<C> {
    buckets: [VecDeque<Box<dyn Task<C>>>; TaskPriority::COUNT],
    running: Option<TaskPriority>,
}

impl<C> Default for TaskScheduler<C> {
    fn default() -> Self {
        Self {
            buckets: std::array::from_fn(|_| VecDeque::new()),
            running: None,
        }
    }
}

impl<C> fmt::Debug for TaskScheduler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pending: Vec<usize> = self.buckets.iter().map(VecDeque::len).collect();
        f.debug_struct("TaskScheduler")
            .field("pending", &pending)
            .field("running", &self.running)
            .finish()
    }
}

impl<C> TaskScheduler<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The priority currently being drained, if a run is in progress.
    #[must_use]
    pub fn running_priority(&self) -> Option<TaskPriority> {
        self.running
    }

    /// Number of tasks waiting to run.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buckets.iter().map(VecDeque::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending() == 0
    }

    /// Queue `task` under its priority.
    ///
    /// # Errors
    /// Returns [`Error::TaskPriority`] if a run is in progress and the task's
    /// priority is not strictly greater than the one being drained.
    pub fn schedule<T: Task<C> + 'static>(&mut self, task: T) -> Result<()> {
        self.schedule_boxed(Box::new(task))
    }

    /// Queue a closure as a task.
    ///
    /// # Errors
    /// See [`TaskScheduler::schedule`].
    pub fn schedule_fn<F>(&mut self, priority: TaskPriority, label: impl Into<String>, run: F) -> Result<()>
    where
        F: FnOnce(&mut C, &mut TaskScheduler<C>) -> Result<()> + 'static,
        C: 'static,
    {
        self.schedule(FnTask::new(priority, label, run))
    }

    /// Queue an already boxed task.
    ///
    /// # Errors
    /// See [`TaskScheduler::schedule`].
    pub fn schedule_boxed(&mut self, task: Box<dyn Task<C>>) -> Result<()> {
        let requested = task.priority();
        if let Some(current) = self.running {
            if requested <= current {
                return Err(Error::TaskPriority { requested, current });
            }
        }
        self.buckets[requested.rank()].push_back(task);
        Ok(())
    }

    /// Drain every bucket in priority order.
    ///
    /// Cancellation is checked before each task; once observed, all remaining
    /// tasks are dropped. The scheduler is empty afterwards in every case.
    ///
    /// # Errors
    /// Returns the first error a task reports; remaining tasks are dropped.
    pub fn run_all(
        &mut self,
        context: &mut C,
        progress: Option<TaskProgressCallback<'_>>,
        cancel: Option<&CancellationToken>,
    ) -> Result<TaskRunOutcome> {
        let result = self.drain(context, progress, cancel);
        self.clear();
        result
    }

    fn drain(
        &mut self,
        context: &mut C,
        progress: Option<TaskProgressCallback<'_>>,
        cancel: Option<&CancellationToken>,
    ) -> Result<TaskRunOutcome> {
        for priority in TaskPriority::ALL {
            self.running = Some(priority);
            let total = self.buckets[priority.rank()].len();
            if total == 0 {
                continue;
            }
            tracing::debug!("Running {total} {priority} task(s)");

            let mut current = 0;
            while let Some(task) = self.buckets[priority.rank()].pop_front() {
                if cancel.is_some_and(CancellationToken::is_cancelled) {
                    tracing::info!("Task run cancelled during {priority}");
                    return Ok(TaskRunOutcome::Cancelled);
                }

                current += 1;
                let label = task.label();
                if let Some(callback) = progress {
                    callback(&TaskProgress::with_label(priority, current, total, label.as_str()));
                }
                tracing::debug!("[{current}/{total}] {label}");
                task.complete(context, self)?;
            }
        }
        Ok(TaskRunOutcome::Completed)
    }

    /// Drop every pending task and leave the running state.
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            bucket.clear();
        }
        self.running = None;
    }
}
