//! Priority-staged deferred construction.
//!
//! Collaborators queue [`Task`]s instead of building order-dependent entities
//! immediately. [`TaskScheduler::run_all`] drains the queue one
//! [`TaskPriority`] at a time on the calling thread, reporting progress and
//! checking for cancellation between tasks.

mod priority;
mod progress;
mod scheduler;

pub use priority::TaskPriority;
pub use progress::{CancellationToken, TaskProgress, TaskProgressCallback};
pub use scheduler::{FnTask, Task, TaskRunOutcome, TaskScheduler};
