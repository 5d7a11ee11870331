//! Work distribution for per-sample jobs.
//!
//! The [`Supervisor`] splits `0..n` sample indices over a fixed number of
//! workers, either as contiguous [`Partition`]s (one worker per partition,
//! all started at once) or as a queue drained by a bounded Rayon pool.
//! Callers implement [`TaskProcessor`] to define the per-sample work; every
//! [`TaskOutcome`] is streamed back over a crossbeam channel and folded into
//! a [`RunSummary`].

mod partition;
mod scheduler;
mod types;

pub use partition::{partition, Partition};
pub use scheduler::Supervisor;
pub use types::{format_elapsed, RunSummary, Schedule, TaskOutcome, TaskProcessor};
