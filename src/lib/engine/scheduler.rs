use crossbeam::channel::{unbounded, Receiver, Sender};
use log::*;
use rayon::prelude::*;
use std::thread;
use std::time::Instant;

use super::partition::{partition, Partition};
use super::types::{RunSummary, Schedule, TaskOutcome, TaskProcessor};
use crate::core::concurrency::build_worker_pool;
use crate::core::error::{RadalignError, Result};

/// Fans sample indices out over a fixed number of workers and waits for all
/// of them. Per-index failures are collected, never propagated.
#[derive(Debug)]
pub struct Supervisor<P: TaskProcessor> {
    workers: usize,
    schedule: Schedule,
    processor: P,
}

impl<P: TaskProcessor> Supervisor<P> {
    pub fn new(workers: usize, schedule: Schedule, processor: P) -> Self {
        Self {
            workers,
            schedule,
            processor,
        }
    }

    pub fn processor(&self) -> &P {
        &self.processor
    }

    /// Process indices `0..num_items` and block until every worker is done.
    pub fn run(&self, num_items: usize) -> Result<RunSummary> {
        if self.workers == 0 {
            return Err(RadalignError::Config(
                "Supervisor needs at least one worker".to_string(),
            ));
        }

        info!(
            "Dispatching {} samples to {} workers ({} schedule)",
            num_items, self.workers, self.schedule
        );
        let started = Instant::now();
        let (sender, receiver) = unbounded::<TaskOutcome>();

        let mut summary = match self.schedule {
            Schedule::Static => self.run_static(num_items, sender, receiver)?,
            Schedule::Queue => self.run_queue(num_items, sender, receiver)?,
        };
        summary.elapsed = started.elapsed();
        Ok(summary)
    }

    fn run_static(
        &self,
        num_items: usize,
        sender: Sender<TaskOutcome>,
        receiver: Receiver<TaskOutcome>,
    ) -> Result<RunSummary> {
        let partitions = partition(num_items, self.workers);
        for part in &partitions {
            debug!(
                "Worker {} assigned samples [{}, {})",
                part.worker, part.start, part.end
            );
        }

        thread::scope(|scope| -> Result<RunSummary> {
            let mut handles = Vec::with_capacity(partitions.len());
            for part in partitions.iter().copied() {
                let sender = sender.clone();
                let processor = &self.processor;
                let handle = thread::Builder::new()
                    .name(format!("radalign-worker-{}", part.worker))
                    .spawn_scoped(scope, move || run_partition(processor, part, sender))?;
                handles.push((part.worker, handle));
            }
            drop(sender);

            let summary = collect_outcomes(receiver, num_items);

            for (worker, handle) in handles {
                if handle.join().is_err() {
                    error!("Worker {} terminated abnormally", worker);
                }
            }
            Ok(summary)
        })
    }

    fn run_queue(
        &self,
        num_items: usize,
        sender: Sender<TaskOutcome>,
        receiver: Receiver<TaskOutcome>,
    ) -> Result<RunSummary> {
        let pool = build_worker_pool(self.workers)?;
        let processor = &self.processor;

        thread::scope(|scope| -> Result<RunSummary> {
            let handle = scope.spawn(move || {
                pool.install(|| {
                    (0..num_items)
                        .into_par_iter()
                        .with_max_len(1)
                        .for_each_with(sender, |snd, index| {
                            let worker = rayon::current_thread_index().unwrap_or(0);
                            let outcome = processor.process(worker, index);
                            if snd.send(outcome).is_err() {
                                warn!("Outcome channel closed; result for sample {} dropped", index);
                            }
                        });
                });
            });

            let summary = collect_outcomes(receiver, num_items);
            if handle.join().is_err() {
                error!("Worker pool terminated abnormally");
            }
            Ok(summary)
        })
    }
}

fn run_partition<P: TaskProcessor>(processor: &P, part: Partition, sender: Sender<TaskOutcome>) {
    if part.is_empty() {
        debug!("Worker {} has no samples assigned", part.worker);
        return;
    }

    for index in part.indices() {
        let outcome = processor.process(part.worker, index);
        if sender.send(outcome).is_err() {
            warn!(
                "Outcome channel closed; worker {} stopping after sample {}",
                part.worker, index
            );
            return;
        }
    }
}

fn collect_outcomes(receiver: Receiver<TaskOutcome>, expected: usize) -> RunSummary {
    let log_step = std::cmp::max(1, expected / 10);
    let mut summary = RunSummary::default();

    for outcome in receiver.iter() {
        summary.record(outcome);
        if summary.total == expected || summary.total % log_step == 0 {
            let percent = (summary.total as f64 / expected.max(1) as f64) * 100.0;
            info!(
                "Processed {:.1}% ({} / {} samples)",
                percent, summary.total, expected
            );
        }
    }
    summary
}
