use log::{error, info};
use std::path::PathBuf;

use super::command::{AlignmentPipeline, PipelineRunner, ToolSet};
use super::discovery::SamplePair;
use crate::engine::{TaskOutcome, TaskProcessor};

/// Settings shared by every alignment in a run.
#[derive(Debug, Clone)]
pub struct AlignmentSettings {
    pub tools: ToolSet,
    pub aligner_threads: usize,
    pub reference: PathBuf,
    pub bam_dir: PathBuf,
}

/// Aligns sample `i` of a sorted pair list; plugs into the supervisor.
pub struct AlignmentTask<R: PipelineRunner> {
    pairs: Vec<SamplePair>,
    settings: AlignmentSettings,
    runner: R,
}

impl<R: PipelineRunner> AlignmentTask<R> {
    pub fn new(pairs: Vec<SamplePair>, settings: AlignmentSettings, runner: R) -> Self {
        Self {
            pairs,
            settings,
            runner,
        }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn pipeline(&self, index: usize) -> Option<AlignmentPipeline> {
        self.pairs.get(index).map(|pair| {
            AlignmentPipeline::new(
                &self.settings.tools,
                self.settings.aligner_threads,
                &self.settings.reference,
                pair,
                &self.settings.bam_dir,
            )
        })
    }

    /// Every pipeline the run would execute, in index order.
    pub fn plan(&self) -> Vec<AlignmentPipeline> {
        (0..self.pairs.len())
            .filter_map(|index| self.pipeline(index))
            .collect()
    }
}

impl<R: PipelineRunner> TaskProcessor for AlignmentTask<R> {
    fn process(&self, worker: usize, index: usize) -> TaskOutcome {
        let pipeline = match self.pipeline(index) {
            Some(pipeline) => pipeline,
            None => {
                error!("worker {}: no sample at index {}", worker, index);
                return TaskOutcome::failure(worker, index, index.to_string(), "index out of range");
            }
        };

        info!("worker {}: running {}", worker, pipeline.render());
        match self.runner.run(&pipeline) {
            Ok(report) if report.succeeded() => {
                info!(
                    "worker {}: alignment command completed for sample {}",
                    worker, pipeline.sample
                );
                TaskOutcome::success(worker, index, pipeline.sample)
            }
            Ok(report) => {
                let reason = report.failures.join(", ");
                error!(
                    "worker {}: alignment command failed for sample {} ({})",
                    worker, pipeline.sample, reason
                );
                if !report.stderr.is_empty() {
                    error!("{}", report.stderr);
                }
                TaskOutcome::failure(worker, index, pipeline.sample, reason)
            }
            Err(err) => {
                error!(
                    "worker {}: alignment command failed for sample {}: {}",
                    worker, pipeline.sample, err
                );
                TaskOutcome::failure(worker, index, pipeline.sample, err.to_string())
            }
        }
    }
}
