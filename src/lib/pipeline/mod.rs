//! The read-mapping stage: preflight checks, workspace reset, input
//! discovery and the per-sample `aligner | converter` pipeline.
//!
//! - [`preflight`]: output directory writability and tool lookup
//! - [`workspace`]: removal of a previous run's `bam/` directory
//! - [`discovery`]: R1/R2 file discovery and positional pairing
//! - [`command`]: structured process invocations and the process runner
//! - [`align`]: the per-sample task executed by the supervisor

pub mod align;
pub mod command;
pub mod discovery;
pub mod preflight;
pub mod workspace;

pub mod prelude {
    pub use super::align::{AlignmentSettings, AlignmentTask};
    pub use super::command::{
        AlignmentPipeline, CommandSpec, PipelineReport, PipelineRunner, ProcessRunner, ToolSet,
    };
    pub use super::discovery::{discover_pairs, ensure_output_subdir, SamplePair};
    pub use super::preflight::{check_executables, check_output_dir};
    pub use super::workspace::reset_output_subdir;
}
