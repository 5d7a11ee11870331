//! radalign: read-mapping stage of the ddRAD-seq pipeline
//!
//! radalign maps every demultiplexed sample of a ddRAD-seq run against a
//! reference genome by driving two external tools, an aligner (`bwa mem`)
//! and a SAM/BAM converter (`samtools view`), over a fixed number of
//! concurrent workers.
//!
//! # Modules
//!
//! - [`core`]: errors, logging set-up, thread budgeting and filesystem helpers
//! - [`engine`]: index partitioning and the worker supervisor
//! - [`pipeline`]: preflight, workspace reset, input discovery and the
//!   per-sample alignment task
//! - [`utils`]: flat re-exports of the helpers the command layer uses

pub mod core;
pub mod engine;
pub mod pipeline;
pub mod utils;
