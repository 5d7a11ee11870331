use radalign_lib::core::error::RadalignError;
use radalign_lib::core::logging::DEFAULT_LOG_FILE;
use radalign_lib::engine::Schedule;
use radalign_lib::pipeline::command::{ToolSet, DEFAULT_ALIGNER, DEFAULT_CONVERTER};
use radalign_lib::utils;
use std::convert::TryFrom;
use std::path::PathBuf;
use structopt::StructOpt;

/// CLI arguments for the `align` subcommand.
#[derive(Debug, Clone, StructOpt)]
#[structopt(
    name = "align",
    about = "Map every sample in DIR/final against a reference genome"
)]
pub struct AlignArgs {
    /// Directory containing input fastQ files (in `final/`); BAMs go to `bam/`.
    #[structopt(short = "d", long = "dir", parse(from_os_str))]
    pub dir: PathBuf,

    /// Name of file with reference sequence for read mapping.
    #[structopt(short = "r", long = "ref", parse(from_os_str))]
    pub reference: Option<PathBuf>,

    /// Number of threads available for bwa read mapping (per sample).
    #[structopt(short = "m", long = "map", default_value = "1")]
    pub map_threads: usize,

    /// Number of samples mapped concurrently.
    #[structopt(short = "t", long = "threads", default_value = "1")]
    pub threads: usize,

    /// Aligner executable.
    #[structopt(long, default_value = DEFAULT_ALIGNER)]
    pub aligner: String,

    /// SAM/BAM converter executable.
    #[structopt(long, default_value = DEFAULT_CONVERTER)]
    pub converter: String,

    /// Log file, appended to on every run.
    #[structopt(long = "log", parse(from_os_str), default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// How samples are handed to workers: `static` partitions or a `queue`.
    #[structopt(long, default_value = "static")]
    pub schedule: Schedule,

    /// Validate inputs and log the planned commands without running them.
    #[structopt(long)]
    pub dry_run: bool,
}

/// Validated configuration derived from [`AlignArgs`].
#[derive(Debug, Clone)]
pub struct AlignConfig {
    pub dir: PathBuf,
    pub reference: PathBuf,
    pub workers: usize,
    pub aligner_threads: usize,
    pub tools: ToolSet,
    pub log_file: PathBuf,
    pub schedule: Schedule,
    pub dry_run: bool,
}

impl AlignArgs {
    /// Check thread counts against `available` cores and the reference file.
    pub fn validate_with_cores(&self, available: usize) -> Result<PathBuf, RadalignError> {
        utils::check_thread_budget(self.threads, self.map_threads, available)?;

        let reference = self.reference.clone().ok_or_else(|| {
            RadalignError::InvalidInput(
                "reference genome fastA file needed as input (--ref)".to_string(),
            )
        })?;
        if !reference.is_file() {
            return Err(RadalignError::FileNotFound(format!(
                "reference fastA file {} not found",
                reference.display()
            )));
        }
        Ok(reference)
    }
}

impl TryFrom<AlignArgs> for AlignConfig {
    type Error = RadalignError;

    fn try_from(args: AlignArgs) -> Result<Self, Self::Error> {
        let reference = args.validate_with_cores(num_cpus::get())?;
        Ok(AlignConfig {
            dir: args.dir,
            reference,
            workers: args.threads,
            aligner_threads: args.map_threads,
            tools: ToolSet {
                aligner: args.aligner,
                converter: args.converter,
            },
            log_file: args.log_file,
            schedule: args.schedule,
            dry_run: args.dry_run,
        })
    }
}
