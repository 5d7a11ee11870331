//! RADALIGN - read mapping stage of the ddRAD-seq pipeline
//!
//! RADALIGN maps every demultiplexed, trimmed sample of a ddRAD-seq run
//! against a reference genome. For each `smpl_<id>.R1.fq.gz` /
//! `smpl_<id>.R2.fq.gz` pair in `<dir>/final` it runs
//! `bwa mem | samtools view` and writes `<dir>/bam/smpl_<id>.bam`, spreading
//! the samples over a fixed number of concurrent workers.
//!
//! # Tools
//!
//! - `align`: map all samples and write one BAM per sample
//!
//! # Usage
//!
//! ```bash
//! # Map with 4 concurrent samples, 2 bwa threads each
//! radalign align --dir run01 --ref genome.fa -t 4 -m 2
//!
//! # Show the commands each worker would run, without running them
//! radalign align --dir run01 --ref genome.fa -t 4 --dry-run
//! ```
//!
//! Exit status is 0 when every sample aligned, 1 on a fatal error and 2 when
//! the stage finished but some samples failed.

extern crate radalign_lib;
pub mod commands;
use anyhow::Result;
use commands::RunStatus;
use radalign_lib::utils;
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(rename_all = "kebab-case", author, about)]
/// Read mapping stage of the ddRAD-seq pipeline
struct Args {
    /// Increase log verbosity (-v debug, -vv trace)
    #[structopt(short, long, parse(from_occurrences), global = true)]
    verbose: u8,

    #[structopt(subcommand)]
    subcommand: Subcommand,
}

#[derive(StructOpt)]
enum Subcommand {
    /// Map paired fastQ files of every sample to a reference genome
    Align(commands::AlignArgs),
}

impl Subcommand {
    fn run(self, verbose: u8) -> Result<RunStatus> {
        match self {
            Subcommand::Align(args) => commands::run_align(args, verbose),
        }
    }
}

fn main() {
    let args = Args::from_args();
    match args.subcommand.run(args.verbose) {
        Ok(status) => std::process::exit(status.exit_code()),
        Err(err) => {
            if utils::is_broken_pipe(&err) {
                std::process::exit(0);
            }
            commands::common::report_fatal(&err);
            std::process::exit(1);
        }
    }
}
