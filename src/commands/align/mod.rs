mod args;

use anyhow::{Context, Result};
use log::{error, info, warn};
use radalign_lib::core::logging::{self, LogConfig};
use radalign_lib::engine::{format_elapsed, partition, Supervisor};
use radalign_lib::pipeline::align::{AlignmentSettings, AlignmentTask};
use radalign_lib::pipeline::command::ProcessRunner;
use radalign_lib::pipeline::{discovery, preflight, workspace};
use radalign_lib::utils;
use std::convert::TryFrom;
use std::path::Path;

use crate::commands::common::RunStatus;

pub use args::{AlignArgs, AlignConfig};

/// Execute the `align` command end-to-end.
pub fn run_align(args: AlignArgs, verbose: u8) -> Result<RunStatus> {
    let config = AlignConfig::try_from(args)?;

    let log_config = LogConfig {
        path: config.log_file.clone(),
        ..LogConfig::default()
    }
    .with_verbosity(verbose);
    logging::init(&log_config)
        .with_context(|| format!("Failed to open log file {}", config.log_file.display()))?;

    info!(
        "radalign {} started by user {}",
        env!("CARGO_PKG_VERSION"),
        utils::current_user()
    );
    info!("Host has {} CPUs available", num_cpus::get());
    info!(
        "Arguments: dir={} ref={} workers={} map_threads={} schedule={}",
        config.dir.display(),
        config.reference.display(),
        config.workers,
        config.aligner_threads,
        config.schedule
    );

    execute(&config)
}

/// Run the stage for an already validated configuration. The logger, if
/// any, is the caller's business.
pub fn execute(config: &AlignConfig) -> Result<RunStatus> {
    preflight::check_output_dir(&config.dir)?;
    preflight::check_executables(&config.tools.names())?;

    if config.dry_run {
        plan_stage(config)?;
        info!("Dry run finished; nothing was deleted or executed.");
        return Ok(RunStatus::Completed);
    }

    workspace::reset_output_subdir(&config.dir)?;
    let status = run_stage(config)?;
    info!("radalign stage completed.");
    Ok(status)
}

fn settings(config: &AlignConfig, bam_dir: &Path) -> AlignmentSettings {
    AlignmentSettings {
        tools: config.tools.clone(),
        aligner_threads: config.aligner_threads,
        reference: config.reference.clone(),
        bam_dir: bam_dir.to_path_buf(),
    }
}

/// Log what each worker would run, without touching `bam/`.
fn plan_stage(config: &AlignConfig) -> Result<()> {
    let pairs = discovery::discover_pairs(&config.dir)?;
    let bam_dir = config.dir.join(discovery::OUTPUT_SUBDIR);
    let task = AlignmentTask::new(pairs, settings(config, &bam_dir), ProcessRunner);
    let plan = task.plan();

    for part in partition(plan.len(), config.workers) {
        if part.is_empty() {
            info!("worker {}: nothing to do", part.worker);
            continue;
        }
        for pipeline in &plan[part.indices()] {
            info!("worker {}: would run: {}", part.worker, pipeline.render());
        }
    }
    Ok(())
}

fn run_stage(config: &AlignConfig) -> Result<RunStatus> {
    info!("Running the bwa stage of the pipeline");
    info!(
        "Starting to map reads to reference genome in {}",
        config.dir.display()
    );

    let pairs = discovery::discover_pairs(&config.dir)?;
    let bam_dir = discovery::ensure_output_subdir(&config.dir)?;
    let num_samples = pairs.len();

    let task = AlignmentTask::new(pairs, settings(config, &bam_dir), ProcessRunner);
    let supervisor = Supervisor::new(config.workers, config.schedule, task);
    let summary = supervisor.run(num_samples)?;

    info!(
        "Total elapsed bwa time: {}",
        format_elapsed(summary.elapsed)
    );
    info!(
        "{} of {} samples aligned successfully",
        summary.succeeded, summary.total
    );

    let status = RunStatus::from_summary(&summary);
    if let RunStatus::PartialFailure(failed) = status {
        warn!("{} samples failed to align", failed);
        error!("Failed samples: {}", summary.failed_labels().join(", "));
    }
    Ok(status)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use radalign_lib::core::logging::DEFAULT_LOG_FILE;
    use radalign_lib::engine::Schedule;
    use radalign_lib::pipeline::command::ToolSet;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;
    use tempfile::{tempdir, TempDir};

    // Records each call next to itself and fails for samples named BAD.
    const FAKE_ALIGNER: &str = r#"#!/bin/sh
echo "$5" >> "$0.calls"
case "$5" in
  *smpl_BAD*) echo "[E::bwa_idx_load] fail to locate the index" >&2; exit 1 ;;
esac
echo "read1	$5	$6"
"#;

    const FAKE_CONVERTER: &str = r#"#!/bin/sh
cat > "$6"
"#;

    struct Fixture {
        tools_dir: TempDir,
        run: TempDir,
        tools: ToolSet,
    }

    impl Fixture {
        fn new(samples: &[&str]) -> Self {
            let tools_dir = tempdir().unwrap();
            let install = |name: &str, body: &str| {
                let path = tools_dir.path().join(name);
                fs::write(&path, body).unwrap();
                fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
                path.to_string_lossy().into_owned()
            };
            let tools = ToolSet {
                aligner: install("bwa", FAKE_ALIGNER),
                converter: install("samtools", FAKE_CONVERTER),
            };

            let run = tempdir().unwrap();
            let final_dir = run.path().join(discovery::INPUT_SUBDIR);
            fs::create_dir_all(&final_dir).unwrap();
            for id in samples {
                for mate in ["R1", "R2"] {
                    fs::write(final_dir.join(format!("smpl_{}.{}.fq.gz", id, mate)), b"").unwrap();
                }
            }
            fs::write(run.path().join("genome.fa"), b">chr1\nACGT\n").unwrap();

            Self {
                tools_dir,
                run,
                tools,
            }
        }

        fn config(&self, dry_run: bool) -> AlignConfig {
            AlignConfig {
                dir: self.run.path().to_path_buf(),
                reference: self.run.path().join("genome.fa"),
                workers: 2,
                aligner_threads: 1,
                tools: self.tools.clone(),
                log_file: PathBuf::from(DEFAULT_LOG_FILE),
                schedule: Schedule::Static,
                dry_run,
            }
        }

        fn bam_dir(&self) -> PathBuf {
            self.run.path().join(discovery::OUTPUT_SUBDIR)
        }

        fn aligner_was_called(&self) -> bool {
            self.tools_dir.path().join("bwa.calls").exists()
        }
    }

    #[test]
    fn dry_run_leaves_bam_dir_alone_and_spawns_nothing() {
        let fixture = Fixture::new(&["A", "B", "C"]);

        assert_eq!(execute(&fixture.config(true)).unwrap(), RunStatus::Completed);
        assert!(!fixture.bam_dir().exists());

        fs::create_dir_all(fixture.bam_dir()).unwrap();
        fs::write(fixture.bam_dir().join("smpl_OLD.bam"), b"stale").unwrap();
        assert_eq!(execute(&fixture.config(true)).unwrap(), RunStatus::Completed);
        assert!(fixture.bam_dir().join("smpl_OLD.bam").exists());

        assert!(!fixture.aligner_was_called());
    }

    #[test]
    fn failed_sample_gives_partial_failure() {
        let fixture = Fixture::new(&["A", "BAD", "C"]);

        let status = execute(&fixture.config(false)).unwrap();
        assert_eq!(status, RunStatus::PartialFailure(1));
        assert_eq!(status.exit_code(), 2);
        assert!(fixture.bam_dir().join("smpl_A.bam").is_file());
        assert!(fixture.bam_dir().join("smpl_C.bam").is_file());
    }

    #[test]
    fn all_samples_aligned_completes() {
        let fixture = Fixture::new(&["A", "B"]);
        fs::create_dir_all(fixture.bam_dir()).unwrap();
        fs::write(fixture.bam_dir().join("smpl_OLD.bam"), b"stale").unwrap();

        let status = execute(&fixture.config(false)).unwrap();
        assert_eq!(status, RunStatus::Completed);
        assert_eq!(status.exit_code(), 0);
        assert!(!fixture.bam_dir().join("smpl_OLD.bam").exists());
        assert!(fixture.aligner_was_called());
    }

    #[test]
    fn preflight_failure_creates_no_bam_dir() {
        let fixture = Fixture::new(&["A"]);
        let mut config = fixture.config(false);
        config.dir = fixture.run.path().join("missing");

        assert!(execute(&config).is_err());
        assert!(!config.dir.exists());
        assert!(!config.dir.join(discovery::OUTPUT_SUBDIR).exists());
        assert!(!fixture.bam_dir().exists());
        assert!(!fixture.aligner_was_called());
    }

    #[test]
    fn missing_tool_stops_before_reset() {
        let fixture = Fixture::new(&["A"]);
        fs::create_dir_all(fixture.bam_dir()).unwrap();
        let mut config = fixture.config(false);
        config.tools.converter = "radalign-no-such-converter".to_string();

        assert!(execute(&config).is_err());
        assert!(fixture.bam_dir().is_dir());
    }
}
