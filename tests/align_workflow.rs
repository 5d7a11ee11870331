//! Drives the real process runner against stub `bwa`/`samtools` scripts.
#![cfg(unix)]

use radalign_lib::engine::{Schedule, Supervisor};
use radalign_lib::pipeline::align::{AlignmentSettings, AlignmentTask};
use radalign_lib::pipeline::command::{ProcessRunner, ToolSet};
use radalign_lib::pipeline::{discovery, preflight, workspace};
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

// Emits one fake SAM line per call and fails for samples named BAD.
const FAKE_ALIGNER: &str = r#"#!/bin/sh
case "$5" in
  *smpl_BAD*) echo "[E::bwa_idx_load] fail to locate the index" >&2; exit 1 ;;
esac
echo "@SQ	SN:chr1	LN:4"
echo "read1	$5	$6"
"#;

// Copies stdin to the path following -o.
const FAKE_CONVERTER: &str = r#"#!/bin/sh
cat > "$6"
"#;

fn install(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn touch(dir: &Path, name: &str) {
    fs::write(dir.join(name), b"").unwrap();
}

#[test]
fn aligns_every_sample_and_reports_failures() {
    let tools_dir = tempdir().unwrap();
    let aligner = install(tools_dir.path(), "bwa", FAKE_ALIGNER);
    let converter = install(tools_dir.path(), "samtools", FAKE_CONVERTER);
    let tools = ToolSet {
        aligner: aligner.to_string_lossy().into_owned(),
        converter: converter.to_string_lossy().into_owned(),
    };

    let run = tempdir().unwrap();
    let final_dir = run.path().join(discovery::INPUT_SUBDIR);
    fs::create_dir_all(&final_dir).unwrap();
    for id in ["A", "B", "BAD", "C"] {
        touch(&final_dir, &format!("smpl_{}.R1.fq.gz", id));
        touch(&final_dir, &format!("smpl_{}.R2.fq.gz", id));
    }
    let reference = run.path().join("genome.fa");
    fs::write(&reference, b">chr1\nACGT\n").unwrap();

    // Leftovers from an earlier run must not survive.
    let stale_dir = run.path().join(discovery::OUTPUT_SUBDIR);
    fs::create_dir_all(&stale_dir).unwrap();
    fs::write(stale_dir.join("smpl_OLD.bam"), b"stale").unwrap();

    preflight::check_output_dir(run.path()).unwrap();
    preflight::check_executables(&tools.names()).unwrap();
    assert!(workspace::reset_output_subdir(run.path()).unwrap());
    assert!(!stale_dir.exists());

    let pairs = discovery::discover_pairs(run.path()).unwrap();
    assert_eq!(pairs.len(), 4);
    let bam_dir = discovery::ensure_output_subdir(run.path()).unwrap();

    for schedule in [Schedule::Static, Schedule::Queue] {
        let settings = AlignmentSettings {
            tools: tools.clone(),
            aligner_threads: 1,
            reference: reference.clone(),
            bam_dir: bam_dir.clone(),
        };
        let task = AlignmentTask::new(pairs.clone(), settings, ProcessRunner);
        let summary = Supervisor::new(3, schedule, task).run(pairs.len()).unwrap();

        assert_eq!(summary.total, 4, "{} schedule", schedule);
        assert_eq!(summary.succeeded, 3, "{} schedule", schedule);
        assert_eq!(summary.failed_labels(), vec!["BAD"]);
        assert!(summary.failed[0]
            .error
            .as_deref()
            .unwrap_or_default()
            .contains("exit status 1"));

        for id in ["A", "B", "C"] {
            let bam = fs::read_to_string(bam_dir.join(format!("smpl_{}.bam", id))).unwrap();
            assert!(bam.contains(&format!("smpl_{}.R2.fq.gz", id)));
        }
    }
    assert!(!bam_dir.join("smpl_OLD.bam").exists());
}
