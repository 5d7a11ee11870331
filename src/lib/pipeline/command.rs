//! Structured aligner | converter invocations.
//!
//! No shell is involved: each side of the pipe is a [`CommandSpec`] and the
//! aligner's stdout is wired straight into the converter's stdin.

use log::debug;
use std::ffi::{OsStr, OsString};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStderr, Command, Stdio};
use std::thread;

use super::discovery::SamplePair;
use crate::core::error::{RadalignError, Result};
use crate::core::errors::describe_exit_status;

/// Default aligner executable.
pub const DEFAULT_ALIGNER: &str = "bwa";
/// Default SAM/BAM converter executable.
pub const DEFAULT_CONVERTER: &str = "samtools";

/// Names (or paths) of the two external tools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSet {
    pub aligner: String,
    pub converter: String,
}

impl Default for ToolSet {
    fn default() -> Self {
        Self {
            aligner: DEFAULT_ALIGNER.to_string(),
            converter: DEFAULT_CONVERTER.to_string(),
        }
    }
}

impl ToolSet {
    pub fn names(&self) -> [&str; 2] {
        [self.aligner.as_str(), self.converter.as_str()]
    }
}

/// Program plus argument vector; argument boundaries are never re-parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl CommandSpec {
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
        }
    }

    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }

    /// Space-joined form for log lines only.
    pub fn render(&self) -> String {
        std::iter::once(&self.program)
            .chain(self.args.iter())
            .map(|part| part.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// `aligner mem ... | converter view ... -` for one sample pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentPipeline {
    pub sample: String,
    pub output: PathBuf,
    pub aligner: CommandSpec,
    pub converter: CommandSpec,
}

impl AlignmentPipeline {
    pub fn new(
        tools: &ToolSet,
        threads: usize,
        reference: &Path,
        pair: &SamplePair,
        bam_dir: &Path,
    ) -> Self {
        let output = bam_dir.join(bam_file_name(&pair.id));

        let aligner = CommandSpec::new(&tools.aligner)
            .arg("mem")
            .arg("-t")
            .arg(threads.to_string())
            .arg(reference)
            .arg(&pair.forward)
            .arg(&pair.reverse);

        let converter = CommandSpec::new(&tools.converter)
            .arg("view")
            .arg("-bS")
            .arg("-T")
            .arg(reference)
            .arg("-o")
            .arg(&output)
            .arg("-");

        Self {
            sample: pair.id.clone(),
            output,
            aligner,
            converter,
        }
    }

    pub fn render(&self) -> String {
        format!("{} | {}", self.aligner.render(), self.converter.render())
    }
}

/// Output file name for a sample identifier.
pub fn bam_file_name(sample: &str) -> String {
    format!("smpl_{}.bam", sample)
}

/// What came back from one pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    /// One entry per process that exited unsuccessfully.
    pub failures: Vec<String>,
    /// Captured stderr of both processes.
    pub stderr: String,
}

impl PipelineReport {
    #[inline]
    pub fn succeeded(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Executes an [`AlignmentPipeline`].
///
/// `Err` is reserved for failures to start or wait on the processes; a
/// process that ran and exited non-zero is reported through
/// [`PipelineReport::failures`].
pub trait PipelineRunner: Send + Sync {
    fn run(&self, pipeline: &AlignmentPipeline) -> Result<PipelineReport>;
}

/// Runs pipelines as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl PipelineRunner for ProcessRunner {
    fn run(&self, pipeline: &AlignmentPipeline) -> Result<PipelineReport> {
        let mut aligner_cmd = pipeline.aligner.to_command();
        aligner_cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        let mut aligner = aligner_cmd
            .spawn()
            .map_err(|e| spawn_error(&pipeline.aligner, e))?;

        let aligner_stdout = aligner.stdout.take().ok_or_else(|| {
            RadalignError::InvalidInput("aligner stdout was not captured".to_string())
        })?;
        let aligner_stderr = aligner.stderr.take().map(drain_stderr);

        let mut converter_cmd = pipeline.converter.to_command();
        converter_cmd
            .stdin(Stdio::from(aligner_stdout))
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        let spawned = converter_cmd.spawn();
        // Release our copy of the pipe's read end so the aligner sees EPIPE
        // if the converter exits early.
        drop(converter_cmd);
        let converter = match spawned {
            Ok(child) => child,
            Err(e) => {
                reap(&mut aligner);
                return Err(spawn_error(&pipeline.converter, e));
            }
        };

        let converter_output = converter.wait_with_output()?;
        let aligner_status = aligner.wait()?;
        let aligner_stderr = aligner_stderr
            .and_then(|handle| handle.join().ok())
            .unwrap_or_default();

        debug!(
            "Sample {}: aligner {}, converter {}",
            pipeline.sample,
            describe_exit_status(&aligner_status),
            describe_exit_status(&converter_output.status)
        );

        let mut report = PipelineReport::default();
        if !aligner_status.success() {
            report.failures.push(format!(
                "{} {}",
                pipeline.aligner.program.to_string_lossy(),
                describe_exit_status(&aligner_status)
            ));
        }
        if !converter_output.status.success() {
            report.failures.push(format!(
                "{} {}",
                pipeline.converter.program.to_string_lossy(),
                describe_exit_status(&converter_output.status)
            ));
        }

        let converter_stderr = String::from_utf8_lossy(&converter_output.stderr);
        report.stderr = [aligner_stderr.trim_end(), converter_stderr.trim_end()]
            .iter()
            .filter(|text| !text.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join("\n");
        Ok(report)
    }
}

fn spawn_error(spec: &CommandSpec, err: io::Error) -> RadalignError {
    RadalignError::Io(io::Error::new(
        err.kind(),
        format!("failed to start {}: {}", spec.program.to_string_lossy(), err),
    ))
}

/// Read a child's stderr to completion on a helper thread so neither side
/// of the pipe can block on a full stderr buffer.
fn drain_stderr(mut stderr: ChildStderr) -> thread::JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = stderr.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
