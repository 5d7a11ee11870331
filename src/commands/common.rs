//! Pieces shared by the subcommands and `main`.

use log::{error, LevelFilter};
use radalign_lib::engine::RunSummary;

/// How a stage ended when it did not hit a fatal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every sample was processed successfully, or nothing was executed.
    Completed,
    /// The stage ran to the end but this many samples failed.
    PartialFailure(usize),
}

impl RunStatus {
    pub fn from_summary(summary: &RunSummary) -> Self {
        match summary.failed_count() {
            0 => RunStatus::Completed,
            n => RunStatus::PartialFailure(n),
        }
    }

    /// Process exit status for this outcome.
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Completed => 0,
            RunStatus::PartialFailure(_) => 2,
        }
    }
}

/// Report a fatal error through the logger, or on stderr when the logger was
/// never installed (argument validation runs before the log file is opened).
pub fn report_fatal(err: &anyhow::Error) {
    if log::max_level() == LevelFilter::Off {
        eprintln!("[radalign] ERROR -- {:#}", err);
    } else {
        error!("{:#}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use radalign_lib::engine::TaskOutcome;

    #[test]
    fn exit_codes() {
        assert_eq!(RunStatus::Completed.exit_code(), 0);
        assert_eq!(RunStatus::PartialFailure(3).exit_code(), 2);
    }

    #[test]
    fn status_follows_failures() {
        let mut summary = RunSummary::default();
        summary.record(TaskOutcome::success(0, 0, "A"));
        assert_eq!(RunStatus::from_summary(&summary), RunStatus::Completed);

        summary.record(TaskOutcome::failure(1, 1, "B", "exit status 1"));
        assert_eq!(
            RunStatus::from_summary(&summary),
            RunStatus::PartialFailure(1)
        );
    }
}
