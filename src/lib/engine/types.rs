use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// How sample indices are handed to workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// One worker per contiguous partition, all launched at once.
    Static,
    /// A fixed pool of workers pulling single indices as they become free.
    Queue,
}

impl Default for Schedule {
    fn default() -> Self {
        Schedule::Static
    }
}

impl FromStr for Schedule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "static" => Ok(Schedule::Static),
            "queue" => Ok(Schedule::Queue),
            other => Err(format!(
                "Unknown schedule '{}', expected one of: static, queue",
                other
            )),
        }
    }
}

impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schedule::Static => write!(f, "static"),
            Schedule::Queue => write!(f, "queue"),
        }
    }
}

/// Result of processing one sample index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    pub worker: usize,
    pub index: usize,
    pub label: String,
    /// `None` on success, otherwise the reason the task failed.
    pub error: Option<String>,
}

impl TaskOutcome {
    pub fn success(worker: usize, index: usize, label: impl Into<String>) -> Self {
        Self {
            worker,
            index,
            label: label.into(),
            error: None,
        }
    }

    pub fn failure(
        worker: usize,
        index: usize,
        label: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            worker,
            index,
            label: label.into(),
            error: Some(reason.into()),
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-index work executed by the supervisor's workers.
pub trait TaskProcessor: Send + Sync {
    /// Process sample `index` on behalf of `worker`. Failures are reported
    /// through the outcome, never by panicking.
    fn process(&self, worker: usize, index: usize) -> TaskOutcome;
}

/// Aggregate of every [`TaskOutcome`] in a run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: Vec<TaskOutcome>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn record(&mut self, outcome: TaskOutcome) {
        self.total += 1;
        if outcome.is_success() {
            self.succeeded += 1;
        } else {
            self.failed.push(outcome);
        }
    }

    #[inline]
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    #[inline]
    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }

    /// Labels of the failed tasks in index order.
    pub fn failed_labels(&self) -> Vec<&str> {
        let mut failed: Vec<&TaskOutcome> = self.failed.iter().collect();
        failed.sort_by_key(|outcome| outcome.index);
        failed.iter().map(|outcome| outcome.label.as_str()).collect()
    }
}

/// Format a duration as `HH:MM:SS`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let (mins, sec) = (secs / 60, secs % 60);
    let (hours, min) = (mins / 60, mins % 60);
    format!("{:02}:{:02}:{:02}", hours, min, sec)
}
