use anyhow::Error;
use std::io;
use std::process::ExitStatus;

/// Returns `true` if the error chain bottoms out in a broken pipe.
#[inline]
pub fn is_broken_pipe(err: &Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<io::Error>())
        .any(|io_err| io_err.kind() == io::ErrorKind::BrokenPipe)
}

/// Human readable form of a child's exit status for log lines.
pub fn describe_exit_status(status: &ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit status {}", code),
        None => signal_description(status),
    }
}

#[cfg(unix)]
fn signal_description(status: &ExitStatus) -> String {
    use std::os::unix::process::ExitStatusExt;
    match status.signal() {
        Some(sig) => format!("terminated by signal {}", sig),
        None => "terminated abnormally".to_string(),
    }
}

#[cfg(not(unix))]
fn signal_description(_status: &ExitStatus) -> String {
    "terminated abnormally".to_string()
}
