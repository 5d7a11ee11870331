//! Checks that must pass before any output is touched.

use log::info;
use std::path::{Path, PathBuf};

use crate::core::error::{RadalignError, Result};
use crate::core::fs::find_executable;

/// Confirm `dir` exists and that the user can create and delete a file in it.
pub fn check_output_dir(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Err(RadalignError::NotWritable {
            path: dir.to_path_buf(),
            reason: "not an existing directory".to_string(),
        });
    }
    info!(
        "Confirmed that specified path to output directory {} exists",
        dir.display()
    );
    info!("Now testing for user write permissions on {}", dir.display());

    let not_writable = |e: std::io::Error| RadalignError::NotWritable {
        path: dir.to_path_buf(),
        reason: e.to_string(),
    };
    let probe = tempfile::Builder::new()
        .prefix(".radalign-probe")
        .tempfile_in(dir)
        .map_err(not_writable)?;
    probe.close().map_err(not_writable)?;

    info!(
        "Confirmed that the user is able to write to {}",
        dir.display()
    );
    Ok(())
}

/// Resolve every tool on `PATH`, failing on the first one that is missing.
pub fn check_executables<S: AsRef<str>>(tools: &[S]) -> Result<Vec<PathBuf>> {
    tools
        .iter()
        .map(|tool| {
            let name = tool.as_ref();
            info!("Checking whether the {} executable is in user PATH", name);
            let path = find_executable(name).ok_or_else(|| RadalignError::ExecutableNotFound {
                name: name.to_string(),
            })?;
            info!("{} executable found at: {}", name, path.display());
            Ok(path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn writable_directory_passes_and_leaves_nothing_behind() {
        let dir = tempdir().unwrap();
        check_output_dir(dir.path()).unwrap();
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn missing_directory_fails() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            check_output_dir(&missing),
            Err(RadalignError::NotWritable { .. })
        ));
    }

    #[test]
    fn regular_file_is_not_a_directory() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("file");
        fs::write(&file, b"x").unwrap();
        assert!(check_output_dir(&file).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn read_only_directory_fails() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        // Permission bits do not bind root; only assert when they apply.
        if fs::write(locked.join("canary"), b"").is_err() {
            assert!(matches!(
                check_output_dir(&locked),
                Err(RadalignError::NotWritable { .. })
            ));
        }
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn missing_executable_is_fatal() {
        match check_executables(&["radalign-no-such-tool"]) {
            Err(RadalignError::ExecutableNotFound { name }) => {
                assert_eq!(name, "radalign-no-such-tool")
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn resolves_tools_on_path() {
        let found = check_executables(&["sh"]).unwrap();
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("sh"));
    }
}
