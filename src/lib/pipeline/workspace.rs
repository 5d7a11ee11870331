use log::{info, warn};
use std::fs;
use std::path::Path;

use super::discovery::OUTPUT_SUBDIR;
use crate::core::error::Result;

/// Remove `<dir>/bam` and everything in it so stale BAMs from an earlier run
/// cannot be mistaken for new results. Returns `true` when something was
/// removed. The directory is recreated later, right before alignment.
pub fn reset_output_subdir(dir: &Path) -> Result<bool> {
    info!("Checking for existing output directories in {}", dir.display());
    let bam_dir = dir.join(OUTPUT_SUBDIR);

    if !bam_dir.is_dir() {
        info!(
            "bwa output directory {} does not exist-- it will be created",
            bam_dir.display()
        );
        return Ok(false);
    }

    info!(
        "bwa output directory {} already exists on disk",
        bam_dir.display()
    );
    warn!("Files will be overwritten");
    fs::remove_dir_all(&bam_dir)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn removes_populated_output_dir() {
        let root = tempdir().unwrap();
        let bam_dir = root.path().join(OUTPUT_SUBDIR);
        fs::create_dir_all(bam_dir.join("nested")).unwrap();
        fs::write(bam_dir.join("smpl_A.bam"), b"stale").unwrap();
        fs::write(bam_dir.join("nested/smpl_B.bam"), b"stale").unwrap();

        assert!(reset_output_subdir(root.path()).unwrap());
        assert!(!bam_dir.exists());
    }

    #[test]
    fn absent_output_dir_is_a_no_op() {
        let root = tempdir().unwrap();
        fs::write(root.path().join("keep.txt"), b"x").unwrap();

        assert!(!reset_output_subdir(root.path()).unwrap());
        assert!(root.path().join("keep.txt").exists());
        assert!(!root.path().join(OUTPUT_SUBDIR).exists());
    }
}
