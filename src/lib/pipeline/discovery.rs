//! Locating paired FASTQ inputs under `<dir>/final`.

use lazy_static::lazy_static;
use log::{info, warn};
use regex::Regex;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::core::error::{RadalignError, Result};

/// Subdirectory holding the demultiplexed, trimmed reads.
pub const INPUT_SUBDIR: &str = "final";
/// Subdirectory receiving one BAM per sample.
pub const OUTPUT_SUBDIR: &str = "bam";

lazy_static! {
    /// `smpl_*.R1.fq.gz`
    static ref FORWARD_RE: Regex = Regex::new(r"^smpl_.*\.R1\.fq\.gz$").unwrap();
    /// `smpl_*.R2.fq.gz`
    static ref REVERSE_RE: Regex = Regex::new(r"^smpl_.*\.R2\.fq\.gz$").unwrap();
}

/// Forward and reverse reads of one sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplePair {
    pub id: String,
    pub forward: PathBuf,
    pub reverse: PathBuf,
}

/// Which mate a file name belongs to, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mate {
    Forward,
    Reverse,
}

impl Mate {
    pub fn label(self) -> &'static str {
        match self {
            Mate::Forward => "R1",
            Mate::Reverse => "R2",
        }
    }
}

pub fn classify(file_name: &str) -> Option<Mate> {
    if FORWARD_RE.is_match(file_name) {
        Some(Mate::Forward)
    } else if REVERSE_RE.is_match(file_name) {
        Some(Mate::Reverse)
    } else {
        None
    }
}

/// Sample identifier: the second `_`/`.`-delimited field of the file name
/// (`smpl_A01.R1.fq.gz` -> `A01`). The field may be empty (`smpl_.R1.fq.gz`).
pub fn sample_id(path: &Path) -> Result<String> {
    let base = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            RadalignError::InvalidInput(format!("Unreadable file name: {}", path.display()))
        })?;

    base.split(|c| c == '_' || c == '.')
        .nth(1)
        .map(str::to_string)
        .ok_or_else(|| {
            RadalignError::InvalidInput(format!(
                "Cannot extract a sample identifier from {}",
                base
            ))
        })
}

/// List and sort the R1 and R2 files of `<dir>/final`.
fn list_mates(input_dir: &Path) -> Result<(Vec<PathBuf>, Vec<PathBuf>)> {
    let entries = match fs::read_dir(input_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Ok((Vec::new(), Vec::new()));
        }
        Err(e) => return Err(e.into()),
    };

    let mut forward = Vec::new();
    let mut reverse = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let mate = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(classify);
        match mate {
            Some(Mate::Forward) => forward.push(path),
            Some(Mate::Reverse) => reverse.push(path),
            None => {}
        }
    }

    forward.sort();
    reverse.sort();
    Ok((forward, reverse))
}

/// Discover sample pairs in `<dir>/final`, paired by sorted position.
///
/// Fails when either mate list is empty or the two lists differ in length.
pub fn discover_pairs(dir: &Path) -> Result<Vec<SamplePair>> {
    let input_dir = dir.join(INPUT_SUBDIR);
    let (forward, reverse) = list_mates(&input_dir)?;

    for (files, mate) in [(&forward, Mate::Forward), (&reverse, Mate::Reverse)] {
        if files.is_empty() {
            return Err(RadalignError::NoInputFiles {
                mate: mate.label().to_string(),
                dir: input_dir,
            });
        }
    }

    if forward.len() != reverse.len() {
        return Err(RadalignError::PairCountMismatch {
            forward: forward.len(),
            reverse: reverse.len(),
        });
    }

    let mut seen = HashSet::new();
    let mut pairs = Vec::with_capacity(forward.len());
    for (fwd, rev) in forward.into_iter().zip(reverse) {
        let id = sample_id(&fwd)?;
        if id.is_empty() {
            warn!(
                "Empty sample identifier in {}; its BAM file will be smpl_.bam",
                fwd.display()
            );
        }
        if !mates_agree(&fwd, &rev) {
            warn!(
                "Forward file {} is paired with {} by sort order; names do not match",
                fwd.display(),
                rev.display()
            );
        }
        if !seen.insert(id.clone()) {
            warn!(
                "Sample identifier {} occurs more than once; its BAM file will be overwritten",
                id
            );
        }
        pairs.push(SamplePair {
            id,
            forward: fwd,
            reverse: rev,
        });
    }

    info!(
        "Found {} mate-paired fastQ samples in {}",
        pairs.len(),
        input_dir.display()
    );
    Ok(pairs)
}

fn mates_agree(forward: &Path, reverse: &Path) -> bool {
    match (
        forward.file_name().and_then(|n| n.to_str()),
        reverse.file_name().and_then(|n| n.to_str()),
    ) {
        (Some(f), Some(r)) => f.replacen(".R1.", ".R2.", 1) == r,
        _ => false,
    }
}

/// Create `<dir>/bam` if needed and return its path.
pub fn ensure_output_subdir(dir: &Path) -> Result<PathBuf> {
    let bam_dir = dir.join(OUTPUT_SUBDIR);
    fs::create_dir_all(&bam_dir)?;
    Ok(bam_dir)
}
