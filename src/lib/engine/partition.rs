use std::ops::Range;

/// Contiguous half-open range of sample indices owned by one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Partition {
    pub worker: usize,
    pub start: usize,
    pub end: usize,
}

impl Partition {
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    #[inline]
    pub fn indices(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Split `[0, num_files)` into exactly `num_workers` contiguous ranges.
///
/// Each worker receives `ceil(num_files / num_workers)` indices; the last
/// range always ends at `num_files` and absorbs the remainder. When there
/// are fewer files than workers the trailing ranges are empty.
pub fn partition(num_files: usize, num_workers: usize) -> Vec<Partition> {
    if num_workers == 0 {
        return Vec::new();
    }

    let per_worker = (num_files + num_workers - 1) / num_workers;
    let mut partitions: Vec<Partition> = (0..num_workers)
        .map(|worker| Partition {
            worker,
            start: (worker * per_worker).min(num_files),
            end: ((worker + 1) * per_worker).min(num_files),
        })
        .collect();

    if let Some(last) = partitions.last_mut() {
        last.end = num_files;
    }
    partitions
}
