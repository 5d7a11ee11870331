use crate::core::error::{RadalignError, Result};
use log::error;

/// Build a dedicated Rayon pool with `size` threads.
pub fn build_worker_pool(size: usize) -> Result<rayon::ThreadPool> {
    if size == 0 {
        error!("Must select > 0 workers");
        return Err(RadalignError::Config(
            "Worker pool needs at least one thread".to_string(),
        ));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(size)
        .thread_name(|idx| format!("radalign-worker-{}", idx))
        .build()
        .map_err(|e| RadalignError::Config(format!("Failed to build worker pool: {}", e)))
}

/// Check that `workers` concurrent pipelines, each running an aligner with
/// `threads_per_worker` threads, fit on `available` cores.
pub fn check_thread_budget(
    workers: usize,
    threads_per_worker: usize,
    available: usize,
) -> Result<usize> {
    if workers == 0 || threads_per_worker == 0 {
        return Err(RadalignError::Config(
            "Thread counts must be greater than 0".to_string(),
        ));
    }

    let requested = workers.saturating_mul(threads_per_worker);
    if requested > available {
        return Err(RadalignError::Oversubscribed {
            requested,
            available,
        });
    }
    Ok(requested)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_budget_within_host() {
        assert_eq!(check_thread_budget(2, 4, 8).unwrap(), 8);
        assert_eq!(check_thread_budget(1, 1, 1).unwrap(), 1);
    }

    #[test]
    fn rejects_oversubscription() {
        match check_thread_budget(4, 4, 8) {
            Err(RadalignError::Oversubscribed {
                requested,
                available,
            }) => {
                assert_eq!(requested, 16);
                assert_eq!(available, 8);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn rejects_zero_threads() {
        assert!(check_thread_budget(0, 1, 8).is_err());
        assert!(check_thread_budget(1, 0, 8).is_err());
    }

    #[test]
    fn builds_pool_of_requested_size() {
        let pool = build_worker_pool(2).unwrap();
        assert_eq!(pool.current_num_threads(), 2);
    }

    #[test]
    fn rejects_empty_pool() {
        assert!(matches!(
            build_worker_pool(0),
            Err(RadalignError::Config(_))
        ));
    }
}
