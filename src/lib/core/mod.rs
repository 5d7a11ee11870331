pub mod concurrency;
pub mod error;
pub mod errors;
pub mod fs;
pub mod logging;

pub mod prelude {
    pub use super::concurrency::{build_worker_pool, check_thread_budget};
    pub use super::error::{RadalignError, Result};
    pub use super::errors::{describe_exit_status, is_broken_pipe};
    pub use super::fs::{find_executable, make_parent_dirs};
    pub use super::logging::{current_user, LogConfig};
}
