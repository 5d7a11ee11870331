//! Flat re-exports of the helpers used by the command layer.

pub use crate::core::concurrency::check_thread_budget;
pub use crate::core::errors::is_broken_pipe;
pub use crate::core::fs::{find_executable, make_parent_dirs};
pub use crate::core::logging::current_user;
