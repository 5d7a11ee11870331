pub mod align;
pub mod common;

pub use align::{run_align, AlignArgs};
pub use common::RunStatus;
