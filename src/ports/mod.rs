//! Port traits defining external boundaries.
//!
//! The only boundary is process execution; implementations live in
//! `src/adapters/`.

pub mod process;

pub use process::{split_args, BufferedOutput, ProcessFuture, ProcessRunner};
