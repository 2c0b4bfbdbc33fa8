//! Core task, timer and storage types for Tempo.

pub mod config;
pub mod lists;
pub mod store;
pub mod task;
pub mod task_ops;

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
