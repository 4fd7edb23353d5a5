//! Command implementations, one module per noun

pub mod completions;
pub mod init;
pub mod project;
pub mod task;
pub mod user;
pub mod utils;
