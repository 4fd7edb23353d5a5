//! ptrack: a personal project tracker
//!
//! Users, projects and tasks kept as plain JSON documents and managed from
//! the command line.

pub mod cli;
pub mod core;
pub mod entities;
