//! Core module - identifiers, lookup, relationships, workflow and storage

pub mod config;
pub mod entity;
pub mod error;
pub mod identity;
pub mod links;
pub mod resolve;
pub mod store;
pub mod tracker;
pub mod workflow;
pub mod workspace;

pub use config::Config;
pub use entity::{Entity, ModelError};
pub use error::TrackerError;
pub use identity::{EntityKind, Id, IdAllocator};
pub use links::IdSet;
pub use resolve::resolve;
pub use store::{Store, StoreError};
pub use tracker::{NewProject, NewTask, TaskUpdate, Tracker};
pub use workflow::Completion;
pub use workspace::{Workspace, WorkspaceError};
