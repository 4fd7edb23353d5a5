//! Entity type definitions
//!
//! - [`User`] - a person; owns projects and can be assigned tasks
//! - [`Project`] - titled work with a due date, owned by one user
//! - [`Task`] - a unit of work inside one project, with a status

pub mod project;
pub mod task;
pub mod user;

pub use project::Project;
pub use task::Task;
pub use user::User;
