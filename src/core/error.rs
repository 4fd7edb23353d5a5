//! Errors surfaced by tracker operations

use miette::Diagnostic;
use thiserror::Error;

use crate::core::entity::ModelError;
use crate::core::identity::EntityKind;
use crate::core::store::StoreError;

/// Everything a single command can fail with.
///
/// A redundant completion is not here: it is reported as
/// [`Completion::AlreadyCompleted`](crate::core::workflow::Completion).
#[derive(Debug, Error, Diagnostic)]
pub enum TrackerError {
    /// A field failed validation or had the wrong type
    #[error(transparent)]
    #[diagnostic(code(ptrack::invalid))]
    Model(#[from] ModelError),

    /// A token resolved to nothing
    #[error("{} '{}' not found.", .kind.title(), .token)]
    #[diagnostic(
        code(ptrack::not_found),
        help("tokens are matched against ids first, then case-insensitively against names")
    )]
    NotFound { kind: EntityKind, token: String },

    /// A name or title is already taken
    #[error("{}", conflict_message(.kind, .value, .scope))]
    #[diagnostic(code(ptrack::conflict))]
    Conflict {
        kind: EntityKind,
        value: String,
        /// Title of the project the conflict is scoped to (tasks only)
        scope: Option<String>,
    },

    #[error(transparent)]
    #[diagnostic(code(ptrack::store))]
    Store(#[from] StoreError),
}

impl TrackerError {
    pub fn not_found(kind: EntityKind, token: impl Into<String>) -> Self {
        TrackerError::NotFound {
            kind,
            token: token.into(),
        }
    }
}

fn conflict_message(kind: &EntityKind, value: &str, scope: &Option<String>) -> String {
    let mut message = format!(
        "{} with {} '{}' already exists",
        kind.title(),
        kind.name_field(),
        value
    );
    if let Some(project) = scope {
        message.push_str(&format!(" in project '{}'", project));
    }
    message.push('.');
    message
}
