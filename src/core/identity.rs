//! Entity identity: per-kind sequential integer identifiers
//!
//! Every entity kind owns an independent counter starting at 1. Counters only
//! move forward; loading persisted records pushes a counter past the largest
//! identifier seen so new entities never collide with stored ones.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::entity::ModelError;

/// Numeric identifier shared by all entity kinds. Never zero.
pub type Id = u64;

/// The three kinds of tracked entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    User,
    Project,
    Task,
}

impl EntityKind {
    /// Get the lowercase name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Project => "project",
            EntityKind::Task => "task",
        }
    }

    /// Capitalised name for messages ("User", "Project", "Task")
    pub fn title(&self) -> &'static str {
        match self {
            EntityKind::User => "User",
            EntityKind::Project => "Project",
            EntityKind::Task => "Task",
        }
    }

    /// Name of the field used for name-based lookup
    pub fn name_field(&self) -> &'static str {
        match self {
            EntityKind::User => "name",
            EntityKind::Project | EntityKind::Task => "title",
        }
    }

    /// File name of the document holding this kind's records
    pub fn document_name(&self) -> &'static str {
        match self {
            EntityKind::User => "users.json",
            EntityKind::Project => "projects.json",
            EntityKind::Task => "tasks.json",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single monotonic counter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    next: Id,
}

impl Default for Sequence {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl Sequence {
    /// Return the current value and advance, or `None` once the counter is spent
    pub fn allocate(&mut self) -> Option<Id> {
        let id = self.next;
        self.next = id.checked_add(1)?;
        Some(id)
    }

    /// Make sure `id` can never be handed out again.
    ///
    /// Returns `false` when `id` is the largest representable value, which
    /// would leave nothing to allocate after it.
    pub fn observe(&mut self, id: Id) -> bool {
        match id.checked_add(1) {
            Some(next) => {
                self.next = self.next.max(next);
                true
            }
            None => false,
        }
    }

    /// The value the next `allocate` will return
    pub fn peek(&self) -> Id {
        self.next
    }
}

/// Owns one [`Sequence`] per entity kind.
///
/// Created by whoever bootstraps a set of collections (normally the store
/// when loading) and passed by `&mut` into every entity constructor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdAllocator {
    users: Sequence,
    projects: Sequence,
    tasks: Sequence,
}

impl IdAllocator {
    /// Create an allocator with every counter at 1
    pub fn new() -> Self {
        Self::default()
    }

    fn sequence_mut(&mut self, kind: EntityKind) -> &mut Sequence {
        match kind {
            EntityKind::User => &mut self.users,
            EntityKind::Project => &mut self.projects,
            EntityKind::Task => &mut self.tasks,
        }
    }

    /// Hand out the next identifier for `kind`
    pub fn allocate(&mut self, kind: EntityKind) -> Result<Id, ModelError> {
        let id = self.sequence_mut(kind).allocate().ok_or_else(|| {
            ModelError::invalid("id", format!("No {} identifiers left to allocate", kind))
        })?;
        tracing::debug!(%kind, id, "allocated identifier");
        Ok(id)
    }

    /// Record an identifier loaded from storage
    pub fn observe(&mut self, kind: EntityKind, id: Id) -> Result<(), ModelError> {
        if self.sequence_mut(kind).observe(id) {
            Ok(())
        } else {
            Err(ModelError::MalformedRecord {
                kind,
                message: format!("id {} is too large", id),
            })
        }
    }

    /// The identifier the next allocation of `kind` will return
    pub fn peek(&self, kind: EntityKind) -> Id {
        match kind {
            EntityKind::User => self.users.peek(),
            EntityKind::Project => self.projects.peek(),
            EntityKind::Task => self.tasks.peek(),
        }
    }
}
