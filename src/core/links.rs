//! Parent/child relationship bookkeeping
//!
//! Users keep the ids of the projects they own and projects keep the ids of
//! their tasks. Both lists are [`IdSet`]s: ordered, duplicate-free, and
//! idempotent under insert and remove.

use crate::core::entity::Entity;
use crate::core::identity::Id;
use crate::entities::{Project, Task, User};

/// Insertion-ordered set of identifiers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdSet(Vec<Id>);

impl IdSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list, keeping the first occurrence of each id
    pub fn from_ids(ids: impl IntoIterator<Item = Id>) -> Self {
        let mut set = Self::new();
        for id in ids {
            set.insert(id);
        }
        set
    }

    /// Append `id` unless present. Returns whether the set changed.
    pub fn insert(&mut self, id: Id) -> bool {
        if self.contains(id) {
            return false;
        }
        self.0.push(id);
        true
    }

    /// Remove `id` if present. Returns whether the set changed.
    pub fn remove(&mut self, id: Id) -> bool {
        let before = self.0.len();
        self.0.retain(|&existing| existing != id);
        self.0.len() != before
    }

    pub fn contains(&self, id: Id) -> bool {
        self.0.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Id> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[Id] {
        &self.0
    }
}

/// Record `project` under its owner
pub fn link_project(owner: &mut User, project: &Project) -> bool {
    let changed = owner.add_project(project.id());
    if changed {
        tracing::debug!(user = owner.id(), project = project.id(), "linked project to owner");
    }
    changed
}

/// Record `task` under its project
pub fn link_task(project: &mut Project, task: &Task) -> bool {
    let changed = project.add_task(task.id());
    if changed {
        tracing::debug!(project = project.id(), task = task.id(), "linked task to project");
    }
    changed
}

/// Drop `project` from its owner's list
pub fn unlink_project(owner: &mut User, project: &Project) -> bool {
    owner.remove_project(project.id())
}

/// Drop `task` from its project's list
pub fn unlink_task(project: &mut Project, task: &Task) -> bool {
    project.remove_task(task.id())
}
