//! Task entity - a unit of work inside a project

use serde::{Deserialize, Serialize};

use crate::core::entity::{require_id, require_text, Entity, ModelError};
use crate::core::identity::{EntityKind, Id, IdAllocator};

/// Task status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[derive(Default)]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub fn all() -> &'static [TaskStatus] {
        &[
            TaskStatus::Pending,
            TaskStatus::InProgress,
            TaskStatus::Completed,
            TaskStatus::Cancelled,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    /// Comma-separated list of every valid status name
    pub fn valid_values() -> String {
        Self::all()
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = ModelError;

    /// Exact match only; "Completed" or "done" are rejected rather than coerced
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "completed" => Ok(TaskStatus::Completed),
            "cancelled" => Ok(TaskStatus::Cancelled),
            _ => Err(ModelError::invalid(
                "status",
                format!("Status must be one of: {}", TaskStatus::valid_values()),
            )),
        }
    }
}

/// A set of field changes applied to a task all-or-nothing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    /// `Some(None)` unassigns
    pub assigned_to: Option<Option<Id>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.assigned_to.is_none()
    }

    /// Check every requested change without touching any task
    pub fn validate(&self) -> Result<(), ModelError> {
        if let Some(ref title) = self.title {
            require_text("title", "Title", title)?;
        }
        if let Some(Some(user_id)) = self.assigned_to {
            require_id("assigned_to", user_id)?;
        }
        Ok(())
    }
}

/// Persisted form of a [`Task`]. A record without a status is pending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
    pub project_id: Id,
    #[serde(default)]
    pub assigned_to: Option<Id>,
}

/// A task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    id: Id,
    title: String,
    description: String,
    project_id: Id,
    assigned_to: Option<Id>,
    status: TaskStatus,
}

impl Task {
    /// Create a new task.
    ///
    /// Title uniqueness within the project is the caller's check.
    pub fn new(
        ids: &mut IdAllocator,
        title: impl Into<String>,
        description: impl Into<String>,
        project_id: Id,
        assigned_to: Option<Id>,
        status: TaskStatus,
    ) -> Result<Self, ModelError> {
        let title = title.into();
        require_text("title", "Title", &title)?;
        require_id("project_id", project_id)?;
        if let Some(user_id) = assigned_to {
            require_id("assigned_to", user_id)?;
        }

        Ok(Self {
            id: ids.allocate(EntityKind::Task)?,
            title,
            description: description.into(),
            project_id,
            assigned_to,
            status,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), ModelError> {
        let title = title.into();
        require_text("title", "Title", &title)?;
        self.title = title;
        Ok(())
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn project_id(&self) -> Id {
        self.project_id
    }

    pub fn assigned_to(&self) -> Option<Id> {
        self.assigned_to
    }

    pub fn set_assigned_to(&mut self, user_id: Option<Id>) -> Result<(), ModelError> {
        if let Some(id) = user_id {
            require_id("assigned_to", id)?;
        }
        self.assigned_to = user_id;
        Ok(())
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    /// Set the status from its string name, rejecting unknown names
    pub fn set_status_str(&mut self, status: &str) -> Result<(), ModelError> {
        self.status = status.parse()?;
        Ok(())
    }

    /// Unconditionally set the status to completed.
    ///
    /// Callers that need to distinguish a redundant completion check
    /// the prior status first (see `core::workflow::complete`).
    pub fn mark_completed(&mut self) {
        self.status = TaskStatus::Completed;
    }

    /// Apply `patch` only if every change in it is valid
    pub fn apply(&mut self, patch: TaskPatch) -> Result<(), ModelError> {
        patch.validate()?;
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(assigned_to) = patch.assigned_to {
            self.assigned_to = assigned_to;
        }
        Ok(())
    }
}

impl Entity for Task {
    const KIND: EntityKind = EntityKind::Task;
    type Record = TaskRecord;

    fn id(&self) -> Id {
        self.id
    }

    fn lookup_name(&self) -> &str {
        &self.title
    }

    fn to_record(&self) -> TaskRecord {
        TaskRecord {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            status: self.status,
            project_id: self.project_id,
            assigned_to: self.assigned_to,
        }
    }

    fn from_record(record: TaskRecord, ids: &mut IdAllocator) -> Result<Self, ModelError> {
        require_id("id", record.id)?;
        require_text("title", "Title", &record.title)?;
        require_id("project_id", record.project_id)?;
        if let Some(user_id) = record.assigned_to {
            require_id("assigned_to", user_id)?;
        }

        ids.observe(EntityKind::Task, record.id)?;
        Ok(Self {
            id: record.id,
            title: record.title,
            description: record.description,
            project_id: record.project_id,
            assigned_to: record.assigned_to,
            status: record.status,
        })
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Task(id={}, title={}, status={})",
            self.id, self.title, self.status
        )
    }
}
