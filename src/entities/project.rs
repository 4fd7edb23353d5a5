//! Project entity - a titled body of work owned by a user

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::entity::{require_id, require_text, Entity, ModelError};
use crate::core::identity::{EntityKind, Id, IdAllocator};
use crate::core::links::IdSet;

/// Date-time layouts accepted without an offset (read as UTC)
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Date-only layouts (read as midnight UTC)
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
];

/// A due date as supplied by a caller: text to parse, or a ready timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DueDateInput {
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl From<&str> for DueDateInput {
    fn from(s: &str) -> Self {
        DueDateInput::Text(s.to_string())
    }
}

impl From<String> for DueDateInput {
    fn from(s: String) -> Self {
        DueDateInput::Text(s)
    }
}

impl From<DateTime<Utc>> for DueDateInput {
    fn from(ts: DateTime<Utc>) -> Self {
        DueDateInput::Timestamp(ts)
    }
}

impl TryFrom<&Value> for DueDateInput {
    type Error = ModelError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(DueDateInput::Text(s.clone())),
            _ => Err(ModelError::WrongType {
                field: "due_date",
                expected: "a date-time string or timestamp",
            }),
        }
    }
}

impl DueDateInput {
    /// Resolve to a timestamp, failing on unparseable text
    pub fn resolve(self) -> Result<DateTime<Utc>, ModelError> {
        match self {
            DueDateInput::Timestamp(ts) => Ok(ts),
            DueDateInput::Text(text) => parse_due_date(&text),
        }
    }
}

/// Parse a user-supplied date or date-time string
pub fn parse_due_date(text: &str) -> Result<DateTime<Utc>, ModelError> {
    let text = text.trim();
    let invalid = || ModelError::invalid("due_date", "Invalid due date format");
    if text.is_empty() {
        return Err(invalid());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(naive.and_utc());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            if let Some(naive) = date.and_hms_opt(0, 0, 0) {
                return Ok(naive.and_utc());
            }
        }
    }

    Err(invalid())
}

/// Persisted form of a [`Project`].
///
/// `due_date` is kept as raw JSON so a non-string value is reported as a
/// type error on that field rather than a generic decoding failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: Value,
    pub user_id: Id,
    #[serde(default)]
    pub tasks: Vec<Id>,
}

/// A project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    id: Id,
    title: String,
    description: String,
    due_date: DateTime<Utc>,
    /// Owning user (existence is the caller's check)
    user_id: Id,
    /// Tasks belonging to this project
    tasks: IdSet,
}

impl Project {
    /// Create a new project. A missing due date defaults to now.
    ///
    /// Title uniqueness across projects is the caller's check.
    pub fn new(
        ids: &mut IdAllocator,
        title: impl Into<String>,
        description: impl Into<String>,
        due_date: Option<DueDateInput>,
        user_id: Id,
    ) -> Result<Self, ModelError> {
        let title = title.into();
        require_text("title", "Title", &title)?;
        require_id("user_id", user_id)?;
        let due_date = match due_date {
            Some(input) => input.resolve()?,
            None => Utc::now(),
        };

        Ok(Self {
            id: ids.allocate(EntityKind::Project)?,
            title,
            description: description.into(),
            due_date,
            user_id,
            tasks: IdSet::new(),
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

    pub fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }

    pub fn set_due_date(&mut self, due_date: impl Into<DueDateInput>) -> Result<(), ModelError> {
        self.due_date = due_date.into().resolve()?;
        Ok(())
    }

    pub fn user_id(&self) -> Id {
        self.user_id
    }

    pub fn tasks(&self) -> &IdSet {
        &self.tasks
    }

    /// Add a task id; no-op if already present
    pub fn add_task(&mut self, task_id: Id) -> bool {
        self.tasks.insert(task_id)
    }

    /// Remove a task id; no-op if absent
    pub fn remove_task(&mut self, task_id: Id) -> bool {
        self.tasks.remove(task_id)
    }

    /// Due date already passed at `now`
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.due_date < now
    }

    /// Not overdue, but due within `days` of `now`.
    ///
    /// A window too large for chrono to represent covers every future date.
    pub fn is_due_soon(&self, now: DateTime<Utc>, days: i64) -> bool {
        if self.is_overdue(now) {
            return false;
        }
        match TimeDelta::try_days(days) {
            Some(window) => self.due_date - now <= window,
            None => days > 0,
        }
    }
}

impl Entity for Project {
    const KIND: EntityKind = EntityKind::Project;
    type Record = ProjectRecord;

    fn id(&self) -> Id {
        self.id
    }

    fn lookup_name(&self) -> &str {
        &self.title
    }

    fn to_record(&self) -> ProjectRecord {
        ProjectRecord {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            due_date: Value::String(self.due_date.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
            user_id: self.user_id,
            tasks: self.tasks.as_slice().to_vec(),
        }
    }

    fn from_record(record: ProjectRecord, ids: &mut IdAllocator) -> Result<Self, ModelError> {
        require_id("id", record.id)?;
        require_text("title", "Title", &record.title)?;
        require_id("user_id", record.user_id)?;
        let due_date = DueDateInput::try_from(&record.due_date)?.resolve()?;

        ids.observe(EntityKind::Project, record.id)?;
        Ok(Self {
            id: record.id,
            title: record.title,
            description: record.description,
            due_date,
            user_id: record.user_id,
            tasks: IdSet::from_ids(record.tasks),
        })
    }
}

impl std::fmt::Display for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Project(id={}, title={}, due_date={}, tasks={})",
            self.id,
            self.title,
            self.due_date.format("%Y-%m-%d"),
            self.tasks.len()
        )
    }
}
