//! Entity trait - common interface for users, projects and tasks

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::core::identity::{EntityKind, Id, IdAllocator};

/// Common trait for all tracked entities
pub trait Entity: Sized {
    /// The entity kind
    const KIND: EntityKind;

    /// The persisted shape of the entity, one JSON object per record
    type Record: Serialize + DeserializeOwned;

    /// Get the entity's unique ID
    fn id(&self) -> Id;

    /// Get the name (users) or title (projects, tasks) used for lookup
    fn lookup_name(&self) -> &str;

    /// Convert to the canonical plain record
    fn to_record(&self) -> Self::Record;

    /// Rebuild an entity from its plain record, running the field validators.
    ///
    /// The record's id is fed to `ids` so later allocations cannot collide.
    fn from_record(record: Self::Record, ids: &mut IdAllocator) -> Result<Self, ModelError>;
}

/// Decode a raw JSON value into an entity of kind `T`.
///
/// Missing keys and values of the wrong JSON type surface as
/// [`ModelError::MalformedRecord`]; field rules are checked by `from_record`.
pub fn decode_record<T: Entity>(value: Value, ids: &mut IdAllocator) -> Result<T, ModelError> {
    if !value.is_object() {
        return Err(ModelError::MalformedRecord {
            kind: T::KIND,
            message: "expected an object".to_string(),
        });
    }
    let record: T::Record =
        serde_json::from_value(value).map_err(|e| ModelError::MalformedRecord {
            kind: T::KIND,
            message: e.to_string(),
        })?;
    T::from_record(record, ids)
}

/// Field-level failures raised by constructors, mutators and record decoding
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The value has the right type but violates a field rule
    #[error("{message}")]
    Invalid { field: &'static str, message: String },

    /// The value is not of a type the field accepts at all
    #[error("{field} must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    /// A persisted record is not an object, lacks keys or holds values of the wrong JSON type
    #[error("malformed {kind} record: {message}")]
    MalformedRecord { kind: EntityKind, message: String },
}

impl ModelError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        ModelError::Invalid {
            field,
            message: message.into(),
        }
    }

    /// The field the error refers to, if any
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ModelError::Invalid { field, .. } | ModelError::WrongType { field, .. } => Some(field),
            ModelError::MalformedRecord { .. } => None,
        }
    }

    /// True for "wrong kind of value" failures, as opposed to malformed values
    pub fn is_type_error(&self) -> bool {
        matches!(self, ModelError::WrongType { .. })
    }
}

/// Reject empty (or blank) names and titles.
///
/// `label` is the capitalised field name used in the message, e.g. "Title".
pub fn require_text(field: &'static str, label: &str, value: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::invalid(
            field,
            format!("{} must be a non-empty string", label),
        ));
    }
    Ok(())
}

/// Reject email addresses that are empty or have no `@`
pub fn require_email(value: &str) -> Result<(), ModelError> {
    if value.is_empty() || !value.contains('@') {
        return Err(ModelError::invalid(
            "email",
            "Email must be a valid email address",
        ));
    }
    Ok(())
}

/// Reject the zero identifier in foreign-key fields
pub fn require_id(field: &'static str, id: Id) -> Result<(), ModelError> {
    if id == 0 {
        return Err(ModelError::invalid(field, format!("{} must be positive", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Task, User};
    use serde_json::json;

    #[test]
    fn test_require_text() {
        assert!(require_text("title", "Title", "Orbit").is_ok());
        let err = require_text("title", "Title", "").unwrap_err();
        assert_eq!(err.to_string(), "Title must be a non-empty string");
        assert_eq!(err.field(), Some("title"));
        assert!(require_text("name", "Name", "   ").is_err());
    }

    #[test]
    fn test_require_email() {
        assert!(require_email("ada@example.com").is_ok());
        assert!(require_email("").is_err());
        assert!(require_email("ada.example.com").is_err());
    }

    #[test]
    fn test_require_id() {
        assert!(require_id("project_id", 3).is_ok());
        let err = require_id("project_id", 0).unwrap_err();
        assert_eq!(err.field(), Some("project_id"));
        assert!(!err.is_type_error());
    }

    #[test]
    fn test_decode_rejects_non_object() {
        let err = decode_record::<User>(json!([1, 2]), &mut IdAllocator::new()).unwrap_err();
        assert_eq!(
            err,
            ModelError::MalformedRecord {
                kind: EntityKind::User,
                message: "expected an object".to_string(),
            }
        );
    }

    #[test]
    fn test_decode_reports_missing_key() {
        let record = json!({ "id": 3, "name": "Ada" });
        match decode_record::<User>(record, &mut IdAllocator::new()) {
            Err(ModelError::MalformedRecord { kind, message }) => {
                assert_eq!(kind, EntityKind::User);
                assert!(message.contains("email"), "{}", message);
            }
            other => panic!("expected malformed record, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_rejects_negative_id() {
        let record = json!({ "id": -4, "title": "Launch", "project_id": 1 });
        let err = decode_record::<Task>(record, &mut IdAllocator::new()).unwrap_err();
        assert!(matches!(
            err,
            ModelError::MalformedRecord {
                kind: EntityKind::Task,
                ..
            }
        ));
    }

    #[test]
    fn test_decode_seeds_allocator() {
        let record = json!({ "id": 9, "title": "Launch", "project_id": 1 });
        let mut ids = IdAllocator::new();
        let task: Task = decode_record(record, &mut ids).unwrap();
        assert_eq!(task.id(), 9);
        assert_eq!(ids.peek(EntityKind::Task), 10);
    }
}
