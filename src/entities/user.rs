//! User entity - a person who owns projects and can be assigned tasks

use serde::{Deserialize, Serialize};

use crate::core::entity::{require_email, require_id, require_text, Entity, ModelError};
use crate::core::identity::{EntityKind, Id, IdAllocator};
use crate::core::links::IdSet;

/// Persisted form of a [`User`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: Id,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub projects: Vec<Id>,
}

/// A user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: Id,
    name: String,
    email: String,
    /// Projects owned by this user
    projects: IdSet,
}

impl User {
    /// Create a new user, validating every field before taking an id.
    ///
    /// Name uniqueness across users is the caller's check.
    pub fn new(
        ids: &mut IdAllocator,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, ModelError> {
        let name = name.into();
        let email = email.into();
        require_text("name", "Name", &name)?;
        require_email(&email)?;

        Ok(Self {
            id: ids.allocate(EntityKind::User)?,
            name,
            email,
            projects: IdSet::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), ModelError> {
        let name = name.into();
        require_text("name", "Name", &name)?;
        self.name = name;
        Ok(())
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_email(&mut self, email: impl Into<String>) -> Result<(), ModelError> {
        let email = email.into();
        require_email(&email)?;
        self.email = email;
        Ok(())
    }

    pub fn projects(&self) -> &IdSet {
        &self.projects
    }

    /// Add a project id; no-op if already present
    pub fn add_project(&mut self, project_id: Id) -> bool {
        self.projects.insert(project_id)
    }

    /// Remove a project id; no-op if absent
    pub fn remove_project(&mut self, project_id: Id) -> bool {
        self.projects.remove(project_id)
    }
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;
    type Record = UserRecord;

    fn id(&self) -> Id {
        self.id
    }

    fn lookup_name(&self) -> &str {
        &self.name
    }

    fn to_record(&self) -> UserRecord {
        UserRecord {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            projects: self.projects.as_slice().to_vec(),
        }
    }

    fn from_record(record: UserRecord, ids: &mut IdAllocator) -> Result<Self, ModelError> {
        require_id("id", record.id)?;
        require_text("name", "Name", &record.name)?;
        require_email(&record.email)?;

        ids.observe(EntityKind::User, record.id)?;
        Ok(Self {
            id: record.id,
            name: record.name,
            email: record.email,
            projects: IdSet::from_ids(record.projects),
        })
    }
}

impl std::fmt::Display for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "User(id={}, name={}, email={}, projects={})",
            self.id,
            self.name,
            self.email,
            self.projects.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::decode_record;

    #[test]
    fn test_user_creation() {
        let mut ids = IdAllocator::new();
        let user = User::new(&mut ids, "Ada", "ada@example.com").unwrap();
        assert_eq!(user.id(), 1);
        assert_eq!(user.name(), "Ada");
        assert!(user.projects().is_empty());
    }

    #[test]
    fn test_user_rejects_bad_fields() {
        let mut ids = IdAllocator::new();
        assert!(User::new(&mut ids, "", "ada@example.com").is_err());
        assert!(User::new(&mut ids, "Ada", "not-an-email").is_err());
        // Failed constructions do not consume identifiers
        let user = User::new(&mut ids, "Ada", "ada@example.com").unwrap();
        assert_eq!(user.id(), 1);
    }

    #[test]
    fn test_user_setters_revalidate() {
        let mut ids = IdAllocator::new();
        let mut user = User::new(&mut ids, "Ada", "ada@example.com").unwrap();

        assert!(user.set_name("").is_err());
        assert_eq!(user.name(), "Ada");
        assert!(user.set_email("nope").is_err());
        assert_eq!(user.email(), "ada@example.com");

        user.set_name("Ada L.").unwrap();
        user.set_email("ada@lovelace.org").unwrap();
        assert_eq!(user.name(), "Ada L.");
        assert_eq!(user.email(), "ada@lovelace.org");
    }

    #[test]
    fn test_user_project_membership_idempotent() {
        let mut ids = IdAllocator::new();
        let mut user = User::new(&mut ids, "Ada", "ada@example.com").unwrap();
        user.add_project(4);
        user.add_project(4);
        user.add_project(2);
        assert_eq!(user.projects().as_slice(), &[4, 2]);
        user.remove_project(7);
        assert_eq!(user.projects().len(), 2);
    }

    #[test]
    fn test_user_record_round_trip() {
        let mut ids = IdAllocator::new();
        let mut user = User::new(&mut ids, "Ada", "ada@example.com").unwrap();
        user.add_project(1);
        user.add_project(3);

        let record = user.to_record();
        assert_eq!(record.projects, vec![1, 3]);

        let mut fresh = IdAllocator::new();
        let loaded = User::from_record(record, &mut fresh).unwrap();
        assert_eq!(loaded, user);
    }

    #[test]
    fn test_user_record_json_shape() {
        let user = User::new(&mut IdAllocator::new(), "Ada", "ada@example.com").unwrap();
        assert_eq!(
            serde_json::to_value(user.to_record()).unwrap(),
            serde_json::json!({
                "id": 1,
                "name": "Ada",
                "email": "ada@example.com",
                "projects": []
            })
        );
    }

    #[test]
    fn test_user_from_record_observes_id() {
        let record = UserRecord {
            id: 12,
            name: "Bob".to_string(),
            email: "bob@example.com".to_string(),
            projects: Vec::new(),
        };
        let mut ids = IdAllocator::new();
        User::from_record(record, &mut ids).unwrap();
        let next = User::new(&mut ids, "Carol", "carol@example.com").unwrap();
        assert_eq!(next.id(), 13);
    }

    #[test]
    fn test_user_from_record_runs_validators() {
        let record = UserRecord {
            id: 2,
            name: "Bob".to_string(),
            email: "no-at-sign".to_string(),
            projects: Vec::new(),
        };
        let mut ids = IdAllocator::new();
        let err = User::from_record(record, &mut ids).unwrap_err();
        assert_eq!(err.field(), Some("email"));
        // A rejected record does not move the counter
        assert_eq!(ids.peek(EntityKind::User), 1);
    }

    #[test]
    fn test_user_projects_default_to_empty() {
        let value = serde_json::json!({ "id": 1, "name": "Bob", "email": "bob@example.com" });
        let user: User = decode_record(value, &mut IdAllocator::new()).unwrap();
        assert!(user.projects().is_empty());
    }

    #[test]
    fn test_user_wrong_json_type_is_malformed() {
        let value = serde_json::json!({
            "id": 1,
            "name": ["Bob"],
            "email": "bob@example.com",
            "projects": []
        });
        let err = decode_record::<User>(value, &mut IdAllocator::new()).unwrap_err();
        assert!(matches!(
            err,
            ModelError::MalformedRecord {
                kind: EntityKind::User,
                ..
            }
        ));
    }
}
