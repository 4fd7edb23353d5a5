//! Token resolution: find an entity by id or by name/title
//!
//! A token that is an integer literal (optional sign, then digits) is *only*
//! ever matched against ids, however large it is. Names are compared
//! case-insensitively, and only for tokens that are not integers. So a
//! project literally titled "42" cannot be found with the token `42` unless
//! project 42 happens to exist; use its id instead.

use crate::core::entity::Entity;
use crate::core::identity::Id;

/// How a token will be interpreted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// An integer literal. `None` when it cannot be an id (negative,
    /// or too large), so it matches nothing.
    Id(Option<Id>),
    Name(&'a str),
}

impl<'a> Token<'a> {
    pub fn parse(token: &'a str) -> Self {
        let trimmed = token.trim();
        let digits = trimmed
            .strip_prefix(|c: char| c == '+' || c == '-')
            .unwrap_or(trimmed);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Token::Name(token);
        }
        if trimmed.starts_with('-') {
            return Token::Id(None);
        }
        Token::Id(digits.parse::<Id>().ok())
    }

    fn matches<T: Entity>(&self, entity: &T) -> bool {
        match self {
            Token::Id(id) => *id == Some(entity.id()),
            Token::Name(name) => names_equal(entity.lookup_name(), name),
        }
    }
}

/// Case-insensitive name comparison used for lookup and uniqueness checks
pub fn names_equal(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Position of the first entity matching `token`
pub fn resolve_index<T: Entity>(items: &[T], token: &str) -> Option<usize> {
    let token = Token::parse(token);
    items.iter().position(|item| token.matches(item))
}

/// First entity matching `token`
pub fn resolve<'a, T: Entity>(items: &'a [T], token: &str) -> Option<&'a T> {
    resolve_index(items, token).map(|i| &items[i])
}

/// First entity matching `token`, mutably
pub fn resolve_mut<'a, T: Entity>(items: &'a mut [T], token: &str) -> Option<&'a mut T> {
    let index = resolve_index(items, token)?;
    items.get_mut(index)
}

/// Entity with exactly this id
pub fn find_by_id<T: Entity>(items: &[T], id: Id) -> Option<&T> {
    items.iter().find(|item| item.id() == id)
}

/// Entity with exactly this id, mutably
pub fn find_by_id_mut<T: Entity>(items: &mut [T], id: Id) -> Option<&mut T> {
    items.iter_mut().find(|item| item.id() == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::IdAllocator;
    use crate::entities::task::TaskStatus;
    use crate::entities::{Task, User};

    fn users() -> Vec<User> {
        let mut ids = IdAllocator::new();
        vec![
            User::new(&mut ids, "Ada", "ada@example.com").unwrap(),
            User::new(&mut ids, "Bob", "bob@example.com").unwrap(),
        ]
    }

    #[test]
    fn test_token_parse() {
        assert_eq!(Token::parse("42"), Token::Id(Some(42)));
        assert_eq!(Token::parse(" 7 "), Token::Id(Some(7)));
        assert_eq!(Token::parse("+7"), Token::Id(Some(7)));
        assert_eq!(Token::parse("-1"), Token::Id(None));
        assert_eq!(Token::parse("99999999999999999999"), Token::Id(None));
        assert_eq!(Token::parse("Ada"), Token::Name("Ada"));
        assert_eq!(Token::parse("4x"), Token::Name("4x"));
        assert_eq!(Token::parse("-"), Token::Name("-"));
        assert_eq!(Token::parse(""), Token::Name(""));
    }

    #[test]
    fn test_resolve_by_id() {
        let users = users();
        assert_eq!(resolve(&users, "2").map(|u| u.name()), Some("Bob"));
        assert!(resolve(&users, "3").is_none());
        assert!(resolve(&users, "-1").is_none());
    }

    #[test]
    fn test_resolve_by_name_case_insensitive() {
        let users = users();
        assert_eq!(resolve(&users, "ada").map(|u| u.id()), Some(1));
        assert_eq!(resolve(&users, "BOB").map(|u| u.id()), Some(2));
        assert!(resolve(&users, "Carol").is_none());
    }

    #[test]
    fn test_resolve_every_entity_by_id_and_name() {
        let users = users();
        for user in &users {
            assert_eq!(resolve(&users, &user.id().to_string()), Some(user));
            assert_eq!(resolve(&users, user.name()), Some(user));
        }
    }

    #[test]
    fn test_numeric_title_is_treated_as_id() {
        let mut ids = IdAllocator::new();
        let tasks = vec![Task::new(&mut ids, "42", "", 1, None, TaskStatus::Pending).unwrap()];
        assert!(resolve(&tasks, "42").is_none());
        assert_eq!(resolve(&tasks, "1").map(|t| t.title()), Some("42"));
    }

    #[test]
    fn test_oversized_integer_title_is_still_an_id() {
        let mut ids = IdAllocator::new();
        let title = "99999999999999999999";
        let tasks = vec![Task::new(&mut ids, title, "", 1, None, TaskStatus::Pending).unwrap()];
        assert!(resolve(&tasks, title).is_none());
        assert!(resolve(&tasks, "-1").is_none());
        assert_eq!(resolve(&tasks, "+1").map(|t| t.title()), Some(title));
    }

    #[test]
    fn test_tasks_resolve_across_projects() {
        let mut ids = IdAllocator::new();
        let tasks = vec![
            Task::new(&mut ids, "Launch", "", 1, None, TaskStatus::Pending).unwrap(),
            Task::new(&mut ids, "Launch", "", 2, None, TaskStatus::Pending).unwrap(),
        ];
        // First match wins regardless of project
        assert_eq!(resolve(&tasks, "launch").map(|t| t.project_id()), Some(1));
    }

    #[test]
    fn test_resolve_mut() {
        let mut users = users();
        if let Some(bob) = resolve_mut(&mut users, "bob") {
            bob.set_email("robert@example.com").unwrap();
        }
        assert_eq!(users[1].email(), "robert@example.com");
        assert!(find_by_id(&users, 2).is_some());
        assert!(find_by_id_mut(&mut users, 9).is_none());
    }
}
