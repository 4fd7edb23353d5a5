//! In-memory aggregate of all three collections
//!
//! A `Tracker` is what a command works on: loaded in full from the store,
//! mutated through the operations below, then handed back to the store which
//! writes only the collections marked dirty. Every operation runs all of its
//! lookups and validation before it touches any collection.

use crate::core::entity::Entity;
use crate::core::error::TrackerError;
use crate::core::identity::{EntityKind, Id, IdAllocator};
use crate::core::links::{link_project, link_task};
use crate::core::resolve::{find_by_id, names_equal, resolve, resolve_index};
use crate::core::workflow::{self, Completion};
use crate::entities::project::DueDateInput;
use crate::entities::task::{TaskPatch, TaskStatus};
use crate::entities::{Project, Task, User};

/// Arguments for [`Tracker::add_project`]
#[derive(Debug, Clone, Default)]
pub struct NewProject {
    /// Owner token (id or name)
    pub user: String,
    pub title: String,
    pub description: String,
    /// Defaults to now when absent
    pub due_date: Option<DueDateInput>,
}

/// Arguments for [`Tracker::add_task`]
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    /// Project token (id or title)
    pub project: String,
    pub title: String,
    pub description: String,
    /// Assignee token (id or name)
    pub assign: Option<String>,
}

/// Arguments for [`Tracker::update_task`], as given on the command line
#[derive(Debug, Clone, Default)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    /// User token, or "none" to unassign
    pub assign: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Dirty {
    users: bool,
    projects: bool,
    tasks: bool,
}

/// All users, projects and tasks plus the identifier allocator
#[derive(Debug, Default)]
pub struct Tracker {
    users: Vec<User>,
    projects: Vec<Project>,
    tasks: Vec<Task>,
    ids: IdAllocator,
    dirty: Dirty,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble from loaded collections; `ids` must have observed every record
    pub fn from_parts(users: Vec<User>, projects: Vec<Project>, tasks: Vec<Task>, ids: IdAllocator) -> Self {
        Self {
            users,
            projects,
            tasks,
            ids,
            dirty: Dirty::default(),
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    /// Collections changed since load or the last save
    pub fn dirty_kinds(&self) -> Vec<EntityKind> {
        let mut kinds = Vec::new();
        if self.dirty.users {
            kinds.push(EntityKind::User);
        }
        if self.dirty.projects {
            kinds.push(EntityKind::Project);
        }
        if self.dirty.tasks {
            kinds.push(EntityKind::Task);
        }
        kinds
    }

    pub fn mark_clean(&mut self) {
        self.dirty = Dirty::default();
    }

    pub fn find_user(&self, token: &str) -> Result<&User, TrackerError> {
        resolve(&self.users, token).ok_or_else(|| TrackerError::not_found(EntityKind::User, token))
    }

    pub fn find_project(&self, token: &str) -> Result<&Project, TrackerError> {
        resolve(&self.projects, token)
            .ok_or_else(|| TrackerError::not_found(EntityKind::Project, token))
    }

    pub fn find_task(&self, token: &str) -> Result<&Task, TrackerError> {
        resolve(&self.tasks, token).ok_or_else(|| TrackerError::not_found(EntityKind::Task, token))
    }

    pub fn user_by_id(&self, id: Id) -> Option<&User> {
        find_by_id(&self.users, id)
    }

    pub fn project_by_id(&self, id: Id) -> Option<&Project> {
        find_by_id(&self.projects, id)
    }

    pub fn task_by_id(&self, id: Id) -> Option<&Task> {
        find_by_id(&self.tasks, id)
    }

    /// Projects owned by `user_id`
    pub fn projects_of(&self, user_id: Id) -> impl Iterator<Item = &Project> {
        self.projects.iter().filter(move |p| p.user_id() == user_id)
    }

    /// Tasks belonging to `project_id`
    pub fn tasks_of(&self, project_id: Id) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |t| t.project_id() == project_id)
    }

    /// Create a user with a name no other user has (case-insensitively)
    pub fn add_user(&mut self, name: &str, email: &str) -> Result<&User, TrackerError> {
        if self.users.iter().any(|u| names_equal(u.name(), name)) {
            return Err(TrackerError::Conflict {
                kind: EntityKind::User,
                value: name.to_string(),
                scope: None,
            });
        }

        let user = User::new(&mut self.ids, name, email)?;
        tracing::info!(id = user.id(), name = user.name(), "added user");
        self.users.push(user);
        self.dirty.users = true;
        Ok(&self.users[self.users.len() - 1])
    }

    /// Create a project under an existing user and record it on the owner
    pub fn add_project(&mut self, new: NewProject) -> Result<&Project, TrackerError> {
        let owner = resolve_index(&self.users, &new.user)
            .ok_or_else(|| TrackerError::not_found(EntityKind::User, &new.user))?;

        if self.projects.iter().any(|p| names_equal(p.title(), &new.title)) {
            return Err(TrackerError::Conflict {
                kind: EntityKind::Project,
                value: new.title,
                scope: None,
            });
        }

        let owner_id = self.users[owner].id();
        let project = Project::new(&mut self.ids, new.title, new.description, new.due_date, owner_id)?;
        link_project(&mut self.users[owner], &project);
        tracing::info!(id = project.id(), owner = owner_id, "added project");

        self.projects.push(project);
        self.dirty.projects = true;
        self.dirty.users = true;
        Ok(&self.projects[self.projects.len() - 1])
    }

    /// Create a task in an existing project and record it on the project
    pub fn add_task(&mut self, new: NewTask) -> Result<&Task, TrackerError> {
        let parent = resolve_index(&self.projects, &new.project)
            .ok_or_else(|| TrackerError::not_found(EntityKind::Project, &new.project))?;
        let project_id = self.projects[parent].id();

        if self
            .tasks_of(project_id)
            .any(|t| names_equal(t.title(), &new.title))
        {
            return Err(TrackerError::Conflict {
                kind: EntityKind::Task,
                value: new.title,
                scope: Some(self.projects[parent].title().to_string()),
            });
        }

        let assigned_to = match new.assign {
            Some(ref token) => Some(self.find_user(token)?.id()),
            None => None,
        };

        let task = Task::new(
            &mut self.ids,
            new.title,
            new.description,
            project_id,
            assigned_to,
            TaskStatus::Pending,
        )?;
        link_task(&mut self.projects[parent], &task);
        tracing::info!(id = task.id(), project = project_id, "added task");

        self.tasks.push(task);
        self.dirty.tasks = true;
        self.dirty.projects = true;
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Mark a task completed, or report that it already was
    pub fn complete_task(&mut self, token: &str) -> Result<(Completion, &Task), TrackerError> {
        let index = resolve_index(&self.tasks, token)
            .ok_or_else(|| TrackerError::not_found(EntityKind::Task, token))?;

        let outcome = workflow::complete(&mut self.tasks[index]);
        if outcome.changed() {
            self.dirty.tasks = true;
            tracing::info!(id = self.tasks[index].id(), "completed task");
        } else {
            tracing::warn!(id = self.tasks[index].id(), "task already completed, nothing written");
        }
        Ok((outcome, &self.tasks[index]))
    }

    /// Apply command-line changes to a task all-or-nothing.
    ///
    /// The flag is false when `update` asked for nothing; the task is then
    /// left untouched and not marked for writing.
    pub fn update_task(
        &mut self,
        token: &str,
        update: TaskUpdate,
    ) -> Result<(bool, &Task), TrackerError> {
        let index = resolve_index(&self.tasks, token)
            .ok_or_else(|| TrackerError::not_found(EntityKind::Task, token))?;
        let task_id = self.tasks[index].id();
        let project_id = self.tasks[index].project_id();

        if let Some(ref title) = update.title {
            let taken = self
                .tasks_of(project_id)
                .any(|t| t.id() != task_id && names_equal(t.title(), title));
            if taken {
                return Err(TrackerError::Conflict {
                    kind: EntityKind::Task,
                    value: title.clone(),
                    scope: self.project_by_id(project_id).map(|p| p.title().to_string()),
                });
            }
        }

        let status = update.status.as_deref().map(str::parse::<TaskStatus>).transpose()?;

        let assigned_to = match update.assign.as_deref() {
            None => None,
            Some(token) if token.eq_ignore_ascii_case("none") => Some(None),
            Some(token) => Some(Some(self.find_user(token)?.id())),
        };

        let patch = TaskPatch {
            title: update.title,
            description: update.description,
            status,
            assigned_to,
        };
        if patch.is_empty() {
            return Ok((false, &self.tasks[index]));
        }

        self.tasks[index].apply(patch)?;
        self.dirty.tasks = true;
        tracing::info!(id = task_id, "updated task");
        Ok((true, &self.tasks[index]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::entity::ModelError;

    fn seeded() -> Tracker {
        let mut tracker = Tracker::new();
        tracker.add_user("Ada", "ada@example.com").unwrap();
        tracker
            .add_project(NewProject {
                user: "Ada".to_string(),
                title: "Orbit".to_string(),
                due_date: Some("2030-01-01".into()),
                ..Default::default()
            })
            .unwrap();
        tracker
            .add_task(NewTask {
                project: "Orbit".to_string(),
                title: "Launch".to_string(),
                ..Default::default()
            })
            .unwrap();
        tracker.mark_clean();
        tracker
    }

    #[test]
    fn test_full_scenario() {
        let mut tracker = Tracker::new();
        assert_eq!(tracker.add_user("Ada", "ada@example.com").unwrap().id(), 1);

        let project = tracker
            .add_project(NewProject {
                user: "Ada".to_string(),
                title: "Orbit".to_string(),
                due_date: Some("2030-01-01".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(project.id(), 1);
        assert_eq!(tracker.users()[0].projects().as_slice(), &[1]);

        let task = tracker
            .add_task(NewTask {
                project: "Orbit".to_string(),
                title: "Launch".to_string(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(task.id(), 1);
        assert_eq!(tracker.projects()[0].tasks().as_slice(), &[1]);

        tracker.mark_clean();
        let (outcome, task) = tracker.complete_task("Launch").unwrap();
        assert!(outcome.changed());
        assert_eq!(task.status(), TaskStatus::Completed);
        assert_eq!(tracker.dirty_kinds(), vec![EntityKind::Task]);

        tracker.mark_clean();
        let (outcome, task) = tracker.complete_task("launch").unwrap();
        assert_eq!(outcome, Completion::AlreadyCompleted);
        assert_eq!(task.status(), TaskStatus::Completed);
        assert!(tracker.dirty_kinds().is_empty());
    }

    #[test]
    fn test_duplicate_user_name_rejected() {
        let mut tracker = Tracker::new();
        tracker.add_user("Bob", "bob@example.com").unwrap();
        let err = tracker.add_user("bob", "bob2@example.com").unwrap_err();
        assert!(matches!(err, TrackerError::Conflict { .. }));
        assert_eq!(tracker.users().len(), 1);
        // The rejected attempt did not burn an identifier
        assert_eq!(tracker.ids().peek(EntityKind::User), 2);
    }

    #[test]
    fn test_invalid_user_is_model_error() {
        let mut tracker = Tracker::new();
        let err = tracker.add_user("Ada", "nope").unwrap_err();
        assert!(matches!(err, TrackerError::Model(ModelError::Invalid { .. })));
        assert!(tracker.dirty_kinds().is_empty());
    }

    #[test]
    fn test_add_project_unknown_user() {
        let mut tracker = Tracker::new();
        let err = tracker
            .add_project(NewProject {
                user: "Ghost".to_string(),
                title: "Orbit".to_string(),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "User 'Ghost' not found.");
        assert!(tracker.projects().is_empty());
    }

    #[test]
    fn test_add_project_duplicate_title() {
        let mut tracker = seeded();
        let err = tracker
            .add_project(NewProject {
                user: "1".to_string(),
                title: "ORBIT".to_string(),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(err, TrackerError::Conflict { .. }));
        assert!(tracker.dirty_kinds().is_empty());
    }

    #[test]
    fn test_add_project_bad_due_date_leaves_owner_untouched() {
        let mut tracker = seeded();
        let err = tracker
            .add_project(NewProject {
                user: "Ada".to_string(),
                title: "Mars".to_string(),
                due_date: Some("someday".into()),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid due date format");
        assert_eq!(tracker.users()[0].projects().as_slice(), &[1]);
        assert!(tracker.dirty_kinds().is_empty());
    }

    #[test]
    fn test_task_titles_unique_per_project_only() {
        let mut tracker = seeded();
        tracker
            .add_project(NewProject {
                user: "Ada".to_string(),
                title: "Mars".to_string(),
                ..Default::default()
            })
            .unwrap();

        let err = tracker
            .add_task(NewTask {
                project: "Orbit".to_string(),
                title: "LAUNCH".to_string(),
                ..Default::default()
            })
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Task with title 'LAUNCH' already exists in project 'Orbit'."
        );

        let task = tracker
            .add_task(NewTask {
                project: "Mars".to_string(),
                title: "Launch".to_string(),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(task.id(), 2);
        assert_eq!(task.project_id(), 2);
    }

    #[test]
    fn test_add_task_unknown_assignee() {
        let mut tracker = seeded();
        let err = tracker
            .add_task(NewTask {
                project: "Orbit".to_string(),
                title: "Land".to_string(),
                assign: Some("Zed".to_string()),
                ..Default::default()
            })
            .unwrap_err();
        assert!(matches!(
            err,
            TrackerError::NotFound {
                kind: EntityKind::User,
                ..
            }
        ));
        assert_eq!(tracker.tasks().len(), 1);
        assert_eq!(tracker.projects()[0].tasks().len(), 1);
    }

    #[test]
    fn test_numeric_task_title_resolves_as_id() {
        let mut tracker = seeded();
        tracker
            .add_task(NewTask {
                project: "Orbit".to_string(),
                title: "42".to_string(),
                ..Default::default()
            })
            .unwrap();
        assert!(matches!(
            tracker.complete_task("42"),
            Err(TrackerError::NotFound { .. })
        ));
        assert_eq!(tracker.find_task("2").unwrap().title(), "42");
    }

    #[test]
    fn test_update_task_all_fields() {
        let mut tracker = seeded();
        tracker.add_user("Bob", "bob@example.com").unwrap();
        tracker.mark_clean();

        let (changed, task) = tracker
            .update_task(
                "Launch",
                TaskUpdate {
                    title: Some("Liftoff".to_string()),
                    description: Some("T-minus 10".to_string()),
                    status: Some("in_progress".to_string()),
                    assign: Some("bob".to_string()),
                },
            )
            .unwrap();
        assert!(changed);
        assert_eq!(task.title(), "Liftoff");
        assert_eq!(task.description(), "T-minus 10");
        assert_eq!(task.status(), TaskStatus::InProgress);
        assert_eq!(task.assigned_to(), Some(2));
        assert_eq!(tracker.dirty_kinds(), vec![EntityKind::Task]);

        let (changed, task) = tracker
            .update_task(
                "1",
                TaskUpdate {
                    assign: Some("None".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(changed);
        assert_eq!(task.assigned_to(), None);
    }

    #[test]
    fn test_update_task_invalid_status_changes_nothing() {
        let mut tracker = seeded();
        let err = tracker
            .update_task(
                "Launch",
                TaskUpdate {
                    title: Some("Liftoff".to_string()),
                    status: Some("done".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, TrackerError::Model(_)));
        assert_eq!(tracker.tasks()[0].title(), "Launch");
        assert!(tracker.dirty_kinds().is_empty());
    }

    #[test]
    fn test_update_task_rename_conflict() {
        let mut tracker = seeded();
        tracker
            .add_task(NewTask {
                project: "Orbit".to_string(),
                title: "Land".to_string(),
                ..Default::default()
            })
            .unwrap();
        let err = tracker
            .update_task(
                "Land",
                TaskUpdate {
                    title: Some("launch".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, TrackerError::Conflict { .. }));

        // Renaming to its own title with different case is allowed
        tracker
            .update_task(
                "Land",
                TaskUpdate {
                    title: Some("LAND".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();
    }

    #[test]
    fn test_update_task_without_changes_is_clean() {
        let mut tracker = seeded();
        let (changed, task) = tracker.update_task("Launch", TaskUpdate::default()).unwrap();
        assert!(!changed);
        assert_eq!(task.title(), "Launch");
        assert!(tracker.dirty_kinds().is_empty());
    }

    #[test]
    fn test_projects_and_tasks_filters() {
        let tracker = seeded();
        assert_eq!(tracker.projects_of(1).count(), 1);
        assert_eq!(tracker.projects_of(2).count(), 0);
        assert_eq!(tracker.tasks_of(1).count(), 1);
        assert_eq!(tracker.user_by_id(1).map(|u| u.name()), Some("Ada"));
    }
}
