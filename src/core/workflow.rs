//! Task status workflow
//!
//! `pending` → `in_progress` → `completed` | `cancelled`. The general status
//! setter accepts any of the four values in any order; only completion has a
//! guarded entry point so a redundant completion is reported, not repeated.

use crate::entities::task::{Task, TaskStatus};

/// Outcome of asking for a task to be completed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Status changed to completed; the task must be persisted
    Completed { previous: TaskStatus },
    /// Nothing to do; the task was already completed
    AlreadyCompleted,
}

impl Completion {
    /// Whether the task changed and needs writing
    pub fn changed(&self) -> bool {
        matches!(self, Completion::Completed { .. })
    }
}

/// Complete `task` unless it already is
pub fn complete(task: &mut Task) -> Completion {
    let previous = task.status();
    if previous == TaskStatus::Completed {
        return Completion::AlreadyCompleted;
    }
    task.mark_completed();
    Completion::Completed { previous }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::identity::IdAllocator;

    fn task(status: TaskStatus) -> Task {
        Task::new(&mut IdAllocator::new(), "Launch", "", 1, None, status).unwrap()
    }

    #[test]
    fn test_complete_pending_task() {
        let mut t = task(TaskStatus::Pending);
        let outcome = complete(&mut t);
        assert_eq!(
            outcome,
            Completion::Completed {
                previous: TaskStatus::Pending
            }
        );
        assert!(outcome.changed());
        assert_eq!(t.status(), TaskStatus::Completed);
    }

    #[test]
    fn test_complete_twice_reports_already_completed() {
        let mut t = task(TaskStatus::InProgress);
        complete(&mut t);
        let outcome = complete(&mut t);
        assert_eq!(outcome, Completion::AlreadyCompleted);
        assert!(!outcome.changed());
        assert_eq!(t.status(), TaskStatus::Completed);
    }

    #[test]
    fn test_cancelled_task_can_still_be_completed() {
        let mut t = task(TaskStatus::Cancelled);
        assert!(complete(&mut t).changed());
    }
}
