//! Table formatting for list commands
//!
//! Each list command turns its entities into a [`Listing`]: a title, column
//! headers and rows of typed [`CellValue`]s. The same listing renders as a
//! coloured table for terminals or as plain CSV for piping.

use chrono::{DateTime, Utc};
use console::style;
use miette::{IntoDiagnostic, Result};
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{format_date, truncate_str};
use crate::core::entity::Entity;
use crate::core::identity::Id;
use crate::core::tracker::Tracker;
use crate::entities::task::TaskStatus;
use crate::entities::{Project, Task, User};

/// Widest a free-text column gets in table output
const MAX_TEXT_WIDTH: usize = 40;

/// A typed cell value with semantic meaning for formatting
#[derive(Debug, Clone)]
pub enum CellValue {
    /// Entity ID (dim)
    Id(Id),
    /// Name or title (bold)
    Name(String),
    /// Plain text, truncated in tables
    Text(String),
    /// Task status with colour coding
    Status(TaskStatus),
    /// Due date, red when overdue and yellow when due soon
    DueDate {
        date: DateTime<Utc>,
        overdue: bool,
        soon: bool,
    },
    /// Right-hand count column
    Count(usize),
    /// Placeholder such as "Unassigned" (dim)
    Placeholder(String),
}

impl CellValue {
    /// Uncoloured, untruncated text (CSV)
    pub fn plain(&self) -> String {
        match self {
            CellValue::Id(id) => id.to_string(),
            CellValue::Name(s) | CellValue::Text(s) | CellValue::Placeholder(s) => s.clone(),
            CellValue::Status(status) => status.to_string(),
            CellValue::DueDate { date, .. } => format_date(*date),
            CellValue::Count(n) => n.to_string(),
        }
    }

    /// Coloured text for terminal tables
    pub fn styled(&self) -> String {
        match self {
            CellValue::Id(id) => style(id).dim().to_string(),
            CellValue::Name(s) => style(truncate_str(s, MAX_TEXT_WIDTH)).bold().to_string(),
            CellValue::Text(s) => truncate_str(s, MAX_TEXT_WIDTH),
            CellValue::Status(status) => {
                let s = status.to_string();
                let styled = match status {
                    TaskStatus::Completed => style(s).green().bold(),
                    TaskStatus::InProgress => style(s).blue().bold(),
                    TaskStatus::Cancelled => style(s).red().bold(),
                    TaskStatus::Pending => style(s).yellow().bold(),
                };
                styled.to_string()
            }
            CellValue::DueDate {
                date,
                overdue,
                soon,
            } => {
                let s = format_date(*date);
                if *overdue {
                    style(s).red().bold().to_string()
                } else if *soon {
                    style(s).yellow().bold().to_string()
                } else {
                    s
                }
            }
            CellValue::Count(n) => format!("{:>5}", n),
            CellValue::Placeholder(s) => style(s).dim().to_string(),
        }
    }
}

/// Rows ready for output
#[derive(Debug, Clone)]
pub struct Listing {
    pub title: &'static str,
    /// Singular noun for summaries ("user", "project", "task")
    pub noun: &'static str,
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Message for an empty listing, e.g. "No users found."
    pub fn empty_message(&self) -> String {
        format!("No {}s found.", self.noun)
    }

    /// Render as a bordered table with title and summary
    pub fn render_table(&self) -> String {
        let mut builder = Builder::default();
        builder.push_record(self.headers.iter().map(|h| style(h).bold().to_string()));
        for row in &self.rows {
            builder.push_record(row.iter().map(CellValue::styled));
        }

        let mut output = String::new();
        output.push_str(&format!("{}\n", style(self.title).bold().blue()));
        output.push_str(&builder.build().with(Style::rounded()).to_string());
        output.push_str(&format!(
            "\n{} {}(s) found.\n",
            style(self.rows.len()).cyan(),
            self.noun
        ));
        output
    }

    /// Render as CSV with lowercase snake_case headers
    pub fn render_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(self.headers.iter().map(|h| h.to_lowercase().replace(' ', "_")))
            .into_diagnostic()?;
        for row in &self.rows {
            writer
                .write_record(row.iter().map(CellValue::plain))
                .into_diagnostic()?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| miette::miette!("failed to flush CSV output: {}", e.error()))?;
        String::from_utf8(bytes).into_diagnostic()
    }
}

/// Users: id, name, email and number of owned projects
pub fn user_listing(users: &[&User]) -> Listing {
    Listing {
        title: "Users",
        noun: "user",
        headers: vec!["ID", "Name", "Email", "Projects"],
        rows: users
            .iter()
            .map(|u| {
                vec![
                    CellValue::Id(u.id()),
                    CellValue::Name(u.name().to_string()),
                    CellValue::Text(u.email().to_string()),
                    CellValue::Count(u.projects().len()),
                ]
            })
            .collect(),
    }
}

/// Projects: owner is shown by name, due dates are highlighted relative to `now`
pub fn project_listing(
    projects: &[&Project],
    tracker: &Tracker,
    now: DateTime<Utc>,
    due_soon_days: i64,
) -> Listing {
    Listing {
        title: "Projects",
        noun: "project",
        headers: vec!["ID", "Title", "Owner", "Due Date", "Tasks"],
        rows: projects
            .iter()
            .map(|p| {
                let owner = match tracker.user_by_id(p.user_id()) {
                    Some(user) => CellValue::Text(user.name().to_string()),
                    None => CellValue::Placeholder(format!("User {}", p.user_id())),
                };
                vec![
                    CellValue::Id(p.id()),
                    CellValue::Name(p.title().to_string()),
                    owner,
                    CellValue::DueDate {
                        date: p.due_date(),
                        overdue: p.is_overdue(now),
                        soon: p.is_due_soon(now, due_soon_days),
                    },
                    CellValue::Count(p.tasks().len()),
                ]
            })
            .collect(),
    }
}

/// Tasks: project and assignee are shown by name
pub fn task_listing(tasks: &[&Task], tracker: &Tracker) -> Listing {
    Listing {
        title: "Tasks",
        noun: "task",
        headers: vec!["ID", "Title", "Project", "Assigned To", "Status"],
        rows: tasks
            .iter()
            .map(|t| {
                let project = match tracker.project_by_id(t.project_id()) {
                    Some(project) => CellValue::Text(project.title().to_string()),
                    None => CellValue::Placeholder(format!("Project {}", t.project_id())),
                };
                let assignee = match t.assigned_to() {
                    None => CellValue::Placeholder("Unassigned".to_string()),
                    Some(id) => match tracker.user_by_id(id) {
                        Some(user) => CellValue::Text(user.name().to_string()),
                        None => CellValue::Placeholder(format!("User {}", id)),
                    },
                };
                vec![
                    CellValue::Id(t.id()),
                    CellValue::Name(t.title().to_string()),
                    project,
                    assignee,
                    CellValue::Status(t.status()),
                ]
            })
            .collect(),
    }
}
