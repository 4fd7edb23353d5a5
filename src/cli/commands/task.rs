//! `ptrack task` command - Task management

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::commands::utils::{print_entities, print_record, Session};
use crate::cli::helpers::{success, warning};
use crate::cli::table::{task_listing, CellValue};
use crate::cli::GlobalOpts;
use crate::core::entity::Entity;
use crate::core::error::TrackerError;
use crate::core::tracker::{NewTask, TaskUpdate};
use crate::core::workflow::Completion;
use crate::entities::task::TaskStatus;
use crate::entities::Task;

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Add a task to a project
    Add(AddArgs),

    /// List tasks
    List(ListArgs),

    /// Show a task's details
    Show(ShowArgs),

    /// Mark a task as completed
    Complete(CompleteArgs),

    /// Change a task's title, description, status or assignee
    Update(UpdateArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Project (ID or title)
    #[arg(long, short = 'p')]
    pub project: String,

    /// Task title (unique within the project, case-insensitive)
    #[arg(long, short = 't')]
    pub title: String,

    /// Task description
    #[arg(long, short = 'd', default_value = "")]
    pub description: String,

    /// Assign to a user (ID or name)
    #[arg(long, short = 'a')]
    pub assign: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only tasks in this project (ID or title)
    #[arg(long, short = 'p')]
    pub project: Option<String>,

    /// Only tasks with this status (pending, in_progress, completed, cancelled)
    #[arg(long, short = 's')]
    pub status: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Task ID or title
    pub task: String,
}

#[derive(clap::Args, Debug)]
pub struct CompleteArgs {
    /// Task ID or title
    pub task: String,
}

#[derive(clap::Args, Debug)]
pub struct UpdateArgs {
    /// Task ID or title
    pub task: String,

    /// New title
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// New description
    #[arg(long, short = 'd')]
    pub description: Option<String>,

    /// New status (pending, in_progress, completed, cancelled)
    #[arg(long, short = 's')]
    pub status: Option<String>,

    /// Assign to a user (ID or name), or "none" to unassign
    #[arg(long, short = 'a')]
    pub assign: Option<String>,
}

pub fn run(cmd: TaskCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        TaskCommands::Add(args) => run_add(args, global),
        TaskCommands::List(args) => run_list(args, global),
        TaskCommands::Show(args) => run_show(args, global),
        TaskCommands::Complete(args) => run_complete(args, global),
        TaskCommands::Update(args) => run_update(args, global),
    }
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let (id, title) = {
        let task = session.tracker.add_task(NewTask {
            project: args.project,
            title: args.title,
            description: args.description,
            assign: args.assign,
        })?;
        (task.id(), task.title().to_string())
    };
    session.commit()?;

    success(
        global,
        format!("Task '{}' added successfully with ID {}.", title, id),
    );
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let tracker = &session.tracker;

    let status = match args.status {
        Some(ref s) => Some(s.parse::<TaskStatus>().map_err(TrackerError::from)?),
        None => None,
    };
    let project = match args.project {
        Some(ref token) => Some(tracker.find_project(token)?.id()),
        None => None,
    };

    let tasks: Vec<&Task> = tracker
        .tasks()
        .iter()
        .filter(|t| project.map_or(true, |id| t.project_id() == id))
        .filter(|t| status.map_or(true, |s| t.status() == s))
        .collect();

    print_entities(&tasks, task_listing(&tasks, tracker), session.format(global))
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let tracker = &session.tracker;
    let task = tracker.find_task(&args.task)?;

    if print_record(task, session.format(global))? {
        return Ok(());
    }

    let project = tracker
        .project_by_id(task.project_id())
        .map(|p| p.title().to_string())
        .unwrap_or_else(|| format!("Project {}", task.project_id()));
    let assignee = match task.assigned_to() {
        None => style("Unassigned".to_string()).dim(),
        Some(id) => match tracker.user_by_id(id) {
            Some(user) => style(user.name().to_string()),
            None => style(format!("User {}", id)).dim(),
        },
    };

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(task.id()).cyan());
    println!("{}: {}", style("Title").bold(), style(task.title()).yellow());
    println!("{}: {}", style("Project").bold(), project);
    println!("{}: {}", style("Assigned To").bold(), assignee);
    println!(
        "{}: {}",
        style("Status").bold(),
        CellValue::Status(task.status()).styled()
    );
    println!("{}", style("─".repeat(60)).dim());

    if !task.description().is_empty() {
        println!();
        println!("{}", task.description());
    }
    Ok(())
}

fn run_complete(args: CompleteArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let (outcome, title) = {
        let (outcome, task) = session.tracker.complete_task(&args.task)?;
        (outcome, task.title().to_string())
    };

    match outcome {
        Completion::AlreadyCompleted => {
            warning(format!("Task '{}' is already completed.", title));
        }
        Completion::Completed { .. } => {
            session.commit()?;
            success(global, format!("Task '{}' marked as completed.", title));
        }
    }
    Ok(())
}

fn run_update(args: UpdateArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let update = TaskUpdate {
        title: args.title,
        description: args.description,
        status: args.status,
        assign: args.assign,
    };
    let (changed, title) = {
        let (changed, task) = session.tracker.update_task(&args.task, update)?;
        (changed, task.title().to_string())
    };

    if !changed {
        warning(format!("No changes given for task '{}'.", title));
        return Ok(());
    }

    session.commit()?;
    success(global, format!("Task '{}' updated successfully.", title));
    Ok(())
}
