//! `ptrack project` command - Project management

use chrono::Utc;
use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::commands::utils::{print_entities, print_record, Session};
use crate::cli::helpers::{format_date, success};
use crate::cli::table::project_listing;
use crate::cli::GlobalOpts;
use crate::core::entity::Entity;
use crate::core::identity::Id;
use crate::core::tracker::NewProject;
use crate::entities::Project;

#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Add a project owned by a user
    Add(AddArgs),

    /// List projects
    List(ListArgs),

    /// Show a project and its tasks
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// Owner (user ID or name)
    #[arg(long, short = 'u')]
    pub user: String,

    /// Project title (unique, case-insensitive)
    #[arg(long, short = 't')]
    pub title: String,

    /// Project description
    #[arg(long, short = 'd', default_value = "")]
    pub description: String,

    /// Due date, e.g. 2030-01-01 or 2030-01-01T09:00:00Z (default: now)
    #[arg(long)]
    pub due_date: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only projects owned by this user (ID or name)
    #[arg(long, short = 'u')]
    pub user: Option<String>,

    /// Only the project with this ID
    #[arg(long)]
    pub id: Option<Id>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Project ID or title
    pub project: String,
}

pub fn run(cmd: ProjectCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ProjectCommands::Add(args) => run_add(args, global),
        ProjectCommands::List(args) => run_list(args, global),
        ProjectCommands::Show(args) => run_show(args, global),
    }
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let (id, title) = {
        let project = session.tracker.add_project(NewProject {
            user: args.user,
            title: args.title,
            description: args.description,
            due_date: args.due_date.map(Into::into),
        })?;
        (project.id(), project.title().to_string())
    };
    session.commit()?;

    success(
        global,
        format!("Project '{}' added successfully with ID {}.", title, id),
    );
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let tracker = &session.tracker;

    let owner = match args.user {
        Some(ref token) => Some(tracker.find_user(token)?.id()),
        None => None,
    };

    let projects: Vec<&Project> = tracker
        .projects()
        .iter()
        .filter(|p| owner.map_or(true, |id| p.user_id() == id))
        .filter(|p| args.id.map_or(true, |id| p.id() == id))
        .collect();

    let listing = project_listing(
        &projects,
        tracker,
        Utc::now(),
        session.config.due_soon_days(),
    );
    print_entities(&projects, listing, session.format(global))
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let tracker = &session.tracker;
    let project = tracker.find_project(&args.project)?;

    if print_record(project, session.format(global))? {
        return Ok(());
    }

    let now = Utc::now();
    let due = format_date(project.due_date());
    let due = if project.is_overdue(now) {
        style(format!("{} (overdue)", due)).red().bold()
    } else if project.is_due_soon(now, session.config.due_soon_days()) {
        style(format!("{} (due soon)", due)).yellow().bold()
    } else {
        style(due)
    };
    let owner = tracker
        .user_by_id(project.user_id())
        .map(|u| u.name().to_string())
        .unwrap_or_else(|| format!("User {}", project.user_id()));

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(project.id()).cyan());
    println!("{}: {}", style("Title").bold(), style(project.title()).yellow());
    println!("{}: {}", style("Owner").bold(), owner);
    println!("{}: {}", style("Due Date").bold(), due);
    println!("{}", style("─".repeat(60)).dim());

    if !project.description().is_empty() {
        println!();
        println!("{}", project.description());
    }

    println!();
    println!("{} ({}):", style("Tasks").bold(), project.tasks().len());
    if project.tasks().is_empty() {
        println!("  {}", style("none").dim());
    }
    for task_id in project.tasks().iter() {
        match tracker.task_by_id(task_id) {
            Some(task) => println!(
                "  • {} {} [{}]",
                style(task_id).dim(),
                task.title(),
                task.status()
            ),
            None => println!("  • {} {}", style(task_id).dim(), style("(missing)").red()),
        }
    }
    Ok(())
}
