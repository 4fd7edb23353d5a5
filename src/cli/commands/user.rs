//! `ptrack user` command - User management

use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::commands::utils::{print_entities, print_record, Session};
use crate::cli::helpers::success;
use crate::cli::table::user_listing;
use crate::cli::GlobalOpts;
use crate::core::entity::Entity;
use crate::core::identity::Id;
use crate::entities::User;

#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Add a new user
    Add(AddArgs),

    /// List users
    List(ListArgs),

    /// Show a user and the projects they own
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct AddArgs {
    /// User name (unique, case-insensitive)
    #[arg(long, short = 'n')]
    pub name: String,

    /// Email address
    #[arg(long, short = 'e')]
    pub email: String,
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only the user with this ID
    #[arg(long)]
    pub id: Option<Id>,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// User ID or name
    pub user: String,
}

pub fn run(cmd: UserCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        UserCommands::Add(args) => run_add(args, global),
        UserCommands::List(args) => run_list(args, global),
        UserCommands::Show(args) => run_show(args, global),
    }
}

fn run_add(args: AddArgs, global: &GlobalOpts) -> Result<()> {
    let mut session = Session::open(global)?;
    let (id, name) = {
        let user = session.tracker.add_user(&args.name, &args.email)?;
        (user.id(), user.name().to_string())
    };
    session.commit()?;

    success(
        global,
        format!("User '{}' added successfully with ID {}.", name, id),
    );
    Ok(())
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let users: Vec<&User> = session
        .tracker
        .users()
        .iter()
        .filter(|u| args.id.map_or(true, |id| u.id() == id))
        .collect();

    print_entities(&users, user_listing(&users), session.format(global))
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let tracker = &session.tracker;
    let user = tracker.find_user(&args.user)?;

    if print_record(user, session.format(global))? {
        return Ok(());
    }

    println!("{}", style("─".repeat(60)).dim());
    println!("{}: {}", style("ID").bold(), style(user.id()).cyan());
    println!("{}: {}", style("Name").bold(), style(user.name()).yellow());
    println!("{}: {}", style("Email").bold(), user.email());
    println!("{}", style("─".repeat(60)).dim());

    println!();
    println!("{} ({}):", style("Projects").bold(), user.projects().len());
    if user.projects().is_empty() {
        println!("  {}", style("none").dim());
    }
    for project_id in user.projects().iter() {
        match tracker.project_by_id(project_id) {
            Some(project) => println!("  • {} {}", style(project_id).dim(), project.title()),
            None => println!("  • {} {}", style(project_id).dim(), style("(missing)").red()),
        }
    }
    Ok(())
}
