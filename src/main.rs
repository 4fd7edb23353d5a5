use clap::Parser;
use miette::Result;
use ptrack::cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Reset SIGPIPE so piping into `head` exits quietly instead of panicking
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    let default_level = if global.verbose { "ptrack=debug" } else { "ptrack=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init(args) => ptrack::cli::commands::init::run(args),
        Commands::User(cmd) => ptrack::cli::commands::user::run(cmd, &global),
        Commands::Project(cmd) => ptrack::cli::commands::project::run(cmd, &global),
        Commands::Task(cmd) => ptrack::cli::commands::task::run(cmd, &global),
        Commands::Completions(args) => ptrack::cli::commands::completions::run(args),
    }
}
