//! `ptrack completions` command - print a completion script to stdout
//!
//! Completions cover the `user`, `project` and `task` nouns with their
//! subcommands and flags. Entity names and ids are not completed since they
//! live in the data directory, not in the command definition.
//!
//! ```bash
//! source <(ptrack completions bash)
//! ptrack completions fish > ~/.config/fish/completions/ptrack.fish
//! ```

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use miette::{IntoDiagnostic, Result};
use std::io::{self, Write};

use crate::cli::Cli;

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell (bash, zsh, fish, elvish, powershell)
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn run(args: CompletionsArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_script(args.shell, &mut out);
    out.flush().into_diagnostic()
}

/// Write the completion script for `shell`, named after the binary
fn write_script(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(shell: Shell) -> String {
        let mut buf = Vec::new();
        write_script(shell, &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_bash_script_knows_nouns() {
        let bash = script(Shell::Bash);
        assert!(bash.contains("ptrack"));
        for noun in ["user", "project", "task", "init"] {
            assert!(bash.contains(noun), "missing {}", noun);
        }
    }

    #[test]
    fn test_fish_script_lists_task_update_flags() {
        let fish = script(Shell::Fish);
        assert!(fish.contains("complete -c ptrack"));
        assert!(fish.contains("assign"));
    }
}
