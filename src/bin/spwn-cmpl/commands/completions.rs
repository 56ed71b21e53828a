//! `spwn-cmpl completions` command

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::{generate, Shell};

use crate::cli::{Cli, CompletionsArgs};

const BIN_NAME: &str = "spwn-cmpl";

pub fn execute(args: CompletionsArgs) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_completions(args.shell, &mut out)?;
    out.flush().context("failed to write completions")
}

/// Completion script for `shell`, registered under the installed binary name.
fn write_completions(shell: Shell, out: &mut dyn Write) -> Result<()> {
    let mut cmd = Cli::command().bin_name(BIN_NAME);
    generate(shell, &mut cmd, BIN_NAME, out);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(shell: Shell) -> String {
        let mut buf = Vec::new();
        write_completions(shell, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_bash_covers_subcommands_and_flags() {
        let bash = script(Shell::Bash);
        assert!(bash.contains("spwn-cmpl"));
        for word in ["build", "resolve", "inspect", "unpack", "--include", "--platform"] {
            assert!(bash.contains(word), "missing {word}");
        }
    }

    #[test]
    fn test_zsh_uses_binary_name() {
        assert!(script(Shell::Zsh).contains("#compdef spwn-cmpl"));
    }
}
