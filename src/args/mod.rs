//! Command-line surface and option resolution.
//!
//! ```text
//! ptyattach [-c <exit-command>] [--shell <shell>] [--config <path>] <command> [args...]
//! ```
//!
//! Values from the command line win over the config file, which wins over
//! built-in defaults.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::attach::LaunchOptions;
use crate::config::Config;
use crate::exit_action::ExitAction;

#[derive(Debug, Parser)]
#[command(
    name = "ptyattach",
    version,
    about = "Run a command under a pseudo-terminal; press Ctrl+] three times quickly to end it"
)]
pub struct Cli {
    /// Shell command run on detach instead of SIGTERM; $TARGET_PID is the child's pid
    #[arg(short = 'c', long = "exit-command", value_name = "CMD")]
    pub exit_command: Option<String>,

    /// Interpreter for the exit command [default: bash]
    #[arg(long, value_name = "SHELL")]
    pub shell: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Command to run, followed by its arguments
    #[arg(required = true, trailing_var_arg = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("No cmd provided")]
    MissingCommand,
}

impl Cli {
    pub fn into_options(self, config: &Config) -> Result<LaunchOptions, UsageError> {
        let mut command = self.command.into_iter();
        let program = command.next().ok_or(UsageError::MissingCommand)?;
        let args: Vec<String> = command.collect();

        let shell = self.shell.unwrap_or_else(|| config.shell.clone());
        let exit_command = self
            .exit_command
            .or_else(|| config.exit_command.clone())
            .filter(|command| !command.is_empty());

        let exit_action = match exit_command {
            Some(command) => ExitAction::RunCommand { shell, command },
            None => ExitAction::Terminate,
        };

        Ok(LaunchOptions {
            command: program,
            args,
            exit_action,
            debounce: config.detach.debounce(),
        })
    }
}
