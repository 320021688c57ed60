/*
[INPUT]:  Command line arguments
[OUTPUT]: Parsed commands for the taskdeck binary
[POS]:    CLI definition
[UPDATE]: When adding commands or flags
*/

pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use taskdeck_adapter::TaskStatus;

#[derive(Parser, Debug)]
#[command(name = "taskdeck", version, about = "Tasks and files against the hosted backend")]
pub struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    pub config_path: Option<PathBuf>,
    /// Overrides the configured log level
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Register a new account
    SignUp {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// Confirm an account with the emailed code, then sign in
    Confirm {
        #[arg(long)]
        email: String,
        #[arg(long)]
        code: String,
        #[arg(long)]
        password: Option<String>,
    },
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: Option<String>,
    },
    SignOut,
    /// Show the signed-in user
    Whoami,
    #[command(subcommand)]
    Tasks(TaskCommand),
    #[command(subcommand)]
    Files(FileCommand),
    #[command(subcommand)]
    Avatar(AvatarCommand),
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    List,
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: Option<String>,
        #[arg(long, default_value = "open", value_parser = parse_status)]
        status: TaskStatus,
    },
    /// Mark a task done
    Done { id: String },
    Status {
        id: String,
        #[arg(value_parser = parse_status)]
        status: TaskStatus,
    },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum FileCommand {
    List,
    /// Upload a local file and make it the avatar
    Upload { path: PathBuf },
    /// Delete by full object path
    Delete { path: String },
    /// Download an upload by its stored name
    Download {
        name: String,
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },
}

#[derive(Subcommand, Debug)]
pub enum AvatarCommand {
    Show,
    Set { url: String },
}

fn parse_status(value: &str) -> Result<TaskStatus, String> {
    value.parse()
}
