//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::models::{Priority, TaskFilter};

/// Taskdesk - manage your tasks from the terminal
#[derive(Parser, Debug)]
#[command(name = "taskdesk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Backend base URL (overrides config and TASKDESK_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Path to an alternative config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in to an existing account
    Login {
        #[arg(long)]
        email: String,

        /// Password (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account and log in
    Register {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        /// Password (read from stdin when omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// Show who is logged in
    Whoami,

    /// Overview of your tasks
    Dashboard,

    /// List and edit tasks
    Tasks {
        #[command(subcommand)]
        action: TaskCommand,
    },

    /// Show or update your profile
    Profile {
        #[command(subcommand)]
        action: Option<ProfileCommand>,
    },
}

#[derive(Subcommand, Debug)]
pub enum TaskCommand {
    /// List tasks, newest first
    List {
        #[arg(short, long, value_enum, default_value_t = TaskFilter::All)]
        filter: TaskFilter,
    },

    /// Create a task
    Add {
        /// Task title
        title: String,

        #[command(flatten)]
        fields: TaskFields,
    },

    /// Change an existing task
    Edit {
        /// Task ID
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        #[command(flatten)]
        fields: TaskFields,
    },

    /// Mark a task completed, or pending again
    Toggle {
        /// Task ID
        id: String,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Optional task fields shared by `add` and `edit`.
#[derive(Args, Debug, Default)]
pub struct TaskFields {
    #[arg(short, long)]
    pub description: Option<String>,

    #[arg(short, long, value_enum)]
    pub priority: Option<Priority>,

    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Show your profile (default)
    Show,

    /// Change your name and email
    Update {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },
}
