//! CLI command execution.
//!
//! Each run is one application start: load config, restore the session, then
//! run the command inside the auth provider scope.

use std::fmt::Write as _;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::api::{ApiClient, ProfileUpdate};
use crate::auth::{use_auth, AuthProvider, AuthService};
use crate::config::Config;
use crate::models::{RecordId, Task, TaskDraft, User};
use crate::storage::{FileStore, KeyValueStore};
use crate::views::{self, Section};

use super::args::{Cli, Commands, ProfileCommand, TaskCommand, TaskFields};

/// Resolve configuration from file, environment and flags.
pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            let mut config = Config::load_from(path)?;
            config.apply_env(|key| std::env::var(key).ok());
            config
        }
        None => Config::load()?,
    };
    if let Some(url) = &cli.api_url {
        config = config.with_api_url(url.clone());
    }
    Ok(config)
}

pub async fn execute(cli: Cli, config: Config) -> Result<()> {
    let Some(command) = cli.command else {
        print_usage();
        return Ok(());
    };

    let data_dir = config.data_dir()?;
    debug!(api_url = %config.api_url, data_dir = %data_dir.display(), "Starting");

    let storage: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(&data_dir));
    let api = ApiClient::new(&config, storage).context("Failed to build HTTP client")?;
    let provider = AuthProvider::new(api, config.strict_user_validation);

    provider.bootstrap().await;
    provider.scope(run(command)).await
}

fn print_usage() {
    println!("Taskdesk - manage your tasks from the terminal");
    println!();
    println!("Usage: taskdesk <COMMAND>");
    println!();
    println!("Commands:");
    println!("  login       Log in to an existing account");
    println!("  register    Create an account and log in");
    println!("  logout      Forget the stored session");
    println!("  whoami      Show who is logged in");
    println!("  dashboard   Overview of your tasks");
    println!("  tasks       List and edit tasks");
    println!("  profile     Show or update your profile");
    println!();
    println!("Run `taskdesk <COMMAND> --help` for details.");
}

async fn run(command: Commands) -> Result<()> {
    let auth = use_auth();

    if let Some(placeholder) = views::loading_placeholder(&auth.state()) {
        println!("{placeholder}");
    }

    match command {
        Commands::Login { email, password } => {
            let password = read_secret(password, "Password")?;
            let result = auth.login(&email, &password).await;
            finish_auth(&auth, result)
        }
        Commands::Register {
            name,
            email,
            password,
        } => {
            let password = read_secret(password, "Password")?;
            let result = auth.register(&name, &email, &password).await;
            finish_auth(&auth, result)
        }
        Commands::Logout => {
            auth.logout();
            println!("Logged out.");
            Ok(())
        }
        Commands::Whoami => {
            match auth.state().user {
                Some(user) => println!("{}", describe_user(&user)),
                None => println!("Not logged in."),
            }
            Ok(())
        }
        Commands::Dashboard => {
            let user = require_login(&auth, Section::Dashboard)?;
            let tasks = views::fetch_dashboard(auth.api()).await;
            print!("{}", views::render_dashboard(Some(&user), &tasks));
            Ok(())
        }
        Commands::Tasks { action } => {
            require_login(&auth, Section::Tasks)?;
            run_task_command(auth.api(), action).await
        }
        Commands::Profile { action } => {
            let user = require_login(&auth, Section::Profile)?;
            run_profile_command(auth.api(), &user, action.unwrap_or(ProfileCommand::Show)).await
        }
    }
}

fn finish_auth(auth: &AuthService, result: Result<(), crate::auth::AuthFailure>) -> Result<()> {
    match result {
        Ok(()) => {
            let state = auth.state();
            let user = state.user.as_ref().map_or("-".to_string(), describe_user);
            println!("Logged in as {user}");
            Ok(())
        }
        Err(failure) => {
            let message = auth.state().error.unwrap_or(failure.message);
            auth.clear_error();
            bail!(message)
        }
    }
}

fn describe_user(user: &User) -> String {
    let name = user.display_name();
    let mut out = name.to_string();
    if let Some(email) = user.email.as_deref().filter(|e| *e != name) {
        let _ = write!(out, " <{email}>");
    }
    if let Some(role) = user.role.as_deref() {
        let _ = write!(out, " ({role})");
    }
    out
}

/// Logged-in user, printing the navigation line; fails when logged out.
fn require_login(auth: &AuthService, active: Section) -> Result<User> {
    let state = auth.state();
    let Some(user) = state.user.clone().filter(|_| state.is_authenticated) else {
        bail!("Not logged in. Run `taskdesk login --email <EMAIL>` first.");
    };
    if let Some(nav) = views::render_navbar(&state, Some(active)) {
        println!("{nav}\n");
    }
    Ok(user)
}

async fn run_task_command(api: &ApiClient, action: TaskCommand) -> Result<()> {
    match action {
        TaskCommand::List { filter } => {
            let tasks = views::fetch_tasks(api).await?;
            print!("{}", views::render_task_list(&tasks, filter));
        }
        TaskCommand::Add { title, fields } => {
            let draft = apply_fields(
                TaskDraft {
                    title,
                    ..TaskDraft::default()
                },
                fields,
            )?;
            views::save_task(api, None, &draft).await?;
            println!("Task added.");
        }
        TaskCommand::Edit { id, title, fields } => {
            let tasks = views::fetch_tasks(api).await?;
            let task = find_task(&tasks, &id)?;
            let mut draft = TaskDraft::from_task(task);
            if let Some(title) = title {
                draft.title = title;
            }
            let draft = apply_fields(draft, fields)?;
            views::save_task(api, Some(&task.id), &draft).await?;
            println!("Task updated.");
        }
        TaskCommand::Toggle { id } => {
            views::toggle_task(api, &RecordId::from(id.as_str())).await?;
            println!("Task updated.");
        }
        TaskCommand::Delete { id, yes } => {
            if !yes && !confirm("Are you sure you want to delete this task?")? {
                println!("Cancelled.");
                return Ok(());
            }
            views::delete_task(api, &RecordId::from(id.as_str())).await?;
            println!("Task deleted.");
        }
    }
    Ok(())
}

/// Overlay command-line fields onto a draft. An empty `--due` clears the date.
fn apply_fields(mut draft: TaskDraft, fields: TaskFields) -> Result<TaskDraft> {
    if let Some(description) = fields.description {
        draft.description = description;
    }
    if let Some(priority) = fields.priority {
        draft.priority = priority;
    }
    if let Some(due) = fields.due {
        let due = due.trim().to_string();
        if !due.is_empty() && NaiveDate::parse_from_str(&due, "%Y-%m-%d").is_err() {
            bail!("Invalid due date '{due}', expected YYYY-MM-DD");
        }
        draft.due_date = due;
    }
    Ok(draft)
}

fn find_task<'a>(tasks: &'a [Task], id: &str) -> Result<&'a Task> {
    tasks
        .iter()
        .find(|t| t.id.to_string() == id)
        .with_context(|| format!("Task {id} not found"))
}

async fn run_profile_command(api: &ApiClient, user: &User, action: ProfileCommand) -> Result<()> {
    match action {
        ProfileCommand::Show => {
            print!("{}", views::render_profile(user, Local::now().date_naive()));
        }
        ProfileCommand::Update { name, email } => {
            let update = ProfileUpdate {
                name: name.or_else(|| user.name.clone()).unwrap_or_default(),
                email: email.or_else(|| user.email.clone()).unwrap_or_default(),
            };
            views::update_profile(api, &update).await?;
            println!("{}", views::PROFILE_UPDATED);
        }
    }
    Ok(())
}

/// `given`, or one line read from stdin.
fn read_secret(given: Option<String>, prompt: &str) -> Result<String> {
    if let Some(secret) = given {
        return Ok(secret);
    }
    eprint!("{prompt}: ");
    io::stderr().flush()?;
    let secret = read_line(&mut io::stdin().lock())?;
    if secret.is_empty() {
        bail!("{prompt} is required");
    }
    Ok(secret)
}

fn confirm(question: &str) -> Result<bool> {
    eprint!("{question} [y/N] ");
    io::stderr().flush()?;
    let answer = read_line(&mut io::stdin().lock())?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn read_line(input: &mut impl BufRead) -> Result<String> {
    let mut line = String::new();
    input.read_line(&mut line).context("Failed to read from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
