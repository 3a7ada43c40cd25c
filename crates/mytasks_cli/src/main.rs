//! CLI entry point over `mytasks_core`.
//!
//! # Responsibility
//! - Provide `ping`/`version` probes to verify `mytasks_core` linkage.
//! - Run one authenticated use-case per invocation, stateless like any
//!   other caller of the core.
//!
//! # Invariants
//! - Credentials are checked on every invocation; nothing is remembered.
//! - Output is deterministic plain text; failures exit non-zero.

use clap::{Parser, Subcommand};
use log::error;
use mytasks_core::{init_logging_from_config, App, CoreConfig, Principal, ServiceError};
use std::path::PathBuf;
use std::process::ExitCode;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "mytasks", version, about = "Per-user task lists")]
struct Cli {
    /// SQLite database file (overrides MYTASKS_DB_PATH).
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Name to authenticate as.
    #[arg(long, short = 'u', global = true)]
    user: Option<String>,

    /// Password for `--user`.
    #[arg(long, short = 'p', global = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Prints `pong` from the core crate.
    Ping,
    /// Prints the core crate version.
    Version,
    /// Lists account names (administrator only).
    Users,
    /// Creates an account (administrator only).
    AddUser { name: String, password: String },
    /// Replaces an account password (administrator only).
    Passwd { name: String, password: String },
    /// Removes an account (administrator only).
    RemoveUser { name: String },
    /// Lists the caller's tasks.
    Tasks,
    /// Adds a task to the caller's list.
    AddTask { title: String },
    /// Edits one of the caller's tasks.
    EditTask {
        id: Uuid,
        title: String,
        #[arg(long)]
        done: bool,
    },
    /// Removes one of the caller's tasks.
    RemoveTask { id: Uuid },
}

#[derive(Debug)]
enum CliError {
    Setup(String),
    MissingCredentials,
    Service(ServiceError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Setup(message) => write!(f, "{message}"),
            Self::MissingCredentials => write!(f, "--user and --password are required"),
            Self::Service(err) => write!(f, "{err}"),
        }
    }
}

impl From<ServiceError> for CliError {
    fn from(value: ServiceError) -> Self {
        Self::Service(value)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_command module=cli status=error error={err}");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Ping => {
            println!("mytasks_core ping={}", mytasks_core::ping());
            return Ok(());
        }
        Command::Version => {
            println!("mytasks_core version={}", mytasks_core::core_version());
            return Ok(());
        }
        _ => {}
    }

    let mut config = CoreConfig::from_env().map_err(|err| CliError::Setup(err.to_string()))?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    init_logging_from_config(&config).map_err(CliError::Setup)?;
    let app = App::open(&config).map_err(|err| CliError::Setup(err.to_string()))?;

    let (Some(name), Some(password)) = (cli.user.as_deref(), cli.password.as_deref()) else {
        return Err(CliError::MissingCredentials);
    };
    let principal = app.authenticate(name, password)?;

    execute(&app, &principal, cli.command)
}

fn execute(app: &App, principal: &Principal, command: Command) -> Result<(), CliError> {
    match command {
        Command::Ping | Command::Version => {}
        Command::Users => {
            for name in app.users().list_user_names(principal)? {
                println!("{name}");
            }
        }
        Command::AddUser { name, password } => {
            app.users().add_user(principal, &name, &password)?;
            println!("added user {name}");
        }
        Command::Passwd { name, password } => {
            app.users().update_user(principal, &name, &password)?;
            println!("updated user {name}");
        }
        Command::RemoveUser { name } => {
            app.users().remove_user(principal, &name)?;
            println!("removed user {name}");
        }
        Command::Tasks => {
            for task in app.tasks().list_tasks(principal)? {
                let mark = if task.is_done() { "x" } else { " " };
                println!("[{mark}] {} {}", task.id(), task.title());
            }
        }
        Command::AddTask { title } => {
            let task = app.tasks().create_task(principal, &title)?;
            println!("{}", task.id());
        }
        Command::EditTask { id, title, done } => {
            app.tasks().edit_task(principal, id, &title, done)?;
            println!("updated task {id}");
        }
        Command::RemoveTask { id } => {
            app.tasks().remove_task(principal, id)?;
            println!("removed task {id}");
        }
    }
    Ok(())
}
