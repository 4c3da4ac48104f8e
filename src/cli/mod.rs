mod commands;
pub mod error;
mod utils;


use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use clap::{CommandFactory, Parser, Subcommand};

use crate::auth::{IdentityProvider, LocalIdentityProvider};
use crate::cli::error::{CliError, CliResult};
use crate::db::{DocumentStore, SqliteDocumentStore};
use crate::paths::get_db_path;
use crate::profile::{SessionBinder, TaskStatus};

use commands::task::{AddTaskParams, EditTaskParams};

#[derive(Parser)]
#[command(name = "whack")]
#[command(author, version, about = "Whack-A-Task: gardens full of moles to whack", long_about = None)]
pub struct Cli {
    /// Database file (default: XDG data directory, ~/.local/share/whack/whack.db)
    #[arg(long, global = true, env = "WHACK_DB")]
    pub db: Option<PathBuf>,

    /// Email or username to sign in with
    #[arg(long, global = true, env = "WHACK_LOGIN")]
    pub login: Option<String>,

    /// Password
    #[arg(long, global = true, env = "WHACK_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account (uses --password)
    Signup {
        #[arg(long)]
        email: String,
        /// Letters, numbers and underscores, at least 3 characters
        #[arg(long)]
        username: String,
    },
    /// List gardens with their progress
    Gardens {
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Garden management commands
    Garden {
        #[command(subcommand)]
        command: GardenCommands,
    },
    /// Mole (task) management commands
    Task {
        #[command(subcommand)]
        command: TaskCommands,
    },
}

#[derive(Subcommand)]
enum GardenCommands {
    /// Show the moles in a garden
    Show {
        name: String,
        /// Output format (table or json)
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Plant a new garden
    Add { name: String },
    /// Delete a garden and all its moles
    Delete { name: String },
}

#[derive(Subcommand)]
enum TaskCommands {
    /// Spot a new mole
    Add {
        /// Garden to add the mole to
        #[arg(long)]
        garden: String,
        /// Plant the garden first
        #[arg(long)]
        new_garden: bool,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,
    },
    /// Edit a mole
    Edit {
        garden: String,
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// unwhacked, in-whacking or whacked
        #[arg(long)]
        status: Option<TaskStatus>,
        /// Due date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        /// Remove the due date
        #[arg(long)]
        clear_due: bool,
    },
    /// Delete a mole
    Delete { garden: String, id: String },
}

pub async fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let db_path = cli.db.unwrap_or_else(get_db_path);
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let store = Arc::new(SqliteDocumentStore::open(&db_path).await?);
    store.migrate().await?;
    let auth = Arc::new(LocalIdentityProvider::new(store.clone()));
    let session = SessionBinder::new(store, auth);

    let output = execute(
        &session,
        command,
        cli.login.as_deref(),
        cli.password.as_deref(),
    )
    .await?;

    println!("{}", output);
    Ok(())
}

async fn execute<S, A>(
    session: &SessionBinder<S, A>,
    command: Commands,
    login: Option<&str>,
    password: Option<&str>,
) -> CliResult<String>
where
    S: DocumentStore,
    A: IdentityProvider,
{
    if !matches!(command, Commands::Signup { .. }) {
        commands::account::login(session, login, password).await?;
    }
    let today = Local::now().date_naive();

    match command {
        Commands::Signup { email, username } => {
            let password = password.ok_or(CliError::MissingCredentials)?;
            commands::account::signup(session, &email, password, &username).await
        }
        Commands::Gardens { format } => commands::garden::list_gardens(session, &format).await,
        Commands::Garden { command } => match command {
            GardenCommands::Show { name, format } => {
                commands::garden::show_garden(session, &name, &format, today).await
            }
            GardenCommands::Add { name } => commands::garden::add_garden(session, &name).await,
            GardenCommands::Delete { name } => {
                commands::garden::delete_garden(session, &name).await
            }
        },
        Commands::Task { command } => match command {
            TaskCommands::Add {
                garden,
                new_garden,
                name,
                description,
                due,
            } => {
                commands::task::add_task(
                    session,
                    AddTaskParams {
                        garden: &garden,
                        new_garden,
                        name: &name,
                        description: description.as_deref(),
                        due: due.as_deref(),
                    },
                )
                .await
            }
            TaskCommands::Edit {
                garden,
                id,
                name,
                description,
                status,
                due,
                clear_due,
            } => {
                commands::task::edit_task(
                    session,
                    &garden,
                    &id,
                    EditTaskParams {
                        name: name.as_deref(),
                        description: description.as_deref(),
                        status,
                        due: due.as_deref(),
                        clear_due,
                    },
                )
                .await
            }
            TaskCommands::Delete { garden, id } => {
                commands::task::delete_task(session, &garden, &id).await
            }
        },
    }
}
