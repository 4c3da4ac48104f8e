use miette::Diagnostic;
use thiserror::Error;

use crate::db::DbError;
use crate::profile::ProfileError;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error("Not signed in")]
    #[diagnostic(
        code(whack::cli::missing_credentials),
        help("Pass --login and --password, or set WHACK_LOGIN and WHACK_PASSWORD.")
    )]
    MissingCredentials,

    #[error("No profile found for this account")]
    #[diagnostic(
        code(whack::cli::no_profile),
        help("The account signed in but has no profile linked to it. Sign up again with a new username.")
    )]
    NoProfile,

    #[error("Could not load the profile: {message}")]
    #[diagnostic(
        code(whack::cli::profile_unavailable),
        help("The stored profile could not be read. Set RUST_LOG=whack=debug for details.")
    )]
    ProfileUnavailable { message: String },

    #[error("No garden named '{name}'")]
    #[diagnostic(code(whack::cli::garden_not_found), help("Garden names are case-sensitive."))]
    GardenNotFound { name: String },

    #[error("No mole with id {id} in garden '{garden}'")]
    #[diagnostic(code(whack::cli::task_not_found))]
    TaskNotFound { garden: String, id: String },

    #[error("{}", .0.user_message())]
    #[diagnostic(code(whack::cli::profile))]
    Profile(#[from] ProfileError),

    #[error("Database error: {0}")]
    #[diagnostic(code(whack::cli::database))]
    Database(#[from] DbError),

    #[error("Failed to format output: {0}")]
    #[diagnostic(code(whack::cli::serialization))]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    #[diagnostic(code(whack::cli::io))]
    Io(#[from] std::io::Error),
}

pub type CliResult<T> = Result<T, CliError>;
