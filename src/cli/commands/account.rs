use crate::auth::IdentityProvider;
use crate::cli::error::{CliError, CliResult};
use crate::db::DocumentStore;
use crate::profile::{Profile, SessionBinder};

/// Create an account and its empty profile
pub async fn signup<S, A>(
    session: &SessionBinder<S, A>,
    email: &str,
    password: &str,
    username: &str,
) -> CliResult<String>
where
    S: DocumentStore,
    A: IdentityProvider,
{
    let profile = session.signup(email, password, username).await?;
    Ok(format!(
        "✓ Welcome, {}! Plant your first garden with `whack garden add <name>`.",
        profile.username
    ))
}

/// Sign in with an email or username and load the profile
pub async fn login<S, A>(
    session: &SessionBinder<S, A>,
    identifier: Option<&str>,
    password: Option<&str>,
) -> CliResult<Profile>
where
    S: DocumentStore,
    A: IdentityProvider,
{
    let (Some(identifier), Some(password)) = (identifier, password) else {
        return Err(CliError::MissingCredentials);
    };

    match session.login(identifier, password).await? {
        Some(profile) => Ok(profile),
        None => Err(match session.error() {
            Some(message) => CliError::ProfileUnavailable { message },
            None => CliError::NoProfile,
        }),
    }
}
