pub mod account;
pub mod garden;
pub mod task;

use crate::auth::IdentityProvider;
use crate::cli::error::{CliError, CliResult};
use crate::db::DocumentStore;
use crate::profile::{Garden, Profile, SessionBinder};

/// Profile of the signed-in account.
pub(crate) fn current_profile<S, A>(session: &SessionBinder<S, A>) -> CliResult<Profile>
where
    S: DocumentStore,
    A: IdentityProvider,
{
    session.profile_store().snapshot().ok_or(CliError::NoProfile)
}

/// Garden by exact name.
pub(crate) fn find_garden<'a>(profile: &'a Profile, name: &str) -> CliResult<&'a Garden> {
    profile.garden(name).ok_or_else(|| CliError::GardenNotFound {
        name: name.to_string(),
    })
}
