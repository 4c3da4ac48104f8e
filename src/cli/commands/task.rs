use crate::auth::IdentityProvider;
use crate::cli::commands::{current_profile, find_garden};
use crate::cli::error::{CliError, CliResult};
use crate::db::DocumentStore;
use crate::profile::validation::validate_update;
use crate::profile::{
    Garden, GardenTarget, ProfileError, SessionBinder, TaskDraft, TaskStatus, TaskUpdate,
};

/// Where to spot a new mole
pub struct AddTaskParams<'a> {
    pub garden: &'a str,
    /// Create the garden first
    pub new_garden: bool,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub due: Option<&'a str>,
}

/// Spot a new mole, optionally planting its garden first
pub async fn add_task<S, A>(
    session: &SessionBinder<S, A>,
    params: AddTaskParams<'_>,
) -> CliResult<String>
where
    S: DocumentStore,
    A: IdentityProvider,
{
    let profile = current_profile(session)?;
    let target = if params.new_garden {
        GardenTarget::New(params.garden.to_string())
    } else {
        find_garden(&profile, params.garden)?;
        GardenTarget::Existing(params.garden.to_string())
    };
    let draft = TaskDraft {
        name: params.name.to_string(),
        description: params.description.unwrap_or_default().to_string(),
        due_date: params.due.map(str::to_string),
    };

    let task = session
        .mutations()
        .spot_task(target, draft)
        .await?
        .ok_or(CliError::NoProfile)?;
    Ok(format!("✓ Spotted mole: {} ({})", task.name, task.id))
}

/// Fields to change on a mole
#[derive(Debug, Default)]
pub struct EditTaskParams<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub status: Option<TaskStatus>,
    pub due: Option<&'a str>,
    /// Remove the due date
    pub clear_due: bool,
}

impl EditTaskParams<'_> {
    fn into_update(self) -> TaskUpdate {
        let due_date = if self.clear_due {
            Some(None)
        } else {
            self.due.map(|d| Some(d.to_string()))
        };
        TaskUpdate {
            name: self.name.map(str::to_string),
            description: self.description.map(str::to_string),
            status: self.status,
            due_date,
        }
    }
}

/// Edit a mole
pub async fn edit_task<S, A>(
    session: &SessionBinder<S, A>,
    garden: &str,
    id: &str,
    params: EditTaskParams<'_>,
) -> CliResult<String>
where
    S: DocumentStore,
    A: IdentityProvider,
{
    let update = validate_update(params.into_update()).map_err(ProfileError::from)?;
    if update.is_empty() {
        return Ok("Nothing to update.".to_string());
    }

    let profile = current_profile(session)?;
    ensure_task(find_garden(&profile, garden)?, garden, id)?;

    session
        .mutations()
        .update_task(garden, id, update)
        .await?
        .ok_or(CliError::NoProfile)?;
    Ok(format!("✓ Updated mole {}", id))
}

/// Delete a mole
pub async fn delete_task<S, A>(
    session: &SessionBinder<S, A>,
    garden: &str,
    id: &str,
) -> CliResult<String>
where
    S: DocumentStore,
    A: IdentityProvider,
{
    let profile = current_profile(session)?;
    ensure_task(find_garden(&profile, garden)?, garden, id)?;

    session
        .mutations()
        .delete_task(garden, id)
        .await?
        .ok_or(CliError::NoProfile)?;
    Ok(format!("✓ Deleted mole {}", id))
}

fn ensure_task(found: &Garden, garden: &str, id: &str) -> CliResult<()> {
    found
        .find_task(id)
        .map(|_| ())
        .ok_or_else(|| CliError::TaskNotFound {
            garden: garden.to_string(),
            id: id.to_string(),
        })
}
