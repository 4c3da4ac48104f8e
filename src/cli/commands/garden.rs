use chrono::NaiveDate;
use tabled::{Table, Tabled};

use crate::auth::IdentityProvider;
use crate::cli::commands::{current_profile, find_garden};
use crate::cli::error::{CliError, CliResult};
use crate::cli::utils::{apply_table_style, format_due, truncate_with_ellipsis};
use crate::db::DocumentStore;
use crate::profile::display::{Progress, sorted_tasks};
use crate::profile::validation::validate_new_garden;
use crate::profile::{Garden, ProfileError, SessionBinder, Task};

#[derive(Tabled)]
pub(crate) struct GardenDisplay {
    #[tabled(rename = "Garden")]
    pub(crate) name: String,
    #[tabled(rename = "Moles")]
    pub(crate) moles: usize,
    #[tabled(rename = "Progress")]
    pub(crate) progress: String,
}

impl From<&Garden> for GardenDisplay {
    fn from(garden: &Garden) -> Self {
        let progress = Progress::of_garden(garden);
        let marker = if progress.is_complete() { " 🏆" } else { "" };
        Self {
            name: truncate_with_ellipsis(&garden.name, 40),
            moles: progress.total,
            progress: format!("{}% ({}){}", progress.percent(), progress, marker),
        }
    }
}

#[derive(Tabled)]
pub(crate) struct TaskDisplay {
    #[tabled(rename = "ID")]
    pub(crate) id: String,
    #[tabled(rename = "Mole")]
    pub(crate) name: String,
    #[tabled(rename = "Status")]
    pub(crate) status: String,
    #[tabled(rename = "Due")]
    pub(crate) due: String,
}

impl TaskDisplay {
    fn new(task: &Task, today: NaiveDate) -> Self {
        Self {
            id: task.id.clone(),
            name: truncate_with_ellipsis(&task.name, 50),
            status: task.status.label().to_string(),
            due: format_due(task.due_date.as_deref(), today),
        }
    }
}

/// List gardens with their progress
pub async fn list_gardens<S, A>(session: &SessionBinder<S, A>, format: &str) -> CliResult<String>
where
    S: DocumentStore,
    A: IdentityProvider,
{
    let profile = current_profile(session)?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(&profile.gardens)?),
        _ => {
            if profile.gardens.is_empty() {
                return Ok(
                    "No gardens yet. Plant one with `whack garden add <name>`.".to_string(),
                );
            }
            let rows: Vec<GardenDisplay> = profile.gardens.iter().map(Into::into).collect();
            let mut table = Table::new(rows);
            apply_table_style(&mut table);
            Ok(format!(
                "{}\n{}!",
                table,
                Progress::of_gardens(&profile.gardens)
            ))
        }
    }
}

/// Show the moles of one garden in display order
pub async fn show_garden<S, A>(
    session: &SessionBinder<S, A>,
    name: &str,
    format: &str,
    today: NaiveDate,
) -> CliResult<String>
where
    S: DocumentStore,
    A: IdentityProvider,
{
    let profile = current_profile(session)?;
    let garden = find_garden(&profile, name)?;

    match format {
        "json" => Ok(serde_json::to_string_pretty(garden)?),
        _ => {
            if garden.tasks.is_empty() {
                return Ok(format!("No moles in {} yet.", garden.name));
            }
            let rows: Vec<TaskDisplay> = sorted_tasks(&garden.tasks)
                .into_iter()
                .map(|t| TaskDisplay::new(t, today))
                .collect();
            let mut table = Table::new(rows);
            apply_table_style(&mut table);
            Ok(format!(
                "{}\n{}\n{}",
                garden.name,
                table,
                Progress::of_garden(garden)
            ))
        }
    }
}

/// Plant a new, empty garden
pub async fn add_garden<S, A>(session: &SessionBinder<S, A>, name: &str) -> CliResult<String>
where
    S: DocumentStore,
    A: IdentityProvider,
{
    let profile = current_profile(session)?;
    let name = validate_new_garden(name, &profile.gardens).map_err(ProfileError::from)?;

    session
        .mutations()
        .add_garden(&name)
        .await?
        .ok_or(CliError::NoProfile)?;
    Ok(format!("✓ Planted garden '{}'", name))
}

/// Delete a garden and all its moles
pub async fn delete_garden<S, A>(session: &SessionBinder<S, A>, name: &str) -> CliResult<String>
where
    S: DocumentStore,
    A: IdentityProvider,
{
    let profile = current_profile(session)?;
    let garden = find_garden(&profile, name)?;
    let moles = garden.tasks.len();

    session
        .mutations()
        .delete_garden(name)
        .await?
        .ok_or(CliError::NoProfile)?;
    Ok(format!("✓ Deleted garden '{}' ({} moles)", name, moles))
}
