//! Garden and task mutations.
//!
//! Every operation follows the same read-modify-write shape: copy the cached
//! `gardens`, apply the change, replace the document's `gardens` field, and on
//! success swap the new sequence into the cache. Without a cached profile the
//! operation does nothing and returns `Ok(None)`.
//!
//! Nothing serializes overlapping calls. Two mutations started before either
//! persisted both start from the same sequence and the later write wins.
//! [`ProfileMutations::add_task`] takes an override sequence so a caller that
//! just created a garden can pass the result straight through.

use std::sync::Arc;

use tracing::{debug, error, info, instrument};

use crate::db::{DbError, DocumentStore, PROFILES};
use crate::profile::clock::{Clock, SystemClock, created_at, task_id};
use crate::profile::validation::{validate_draft, validate_new_garden};
use crate::profile::{
    Garden, GardenTarget, NewTask, ProfileResult, ProfileStore, Task, TaskDraft, TaskStatus,
    TaskUpdate, ValidationError,
};

/// Mutation operations over the cached profile.
pub struct ProfileMutations<S: DocumentStore, C: Clock = SystemClock> {
    store: Arc<S>,
    cache: ProfileStore,
    clock: C,
}

impl<S: DocumentStore> ProfileMutations<S> {
    pub fn new(store: Arc<S>, cache: ProfileStore) -> Self {
        Self::with_clock(store, cache, SystemClock)
    }
}

impl<S: DocumentStore, C: Clock> ProfileMutations<S, C> {
    pub fn with_clock(store: Arc<S>, cache: ProfileStore, clock: C) -> Self {
        Self {
            store,
            cache,
            clock,
        }
    }

    pub fn cache(&self) -> &ProfileStore {
        &self.cache
    }

    /// Append an empty garden. Returns the whole new sequence.
    ///
    /// Name checks are the caller's job, see
    /// [`validate_new_garden`](crate::profile::validation::validate_new_garden).
    #[instrument(skip(self))]
    pub async fn add_garden(&self, name: &str) -> ProfileResult<Option<Vec<Garden>>> {
        let Some((username, mut gardens)) = self.current() else {
            return Ok(None);
        };

        gardens.push(Garden::new(name));
        self.persist(&username, &gardens).await?;

        info!(gardens = gardens.len(), "garden added");
        Ok(Some(gardens))
    }

    /// Create a task in the garden named exactly `garden_name`.
    ///
    /// Works on `gardens_override` when given, else on the cached sequence. If
    /// no garden matches, the sequence is still persisted unchanged and the
    /// task is returned without being stored anywhere.
    #[instrument(skip(self, task, gardens_override), fields(task = %task.name))]
    pub async fn add_task(
        &self,
        garden_name: &str,
        task: NewTask,
        gardens_override: Option<Vec<Garden>>,
    ) -> ProfileResult<Option<Task>> {
        let Some((username, cached)) = self.current() else {
            return Ok(None);
        };
        let mut gardens = gardens_override.unwrap_or(cached);

        let now = self.clock.now();
        let created = Task {
            id: task_id(now),
            name: task.name,
            description: task.description,
            status: TaskStatus::Unwhacked,
            due_date: task.due_date,
            created_at: created_at(now),
        };

        match gardens.iter_mut().find(|g| g.name == garden_name) {
            Some(garden) => garden.tasks.push(created.clone()),
            None => debug!("no such garden, persisting unchanged"),
        }
        self.persist(&username, &gardens).await?;

        info!(task_id = %created.id, "task added");
        Ok(Some(created))
    }

    /// Merge `updates` into one task. No match leaves the sequence unchanged.
    #[instrument(skip(self, updates))]
    pub async fn update_task(
        &self,
        garden_name: &str,
        task_id: &str,
        updates: TaskUpdate,
    ) -> ProfileResult<Option<Vec<Garden>>> {
        let Some((username, mut gardens)) = self.current() else {
            return Ok(None);
        };

        if let Some(task) = gardens
            .iter_mut()
            .filter(|g| g.name == garden_name)
            .flat_map(|g| g.tasks.iter_mut())
            .find(|t| t.id == task_id)
        {
            updates.merge_into(task);
        }
        self.persist(&username, &gardens).await?;

        info!("task updated");
        Ok(Some(gardens))
    }

    /// Remove one task. Removing a task that is not there succeeds.
    #[instrument(skip(self))]
    pub async fn delete_task(
        &self,
        garden_name: &str,
        task_id: &str,
    ) -> ProfileResult<Option<Vec<Garden>>> {
        let Some((username, mut gardens)) = self.current() else {
            return Ok(None);
        };

        for garden in gardens.iter_mut().filter(|g| g.name == garden_name) {
            garden.tasks.retain(|t| t.id != task_id);
        }
        self.persist(&username, &gardens).await?;

        info!("task deleted");
        Ok(Some(gardens))
    }

    /// Remove a garden and all its tasks. Idempotent.
    #[instrument(skip(self))]
    pub async fn delete_garden(&self, garden_name: &str) -> ProfileResult<Option<Vec<Garden>>> {
        let Some((username, mut gardens)) = self.current() else {
            return Ok(None);
        };

        gardens.retain(|g| g.name != garden_name);
        self.persist(&username, &gardens).await?;

        info!("garden deleted");
        Ok(Some(gardens))
    }

    /// Validate a task draft and add it, creating the target garden first if
    /// asked to.
    ///
    /// A new garden is created with [`add_garden`](Self::add_garden) and its
    /// result is threaded into [`add_task`](Self::add_task), so the task does
    /// not depend on the cache having caught up.
    #[instrument(skip(self, draft))]
    pub async fn spot_task(
        &self,
        target: GardenTarget,
        draft: TaskDraft,
    ) -> ProfileResult<Option<Task>> {
        let task = validate_draft(&draft)?;

        match target {
            GardenTarget::Existing(name) => {
                if name.trim().is_empty() {
                    return Err(ValidationError::MissingGarden.into());
                }
                self.add_task(&name, task, None).await
            }
            GardenTarget::New(name) => {
                let Some(existing) = self.cache.gardens() else {
                    return Ok(None);
                };
                let name = validate_new_garden(&name, &existing)?;
                match self.add_garden(&name).await? {
                    Some(gardens) => self.add_task(&name, task, Some(gardens)).await,
                    None => Ok(None),
                }
            }
        }
    }

    fn current(&self) -> Option<(String, Vec<Garden>)> {
        self.cache.snapshot().map(|p| (p.username, p.gardens))
    }

    async fn persist(&self, username: &str, gardens: &[Garden]) -> ProfileResult<()> {
        let value = serde_json::to_value(gardens).map_err(|e| DbError::InvalidData {
            message: e.to_string(),
        })?;

        if let Err(e) = self
            .store
            .update_field(PROFILES, username, "gardens", &value)
            .await
        {
            error!(error = %e, "failed to persist gardens");
            return Err(e.into());
        }

        self.cache.replace_gardens(gardens.to_vec());
        Ok(())
    }
}
