//! Schema normalization for profile documents.
//!
//! A profile document may have been written by any earlier version of the
//! application. Decoding first classifies the raw JSON into a
//! [`DocumentShape`], then runs the migration for that shape to produce a
//! canonical [`Profile`] and a flag telling the caller whether the migrated
//! form must be written back.
//!
//! Known shapes:
//!
//! - `LegacyFlatList`: a single top-level `tasks` list and no `gardens`. The
//!   old tasks are dropped and the profile starts with no gardens.
//! - `PartiallyMigrated`: `gardens` missing, or tasks still carrying the old
//!   boolean `completed`, no `status`, or no `dueDate` field at all.
//! - `Canonical`: already in the current layout.
//!
//! Individual task values are decoded leniently. An unrecognised `status`
//! is treated like a missing one, a task without a usable `id` gets a
//! generated one, and a garden without a name gets a placeholder. Each of
//! these marks the document for rewrite. Only a document whose overall
//! structure is wrong is rejected.

use miette::Diagnostic;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::profile::{Garden, Profile, Task, TaskStatus};
use crate::serde_utils::{double_option, scalar_string};

/// Errors decoding a profile document.
#[derive(Error, Diagnostic, Debug)]
pub enum NormalizeError {
    #[error("Invalid profile document: {message}")]
    #[diagnostic(
        code(whack::profile::invalid_document),
        help("The stored profile is not a JSON object of the expected shape.")
    )]
    InvalidDocument { message: String },
}

/// Result of normalizing a raw document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub profile: Profile,
    /// True when the stored document differs from the canonical form and should
    /// be rewritten.
    pub must_persist: bool,
}

/// A profile document as read from storage, before migration.
#[derive(Debug, Clone, Deserialize)]
pub struct RawProfile {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub gardens: Option<Vec<RawGarden>>,
    /// Only the presence of the legacy list matters, its contents are dropped.
    #[serde(default)]
    pub tasks: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGarden {
    #[serde(default, deserialize_with = "scalar_string")]
    pub name: Option<String>,
    #[serde(default)]
    pub tasks: Vec<RawTask>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTask {
    #[serde(default, deserialize_with = "scalar_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<RawStatus>,
    /// Boolean completion flag from before statuses existed.
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "scalar_string")]
    pub created_at: Option<String>,
}

impl RawTask {
    fn is_canonical(&self) -> bool {
        self.id.is_some()
            && matches!(self.status, Some(RawStatus::Known(_)))
            && self.due_date.is_some()
    }
}

/// A stored `status` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawStatus {
    Known(TaskStatus),
    /// Anything this version does not recognise, e.g. `"done"`.
    Unrecognized(Value),
}

impl<'de> Deserialize<'de> for RawStatus {
    fn deserialize<D>(de: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(de)?;
        Ok(match TaskStatus::deserialize(&value) {
            Ok(status) => RawStatus::Known(status),
            Err(_) => RawStatus::Unrecognized(value),
        })
    }
}

/// Legacy single-list document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyDocument {
    pub email: String,
    pub username: String,
    /// How many legacy tasks the migration drops.
    pub discarded_tasks: usize,
}

/// Classification of a raw profile document.
#[derive(Debug, Clone)]
pub enum DocumentShape {
    LegacyFlatList(LegacyDocument),
    PartiallyMigrated(RawProfile),
    Canonical(Profile),
}

impl DocumentShape {
    pub fn name(&self) -> &'static str {
        match self {
            DocumentShape::LegacyFlatList(_) => "legacy_flat_list",
            DocumentShape::PartiallyMigrated(_) => "partially_migrated",
            DocumentShape::Canonical(_) => "canonical",
        }
    }
}

/// Decode a raw document and work out which shape it has.
pub fn classify(raw: Value) -> Result<DocumentShape, NormalizeError> {
    if !raw.is_object() {
        return Err(NormalizeError::InvalidDocument {
            message: format!("expected an object, found {}", json_kind(&raw)),
        });
    }

    let doc: RawProfile =
        serde_json::from_value(raw).map_err(|e| NormalizeError::InvalidDocument {
            message: e.to_string(),
        })?;

    if doc.gardens.is_none() {
        if let Some(legacy_tasks) = &doc.tasks {
            let discarded_tasks = legacy_tasks.as_array().map_or(0, Vec::len);
            return Ok(DocumentShape::LegacyFlatList(LegacyDocument {
                email: doc.email,
                username: doc.username,
                discarded_tasks,
            }));
        }
        return Ok(DocumentShape::PartiallyMigrated(doc));
    }

    let canonical = doc.gardens.iter().flatten().all(|garden| {
        garden.name.is_some() && garden.tasks.iter().all(RawTask::is_canonical)
    });

    if canonical {
        Ok(DocumentShape::Canonical(migrate_partial(doc).profile))
    } else {
        Ok(DocumentShape::PartiallyMigrated(doc))
    }
}

/// Normalize a raw document into the canonical profile.
pub fn normalize(raw: Value) -> Result<Normalized, NormalizeError> {
    Ok(migrate(classify(raw)?))
}

/// Run the migration for an already classified document.
pub fn migrate(shape: DocumentShape) -> Normalized {
    match shape {
        DocumentShape::LegacyFlatList(doc) => migrate_legacy(doc),
        DocumentShape::PartiallyMigrated(doc) => migrate_partial(doc),
        DocumentShape::Canonical(profile) => Normalized {
            profile,
            must_persist: false,
        },
    }
}

/// The legacy list is discarded rather than converted into a garden.
fn migrate_legacy(doc: LegacyDocument) -> Normalized {
    Normalized {
        profile: Profile {
            email: doc.email,
            username: doc.username,
            gardens: Vec::new(),
        },
        must_persist: true,
    }
}

fn migrate_partial(doc: RawProfile) -> Normalized {
    let mut must_persist = false;

    let gardens = doc
        .gardens
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(garden_index, garden)| Garden {
            name: garden.name.unwrap_or_else(|| {
                must_persist = true;
                format!("Garden {}", garden_index + 1)
            }),
            tasks: garden
                .tasks
                .into_iter()
                .enumerate()
                .map(|(task_index, task)| {
                    let (task, changed) = migrate_task(task, garden_index, task_index);
                    must_persist |= changed;
                    task
                })
                .collect(),
        })
        .collect();

    Normalized {
        profile: Profile {
            email: doc.email,
            username: doc.username,
            gardens,
        },
        must_persist,
    }
}

/// Fill in `id`, `status` and `dueDate`. Returns whether anything had to
/// change.
fn migrate_task(raw: RawTask, garden_index: usize, task_index: usize) -> (Task, bool) {
    let mut changed = false;

    let id = raw.id.unwrap_or_else(|| {
        changed = true;
        format!("restored-{}-{}", garden_index + 1, task_index + 1)
    });

    let status = match raw.status {
        Some(RawStatus::Known(status)) => status,
        Some(RawStatus::Unrecognized(_)) | None => {
            changed = true;
            if raw.completed == Some(true) {
                TaskStatus::Whacked
            } else {
                TaskStatus::Unwhacked
            }
        }
    };

    let due_date = raw.due_date.unwrap_or_else(|| {
        changed = true;
        None
    });

    let task = Task {
        id,
        name: raw.name.unwrap_or_default(),
        description: raw.description.unwrap_or_default(),
        status,
        due_date,
        created_at: raw.created_at.unwrap_or_default(),
    };

    (task, changed)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
