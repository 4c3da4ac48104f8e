//! Profile state: the canonical model, schema normalization, the session
//! cache, mutations, and the session binder that ties them to the identity
//! lifecycle.
//!
//! # Architecture
//!
//! - `models`: Canonical profile, garden and task types
//! - `normalize`: Classification and migration of stored documents
//! - `validation`: Caller-side input checks
//! - `loader`: Reads documents, normalizes them, writes migrations back
//! - `store`: The session-scoped profile cache
//! - `mutations`: Read-modify-write garden and task operations
//! - `session`: Identity transitions and account flows
//! - `display`: Ordering, progress and due date labels

pub mod clock;
pub mod display;
mod error;
mod loader;
mod models;
mod mutations;
pub mod normalize;
mod session;
mod store;
pub mod validation;

#[cfg(test)]
mod normalize_test;
#[cfg(test)]
mod validation_test;

pub use clock::{Clock, SystemClock};
pub use error::{ProfileError, ProfileResult};
pub use loader::ProfileLoader;
pub use models::{
    Garden, GardenTarget, NewTask, Profile, Task, TaskDraft, TaskStatus, TaskUpdate,
    UsernameMapping,
};
pub use mutations::ProfileMutations;
pub use normalize::{DocumentShape, NormalizeError, Normalized, normalize};
pub use session::SessionBinder;
pub use store::ProfileStore;
pub use validation::{ValidationError, ValidationResult};
