pub mod cascade;
pub mod environment_key;
pub mod project_cache;

pub use cascade::{CascadeResolver, LATEST_PACKAGE};
pub use environment_key::{EnvironmentKey, InvalidEnvironmentKey};
pub use project_cache::ProjectCache;
