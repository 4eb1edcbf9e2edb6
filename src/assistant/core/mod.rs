//! Core assistant types: configuration, errors, identifiers, roles and settings.

pub mod config;
pub mod errors;
pub mod ids;
pub mod role;
pub mod settings;

pub use config::{AssistantConfig, ReplyConfig};
pub use errors::{AssistantError, AssistantResult};
pub use ids::SessionId;
pub use role::UserRole;
pub use settings::{DetailLevel, Language, Settings};
