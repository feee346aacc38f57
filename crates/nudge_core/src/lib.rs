pub mod error;
pub mod platform;
pub mod service;
pub mod store;

pub use crate::error::ServiceError;
pub use crate::platform::{PermissionPrompter, PlatformShell, PromptedStore, SettingsSource};
pub use crate::service::{NotificationService, NotificationServiceBuilder};
pub use crate::store::{FilePromptedStore, MemoryPromptedStore};
