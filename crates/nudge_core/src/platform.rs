use anyhow::Result;

use nudge_domain::category::NotificationCategory;
use nudge_domain::{FeatureRequest, PermissionSnapshot};

/// Reads the platform's current notification settings. The read is a
/// point-in-time snapshot; the service never caches it.
pub trait SettingsSource: Send + Sync {
    fn current_settings(&self) -> Result<PermissionSnapshot>;
}

/// Shows the one-shot permission dialog for the requested features and blocks
/// until the user answers. Returns whether access was granted.
///
/// The platform shows this dialog at most once per install; the adapter must
/// not be invoked while a previous call is still outstanding (the service
/// guards this). No timeout, no cancellation: the call waits for the user.
pub trait PermissionPrompter: Send + Sync {
    fn show_prompt(&self, request: &FeatureRequest) -> Result<bool>;
}

/// Durable record of whether the permission dialog has ever been shown.
///
/// Monotonic by construction: the trait offers no way to clear the flag, so
/// once `mark_prompted` has run, `load` keeps returning true until the app is
/// reinstalled.
pub trait PromptedStore: Send + Sync {
    fn load(&self) -> Result<bool>;
    fn mark_prompted(&self) -> Result<()>;
}

/// Fire-and-forget platform calls tied to the app shell: remote-notification
/// registration, interactive category registration and the settings deep
/// link. None of these return anything the service consumes.
pub trait PlatformShell: Send + Sync {
    fn register_remote(&self);
    fn unregister_remote(&self);

    /// Whether a push token has ever been received. True does not imply the
    /// user was prompted; silent notifications hand out tokens without a
    /// dialog.
    fn is_registered_remote(&self) -> bool;

    fn set_categories(&self, categories: &[NotificationCategory]);

    /// Opens the app's entry in the system settings screen.
    fn open_app_settings(&self);
}
