use anyhow::{anyhow, Result};
use parking_lot::Mutex;
use tracing::instrument;

use nudge_domain::category::NotificationCategory;
use nudge_domain::oracle;
use nudge_domain::{
    FeatureRequest, NotificationFeature, PermissionError, PermissionSnapshot, PermissionVerdict,
};

use crate::error::ServiceError;
use crate::platform::{PermissionPrompter, PlatformShell, PromptedStore, SettingsSource};

/// Owns the notification permission flow for the lifetime of the app.
///
/// Built once at startup and injected wherever it is needed; there is no
/// hidden global. All platform access goes through the injected boundary
/// traits, so the service itself carries no platform code.
pub struct NotificationService {
    settings: Box<dyn SettingsSource>,
    prompter: Box<dyn PermissionPrompter>,
    prompted_store: Box<dyn PromptedStore>,
    shell: Box<dyn PlatformShell>,
    categories: Vec<NotificationCategory>,
    prompt_guard: Mutex<()>,
}

impl std::fmt::Debug for NotificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationService")
            .field("categories", &self.categories)
            .finish_non_exhaustive()
    }
}

pub struct NotificationServiceBuilder {
    settings: Option<Box<dyn SettingsSource>>,
    prompter: Option<Box<dyn PermissionPrompter>>,
    prompted_store: Option<Box<dyn PromptedStore>>,
    shell: Option<Box<dyn PlatformShell>>,
    categories: Vec<NotificationCategory>,
}

impl NotificationServiceBuilder {
    pub fn new() -> Self {
        Self {
            settings: None,
            prompter: None,
            prompted_store: None,
            shell: None,
            categories: Vec::new(),
        }
    }

    pub fn with_settings_source(mut self, settings: Box<dyn SettingsSource>) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn with_prompter(mut self, prompter: Box<dyn PermissionPrompter>) -> Self {
        self.prompter = Some(prompter);
        self
    }

    pub fn with_prompted_store(mut self, store: Box<dyn PromptedStore>) -> Self {
        self.prompted_store = Some(store);
        self
    }

    pub fn with_shell(mut self, shell: Box<dyn PlatformShell>) -> Self {
        self.shell = Some(shell);
        self
    }

    pub fn add_category(mut self, category: NotificationCategory) -> Self {
        if !self
            .categories
            .iter()
            .any(|existing| existing.identifier == category.identifier)
        {
            self.categories.push(category);
        }
        self
    }

    /// Registers the interactive categories and signs up for remote
    /// notifications, then hands back the service. Mirrors what the platform
    /// expects to happen once, early in app launch.
    pub fn build(self) -> Result<NotificationService> {
        let service = NotificationService {
            settings: self
                .settings
                .ok_or_else(|| anyhow!("a settings source is required"))?,
            prompter: self
                .prompter
                .ok_or_else(|| anyhow!("a permission prompter is required"))?,
            prompted_store: self
                .prompted_store
                .ok_or_else(|| anyhow!("a prompted-flag store is required"))?,
            shell: self.shell.ok_or_else(|| anyhow!("a platform shell is required"))?,
            categories: self.categories,
            prompt_guard: Mutex::new(()),
        };
        if !service.categories.is_empty() {
            service.shell.set_categories(&service.categories);
        }
        service.shell.register_remote();
        Ok(service)
    }
}

impl Default for NotificationServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationService {
    pub fn builder() -> NotificationServiceBuilder {
        NotificationServiceBuilder::new()
    }

    pub fn categories(&self) -> &[NotificationCategory] {
        &self.categories
    }

    /// Current settings read plus prompted flag, reconciled into one verdict.
    pub fn permission_verdict(&self) -> Result<PermissionVerdict, ServiceError> {
        let snapshot = self.settings.current_settings()?;
        let prompted = self.prompted_store.load()?;
        Ok(oracle::classify(&snapshot, prompted))
    }

    /// True iff every wanted feature is currently enabled; with an empty
    /// `wanted`, true iff anything at all is enabled.
    pub fn has_permission(&self, wanted: &[NotificationFeature]) -> Result<bool, ServiceError> {
        let snapshot = self.settings.current_settings()?;
        Ok(oracle::has_permission(&snapshot, wanted))
    }

    /// Error-typed companion to [`permission_verdict`](Self::permission_verdict)
    /// for callers that need a hard failure rather than a verdict to branch on.
    pub fn require_permission(&self) -> Result<(), ServiceError> {
        match self.permission_verdict()? {
            PermissionVerdict::Granted => Ok(()),
            PermissionVerdict::Denied => {
                Err(PermissionError::UserHasDeniedPermission.into())
            }
            PermissionVerdict::NotPrompted => {
                Err(PermissionError::UserHasNotBeenPrompted.into())
            }
        }
    }

    /// Runs the permission request flow for the given features.
    ///
    /// Already granted: returns immediately, no dialog. Already denied: fails
    /// and deep-links the user to the app's settings screen. Never prompted:
    /// shows the one-shot platform dialog, records that it was shown whatever
    /// the answer, and succeeds or fails on the user's choice. Only one
    /// request may be in flight at a time; overlapping calls are rejected.
    #[instrument(skip(self))]
    pub fn request_permission(&self, request: &FeatureRequest) -> Result<(), ServiceError> {
        if request.is_empty() {
            return Err(PermissionError::EmptyRequest.into());
        }

        let Some(_guard) = self.prompt_guard.try_lock() else {
            return Err(ServiceError::PromptInFlight);
        };

        match self.permission_verdict()? {
            PermissionVerdict::Granted => {
                tracing::debug!(%request, "permission already granted");
                Ok(())
            }
            PermissionVerdict::Denied => {
                tracing::debug!(%request, "permission previously denied, opening settings");
                self.shell.open_app_settings();
                Err(PermissionError::UserHasDeniedPermission.into())
            }
            PermissionVerdict::NotPrompted => {
                let granted = self.prompter.show_prompt(request)?;
                // The dialog was shown; the platform will not show it again
                // for this install, whatever the answer was.
                self.prompted_store.mark_prompted()?;
                if granted {
                    tracing::info!(%request, "user granted notification permission");
                    Ok(())
                } else {
                    tracing::info!(%request, "user declined notification permission");
                    Err(PermissionError::UserDidNotGrantPermission.into())
                }
            }
        }
    }

    pub fn register_remote(&self) {
        self.shell.register_remote();
    }

    pub fn unregister_remote(&self) {
        self.shell.unregister_remote();
    }

    /// Whether a push token has ever been received. Independent of the
    /// permission verdict; silent pushes hand out tokens without a prompt.
    pub fn is_registered_remote(&self) -> bool {
        self.shell.is_registered_remote()
    }

    /// Called by the app shell when the app returns to the foreground. The
    /// user may have flipped settings while away, so the fresh read is worth
    /// logging.
    pub fn on_foreground(&self) {
        tracing::debug!("application became active");
        self.log_settings();
    }

    /// Called by the app shell when the app enters the background.
    pub fn on_background(&self) {
        tracing::debug!("application entered background");
    }

    /// Structured dump of the current settings snapshot. Best effort: a
    /// failed settings read is logged, not propagated.
    pub fn log_settings(&self) {
        match self.settings.current_settings() {
            Ok(snapshot) => log_snapshot(&snapshot),
            Err(err) => tracing::warn!(%err, "unable to read notification settings"),
        }
    }
}

fn log_snapshot(snapshot: &PermissionSnapshot) {
    for feature in NotificationFeature::all() {
        tracing::info!(
            feature = feature.name(),
            state = ?snapshot.state_of(*feature),
            "notification setting"
        );
    }
}
