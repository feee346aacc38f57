use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use parking_lot::Mutex;
use tracing::info;

use nudge_core::{
    FilePromptedStore, NotificationService, PermissionPrompter, PlatformShell, SettingsSource,
};
use nudge_domain::category::{demo_category, NotificationCategory};
use nudge_domain::{
    FeatureRequest, FeatureSettingState, ModernSnapshot, NotificationFeature, PermissionSnapshot,
};

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub(crate) state_dir: PathBuf,
    pub(crate) prompt_answer: Option<bool>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(dir) = std::env::var("NUDGE_STATE_DIR") {
            config.state_dir = PathBuf::from(dir);
        }
        if let Ok(answer) = std::env::var("NUDGE_PROMPT_ANSWER") {
            config.prompt_answer = parse_answer(&answer);
        }
        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            state_dir: PathBuf::from(".nudge"),
            prompt_answer: None,
        }
    }
}

pub(crate) fn parse_answer(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "y" | "yes" | "true" | "1" => Some(true),
        "n" | "no" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// Console stand-in for the real platform: the "device settings" live in
/// memory and the permission dialog is a terminal question.
struct ConsoleState {
    snapshot: Mutex<ModernSnapshot>,
    scripted_answer: Option<bool>,
}

struct ConsoleSettings(Arc<ConsoleState>);

impl SettingsSource for ConsoleSettings {
    fn current_settings(&self) -> Result<PermissionSnapshot> {
        Ok(PermissionSnapshot::Modern(self.0.snapshot.lock().clone()))
    }
}

struct ConsolePrompter(Arc<ConsoleState>);

impl PermissionPrompter for ConsolePrompter {
    fn show_prompt(&self, request: &FeatureRequest) -> Result<bool> {
        let granted = match self.0.scripted_answer {
            Some(answer) => {
                println!("\"Nudge\" Would Like to Send You Notifications ({request}) -> scripted answer: {answer}");
                answer
            }
            None => {
                print!("\"Nudge\" Would Like to Send You Notifications ({request}) [y/n] ");
                io::stdout().flush()?;
                let mut line = String::new();
                io::stdin().lock().read_line(&mut line)?;
                parse_answer(&line).unwrap_or(false)
            }
        };

        let state = if granted {
            FeatureSettingState::Enabled
        } else {
            FeatureSettingState::Disabled
        };
        let mut snapshot = self.0.snapshot.lock();
        for feature in request.features() {
            *snapshot = snapshot.clone().with(*feature, state);
        }
        Ok(granted)
    }
}

struct ConsoleShell;

impl PlatformShell for ConsoleShell {
    fn register_remote(&self) {
        info!("registering for remote notifications");
    }

    fn unregister_remote(&self) {
        info!("unregistering from remote notifications");
    }

    fn is_registered_remote(&self) -> bool {
        true
    }

    fn set_categories(&self, categories: &[NotificationCategory]) {
        for category in categories {
            info!(
                category = %category.identifier,
                actions = category.actions.len(),
                "registering interactive category"
            );
        }
    }

    fn open_app_settings(&self) {
        println!("-> opening the app's page in system settings");
    }
}

pub fn run(config: AppConfig) -> Result<()> {
    let state = Arc::new(ConsoleState {
        snapshot: Mutex::new(ModernSnapshot::new()),
        scripted_answer: config.prompt_answer,
    });

    let service = NotificationService::builder()
        .with_settings_source(Box::new(ConsoleSettings(state.clone())))
        .with_prompter(Box::new(ConsolePrompter(state)))
        .with_prompted_store(Box::new(FilePromptedStore::new(
            config.state_dir.join("prompted.json"),
        )))
        .with_shell(Box::new(ConsoleShell))
        .add_category(demo_category())
        .build()?;

    info!(verdict = ?service.permission_verdict()?, "verdict before requesting");
    service.log_settings();

    let request = FeatureRequest::new([NotificationFeature::Alert, NotificationFeature::Sound]);
    match service.request_permission(&request) {
        Ok(()) => println!("notifications are on"),
        Err(err) => println!("notifications are off: {err}"),
    }

    service.on_foreground();
    info!(verdict = ?service.permission_verdict()?, "verdict after requesting");
    Ok(())
}
