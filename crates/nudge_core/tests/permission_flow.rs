use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use parking_lot::Mutex;

use nudge_core::{
    NotificationService, PermissionPrompter, PlatformShell, PromptedStore, ServiceError,
    SettingsSource,
};
use nudge_domain::category::{demo_category, NotificationCategory};
use nudge_domain::{
    FeatureRequest, FeatureSettingState, ModernSnapshot, NotificationFeature, PermissionError,
    PermissionSnapshot, PermissionVerdict,
};
use NotificationFeature::{Alert, Sound};

/// Shared state behind the fake platform adapters, with call counters so
/// tests can assert which platform calls were (not) made.
#[derive(Default)]
struct FakePlatform {
    snapshot: Mutex<ModernSnapshot>,
    prompt_answer: Mutex<bool>,
    prompted: Mutex<bool>,
    settings_reads: Mutex<usize>,
    prompts_shown: Mutex<usize>,
    settings_opened: Mutex<usize>,
    remote_registered: Mutex<bool>,
    categories: Mutex<Vec<NotificationCategory>>,
}

impl FakePlatform {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn set_snapshot(&self, snapshot: ModernSnapshot) {
        *self.snapshot.lock() = snapshot;
    }

    fn set_prompt_answer(&self, granted: bool) {
        *self.prompt_answer.lock() = granted;
    }

    fn prompts_shown(&self) -> usize {
        *self.prompts_shown.lock()
    }

    fn settings_opened(&self) -> usize {
        *self.settings_opened.lock()
    }

    fn settings_reads(&self) -> usize {
        *self.settings_reads.lock()
    }
}

struct FakeSettings(Arc<FakePlatform>);

impl SettingsSource for FakeSettings {
    fn current_settings(&self) -> Result<PermissionSnapshot> {
        *self.0.settings_reads.lock() += 1;
        Ok(PermissionSnapshot::Modern(self.0.snapshot.lock().clone()))
    }
}

struct FakePrompter(Arc<FakePlatform>);

impl PermissionPrompter for FakePrompter {
    fn show_prompt(&self, request: &FeatureRequest) -> Result<bool> {
        *self.0.prompts_shown.lock() += 1;
        let granted = *self.0.prompt_answer.lock();
        // Answering the dialog flips the requested features out of the
        // unsupported state, like the real settings object does.
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

struct FakeStore(Arc<FakePlatform>);

impl PromptedStore for FakeStore {
    fn load(&self) -> Result<bool> {
        Ok(*self.0.prompted.lock())
    }

    fn mark_prompted(&self) -> Result<()> {
        *self.0.prompted.lock() = true;
        Ok(())
    }
}

struct FakeShell(Arc<FakePlatform>);

impl PlatformShell for FakeShell {
    fn register_remote(&self) {
        *self.0.remote_registered.lock() = true;
    }

    fn unregister_remote(&self) {
        *self.0.remote_registered.lock() = false;
    }

    fn is_registered_remote(&self) -> bool {
        *self.0.remote_registered.lock()
    }

    fn set_categories(&self, categories: &[NotificationCategory]) {
        *self.0.categories.lock() = categories.to_vec();
    }

    fn open_app_settings(&self) {
        *self.0.settings_opened.lock() += 1;
    }
}

fn build_service(platform: &Arc<FakePlatform>) -> NotificationService {
    NotificationService::builder()
        .with_settings_source(Box::new(FakeSettings(platform.clone())))
        .with_prompter(Box::new(FakePrompter(platform.clone())))
        .with_prompted_store(Box::new(FakeStore(platform.clone())))
        .with_shell(Box::new(FakeShell(platform.clone())))
        .add_category(demo_category())
        .build()
        .expect("build notification service")
}

#[test]
fn build_registers_categories_and_remote_notifications() {
    let platform = FakePlatform::new();
    let service = build_service(&platform);

    assert!(service.is_registered_remote());
    assert_eq!(platform.categories.lock().len(), 1);
    assert_eq!(platform.categories.lock()[0].identifier, "test_category");

    service.unregister_remote();
    assert!(!service.is_registered_remote());
}

#[test]
fn empty_request_is_rejected_before_any_platform_call() {
    let platform = FakePlatform::new();
    let service = build_service(&platform);
    let reads_after_build = platform.settings_reads();

    let err = service
        .request_permission(&FeatureRequest::new([]))
        .expect_err("empty request must fail");
    assert!(matches!(
        err,
        ServiceError::Permission(PermissionError::EmptyRequest)
    ));

    assert_eq!(platform.prompts_shown(), 0);
    assert_eq!(platform.settings_opened(), 0);
    assert_eq!(platform.settings_reads(), reads_after_build);
}

#[test]
fn already_granted_request_never_prompts() {
    let platform = FakePlatform::new();
    platform.set_snapshot(ModernSnapshot::new().with(Alert, FeatureSettingState::Enabled));
    let service = build_service(&platform);

    let request = FeatureRequest::new([Alert]);
    service.request_permission(&request).expect("granted");
    service.request_permission(&request).expect("still granted");
    assert_eq!(platform.prompts_shown(), 0);
}

#[test]
fn denied_request_fails_and_opens_settings_without_prompting() {
    let platform = FakePlatform::new();
    *platform.prompted.lock() = true;
    let service = build_service(&platform);

    let err = service
        .request_permission(&FeatureRequest::new([Alert]))
        .expect_err("denied");
    assert!(matches!(
        err,
        ServiceError::Permission(PermissionError::UserHasDeniedPermission)
    ));
    assert_eq!(platform.settings_opened(), 1);
    assert_eq!(platform.prompts_shown(), 0);
}

#[test]
fn first_prompt_granted_flows_to_granted_verdict() {
    let platform = FakePlatform::new();
    platform.set_prompt_answer(true);
    let service = build_service(&platform);

    assert_eq!(
        service.permission_verdict().expect("verdict"),
        PermissionVerdict::NotPrompted
    );

    service
        .request_permission(&FeatureRequest::new([Alert]))
        .expect("user grants");
    assert_eq!(platform.prompts_shown(), 1);
    assert!(*platform.prompted.lock());
    assert_eq!(
        service.permission_verdict().expect("verdict"),
        PermissionVerdict::Granted
    );
}

#[test]
fn first_prompt_declined_then_short_circuits_to_denied() {
    let platform = FakePlatform::new();
    platform.set_prompt_answer(false);
    let service = build_service(&platform);

    let request = FeatureRequest::new([Alert]);
    let err = service
        .request_permission(&request)
        .expect_err("user declines");
    assert!(matches!(
        err,
        ServiceError::Permission(PermissionError::UserDidNotGrantPermission)
    ));
    assert!(*platform.prompted.lock());

    // The dialog is one-shot per install: the follow-up request must resolve
    // without showing it again.
    let err = service
        .request_permission(&request)
        .expect_err("already denied");
    assert!(matches!(
        err,
        ServiceError::Permission(PermissionError::UserHasDeniedPermission)
    ));
    assert_eq!(platform.prompts_shown(), 1);
    assert_eq!(platform.settings_opened(), 1);
}

#[test]
fn prompted_flag_stays_set_across_subsequent_operations() {
    let platform = FakePlatform::new();
    platform.set_prompt_answer(false);
    let service = build_service(&platform);

    let _ = service.request_permission(&FeatureRequest::new([Sound]));
    assert!(*platform.prompted.lock());

    let _ = service.permission_verdict();
    let _ = service.has_permission(&[Sound]);
    let _ = service.request_permission(&FeatureRequest::new([Sound]));
    service.on_foreground();
    service.on_background();
    assert!(*platform.prompted.lock());
}

#[test]
fn partial_grant_scenario_checks_containment() {
    let platform = FakePlatform::new();
    platform.set_snapshot(
        ModernSnapshot::new()
            .with(Alert, FeatureSettingState::Enabled)
            .with(Sound, FeatureSettingState::Disabled),
    );
    *platform.prompted.lock() = true;
    let service = build_service(&platform);

    assert_eq!(
        service.permission_verdict().expect("verdict"),
        PermissionVerdict::Granted
    );
    assert!(service.has_permission(&[Alert]).expect("alert"));
    assert!(!service.has_permission(&[Sound]).expect("sound"));
    assert!(!service.has_permission(&[Alert, Sound]).expect("both"));
}

#[test]
fn require_permission_maps_verdicts_to_errors() {
    let platform = FakePlatform::new();
    let service = build_service(&platform);

    let err = service.require_permission().expect_err("never prompted");
    assert!(matches!(
        err,
        ServiceError::Permission(PermissionError::UserHasNotBeenPrompted)
    ));

    *platform.prompted.lock() = true;
    let err = service.require_permission().expect_err("denied");
    assert!(matches!(
        err,
        ServiceError::Permission(PermissionError::UserHasDeniedPermission)
    ));

    platform.set_snapshot(ModernSnapshot::new().with(Alert, FeatureSettingState::Enabled));
    service.require_permission().expect("granted");
}

/// Prompter that parks inside the dialog until released, so a second request
/// can be issued while the first is still in flight.
struct BlockingPrompter {
    release: Mutex<mpsc::Receiver<()>>,
    shown: Arc<Mutex<usize>>,
}

impl PermissionPrompter for BlockingPrompter {
    fn show_prompt(&self, _request: &FeatureRequest) -> Result<bool> {
        *self.shown.lock() += 1;
        let _ = self.release.lock().recv_timeout(Duration::from_secs(5));
        Ok(true)
    }
}

#[test]
fn overlapping_request_is_rejected_while_prompt_is_in_flight() {
    let platform = FakePlatform::new();
    let (release_tx, release_rx) = mpsc::channel();
    let shown = Arc::new(Mutex::new(0usize));

    let service = Arc::new(
        NotificationService::builder()
            .with_settings_source(Box::new(FakeSettings(platform.clone())))
            .with_prompter(Box::new(BlockingPrompter {
                release: Mutex::new(release_rx),
                shown: shown.clone(),
            }))
            .with_prompted_store(Box::new(FakeStore(platform.clone())))
            .with_shell(Box::new(FakeShell(platform.clone())))
            .build()
            .expect("build notification service"),
    );

    let background = {
        let service = service.clone();
        thread::spawn(move || service.request_permission(&FeatureRequest::new([Alert])))
    };

    // Wait until the first request is parked inside the dialog.
    for _ in 0..200 {
        if *shown.lock() == 1 {
            break;
        }
        thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(*shown.lock(), 1);

    let err = service
        .request_permission(&FeatureRequest::new([Alert]))
        .expect_err("second request while prompt is up");
    assert!(matches!(err, ServiceError::PromptInFlight));

    release_tx.send(()).expect("release prompt");
    background
        .join()
        .expect("join background request")
        .expect("first request succeeds");
    assert_eq!(*shown.lock(), 1);
}
