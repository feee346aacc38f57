use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::feature::{FeatureSettingState, NotificationFeature};

/// Point-in-time read of the platform's notification settings.
///
/// The two variants cover the two settings-model generations the platform has
/// shipped; both answer the same per-feature queries so the permission logic
/// is written once against this type and never against either variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PermissionSnapshot {
    Legacy(LegacySnapshot),
    Modern(ModernSnapshot),
}

impl PermissionSnapshot {
    pub fn state_of(&self, feature: NotificationFeature) -> FeatureSettingState {
        match self {
            Self::Legacy(snapshot) => snapshot.state_of(feature),
            Self::Modern(snapshot) => snapshot.state_of(feature),
        }
    }

    pub fn enabled_features(&self) -> Vec<NotificationFeature> {
        NotificationFeature::all()
            .iter()
            .copied()
            .filter(|feature| self.state_of(*feature) == FeatureSettingState::Enabled)
            .collect()
    }

    pub fn any_enabled(&self) -> bool {
        NotificationFeature::all()
            .iter()
            .any(|feature| self.state_of(*feature) == FeatureSettingState::Enabled)
    }

    /// Whether the snapshot itself is evidence that the user has already seen
    /// the permission dialog. Only the modern settings object can tell: once
    /// the user has answered the dialog, every applicable feature reports a
    /// concrete state instead of `Unsupported`. The legacy model carries no
    /// such signal, which is why the durable prompted flag exists.
    pub fn shows_prior_prompt(&self) -> bool {
        match self {
            Self::Legacy(_) => false,
            Self::Modern(snapshot) => snapshot
                .states
                .values()
                .any(|state| *state != FeatureSettingState::Unsupported),
        }
    }
}

/// Legacy-generation settings: a single bitmask of currently enabled types,
/// with no per-feature granularity beyond alert, sound and badge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacySnapshot {
    enabled: Vec<NotificationFeature>,
}

impl LegacySnapshot {
    /// Builds the snapshot from the legacy enabled-types mask. Features the
    /// legacy model cannot express are dropped.
    pub fn new(enabled: impl IntoIterator<Item = NotificationFeature>) -> Self {
        let mut unique = Vec::new();
        for feature in enabled {
            if feature.legacy_capable() && !unique.contains(&feature) {
                unique.push(feature);
            }
        }
        Self { enabled: unique }
    }

    pub fn state_of(&self, feature: NotificationFeature) -> FeatureSettingState {
        if !feature.legacy_capable() {
            FeatureSettingState::Unsupported
        } else if self.enabled.contains(&feature) {
            FeatureSettingState::Enabled
        } else {
            FeatureSettingState::Disabled
        }
    }
}

/// Modern-generation settings: an independent tri-state per feature. Features
/// absent from the map report `Unsupported`, matching a settings object read
/// before the user has ever been asked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModernSnapshot {
    states: BTreeMap<NotificationFeature, FeatureSettingState>,
}

impl ModernSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, feature: NotificationFeature, state: FeatureSettingState) -> Self {
        self.states.insert(feature, state);
        self
    }

    pub fn state_of(&self, feature: NotificationFeature) -> FeatureSettingState {
        self.states
            .get(&feature)
            .copied()
            .unwrap_or(FeatureSettingState::Unsupported)
    }
}
