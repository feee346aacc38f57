use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One discrete notification capability the platform can enable on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationFeature {
    Alert,
    Sound,
    Badge,
    CarPlay,
    LockScreen,
    NotificationCenter,
}

impl NotificationFeature {
    pub const fn all() -> &'static [Self] {
        &[
            Self::Alert,
            Self::Sound,
            Self::Badge,
            Self::CarPlay,
            Self::LockScreen,
            Self::NotificationCenter,
        ]
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Alert => "alert",
            Self::Sound => "sound",
            Self::Badge => "badge",
            Self::CarPlay => "car-play",
            Self::LockScreen => "lock-screen",
            Self::NotificationCenter => "notification-center",
        }
    }

    /// Whether the legacy settings model can express this feature at all.
    /// The legacy generation only carries alert, sound and badge bits;
    /// everything else exists only in the modern settings object.
    pub const fn legacy_capable(&self) -> bool {
        matches!(self, Self::Alert | Self::Sound | Self::Badge)
    }
}

impl fmt::Display for NotificationFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for NotificationFeature {
    type Err = ParseFeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "alert" => Ok(Self::Alert),
            "sound" => Ok(Self::Sound),
            "badge" => Ok(Self::Badge),
            "car-play" => Ok(Self::CarPlay),
            "lock-screen" => Ok(Self::LockScreen),
            "notification-center" => Ok(Self::NotificationCenter),
            _ => Err(ParseFeatureError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("unknown notification feature: {0}")]
pub struct ParseFeatureError(pub String);

/// Per-feature tri-state as reported by a settings snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeatureSettingState {
    Enabled,
    Disabled,
    Unsupported,
}

/// Ordered, duplicate-free set of features a caller wants enabled.
///
/// Emptiness is legal to construct but invalid to request with; the service
/// rejects an empty request before touching the platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRequest {
    features: Vec<NotificationFeature>,
}

impl FeatureRequest {
    pub fn new(features: impl IntoIterator<Item = NotificationFeature>) -> Self {
        let mut unique = Vec::new();
        for feature in features {
            if !unique.contains(&feature) {
                unique.push(feature);
            }
        }
        Self { features: unique }
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn features(&self) -> &[NotificationFeature] {
        &self.features
    }
}

impl fmt::Display for FeatureRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.features.iter().map(|feature| feature.name()).collect();
        write!(f, "{}", names.join("+"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_deduplicates_preserving_order() {
        let request = FeatureRequest::new([
            NotificationFeature::Sound,
            NotificationFeature::Alert,
            NotificationFeature::Sound,
        ]);
        assert_eq!(
            request.features(),
            &[NotificationFeature::Sound, NotificationFeature::Alert]
        );
    }

    #[test]
    fn feature_names_round_trip() {
        for feature in NotificationFeature::all() {
            assert_eq!(feature.name().parse::<NotificationFeature>().ok(), Some(*feature));
        }
        assert!("lockscreen".parse::<NotificationFeature>().is_err());
    }
}
