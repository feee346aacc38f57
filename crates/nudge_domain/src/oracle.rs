use serde::{Deserialize, Serialize};

use crate::feature::{FeatureSettingState, NotificationFeature};
use crate::snapshot::PermissionSnapshot;

/// Tri-state outcome of evaluating the current permission status. Always
/// derived from a snapshot and the prompted flag, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionVerdict {
    Granted,
    Denied,
    NotPrompted,
}

/// Reconciles a settings snapshot and the durable prompted flag into one
/// verdict.
///
/// Anything enabled means the user said yes at some point, regardless of what
/// the flag says. With nothing enabled, prior prompting (either recorded in
/// the flag or structurally visible in the snapshot) means the user said no;
/// otherwise they have simply never been asked.
pub fn classify(snapshot: &PermissionSnapshot, prompted_before: bool) -> PermissionVerdict {
    if snapshot.any_enabled() {
        PermissionVerdict::Granted
    } else if prompted_before || snapshot.shows_prior_prompt() {
        PermissionVerdict::Denied
    } else {
        PermissionVerdict::NotPrompted
    }
}

/// Whether the snapshot grants the wanted features.
///
/// An empty `wanted` asks the broad question: is anything at all enabled?
/// A non-empty `wanted` requires every listed feature to be enabled, with
/// containment semantics on both snapshot generations.
pub fn has_permission(snapshot: &PermissionSnapshot, wanted: &[NotificationFeature]) -> bool {
    if wanted.is_empty() {
        return snapshot.any_enabled();
    }
    wanted
        .iter()
        .all(|feature| snapshot.state_of(*feature) == FeatureSettingState::Enabled)
}
