use thiserror::Error;

use nudge_domain::PermissionError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Permission(#[from] PermissionError),

    /// A permission prompt is already outstanding; the platform only allows
    /// one dialog at a time, so overlapping requests are rejected instead of
    /// queued.
    #[error("a permission prompt is already in flight")]
    PromptInFlight,

    /// A platform collaborator failed (settings read, prompt, flag store).
    #[error(transparent)]
    Platform(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn permission(&self) -> Option<&PermissionError> {
        match self {
            Self::Permission(err) => Some(err),
            _ => None,
        }
    }
}
