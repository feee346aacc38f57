use thiserror::Error;

/// Permission failures surfaced to callers. All of these are recoverable;
/// nothing in the permission flow is fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PermissionError {
    /// The caller asked to request permission for zero features. Rejected
    /// before any platform call is made.
    #[error("the requested notification feature set is empty")]
    EmptyRequest,

    /// The user has already denied notification access; no prompt was shown.
    /// The right follow-up is sending them to the app's settings screen.
    #[error("user has denied notification access")]
    UserHasDeniedPermission,

    /// The user was shown the permission dialog and declined.
    #[error("user did not grant notification permission")]
    UserDidNotGrantPermission,

    /// The user has never been shown the permission dialog. Raised only by
    /// callers that want an explicit error instead of the not-prompted
    /// verdict; the request flow shows the dialog instead.
    #[error("user has not been prompted for notification permission yet")]
    UserHasNotBeenPrompted,
}
