use filament_store::StoreError;
use thiserror::Error;

/// Error type returned by caller-supplied session actions.
///
/// Boxed so actions can `?`-propagate anything without the session API
/// growing an error type parameter.
pub type ActionError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result alias for caller-supplied session actions.
pub type ActionResult<T> = Result<T, ActionError>;

/// Errors from session operations.
///
/// Every failure is surfaced to the immediate caller; nothing is retried,
/// logged-and-dropped, or downgraded.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Opening the channel failed (lock held, file missing, file
    /// finalized). Surfaced immediately; the session never ran.
    #[error("failed to open channel: {0}")]
    Acquire(#[source] StoreError),

    /// The caller-supplied action failed. The channel was still released
    /// before this was returned.
    #[error("session action failed: {0}")]
    Action(#[source] ActionError),

    /// Releasing the channel (flush, close, or finalize-close) failed
    /// after the action completed normally.
    #[error("failed to release channel: {0}")]
    Release(#[source] StoreError),

    /// Both the session and the subsequent channel release failed. The
    /// primary failure is preserved as the error source; the release
    /// failure rides along instead of masking it.
    #[error("{primary} (releasing the channel also failed: {release})")]
    ReleaseAfterFailure {
        #[source]
        primary: Box<SessionError>,
        release: StoreError,
    },

    /// Blob-key lookup failed in either direction.
    #[error("blob key resolution failed: {0}")]
    Resolve(#[source] StoreError),

    /// The blob store rejected the deletion.
    #[error("blob deletion failed: {0}")]
    Delete(#[source] StoreError),
}

/// Result alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
