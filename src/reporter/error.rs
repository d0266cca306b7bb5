use thiserror::Error;

use crate::platform::PresenceError;

/// Terminal failures of a `start` attempt. None of these trigger a retry;
/// the caller must invoke `start` again. Clonable so the asynchronous kinds
/// can be surfaced through `ReporterStatus`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReporterError {
    #[error("reporter already polling")]
    AlreadyPolling,
    #[error("location permission not granted")]
    PermissionDenied,
    #[error("location settings rejected the polling request")]
    SettingsRejected,
    #[error("location settings check cancelled")]
    SettingsCheckCancelled,
    #[error("failed to publish foreground notice: {0}")]
    NotificationPublishFailed(String),
}

impl From<PresenceError> for ReporterError {
    fn from(err: PresenceError) -> Self {
        ReporterError::NotificationPublishFailed(err.to_string())
    }
}
