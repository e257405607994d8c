use thiserror::Error;

use crate::events::SessionStatus;

/// Failures reported by the opaque conferencing engine, translated from
/// its status codes into a small closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("engine not initialized")]
    NotInitialized,
    #[error("authentication rejected by the engine")]
    AuthFailed,
    #[error("engine request timed out")]
    Timeout,
    #[error("device unavailable")]
    DeviceUnavailable,
    #[error("unknown engine failure")]
    Unknown,
}

/// Failures surfaced by the session orchestration layer.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("engine not ready: {0}")]
    EngineNotReady(EngineError),
    #[error("authentication failed")]
    AuthenticationFailed,
    #[error("meeting join failed")]
    JoinFailed,
    #[error("device selection failed for '{0}'")]
    DeviceSelectionFailed(String),
    #[error("a {0} operation is already in flight")]
    OperationInFlight(&'static str),
    #[error("cannot {op} while session is {status}")]
    InvalidState {
        op: &'static str,
        status: SessionStatus,
    },
}
