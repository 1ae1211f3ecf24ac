use thiserror::Error;

/// Errors for illegal bridge-level access.
///
/// Engine-level failures are deliberately not represented here: the codec
/// engine reports them as negative return codes which the bridge passes
/// through to the caller unmodified (see `traits::codec_engine`).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The handle does not address any slot in the registry.
    #[error("handle {0} is out of range")]
    OutOfRange(usize),

    /// The session's engine has been released; the handle stays valid for
    /// range checks but accepts no further operations.
    #[error("session is closed")]
    SessionClosed,
}
