use capbridge_common::{CapbridgeError, PlatformError, StorageError};

use crate::channel::{Channel, ChannelMode};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("a handler is already registered for {0}")]
    AlreadyRegistered(Channel),

    #[error("{channel} is {actual:?}, cannot bind a {requested:?} handler")]
    ModeMismatch {
        channel: Channel,
        actual: ChannelMode,
        requested: ChannelMode,
    },
}

/// Failure returned by a channel handler. Reported to the caller as
/// `handler_failed` with this error's message.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Host(#[from] CapbridgeError),

    #[error("{0}")]
    Failed(String),
}

impl HandlerError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    #[error("context isolation is not enabled in this renderer")]
    IsolationUnavailable,

    #[error("{0:?} is already bound in the renderer")]
    KeyAlreadyBound(String),

    #[error("{0:?} is not a valid global name")]
    InvalidKey(String),
}

impl From<BridgeError> for CapbridgeError {
    fn from(err: BridgeError) -> Self {
        CapbridgeError::Bridge(err.to_string())
    }
}
