use ortho_warp::{ImageId, StoreError, WarpError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("unhandled message type: {0}")]
    UnhandledMessage(String),
    #[error("unhandled telemetry message type: {0}")]
    UnhandledTelemetry(String),
    #[error("image {0} is unknown")]
    UnknownImage(ImageId),
    #[error("telemetry for image {0} contains non-finite values")]
    InvalidTelemetry(ImageId),
    #[error(transparent)]
    Warp(WarpError),
    #[error(transparent)]
    Store(StoreError),
    #[error("failed to encode image: {0}")]
    Encode(#[from] image::ImageError),
    #[error("failed to send to client: {0}")]
    Client(#[from] std::io::Error),
}

impl From<StoreError> for ProtocolError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UnknownImage(id) => Self::UnknownImage(id),
            e => Self::Store(e),
        }
    }
}

impl From<WarpError> for ProtocolError {
    fn from(e: WarpError) -> Self {
        match e {
            WarpError::Store {
                source: StoreError::UnknownImage(id),
                ..
            } => Self::UnknownImage(id),
            e => Self::Warp(e),
        }
    }
}
