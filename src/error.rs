//! Error taxonomy
//!
//! Only setup and asset problems are errors. Per-frame gameplay outcomes
//! (empty magazine, blocked movement) are plain state.

use std::path::PathBuf;

use crate::asset::AnimationKey;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `{tag}/{clip}` is not in the asset table. Fatal for the caller.
    #[error("missing animation `{0}`")]
    MissingAnimation(AnimationKey),

    /// No gamepad backend or no pads. Recovered by falling back to the keyboard.
    #[error("input device unavailable: {0}")]
    InputDeviceUnavailable(String),

    /// Invalid tuning or construction parameters.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },

    #[error("failed to serialize: {0}")]
    Serialize(#[from] ron::Error),

    #[error("failed to decode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Configuration(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
