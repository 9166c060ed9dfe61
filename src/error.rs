//! Error taxonomy for sign configuration and rebuilding.
//!
//! Engine plumbing (GPU setup, event loop) reports through `anyhow`; everything
//! that can go wrong while turning a [`SignConfiguration`](crate::sign::config::SignConfiguration)
//! into pixels and meshes is a [`SignError`].

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SignError {
    #[error("unknown wood texture `{0}` (expected oak, dark or acacia)")]
    UnknownWoodTexture(String),
    #[error("unknown sign size `{0}` (expected small, medium or large)")]
    UnknownSize(String),
    #[error("unknown backdrop `{0}` (expected white, in game or gradient)")]
    UnknownBackdrop(String),
    #[error("font could not be loaded: {0}")]
    FontLoad(String),
    #[error("no font is installed, the sign cannot be typeset")]
    FontUnavailable,
    #[error("texture {path} could not be loaded: {reason}")]
    TextureLoad { path: String, reason: String },
    #[error("image {0} has no pixels")]
    EmptyImage(String),
    #[error("image {path} could not be decoded")]
    Decode {
        path: String,
        #[source]
        source: image::ImageError,
    },
}
