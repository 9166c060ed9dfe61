use std::path::Path;

use image::RgbaImage;

use crate::error::SignError;

/**
 * This module contains all logic for loading textures, fonts and other assets from external files.
 */
pub mod texture;

#[cfg(target_arch = "wasm32")]
fn format_url(file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let origin = window
        .location()
        .origin()
        .map_err(|_| anyhow::anyhow!("page origin is not readable"))?;
    let base = reqwest::Url::parse(&format!("{}/assets/", origin))?;
    Ok(base.join(file_name)?)
}

/// Read an asset. Natively `file_name` is resolved against `root`; on the web
/// it is fetched relative to the page's `/assets/`.
pub async fn load_binary(root: &Path, file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let _ = root;
        let url = format_url(file_name)?;
        reqwest::get(url).await?.bytes().await?.to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = root.join(file_name);
        tokio::fs::read(path).await?
    };

    Ok(data)
}

/// Load and decode an image asset into RGBA8.
pub async fn load_image(root: &Path, file_name: &str) -> Result<RgbaImage, SignError> {
    let data = load_binary(root, file_name)
        .await
        .map_err(|e| SignError::TextureLoad {
            path: file_name.to_string(),
            reason: e.to_string(),
        })?;
    let image = image::load_from_memory(&data).map_err(|source| SignError::Decode {
        path: file_name.to_string(),
        source,
    })?;
    Ok(image.to_rgba8())
}
