//! Startup configuration.

use std::path::PathBuf;

use crate::sign::config::{SignConfiguration, WoodTexture};

/// Overrides [`Settings::asset_dir`] on native targets.
pub const ASSET_DIR_ENV: &str = "SIGNWRIGHT_ASSET_DIR";

#[derive(Clone, Debug)]
pub struct Settings {
    /// Root that asset paths are resolved against. Ignored on the web, where
    /// assets are fetched relative to the page origin.
    pub asset_dir: PathBuf,
    pub font_file: String,
    pub wood_extension: String,
    pub in_game_backdrop: String,
    /// Label surfaces are this many times larger than the wood image.
    pub magnification: u32,
    /// Largest texture side the device accepts. Replaced by the device's own
    /// limit once it exists.
    pub max_texture_side: u32,
    pub base_scale: f32,
    pub initial: SignConfiguration,
    pub title: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from("./assets"),
            font_file: "fonts/minecraft_font.ttf".to_string(),
            wood_extension: "webp".to_string(),
            in_game_backdrop: "backgrounds/minecraft_blurred.png".to_string(),
            magnification: 4,
            max_texture_side: wgpu::Limits::downlevel_webgl2_defaults().max_texture_dimension_2d,
            base_scale: 2.0,
            initial: SignConfiguration::default(),
            title: "Signwright".to_string(),
        }
    }
}

impl Settings {
    /// Defaults, with the asset directory taken from the environment if set.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        if let Ok(dir) = std::env::var(ASSET_DIR_ENV) {
            log::info!("Loading assets from {}", dir);
            settings.asset_dir = PathBuf::from(dir);
        }
        settings
    }

    pub fn wood_path(&self, wood: WoodTexture) -> String {
        format!("textures/{}", wood.file_name(&self.wood_extension))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign::config::SignSize;

    #[test]
    fn defaults_start_with_the_greeting_sign() {
        let settings = Settings::default();
        assert_eq!(settings.magnification, 4);
        assert_eq!(settings.max_texture_side, 2048);
        assert_eq!(settings.base_scale, 2.0);
        assert_eq!(settings.initial.wood, WoodTexture::Oak);
        assert_eq!(settings.initial.size, SignSize::Medium);
        assert!(settings.initial.show_pole);
        assert_eq!(settings.initial.text.lines().len(), 4);
    }

    #[test]
    fn wood_paths_follow_the_texture_id() {
        let settings = Settings::default();
        assert_eq!(
            settings.wood_path(WoodTexture::Acacia),
            "textures/wood_acacia.webp"
        );
        let png = Settings {
            wood_extension: "png".into(),
            ..Settings::default()
        };
        assert_eq!(png.wood_path(WoodTexture::Dark), "textures/wood_dark.png");
    }
}
