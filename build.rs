use anyhow::*;
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;
use std::env;
use std::path::PathBuf;

/// Assets the configurator loads at runtime, relative to `assets/`.
const SIGN_ASSETS: [&str; 5] = [
    "fonts/minecraft_font.ttf",
    "textures/wood_oak.webp",
    "textures/wood_dark.webp",
    "textures/wood_acacia.webp",
    "backgrounds/minecraft_blurred.png",
];

fn main() -> Result<()> {
    println!("cargo:rerun-if-changed=assets");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets_src = manifest_dir.join("assets");
    for asset in SIGN_ASSETS {
        if !assets_src.join(asset).exists() {
            println!("cargo:warning=missing asset assets/{}", asset);
        }
    }
    if !assets_src.exists() {
        return Ok(());
    }

    // Web builds serve the copy in OUT_DIR.
    let out_dir = env::var("OUT_DIR")?;
    let mut copy_options = CopyOptions::new();
    copy_options.overwrite = true;
    copy_items(&["assets/"], out_dir, &copy_options)?;

    Ok(())
}
