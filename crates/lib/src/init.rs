//! Initialize the configuration directory: create ~/.lifeos, default config, and bundled assets.
//!
//! Layout mirrors `crates/lib/config/`: `config/assets/` → `~/.lifeos/assets/` (background
//! worker script and app manifest).

use anyhow::{Context, Result};
use include_dir::{include_dir, Dir};
use std::path::{Path, PathBuf};

use crate::config;

static BUNDLED_ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/config/assets");

/// Create the config directory and default files if they do not exist.
/// - Creates the config directory (parent of config file path).
/// - Writes `config.json` with `{}` if missing.
/// - Extracts bundled assets into the `assets` subdirectory if it does not exist.
pub fn init_config_dir(config_path: &Path) -> Result<PathBuf> {
    let config_dir = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(config_dir)
        .with_context(|| format!("creating config directory {}", config_dir.display()))?;

    if !config_path.exists() {
        std::fs::write(config_path, b"{}")
            .with_context(|| format!("writing default config to {}", config_path.display()))?;
        log::info!("created default config at {}", config_path.display());
    }

    let assets_dir = config::assets_dir(config_path);
    if !assets_dir.exists() {
        std::fs::create_dir_all(&assets_dir)
            .with_context(|| format!("creating assets directory {}", assets_dir.display()))?;
        if let Err(e) = BUNDLED_ASSETS.extract(&assets_dir) {
            anyhow::bail!("extracting bundled assets to {}: {}", assets_dir.display(), e);
        }
        log::info!("extracted bundled assets to {}", assets_dir.display());
    } else {
        log::debug!("assets directory already exists at {}, skipping", assets_dir.display());
    }

    Ok(config_dir.to_path_buf())
}
