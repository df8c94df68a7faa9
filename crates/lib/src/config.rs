//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.lifeos/config.json`) and environment.
//! Every field has a default, so a missing file or `{}` yields a working setup.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Simulated assistant settings (reply delay, template, greeting).
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Context list settings (seed data, description placeholder).
    #[serde(default)]
    pub contexts: ContextsConfig,

    /// Installable-app glue (launcher install banner, background worker).
    #[serde(default)]
    pub install: InstallConfig,
}

/// Settings for the stub reply generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantConfig {
    /// Delay before the assistant reply is appended (default 1000 ms). Overridden by LIFEOS_REPLY_DELAY_MS env.
    #[serde(default = "default_reply_delay_ms")]
    pub reply_delay_ms: u64,

    /// Reply template; `{message}` is replaced with the submitted text.
    #[serde(default = "default_reply_template")]
    pub reply_template: String,

    /// Assistant message shown when the conversation starts. `null` disables it.
    #[serde(default = "default_greeting")]
    pub greeting: Option<String>,
}

/// Context list settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextsConfig {
    /// Start with the built-in seed contexts (default true).
    #[serde(default = "default_true")]
    pub seed: bool,

    /// Description used when a new context is created without one.
    #[serde(default = "default_context_description")]
    pub default_description: String,

    /// Characters of a description shown in the list before truncation (default 30).
    #[serde(default = "default_description_preview_chars")]
    pub description_preview_chars: usize,
}

/// Installable-app glue settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallConfig {
    /// When false, no install banner is offered and no background worker is registered.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Name shown in the install banner and written to the launcher entry.
    #[serde(default = "default_app_name")]
    pub app_name: String,

    /// Background worker script. Relative paths are resolved against the assets directory.
    #[serde(default = "default_worker_path")]
    pub worker_path: PathBuf,
}

fn default_reply_delay_ms() -> u64 {
    1000
}

fn default_reply_template() -> String {
    "I received your message: \"{message}\". This is a simulated response. \
     In a real application, you would integrate with an AI API here."
        .to_string()
}

fn default_greeting() -> Option<String> {
    Some("Hello! I'm your AI assistant. How can I help you today?".to_string())
}

fn default_true() -> bool {
    true
}

fn default_context_description() -> String {
    "No description".to_string()
}

fn default_description_preview_chars() -> usize {
    30
}

fn default_app_name() -> String {
    "LifeOS Chat".to_string()
}

fn default_worker_path() -> PathBuf {
    PathBuf::from("sw.js")
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: default_reply_delay_ms(),
            reply_template: default_reply_template(),
            greeting: default_greeting(),
        }
    }
}

impl Default for ContextsConfig {
    fn default() -> Self {
        Self {
            seed: true,
            default_description: default_context_description(),
            description_preview_chars: default_description_preview_chars(),
        }
    }
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            app_name: default_app_name(),
            worker_path: default_worker_path(),
        }
    }
}

/// Resolve the reply delay: env LIFEOS_REPLY_DELAY_MS overrides config. Never zero.
pub fn resolve_reply_delay(config: &Config) -> Duration {
    let ms = std::env::var("LIFEOS_REPLY_DELAY_MS")
        .ok()
        .and_then(|s| s.trim().parse::<u64>().ok())
        .unwrap_or(config.assistant.reply_delay_ms);
    Duration::from_millis(ms.max(1))
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("LIFEOS_CONFIG_PATH").map(PathBuf::from).unwrap_or_else(|_| {
        dirs::home_dir()
            .map(|h| h.join(".lifeos").join("config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    })
}

/// Bundled assets directory: `assets` subdirectory of the config file's parent.
pub fn assets_dir(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .join("assets")
}

/// Resolve the worker script path: absolute paths are kept, relative ones joined onto the assets dir.
pub fn resolve_worker_path(config: &Config, config_path: &Path) -> PathBuf {
    let worker = &config.install.worker_path;
    if worker.is_absolute() {
        worker.clone()
    } else {
        assets_dir(config_path).join(worker)
    }
}

/// Load config from the default path (or LIFEOS_CONFIG_PATH). Missing file => default config.
/// Returns the config and the path that was used (for resolving the assets directory).
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.assistant.reply_delay_ms, 1000);
        assert!(config.assistant.reply_template.contains("{message}"));
        assert!(config.assistant.greeting.is_some());
        assert!(config.contexts.seed);
        assert_eq!(config.contexts.default_description, "No description");
        assert_eq!(config.contexts.description_preview_chars, 30);
        assert!(config.install.enabled);
        assert_eq!(config.install.worker_path, PathBuf::from("sw.js"));
    }

    #[test]
    fn camel_case_keys_and_null_greeting() {
        let config: Config = serde_json::from_str(
            r#"{
                "assistant": { "replyDelayMs": 250, "greeting": null },
                "contexts": { "defaultDescription": "tbd", "descriptionPreviewChars": 12 },
                "install": { "enabled": false }
            }"#,
        )
        .unwrap();
        assert_eq!(config.assistant.reply_delay_ms, 250);
        assert!(config.assistant.greeting.is_none());
        assert_eq!(config.contexts.default_description, "tbd");
        assert_eq!(config.contexts.description_preview_chars, 12);
        assert!(!config.install.enabled);
        assert_eq!(config.install.app_name, "LifeOS Chat");
    }

    #[test]
    fn worker_path_relative_to_assets_dir() {
        let config = Config::default();
        let path = Path::new("/home/user/.lifeos/config.json");
        assert_eq!(
            resolve_worker_path(&config, path),
            PathBuf::from("/home/user/.lifeos/assets/sw.js")
        );
    }

    #[test]
    fn worker_path_absolute_kept() {
        let mut config = Config::default();
        config.install.worker_path = PathBuf::from("/srv/lifeos/worker.js");
        let path = Path::new("/home/user/.lifeos/config.json");
        assert_eq!(
            resolve_worker_path(&config, path),
            PathBuf::from("/srv/lifeos/worker.js")
        );
    }

    #[test]
    fn load_config_missing_file_uses_defaults() {
        let path = std::env::temp_dir()
            .join(format!("lifeos-config-test-{}", uuid::Uuid::new_v4()))
            .join("config.json");
        let (config, used) = load_config(Some(path.clone())).unwrap();
        assert_eq!(used, path);
        assert_eq!(config.assistant.reply_delay_ms, 1000);
    }
}
