//! Host platform capabilities used by the installable-app glue.
//!
//! The view layer never talks to the host directly: it goes through [`AppPlatform`],
//! which can signal that the app is installable, show the install prompt, and register
//! a background worker for offline assets. [`DesktopPlatform`] installs a launcher entry;
//! [`UnsupportedPlatform`] offers none of it.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Opaque, single-use install capability handed out by the platform.
#[derive(Debug)]
pub struct InstallPrompt {
    label: String,
}

impl InstallPrompt {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

/// The user's answer to the install prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    Accepted,
    Dismissed,
}

impl InstallOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstallOutcome::Accepted => "accepted",
            InstallOutcome::Dismissed => "dismissed",
        }
    }
}

/// A registered background worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerRegistration {
    pub script: PathBuf,
    /// Directory the worker serves assets from.
    pub scope: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("background workers are not supported on this platform")]
    Unsupported,
    #[error("worker script not found: {0}")]
    WorkerNotFound(PathBuf),
    #[error("platform io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Invoked once when the platform reports that the app can be installed.
pub type InstallableCallback = Box<dyn Fn(InstallPrompt) + Send + Sync>;

#[async_trait]
pub trait AppPlatform: Send + Sync {
    /// Register for the "app is installable" signal. May fire immediately.
    fn on_installable(&self, callback: InstallableCallback);

    /// Show the platform's install prompt for a retained token and wait for the answer.
    async fn prompt_install(&self, prompt: InstallPrompt) -> InstallOutcome;

    /// Register a background worker script for offline asset caching.
    async fn register_background_worker(
        &self,
        path: &Path,
    ) -> Result<WorkerRegistration, PlatformError>;
}

/// Platform with no install or worker support.
#[derive(Debug, Default)]
pub struct UnsupportedPlatform;

#[async_trait]
impl AppPlatform for UnsupportedPlatform {
    fn on_installable(&self, _callback: InstallableCallback) {}

    async fn prompt_install(&self, _prompt: InstallPrompt) -> InstallOutcome {
        InstallOutcome::Dismissed
    }

    async fn register_background_worker(
        &self,
        _path: &Path,
    ) -> Result<WorkerRegistration, PlatformError> {
        Err(PlatformError::Unsupported)
    }
}

/// Desktop install target: a freedesktop launcher entry for the running executable.
pub struct DesktopPlatform {
    app_name: String,
    launcher_path: PathBuf,
    assets_dir: PathBuf,
}

impl DesktopPlatform {
    pub const LAUNCHER_FILE: &'static str = "lifeos.desktop";

    pub fn new(
        app_name: impl Into<String>,
        launcher_path: impl Into<PathBuf>,
        assets_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            launcher_path: launcher_path.into(),
            assets_dir: assets_dir.into(),
        }
    }

    /// Default launcher location: `<data dir>/applications/lifeos.desktop`.
    pub fn default_launcher_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("applications")
            .join(Self::LAUNCHER_FILE)
    }

    pub fn is_installed(&self) -> bool {
        self.launcher_path.exists()
    }

    fn launcher_entry(&self) -> String {
        let exec = std::env::current_exe()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "lifeos-desktop".to_string());
        format!(
            "[Desktop Entry]\nType=Application\nName={}\nExec={}\nTerminal=false\nCategories=Utility;\n",
            self.app_name, exec
        )
    }

    async fn write_launcher(&self) -> std::io::Result<()> {
        if let Some(parent) = self.launcher_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.launcher_path, self.launcher_entry()).await
    }
}

#[async_trait]
impl AppPlatform for DesktopPlatform {
    fn on_installable(&self, callback: InstallableCallback) {
        if self.is_installed() {
            log::debug!("launcher entry present at {}", self.launcher_path.display());
            return;
        }
        callback(InstallPrompt::new(self.app_name.clone()));
    }

    async fn prompt_install(&self, prompt: InstallPrompt) -> InstallOutcome {
        match self.write_launcher().await {
            Ok(()) => {
                log::info!(
                    "installed launcher for {} at {}",
                    prompt.label(),
                    self.launcher_path.display()
                );
                InstallOutcome::Accepted
            }
            Err(e) => {
                log::warn!("writing launcher entry failed: {}", e);
                InstallOutcome::Dismissed
            }
        }
    }

    async fn register_background_worker(
        &self,
        path: &Path,
    ) -> Result<WorkerRegistration, PlatformError> {
        let script = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.assets_dir.join(path)
        };
        match tokio::fs::metadata(&script).await {
            Ok(meta) if meta.is_file() => {}
            Ok(_) => return Err(PlatformError::WorkerNotFound(script)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PlatformError::WorkerNotFound(script))
            }
            Err(e) => return Err(e.into()),
        }
        let scope = script
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.assets_dir.clone());
        Ok(WorkerRegistration { script, scope })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lifeos-platform-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[tokio::test]
    async fn desktop_signals_installable_until_launcher_exists() {
        let dir = temp_dir();
        let platform = DesktopPlatform::new(
            "LifeOS Chat",
            dir.join("applications").join(DesktopPlatform::LAUNCHER_FILE),
            dir.join("assets"),
        );

        let received = Arc::new(Mutex::new(None));
        let slot = Arc::clone(&received);
        platform.on_installable(Box::new(move |prompt| {
            *slot.lock().unwrap() = Some(prompt);
        }));
        let prompt = received.lock().unwrap().take().expect("installable signal");
        assert_eq!(prompt.label(), "LifeOS Chat");

        assert_eq!(platform.prompt_install(prompt).await, InstallOutcome::Accepted);
        assert!(platform.is_installed());

        let fired = Arc::new(Mutex::new(false));
        let flag = Arc::clone(&fired);
        platform.on_installable(Box::new(move |_| {
            *flag.lock().unwrap() = true;
        }));
        assert!(!*fired.lock().unwrap());
    }

    #[tokio::test]
    async fn desktop_worker_registration_requires_script() {
        let dir = temp_dir();
        let assets = dir.join("assets");
        let platform = DesktopPlatform::new("LifeOS Chat", dir.join("lifeos.desktop"), &assets);

        let err = platform
            .register_background_worker(Path::new("sw.js"))
            .await
            .unwrap_err();
        assert!(matches!(err, PlatformError::WorkerNotFound(_)));

        std::fs::create_dir_all(&assets).unwrap();
        std::fs::write(assets.join("sw.js"), "// worker").unwrap();
        let reg = platform
            .register_background_worker(Path::new("sw.js"))
            .await
            .unwrap();
        assert_eq!(reg.script, assets.join("sw.js"));
        assert_eq!(reg.scope, assets);
    }

    #[tokio::test]
    async fn unsupported_platform_offers_nothing() {
        let platform = UnsupportedPlatform;
        platform.on_installable(Box::new(|_| panic!("must not fire")));
        assert_eq!(
            platform.prompt_install(InstallPrompt::new("x")).await,
            InstallOutcome::Dismissed
        );
        assert!(matches!(
            platform.register_background_worker(Path::new("sw.js")).await,
            Err(PlatformError::Unsupported)
        ));
    }
}
