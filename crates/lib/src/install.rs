//! Install banner state on top of an [`AppPlatform`].
//!
//! The platform's installable signal arrives on an mpsc channel and is picked up by
//! [`InstallGlue::poll`]; the install prompt runs on the tokio runtime and its outcome
//! comes back over a oneshot. Worker registration is fire-and-forget and only logged.

use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use tokio::runtime::Handle;
use tokio::sync::oneshot;

use crate::conversation::Notifier;
use crate::platform::{AppPlatform, InstallOutcome, InstallPrompt};

pub struct InstallGlue {
    platform: Arc<dyn AppPlatform>,
    runtime: Handle,
    installable_rx: mpsc::Receiver<InstallPrompt>,
    deferred: Option<InstallPrompt>,
    banner_visible: bool,
    outcome_rx: Option<oneshot::Receiver<InstallOutcome>>,
    notifier: Option<Notifier>,
}

impl InstallGlue {
    /// Subscribe to the installable signal and register the background worker.
    pub fn attach(platform: Arc<dyn AppPlatform>, runtime: Handle, worker_path: PathBuf) -> Self {
        Self::attach_with_notifier(platform, runtime, worker_path, None)
    }

    pub fn attach_with_notifier(
        platform: Arc<dyn AppPlatform>,
        runtime: Handle,
        worker_path: PathBuf,
        notifier: Option<Notifier>,
    ) -> Self {
        let (tx, installable_rx) = mpsc::channel();
        let signal_notifier = notifier.clone();
        platform.on_installable(Box::new(move |prompt| {
            if tx.send(prompt).is_ok() {
                if let Some(notify) = &signal_notifier {
                    notify();
                }
            }
        }));

        let worker_platform = Arc::clone(&platform);
        runtime.spawn(async move {
            match worker_platform.register_background_worker(&worker_path).await {
                Ok(reg) => log::info!(
                    "background worker registered: {} (scope {})",
                    reg.script.display(),
                    reg.scope.display()
                ),
                Err(e) => log::warn!("background worker registration failed: {}", e),
            }
        });

        Self {
            platform,
            runtime,
            installable_rx,
            deferred: None,
            banner_visible: false,
            outcome_rx: None,
            notifier,
        }
    }

    pub fn banner_visible(&self) -> bool {
        self.banner_visible
    }

    /// True while a retained prompt token is available.
    pub fn can_install(&self) -> bool {
        self.deferred.is_some()
    }

    /// True while the platform prompt is open.
    pub fn is_prompting(&self) -> bool {
        self.outcome_rx.is_some()
    }

    /// Pick up the installable signal and a finished install prompt. Returns true when state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(prompt) = self.installable_rx.try_recv() {
            log::debug!("app is installable: {}", prompt.label());
            self.deferred = Some(prompt);
            self.banner_visible = true;
            changed = true;
        }
        if let Some(rx) = self.outcome_rx.as_mut() {
            match rx.try_recv() {
                Ok(outcome) => {
                    log::info!("install prompt {}", outcome.as_str());
                    self.outcome_rx = None;
                    self.banner_visible = false;
                    changed = true;
                }
                Err(oneshot::error::TryRecvError::Empty) => {}
                Err(oneshot::error::TryRecvError::Closed) => {
                    log::warn!("install prompt ended without an outcome");
                    self.outcome_rx = None;
                    self.banner_visible = false;
                    changed = true;
                }
            }
        }
        changed
    }

    /// Hand the retained token to the platform prompt. No-op without a token.
    pub fn install(&mut self) -> bool {
        let Some(prompt) = self.deferred.take() else {
            return false;
        };
        let (tx, rx) = oneshot::channel();
        let platform = Arc::clone(&self.platform);
        let notifier = self.notifier.clone();
        self.runtime.spawn(async move {
            let outcome = platform.prompt_install(prompt).await;
            if tx.send(outcome).is_err() {
                log::debug!("install outcome dropped: install glue gone");
                return;
            }
            if let Some(notify) = notifier {
                notify();
            }
        });
        self.outcome_rx = Some(rx);
        true
    }

    /// Hide the banner. The token stays retained and is not invoked.
    pub fn dismiss(&mut self) {
        self.banner_visible = false;
    }
}
