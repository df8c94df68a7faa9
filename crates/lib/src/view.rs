//! Page-level view controller: UI-only state wired to the conversation store, the
//! context registry and the optional install glue.
//!
//! Rendering layers read state through the accessors and forward user actions to the
//! methods here; they call [`ViewController::poll`] once per frame (or after a notifier
//! fires) to pick up asynchronous results.

use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;
use tokio::runtime::Handle;

use crate::assistant::SimulatedReply;
use crate::config::{self, Config};
use crate::context::{Context, ContextRegistry};
use crate::conversation::{ConversationStore, Notifier};
use crate::install::InstallGlue;
use crate::message::Message;
use crate::platform::AppPlatform;
use crate::present;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    Contexts,
    #[default]
    Chat,
}

impl Tab {
    pub fn label(&self) -> &'static str {
        match self {
            Tab::Contexts => "Contexts",
            Tab::Chat => "Chat",
        }
    }
}

/// Submission state derived from the store's busy flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    Idle,
    Pending,
}

/// Buffered fields of the "new context" dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextDraft {
    pub name: String,
    pub description: String,
}

/// One row of the contexts list, ready to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextRow {
    pub label: String,
    pub age: String,
    pub description: String,
}

pub struct ViewController {
    conversation: ConversationStore,
    contexts: ContextRegistry,
    install: Option<InstallGlue>,
    active_tab: Tab,
    /// Chat input buffer.
    pub input: String,
    dialog: Option<ContextDraft>,
    description_preview_chars: usize,
}

impl ViewController {
    pub fn new(conversation: ConversationStore, contexts: ContextRegistry) -> Self {
        Self {
            conversation,
            contexts,
            install: None,
            active_tab: Tab::default(),
            input: String::new(),
            dialog: None,
            description_preview_chars: 30,
        }
    }

    /// Build the stores from config. `platform` is only used when install glue is enabled.
    pub fn from_config(
        config: &Config,
        config_path: &Path,
        runtime: Handle,
        platform: Option<Arc<dyn AppPlatform>>,
        notifier: Option<Notifier>,
    ) -> Self {
        let generator = Arc::new(SimulatedReply::from_config(config));
        let mut conversation = ConversationStore::new(generator, runtime.clone());
        if let Some(greeting) = &config.assistant.greeting {
            conversation = conversation.with_greeting(greeting.clone());
        }
        if let Some(notify) = &notifier {
            conversation = conversation.with_notifier(Arc::clone(notify));
        }

        let description = config.contexts.default_description.clone();
        let contexts = if config.contexts.seed {
            ContextRegistry::seeded(Utc::now(), description)
        } else {
            ContextRegistry::empty(description)
        };

        let mut view = Self::new(conversation, contexts)
            .with_description_preview_chars(config.contexts.description_preview_chars);
        match platform {
            Some(platform) if config.install.enabled => {
                let worker_path = config::resolve_worker_path(config, config_path);
                view = view.with_install(InstallGlue::attach_with_notifier(
                    platform,
                    runtime,
                    worker_path,
                    notifier,
                ));
            }
            _ => log::debug!("install glue disabled"),
        }
        view
    }

    pub fn with_install(mut self, install: InstallGlue) -> Self {
        self.install = Some(install);
        self
    }

    pub fn with_description_preview_chars(mut self, chars: usize) -> Self {
        self.description_preview_chars = chars;
        self
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    /// Title shown in the header for the active tab.
    pub fn header_title(&self) -> &'static str {
        match self.active_tab {
            Tab::Contexts => "Contexts",
            Tab::Chat => "AI Assistant",
        }
    }

    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    pub fn contexts(&self) -> &[Context] {
        self.contexts.contexts()
    }

    pub fn input_state(&self) -> InputState {
        if self.conversation.is_busy() {
            InputState::Pending
        } else {
            InputState::Idle
        }
    }

    /// Whether the send affordance is enabled.
    pub fn can_submit(&self) -> bool {
        !self.input.trim().is_empty() && !self.conversation.is_busy()
    }

    /// Forward the input buffer to the conversation store. The buffer is cleared only when accepted.
    pub fn submit_input(&mut self) -> bool {
        if !self.can_submit() {
            return false;
        }
        let accepted = self.conversation.submit(&self.input);
        if accepted {
            self.input.clear();
        }
        accepted
    }

    /// Shift+Enter in the input.
    pub fn insert_newline(&mut self) {
        self.input.push('\n');
    }

    pub fn is_dialog_open(&self) -> bool {
        self.dialog.is_some()
    }

    pub fn open_dialog(&mut self) {
        if self.dialog.is_none() {
            self.dialog = Some(ContextDraft::default());
        }
    }

    pub fn dialog(&self) -> Option<&ContextDraft> {
        self.dialog.as_ref()
    }

    pub fn dialog_mut(&mut self) -> Option<&mut ContextDraft> {
        self.dialog.as_mut()
    }

    /// Close the dialog and discard its draft.
    pub fn cancel_dialog(&mut self) {
        self.dialog = None;
    }

    /// Commit the draft to the registry. A blank name keeps the dialog open.
    pub fn create_context(&mut self) -> bool {
        let Some(draft) = self.dialog.as_ref() else {
            return false;
        };
        let description = Some(draft.description.as_str());
        let created = self.contexts.add_context(&draft.name, description).is_some();
        if created {
            self.dialog = None;
        }
        created
    }

    /// Presentation rows for the contexts list.
    pub fn context_rows(&self, now: DateTime<Utc>) -> Vec<ContextRow> {
        self.contexts
            .contexts()
            .iter()
            .map(|c| ContextRow {
                label: format!("#{}", c.name),
                age: present::relative_age(c.last_updated, now),
                description: present::truncate_description(
                    &c.description,
                    self.description_preview_chars,
                )
                .into_owned(),
            })
            .collect()
    }

    pub fn install_banner_visible(&self) -> bool {
        self.install.as_ref().is_some_and(InstallGlue::banner_visible)
    }

    /// Whether the banner's install action is available (a token is retained).
    pub fn can_install(&self) -> bool {
        self.install.as_ref().is_some_and(InstallGlue::can_install)
    }

    /// True while the platform install prompt is open.
    pub fn install_prompting(&self) -> bool {
        self.install.as_ref().is_some_and(InstallGlue::is_prompting)
    }

    pub fn install(&mut self) -> bool {
        self.install.as_mut().is_some_and(InstallGlue::install)
    }

    pub fn dismiss_install(&mut self) {
        if let Some(glue) = self.install.as_mut() {
            glue.dismiss();
        }
    }

    /// Apply finished async work (assistant reply, install outcome). Returns true when anything changed.
    pub fn poll(&mut self) -> bool {
        let replied = self.conversation.poll();
        let install_changed = self.install.as_mut().is_some_and(InstallGlue::poll);
        replied || install_changed
    }
}
