//! Conversation store: the ordered message thread and the pending-reply flag.
//!
//! `submit` appends the user message right away and spawns one reply task on the
//! tokio runtime. The reply comes back over a oneshot channel and is appended by
//! [`ConversationStore::poll`] (UI frame loop) or [`ConversationStore::wait_reply`] (async
//! callers). While a reply is outstanding every further submit is rejected, so
//! assistant messages always follow the user message they answer.

use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::assistant::ReplyGenerator;
use crate::message::Message;

/// Called from the reply task once a reply is ready (e.g. to request a repaint).
pub type Notifier = Arc<dyn Fn() + Send + Sync>;

struct PendingReply {
    rx: oneshot::Receiver<String>,
    task: JoinHandle<()>,
}

pub struct ConversationStore {
    messages: Vec<Message>,
    generator: Arc<dyn ReplyGenerator>,
    runtime: Handle,
    pending: Option<PendingReply>,
    notifier: Option<Notifier>,
}

impl ConversationStore {
    pub fn new(generator: Arc<dyn ReplyGenerator>, runtime: Handle) -> Self {
        Self {
            messages: Vec::new(),
            generator,
            runtime,
            pending: None,
            notifier: None,
        }
    }

    /// Seed the thread with an assistant greeting.
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.messages.push(Message::assistant(greeting));
        self
    }

    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// True while an assistant reply is outstanding.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// Append a user message and schedule exactly one assistant reply.
    ///
    /// Returns false (and changes nothing) when the trimmed text is empty or a reply is pending.
    pub fn submit(&mut self, text: &str) -> bool {
        if self.is_busy() {
            log::debug!("submit ignored: reply pending");
            return false;
        }
        let text = text.trim();
        if text.is_empty() {
            return false;
        }

        self.messages.push(Message::user(text));

        let (tx, rx) = oneshot::channel();
        let generator = Arc::clone(&self.generator);
        let notifier = self.notifier.clone();
        let prompt = text.to_string();
        let task = self.runtime.spawn(async move {
            let reply = generator.reply(&prompt).await;
            if tx.send(reply).is_err() {
                log::debug!("reply dropped: conversation store gone");
                return;
            }
            if let Some(notify) = notifier {
                notify();
            }
        });
        self.pending = Some(PendingReply { rx, task });
        true
    }

    /// Append the pending reply if it has arrived. Returns true when the thread changed.
    pub fn poll(&mut self) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };
        match pending.rx.try_recv() {
            Ok(reply) => {
                self.pending = None;
                self.messages.push(Message::assistant(reply));
                true
            }
            Err(oneshot::error::TryRecvError::Empty) => false,
            Err(oneshot::error::TryRecvError::Closed) => {
                log::warn!("reply task ended without a reply");
                self.pending = None;
                true
            }
        }
    }

    /// Wait for the pending reply and append it. Returns the assistant message, if any.
    pub async fn wait_reply(&mut self) -> Option<&Message> {
        let pending = self.pending.take()?;
        match pending.rx.await {
            Ok(reply) => {
                self.messages.push(Message::assistant(reply));
                self.messages.last()
            }
            Err(_) => {
                log::warn!("reply task ended without a reply");
                None
            }
        }
    }

    /// Abort the pending reply, if any. No assistant message is appended.
    pub fn cancel_pending(&mut self) -> bool {
        match self.pending.take() {
            Some(pending) => {
                pending.task.abort();
                log::debug!("pending reply cancelled");
                true
            }
            None => false,
        }
    }
}

impl Drop for ConversationStore {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
