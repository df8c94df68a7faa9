//! Reply generation for the assistant side of the conversation.
//!
//! The conversation store only depends on [`ReplyGenerator`]; a model-backed client can
//! replace [`SimulatedReply`] without touching the store.

use async_trait::async_trait;
use std::time::Duration;

use crate::config::{self, Config};

/// Produces the assistant's answer to a submitted user message.
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    async fn reply(&self, text: &str) -> String;
}

/// Stub generator: waits a fixed delay, then echoes the text inside a template.
#[derive(Debug, Clone)]
pub struct SimulatedReply {
    delay: Duration,
    template: String,
}

impl SimulatedReply {
    /// Placeholder replaced with the user's text in the template.
    pub const PLACEHOLDER: &'static str = "{message}";

    pub fn new(delay: Duration, template: impl Into<String>) -> Self {
        Self {
            delay: delay.max(Duration::from_millis(1)),
            template: template.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config::resolve_reply_delay(config),
            config.assistant.reply_template.clone(),
        )
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Render the reply text without waiting.
    pub fn render(&self, text: &str) -> String {
        self.template.replace(Self::PLACEHOLDER, text)
    }
}

#[async_trait]
impl ReplyGenerator for SimulatedReply {
    async fn reply(&self, text: &str) -> String {
        tokio::time::sleep(self.delay).await;
        self.render(text)
    }
}
