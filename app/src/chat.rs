use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::debug;

use crate::config::ChatConfig;
use crate::outcome::OutcomeProvider;
use crate::types::{ChatMessage, MessageSender};

pub const DRIVER_REPLIES: [&str; 5] = [
    "I'm on my way!",
    "I'll be there in a few minutes.",
    "I've reached the pickup point.",
    "Traffic is a bit heavy, please bear with me.",
    "Okay, see you soon!",
];

/// Mock conversation with the driver: each message from the rider gets one
/// canned reply after a fixed delay.
pub struct ChatSimulator {
    messages: Arc<watch::Sender<Vec<ChatMessage>>>,
    pending_replies: JoinSet<()>,
    config: ChatConfig,
    outcomes: Arc<dyn OutcomeProvider>,
}

impl ChatSimulator {
    pub fn new(config: ChatConfig, outcomes: Arc<dyn OutcomeProvider>) -> Self {
        let (messages, _) = watch::channel(Vec::new());
        Self {
            messages: Arc::new(messages),
            pending_replies: JoinSet::new(),
            config,
            outcomes,
        }
    }

    /// Returns `false` and appends nothing for blank input.
    pub fn send(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }

        self.messages
            .send_modify(|messages| messages.push(message(text, MessageSender::User)));

        while self.pending_replies.try_join_next().is_some() {}

        let reply = DRIVER_REPLIES[self.outcomes.pick(DRIVER_REPLIES.len()) % DRIVER_REPLIES.len()];
        let messages = Arc::clone(&self.messages);
        let delay = self.config.reply_delay;

        self.pending_replies.spawn(async move {
            tokio::time::sleep(delay).await;
            debug!("Driver replied: {}", reply);
            messages.send_modify(|messages| messages.push(message(reply, MessageSender::Driver)));
        });

        true
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.messages.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<ChatMessage>> {
        self.messages.subscribe()
    }
}

fn message(text: &str, sender: MessageSender) -> ChatMessage {
    ChatMessage {
        text: text.to_string(),
        sender,
        time: chrono::Local::now().format("%H:%M").to_string(),
    }
}
