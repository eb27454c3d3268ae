//! Single-turn chat exchanges over an append-only conversation log.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{oneshot, watch};

use crate::api::executor::RequestExecutor;
use crate::models::ChatTurn;

/// Bot turn appended when an exchange fails for any reason.
pub const CONNECTION_FALLBACK: &str = "Sorry, I'm having trouble connecting.";

/// Owns one conversation and its input buffer. Clones are handles to the
/// same conversation.
///
/// User turns are appended as soon as `send` is called. Each exchange runs
/// on its own task and waits for the previous one to finish, so bot turns
/// land in the same order as the user turns that prompted them, even if a
/// caller stops waiting.
#[derive(Debug, Clone)]
pub struct ChatController {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    executor: RequestExecutor,
    conversation_tx: watch::Sender<Vec<ChatTurn>>,
    input: Mutex<String>,
    /// Completion signal of the most recently queued exchange.
    tail: Mutex<Option<oneshot::Receiver<()>>>,
}

impl ChatController {
    pub fn new(executor: RequestExecutor) -> Self {
        let (conversation_tx, _) = watch::channel(Vec::new());
        Self {
            shared: Arc::new(Shared {
                executor,
                conversation_tx,
                input: Mutex::new(String::new()),
                tail: Mutex::new(None),
            }),
        }
    }

    /// Snapshot of the conversation so far.
    pub fn conversation(&self) -> Vec<ChatTurn> {
        self.shared.conversation_tx.borrow().clone()
    }

    /// Receiver notified after every appended turn.
    pub fn subscribe(&self) -> watch::Receiver<Vec<ChatTurn>> {
        self.shared.conversation_tx.subscribe()
    }

    pub fn input(&self) -> String {
        self.shared.input.lock().clone()
    }

    pub fn set_input(&self, text: impl Into<String>) {
        *self.shared.input.lock() = text.into();
    }

    /// Send whatever is in the input buffer.
    pub async fn send_input(&self) -> Option<ChatTurn> {
        let text = self.input();
        self.send(&text).await
    }

    /// Send one message. Returns the bot turn that was appended, or `None`
    /// if the message was blank (or the exchange task panicked). Backend
    /// errors become the fallback bot turn.
    pub async fn send(&self, text: &str) -> Option<ChatTurn> {
        if text.trim().is_empty() {
            return None;
        }

        let (done_tx, done_rx) = oneshot::channel();
        let previous = {
            let mut tail = self.shared.tail.lock();
            self.shared.append(ChatTurn::user(text));
            tail.replace(done_rx)
        };
        self.shared.input.lock().clear();

        let shared = Arc::clone(&self.shared);
        let message = text.to_string();
        let task = tokio::spawn(async move {
            if let Some(previous) = previous {
                // Err means the previous exchange task died; the queue moves on
                let _ = previous.await;
            }
            let reply = match shared.executor.exchange_chat(&message).await {
                Ok(reply) => reply,
                Err(e) => {
                    tracing::warn!("Chat exchange failed: {e}");
                    CONNECTION_FALLBACK.to_string()
                }
            };
            let turn = ChatTurn::bot(reply);
            shared.append(turn.clone());
            let _ = done_tx.send(());
            turn
        });

        match task.await {
            Ok(turn) => Some(turn),
            Err(e) => {
                tracing::warn!("Chat exchange task failed: {e}");
                None
            }
        }
    }
}

impl Shared {
    fn append(&self, turn: ChatTurn) {
        self.conversation_tx.send_modify(|turns| turns.push(turn));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::Sender;

    fn unreachable_controller() -> ChatController {
        let config = Config {
            chat_base_url: "http://127.0.0.1:9".to_string(),
            ..Config::default()
        };
        ChatController::new(RequestExecutor::new(reqwest::Client::new(), &config).unwrap())
    }

    #[tokio::test]
    async fn test_blank_message_is_ignored() {
        let chat = unreachable_controller();
        chat.set_input("  ");
        assert_eq!(chat.send_input().await, None);
        assert!(chat.conversation().is_empty());
        assert_eq!(chat.input(), "  ");
    }

    #[tokio::test]
    async fn test_failure_degrades_to_fallback_turn() {
        let chat = unreachable_controller();
        chat.set_input("hi");
        let turn = chat.send_input().await.unwrap();
        assert_eq!(turn, ChatTurn::bot(CONNECTION_FALLBACK));
        assert_eq!(chat.input(), "");

        let log = chat.conversation();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0], ChatTurn::user("hi"));
        assert_eq!(log[1].sender, Sender::Bot);
        assert_eq!(log[1].text, CONNECTION_FALLBACK);
    }
}
