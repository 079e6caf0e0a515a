//! Recording mock of `MessagingPort` for manager/moderation tests, and (via
//! the `test-support` feature) for the adapter crate's handler tests.

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{
    domain::{ChatId, MessageId, MessageRef, UserId},
    messaging::{
        port::MessagingPort,
        types::{CommandSpec, InlineKeyboard, MemberStatus},
    },
    Result,
};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    SendText {
        chat_id: ChatId,
        text: String,
        reply_to: Option<MessageId>,
        sent: MessageRef,
    },
    SendKeyboard {
        chat_id: ChatId,
        text: String,
        keyboard: InlineKeyboard,
        sent: MessageRef,
    },
    EditText {
        msg: MessageRef,
        text: String,
    },
    EditKeyboard {
        msg: MessageRef,
        keyboard: InlineKeyboard,
    },
    DeleteMessage {
        msg: MessageRef,
    },
    AnswerCallback {
        callback_id: String,
        text: Option<String>,
        show_alert: bool,
    },
}

/// Records every port call and hands out increasing message ids for sends.
#[derive(Default)]
pub struct RecordingMessenger {
    next_id: AtomicI32,
    calls: Mutex<Vec<Call>>,
    pub member_status: Option<MemberStatus>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self {
            next_id: AtomicI32::new(100),
            calls: Mutex::new(Vec::new()),
            member_status: None,
        }
    }

    fn next_ref(&self, chat_id: ChatId) -> MessageRef {
        MessageRef {
            chat_id,
            message_id: MessageId(self.next_id.fetch_add(1, Ordering::SeqCst)),
        }
    }

    pub async fn calls(&self) -> Vec<Call> {
        self.calls.lock().await.clone()
    }

    pub async fn keyboard_clears(&self) -> Vec<MessageRef> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|c| match c {
                Call::EditKeyboard { msg, keyboard } if keyboard.is_empty() => Some(*msg),
                _ => None,
            })
            .collect()
    }

    pub async fn deletions(&self) -> Vec<MessageRef> {
        self.calls
            .lock()
            .await
            .iter()
            .filter_map(|c| match c {
                Call::DeleteMessage { msg } => Some(*msg),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl MessagingPort for RecordingMessenger {
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        reply_to: Option<MessageId>,
    ) -> Result<MessageRef> {
        let sent = self.next_ref(chat_id);
        self.calls.lock().await.push(Call::SendText {
            chat_id,
            text: text.to_string(),
            reply_to,
            sent,
        });
        Ok(sent)
    }

    async fn send_keyboard(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: InlineKeyboard,
    ) -> Result<MessageRef> {
        let sent = self.next_ref(chat_id);
        self.calls.lock().await.push(Call::SendKeyboard {
            chat_id,
            text: text.to_string(),
            keyboard,
            sent,
        });
        Ok(sent)
    }

    async fn edit_text(&self, msg: MessageRef, text: &str) -> Result<()> {
        self.calls.lock().await.push(Call::EditText {
            msg,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn edit_keyboard(&self, msg: MessageRef, keyboard: InlineKeyboard) -> Result<()> {
        self.calls
            .lock()
            .await
            .push(Call::EditKeyboard { msg, keyboard });
        Ok(())
    }

    async fn delete_message(&self, msg: MessageRef) -> Result<()> {
        self.calls.lock().await.push(Call::DeleteMessage { msg });
        Ok(())
    }

    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<()> {
        self.calls.lock().await.push(Call::AnswerCallback {
            callback_id: callback_id.to_string(),
            text: text.map(|t| t.to_string()),
            show_alert,
        });
        Ok(())
    }

    async fn member_status(&self, _chat_id: ChatId, _user_id: UserId) -> Result<MemberStatus> {
        Ok(self.member_status.unwrap_or(MemberStatus::Member))
    }

    async fn set_commands(&self, _commands: &[CommandSpec]) -> Result<()> {
        Ok(())
    }

    async fn bot_username(&self) -> Result<String> {
        Ok("vocebot".to_string())
    }
}
