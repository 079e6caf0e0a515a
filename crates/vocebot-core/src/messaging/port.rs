use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageId, MessageRef, UserId},
    messaging::types::{CommandSpec, InlineKeyboard, MemberStatus},
    Result,
};

/// Transport port consumed by the core.
///
/// Telegram is the only implementation today; everything the bot needs from
/// the platform goes through here so the settings manager and the moderation
/// flow can be exercised against a recording mock in tests. All calls are
/// network calls that may fail or be delayed; retry behavior belongs to the
/// adapter, not the core.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    /// Send a text message, optionally as a reply to another message.
    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        reply_to: Option<MessageId>,
    ) -> Result<MessageRef>;

    /// Send a text message carrying an inline keyboard.
    async fn send_keyboard(
        &self,
        chat_id: ChatId,
        text: &str,
        keyboard: InlineKeyboard,
    ) -> Result<MessageRef>;

    async fn edit_text(&self, msg: MessageRef, text: &str) -> Result<()>;

    /// Replace the inline keyboard of a message; an empty keyboard clears it.
    async fn edit_keyboard(&self, msg: MessageRef, keyboard: InlineKeyboard) -> Result<()>;

    async fn delete_message(&self, msg: MessageRef) -> Result<()>;

    /// Answer a callback query with a transient popup, or a modal alert when
    /// `show_alert` is set.
    async fn answer_callback(
        &self,
        callback_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<()>;

    async fn member_status(&self, chat_id: ChatId, user_id: UserId) -> Result<MemberStatus>;

    /// Register the bot's command list with the platform.
    async fn set_commands(&self, commands: &[CommandSpec]) -> Result<()>;

    /// Resolve the bot's own username (cached by the caller for the process
    /// lifetime).
    async fn bot_username(&self) -> Result<String>;
}
