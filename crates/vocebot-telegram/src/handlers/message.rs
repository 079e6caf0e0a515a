use std::sync::Arc;

use teloxide::{prelude::*, types::Message};

use tracing::{debug, info, warn};

use vocebot_core::{
    commands::{AuthLevel, Command, CommandTable},
    domain::{ChatId, MessageId, MessageRef},
    policy::{self, DeleteReason, MessageKind, Verdict},
};

use crate::handlers::is_admin;
use crate::router::AppState;

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let chat_id = ChatId(msg.chat.id.0);

    // Outside the configured group, only commands open to anyone are
    // answered (today that is /chatid); everything else is dropped silently.
    if chat_id != state.group_id {
        if let Some(text) = msg.text() {
            if let Some(command) = state.commands.match_command(text) {
                if CommandTable::auth_level(command) == AuthLevel::Anyone
                    && command == Command::ChatId
                {
                    answer_chat_id(&state, chat_id).await;
                }
            }
        }
        return Ok(());
    }

    let Some(from) = msg.from() else {
        // No sender to authorize (channel posts, some service events).
        return Ok(());
    };

    if is_admin(&state, from).await {
        debug!(user_id = from.id.0, "message from admin");
        if let Some(text) = msg.text() {
            match state.commands.match_command(text) {
                Some(Command::Help) => {
                    let _ = state
                        .messenger
                        .send_text(chat_id, &state.commands.help_text(), None)
                        .await;
                }
                Some(Command::ChatId) => answer_chat_id(&state, chat_id).await,
                Some(Command::Settings) => {
                    if let Err(e) = state.manager.open_settings_ui(chat_id).await {
                        warn!("failed to open settings UI: {e}");
                    }
                }
                None => {}
            }
        }
        // Admins are never policy-checked.
        return Ok(());
    }

    let settings = state.manager.snapshot().await;
    let target = MessageRef {
        chat_id,
        message_id: MessageId(msg.id.0),
    };

    // Command use by non-admins is always forbidden, regardless of mode.
    if let Some(text) = msg.text() {
        if state.commands.is_command(text) {
            info!(user_id = from.id.0, "non-admin command attempt: {text}");
            state
                .moderator
                .delete_with_reason(
                    target,
                    &DeleteReason::CommandNotAllowed.text(&from.first_name),
                    &settings,
                )
                .await;
            return Ok(());
        }
    }

    match policy::evaluate(classify(&msg), &settings) {
        Verdict::Keep => {}
        Verdict::Delete(reason) => {
            state
                .moderator
                .delete_with_reason(target, &reason.text(&from.first_name), &settings)
                .await;
        }
    }

    Ok(())
}

async fn answer_chat_id(state: &AppState, chat_id: ChatId) {
    info!(chat_id = chat_id.0, "chat id requested");
    let _ = state
        .messenger
        .send_text(chat_id, &chat_id.0.to_string(), None)
        .await;
}

/// Map a Telegram message onto the policy evaluator's payload kinds.
/// Anything unrecognized (pin notices, membership changes, ...) is `Service`.
fn classify(msg: &Message) -> MessageKind {
    if let Some(voice) = msg.voice() {
        return MessageKind::Voice {
            duration_secs: voice.duration,
        };
    }
    if msg.text().is_some() {
        return MessageKind::Text;
    }
    if msg.audio().is_some() {
        return MessageKind::Audio;
    }
    if msg.document().is_some() {
        return MessageKind::Document;
    }
    if msg.photo().is_some() {
        return MessageKind::Photo;
    }
    if msg.sticker().is_some() {
        return MessageKind::Sticker;
    }
    if msg.video().is_some() {
        return MessageKind::Video;
    }
    if msg.video_note().is_some() {
        return MessageKind::VideoNote;
    }
    if msg.contact().is_some() {
        return MessageKind::Contact;
    }
    if msg.poll().is_some() {
        return MessageKind::Poll;
    }
    if msg.location().is_some() {
        return MessageKind::Location;
    }
    MessageKind::Service
}
