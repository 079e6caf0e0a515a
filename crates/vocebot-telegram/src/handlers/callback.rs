use std::sync::Arc;

use teloxide::{prelude::*, types::CallbackQuery};

use tracing::{debug, warn};

use vocebot_core::domain::{ChatId, MessageId, MessageRef};

use crate::handlers::is_admin;
use crate::router::AppState;

const PERMISSION_DENIED_ALERT: &str = "❌ Non hai i permessi per modificare le impostazioni!";

pub async fn handle_callback(q: CallbackQuery, state: Arc<AppState>) -> ResponseResult<()> {
    // Callbacks without an originating message cannot be routed.
    let Some(message) = q.message.as_ref() else {
        return Ok(());
    };

    let chat_id = ChatId(message.chat.id.0);
    if chat_id != state.group_id {
        // Foreign-chat callbacks are always ignored.
        return Ok(());
    }

    if !is_admin(&state, &q.from).await {
        let _ = state
            .messenger
            .answer_callback(&q.id, Some(PERMISSION_DENIED_ALERT), true)
            .await;
        return Ok(());
    }

    let data = q.data.as_deref().unwrap_or("");
    let msg = MessageRef {
        chat_id,
        message_id: MessageId(message.id.0),
    };
    debug!(message_id = msg.message_id.0, "admin callback: {data}");

    if let Err(e) = state.manager.handle_callback(msg, data, &q.id).await {
        warn!("settings callback failed: {e}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_support::{app, callback_query, settings, GROUP};
    use vocebot_core::{
        messaging::{test_support::Call, types::MemberStatus},
        settings::BotMode,
    };

    #[tokio::test]
    async fn non_admin_press_gets_alert_and_changes_nothing() {
        let app = app(MemberStatus::Member, settings(BotMode::VoiceOnly, 15));

        handle_callback(
            callback_query(GROUP, 100, "but_allow_everything"),
            app.state.clone(),
        )
        .await
        .unwrap();

        let calls = app.messenger.calls().await;
        assert_eq!(calls.len(), 1);
        assert!(matches!(
            &calls[0],
            Call::AnswerCallback { text: Some(t), show_alert: true, .. }
                if t == PERMISSION_DENIED_ALERT
        ));
        assert_eq!(app.state.manager.snapshot().await.mode, BotMode::VoiceOnly);
    }

    #[tokio::test]
    async fn foreign_chat_press_is_dropped() {
        let app = app(
            MemberStatus::Administrator,
            settings(BotMode::VoiceOnly, 15),
        );

        handle_callback(
            callback_query(-555, 100, "but_allow_everything"),
            app.state.clone(),
        )
        .await
        .unwrap();

        assert!(app.messenger.calls().await.is_empty());
        assert_eq!(app.state.manager.snapshot().await.mode, BotMode::VoiceOnly);
    }

    #[tokio::test]
    async fn admin_press_runs_the_settings_action() {
        let app = app(
            MemberStatus::Administrator,
            settings(BotMode::VoiceOnly, 15),
        );

        let open = app
            .state
            .manager
            .open_settings_ui(ChatId(GROUP))
            .await
            .unwrap();
        handle_callback(
            callback_query(GROUP, open.message_id.0, "but_chat_only"),
            app.state.clone(),
        )
        .await
        .unwrap();

        assert_eq!(
            app.state.manager.snapshot().await.mode,
            BotMode::TextMediaOnly
        );
        let calls = app.messenger.calls().await;
        assert!(calls.iter().any(|c| matches!(
            c,
            Call::AnswerCallback { show_alert: false, .. }
        )));
    }

    #[tokio::test]
    async fn press_on_untracked_message_only_clears_its_keyboard() {
        let app = app(
            MemberStatus::Administrator,
            settings(BotMode::VoiceOnly, 15),
        );

        handle_callback(
            callback_query(GROUP, 999, "but_allow_everything"),
            app.state.clone(),
        )
        .await
        .unwrap();

        let cleared = app.messenger.keyboard_clears().await;
        assert_eq!(cleared.len(), 1);
        assert_eq!(cleared[0].message_id, MessageId(999));
        assert_eq!(app.state.manager.snapshot().await.mode, BotMode::VoiceOnly);
    }
}
