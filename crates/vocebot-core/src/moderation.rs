//! Deletion flow: notify (optional), delete after a grace period, then
//! expire the notification.

use std::{sync::Arc, time::Duration};

use tracing::{info, warn};

use crate::{
    domain::MessageRef,
    messaging::port::MessagingPort,
    scheduler::Scheduler,
    settings::BotSettings,
};

/// Grace period between the notification reply and the deletion of its
/// target, so the reply can land (and notify) before the message disappears.
const DELETE_GRACE: Duration = Duration::from_millis(500);

pub struct Moderator {
    messenger: Arc<dyn MessagingPort>,
    scheduler: Scheduler,
}

impl Moderator {
    pub fn new(messenger: Arc<dyn MessagingPort>, scheduler: Scheduler) -> Self {
        Self {
            messenger,
            scheduler,
        }
    }

    /// Delete `target` for the given reason. If `notify_on_delete` is set,
    /// an explanatory reply is sent first and scheduled for its own deletion
    /// after `delete_confirmation_expire_secs`. All transport failures are
    /// logged, never retried, never surfaced to the chat.
    pub async fn delete_with_reason(
        &self,
        target: MessageRef,
        reason: &str,
        settings: &BotSettings,
    ) {
        info!(
            chat_id = target.chat_id.0,
            message_id = target.message_id.0,
            "deleting message: {reason}"
        );

        let confirmation = if settings.notify_on_delete {
            match self
                .messenger
                .send_text(target.chat_id, reason, Some(target.message_id))
                .await
            {
                Ok(sent) => Some(sent),
                Err(e) => {
                    warn!("failed to send deletion notice: {e}");
                    None
                }
            }
        } else {
            None
        };

        let messenger = self.messenger.clone();
        self.scheduler
            .schedule_after(DELETE_GRACE, "delete-message", async move {
                messenger.delete_message(target).await
            });

        if let Some(confirmation) = confirmation {
            let messenger = self.messenger.clone();
            let expire = Duration::from_secs(settings.delete_confirmation_expire_secs);
            self.scheduler
                .schedule_after(expire, "expire-deletion-notice", async move {
                    messenger.delete_message(confirmation).await
                });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ChatId, MessageId},
        messaging::test_support::{Call, RecordingMessenger},
        scheduler::InstantClock,
        settings::BotMode,
    };

    fn settings(notify: bool) -> BotSettings {
        BotSettings {
            token: "t".to_string(),
            group_id: -100,
            mode: BotMode::VoiceOnly,
            max_voice_secs: 15,
            notify_on_delete: notify,
            delete_confirmation_expire_secs: 10,
        }
    }

    fn target() -> MessageRef {
        MessageRef {
            chat_id: ChatId(-100),
            message_id: MessageId(42),
        }
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn notifies_then_deletes_target_and_notice() {
        let messenger = Arc::new(RecordingMessenger::new());
        let moderator = Moderator::new(messenger.clone(), Scheduler::new(Arc::new(InstantClock)));

        moderator
            .delete_with_reason(
                target(),
                "Hey Mario, invia solo audio inferiori a 15 secondi!",
                &settings(true),
            )
            .await;
        settle().await;

        let calls = messenger.calls().await;
        // The notice is a reply to the target, sent before any deletion.
        match &calls[0] {
            Call::SendText { reply_to, text, .. } => {
                assert_eq!(*reply_to, Some(MessageId(42)));
                assert!(text.contains("15 secondi"));
            }
            other => panic!("expected notice first, got {other:?}"),
        }

        let deletions = messenger.deletions().await;
        assert_eq!(deletions.len(), 2);
        assert!(deletions.contains(&target()));
    }

    #[tokio::test]
    async fn silent_mode_deletes_without_notice() {
        let messenger = Arc::new(RecordingMessenger::new());
        let moderator = Moderator::new(messenger.clone(), Scheduler::new(Arc::new(InstantClock)));

        moderator
            .delete_with_reason(target(), "Hey Anna, non puoi inviare audio!", &settings(false))
            .await;
        settle().await;

        let calls = messenger.calls().await;
        assert!(calls
            .iter()
            .all(|c| !matches!(c, Call::SendText { .. })));
        assert_eq!(messenger.deletions().await, vec![target()]);
    }
}
