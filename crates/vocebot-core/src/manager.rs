//! Settings manager: owns the mutable settings record and the set of open
//! settings messages, mediates admin actions from the inline keyboard, and
//! keeps the persisted record in sync.

use std::{collections::HashSet, sync::Arc, time::Duration};

use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::{
    domain::{ChatId, MessageId, MessageRef},
    messaging::{port::MessagingPort, types::InlineKeyboard},
    scheduler::Scheduler,
    settings::{apply_update, BotSettings, SettingsStore},
    ui::{self, Action},
    Result,
};

/// Deferred summary-text refresh, so the keyboard-clear edit and the text
/// edit on the same message do not race each other on the platform side.
const SUMMARY_REFRESH_DELAY: Duration = Duration::from_millis(200);

const SETTINGS_SAVED_POPUP: &str = "✅ Impostazioni aggiornate";

#[derive(Clone)]
pub struct SettingsManager {
    inner: Arc<ManagerInner>,
}

struct ManagerInner {
    store: SettingsStore,
    messenger: Arc<dyn MessagingPort>,
    scheduler: Scheduler,
    settings: Mutex<BotSettings>,
    /// Ids of previously sent settings messages whose inline keyboard is
    /// still active. Mutated before any transport call (mutate-then-suspend).
    open_messages: Mutex<HashSet<MessageId>>,
}

impl SettingsManager {
    pub fn new(
        store: SettingsStore,
        settings: BotSettings,
        messenger: Arc<dyn MessagingPort>,
        scheduler: Scheduler,
    ) -> Self {
        Self {
            inner: Arc::new(ManagerInner {
                store,
                messenger,
                scheduler,
                settings: Mutex::new(settings),
                open_messages: Mutex::new(HashSet::new()),
            }),
        }
    }

    /// Current settings record, cloned under the lock.
    pub async fn snapshot(&self) -> BotSettings {
        self.inner.settings.lock().await.clone()
    }

    #[cfg(test)]
    pub async fn open_message_ids(&self) -> Vec<MessageId> {
        self.inner.open_messages.lock().await.iter().copied().collect()
    }

    /// Open the settings UI: close every other open instance, send a fresh
    /// summary with the main keyboard, and track the new message.
    pub async fn open_settings_ui(&self, chat_id: ChatId) -> Result<MessageRef> {
        let stale: Vec<MessageId> = {
            let mut open = self.inner.open_messages.lock().await;
            open.drain().collect()
        };
        self.close_keyboards(chat_id, &stale).await;

        let summary = ui::render_summary(&self.snapshot().await);
        let sent = self
            .inner
            .messenger
            .send_keyboard(chat_id, &summary, ui::main_keyboard())
            .await?;
        // The id does not exist until the send returns, so there is a
        // suspension point between the drain above and this insert. The
        // "at most one open instance" invariant assumes opens for the group
        // are effectively serialized; two opens racing through this gap
        // could each end up tracked.
        self.inner.open_messages.lock().await.insert(sent.message_id);

        info!(chat_id = chat_id.0, message_id = sent.message_id.0, "settings UI opened");
        Ok(sent)
    }

    /// Handle an admin keyboard press. The caller has already verified the
    /// chat and the sender's admin status.
    pub async fn handle_callback(
        &self,
        msg: MessageRef,
        data: &str,
        callback_id: &str,
    ) -> Result<()> {
        let tracked = self.inner.open_messages.lock().await.contains(&msg.message_id);
        if !tracked {
            // Stale UI: close the orphaned keyboard, do not run the action.
            debug!(message_id = msg.message_id.0, "callback from untracked settings message");
            let _ = self
                .inner
                .messenger
                .edit_keyboard(msg, InlineKeyboard::empty())
                .await;
            return Ok(());
        }

        let Some(action) = Action::parse(data) else {
            debug!("unrecognized callback token: {data}");
            return Ok(());
        };

        if action == Action::ChangeDuration {
            return self.switch_to_duration_picker(msg).await;
        }

        let Some(update) = action.update() else {
            return Ok(());
        };

        let (changed, snapshot) = {
            let mut settings = self.inner.settings.lock().await;
            let changed = apply_update(&mut settings, update);
            (changed, settings.clone())
        };
        let open: Vec<MessageId> = {
            let mut open = self.inner.open_messages.lock().await;
            open.drain().collect()
        };
        self.close_keyboards(msg.chat_id, &open).await;

        // Persisted unconditionally after any recognized action, even no-ops.
        if let Err(e) = self.inner.store.persist(&snapshot) {
            error!("failed to persist settings: {e}");
        }

        let _ = self
            .inner
            .messenger
            .answer_callback(callback_id, Some(SETTINGS_SAVED_POPUP), false)
            .await;

        if changed {
            info!(?update, "settings changed");
            let messenger = self.inner.messenger.clone();
            let text = ui::render_summary(&snapshot);
            self.inner
                .scheduler
                .schedule_after(SUMMARY_REFRESH_DELAY, "summary-refresh", async move {
                    // The platform may reject a no-op edit; never a problem here.
                    let _ = messenger.edit_text(msg, &text).await;
                    Ok(())
                });
        }

        Ok(())
    }

    /// Open -> DurationPicker: swap the keyboard without mutating settings
    /// and without untracking this message, so the later duration pick still
    /// finds it open. Every other open instance is closed.
    async fn switch_to_duration_picker(&self, msg: MessageRef) -> Result<()> {
        let others: Vec<MessageId> = {
            let mut open = self.inner.open_messages.lock().await;
            let others: Vec<MessageId> = open
                .iter()
                .copied()
                .filter(|id| *id != msg.message_id)
                .collect();
            open.retain(|id| *id == msg.message_id);
            others
        };
        self.close_keyboards(msg.chat_id, &others).await;

        self.inner
            .messenger
            .edit_keyboard(msg, ui::duration_keyboard())
            .await?;
        Ok(())
    }

    async fn close_keyboards(&self, chat_id: ChatId, ids: &[MessageId]) {
        for id in ids {
            let stale = MessageRef {
                chat_id,
                message_id: *id,
            };
            let _ = self
                .inner
                .messenger
                .edit_keyboard(stale, InlineKeyboard::empty())
                .await;
        }
    }
}
