//! Fixtures for handler tests: an app state wired to the recording port and
//! teloxide updates deserialized from raw Bot API JSON.

use std::sync::Arc;

use serde_json::{json, Value};
use teloxide::types::{CallbackQuery, Message};

use vocebot_core::{
    commands::CommandTable,
    domain::ChatId,
    manager::SettingsManager,
    messaging::{port::MessagingPort, test_support::RecordingMessenger, types::MemberStatus},
    moderation::Moderator,
    scheduler::{InstantClock, Scheduler},
    settings::{BotMode, BotSettings, SettingsStore},
};

use crate::router::AppState;

pub(crate) const GROUP: i64 = -100123;

pub(crate) fn settings(mode: BotMode, max_voice_secs: u32) -> BotSettings {
    BotSettings {
        token: "t".to_string(),
        group_id: GROUP,
        mode,
        max_voice_secs,
        notify_on_delete: true,
        delete_confirmation_expire_secs: 10,
    }
}

pub(crate) struct TestApp {
    pub state: Arc<AppState>,
    pub messenger: Arc<RecordingMessenger>,
    store: SettingsStore,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(self.store.path());
    }
}

/// App state over the recording port. Every membership lookup resolves to
/// `status`, so one fixture covers both sides of the authorization gate.
pub(crate) fn app(status: MemberStatus, settings: BotSettings) -> TestApp {
    let ts = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let pid = std::process::id();
    let store = SettingsStore::new(format!("/tmp/vocebot-handlers-{pid}-{ts}.json"));

    let mut recording = RecordingMessenger::new();
    recording.member_status = Some(status);
    let messenger = Arc::new(recording);
    let port: Arc<dyn MessagingPort> = messenger.clone();
    let scheduler = Scheduler::new(Arc::new(InstantClock));

    let state = Arc::new(AppState {
        group_id: ChatId(settings.group_id),
        commands: Arc::new(CommandTable::new("vocebot")),
        messenger: port.clone(),
        manager: Arc::new(SettingsManager::new(
            store.clone(),
            settings,
            port.clone(),
            scheduler.clone(),
        )),
        moderator: Arc::new(Moderator::new(port, scheduler)),
    });

    TestApp {
        state,
        messenger,
        store,
    }
}

fn chat_json(chat_id: i64) -> Value {
    json!({"id": chat_id, "type": "supergroup", "title": "gruppo"})
}

fn sender_json() -> Value {
    json!({"id": 7777, "is_bot": false, "first_name": "Mario", "username": "mario"})
}

fn message_with(chat_id: i64, message_id: i32, payload: Value) -> Message {
    let mut raw = json!({
        "message_id": message_id,
        "date": 1_700_000_000,
        "chat": chat_json(chat_id),
        "from": sender_json(),
    });
    if let (Value::Object(base), Value::Object(extra)) = (&mut raw, payload) {
        base.extend(extra);
    }
    serde_json::from_value(raw).unwrap()
}

pub(crate) fn text_message(chat_id: i64, message_id: i32, text: &str) -> Message {
    message_with(chat_id, message_id, json!({"text": text}))
}

pub(crate) fn voice_message(chat_id: i64, message_id: i32, duration: u32) -> Message {
    message_with(
        chat_id,
        message_id,
        json!({"voice": {
            "file_id": "f",
            "file_unique_id": "u",
            "duration": duration,
            "mime_type": "audio/ogg",
        }}),
    )
}

pub(crate) fn photo_message(chat_id: i64, message_id: i32) -> Message {
    message_with(
        chat_id,
        message_id,
        json!({"photo": [{"file_id": "f", "file_unique_id": "u", "width": 90, "height": 60}]}),
    )
}

/// A pin notice, as one representative of service events.
pub(crate) fn pin_notice(chat_id: i64, message_id: i32) -> Message {
    message_with(
        chat_id,
        message_id,
        json!({"pinned_message": {
            "message_id": 1,
            "date": 1_700_000_000,
            "chat": chat_json(chat_id),
            "from": sender_json(),
            "text": "vecchio messaggio",
        }}),
    )
}

pub(crate) fn callback_query(chat_id: i64, message_id: i32, data: &str) -> CallbackQuery {
    serde_json::from_value(json!({
        "id": "cb1",
        "from": sender_json(),
        "message": {
            "message_id": message_id,
            "date": 1_700_000_000,
            "chat": chat_json(chat_id),
            "from": {"id": 42, "is_bot": true, "first_name": "vocebot", "username": "vocebot"},
            "text": "Impostazioni del bot",
        },
        "chat_instance": "ci",
        "data": data,
    }))
    .unwrap()
}
