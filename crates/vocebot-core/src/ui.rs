//! Settings UI: action tokens, the summary text, and the two keyboard
//! layouts. All pure functions of the settings record.

use crate::messaging::types::{InlineButton, InlineKeyboard};
use crate::settings::{BotMode, BotSettings, SettingsUpdate};

/// The fixed duration choices offered by the picker, in seconds.
pub const DURATION_CHOICES: [u32; 12] = [10, 15, 20, 25, 30, 35, 40, 45, 50, 55, 60, 90];

/// A recognized inline-keyboard action. Tokens are the historical callback
/// data strings, so settings messages sent by older deployments keep working.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    AllowEverything,
    VoiceOnly,
    TextMediaOnly,
    NotifyOn,
    NotifyOff,
    ChangeDuration,
    Duration(u32),
}

impl Action {
    /// Parse a callback data string. Unknown tokens (including duration
    /// values outside the fixed choice set) yield `None` and are ignored.
    pub fn parse(data: &str) -> Option<Action> {
        match data {
            "but_allow_everything" => Some(Action::AllowEverything),
            "but_audio_only" => Some(Action::VoiceOnly),
            "but_chat_only" => Some(Action::TextMediaOnly),
            "but_confirm_delete" => Some(Action::NotifyOn),
            "but_hide_delete" => Some(Action::NotifyOff),
            "but_change_duration" => Some(Action::ChangeDuration),
            other => {
                let secs = other.strip_prefix("but_duration_")?.parse::<u32>().ok()?;
                DURATION_CHOICES.contains(&secs).then_some(Action::Duration(secs))
            }
        }
    }

    pub fn token(&self) -> String {
        match self {
            Action::AllowEverything => "but_allow_everything".to_string(),
            Action::VoiceOnly => "but_audio_only".to_string(),
            Action::TextMediaOnly => "but_chat_only".to_string(),
            Action::NotifyOn => "but_confirm_delete".to_string(),
            Action::NotifyOff => "but_hide_delete".to_string(),
            Action::ChangeDuration => "but_change_duration".to_string(),
            Action::Duration(secs) => format!("but_duration_{secs}"),
        }
    }

    /// The settings mutation this action maps to; `ChangeDuration` is a
    /// UI-only transition and maps to none.
    pub fn update(&self) -> Option<SettingsUpdate> {
        match self {
            Action::AllowEverything => Some(SettingsUpdate::Mode(BotMode::AllowAll)),
            Action::VoiceOnly => Some(SettingsUpdate::Mode(BotMode::VoiceOnly)),
            Action::TextMediaOnly => Some(SettingsUpdate::Mode(BotMode::TextMediaOnly)),
            Action::NotifyOn => Some(SettingsUpdate::NotifyOnDelete(true)),
            Action::NotifyOff => Some(SettingsUpdate::NotifyOnDelete(false)),
            Action::ChangeDuration => None,
            Action::Duration(secs) => Some(SettingsUpdate::MaxVoiceSecs(*secs)),
        }
    }
}

pub fn mode_label(mode: BotMode) -> &'static str {
    match mode {
        BotMode::AllowAll => "Tutti i messaggi sono ammessi",
        BotMode::VoiceOnly => "Solo vocali ammessi",
        BotMode::TextMediaOnly => "Solo testo/immagini ammesse",
    }
}

/// Human-readable settings summary (Telegram HTML). Pure function of the
/// record: same settings, identical text.
pub fn render_summary(settings: &BotSettings) -> String {
    let notify = if settings.notify_on_delete { "Sì" } else { "No" };
    format!(
        "<b>Impostazioni del bot:</b>\n\
         Modalità attuale: <u><b>{}</b></u>\n\n\
         Durata massima dei vocali: <u><b>{} secondi</b></u>\n\n\
         Comunica l'eliminazione dei messaggi: <u><b>{}</b></u>",
        mode_label(settings.mode),
        settings.max_voice_secs,
        notify,
    )
}

/// Main settings keyboard: mode selector row, change-duration row, and the
/// two notify-on-delete toggles.
pub fn main_keyboard() -> InlineKeyboard {
    InlineKeyboard::new(vec![
        vec![
            InlineButton::new("✅ Tutto", Action::AllowEverything.token()),
            InlineButton::new("🎙 Solo vocali", Action::VoiceOnly.token()),
            InlineButton::new("💬 Solo testo", Action::TextMediaOnly.token()),
        ],
        vec![InlineButton::new(
            "⏱ Cambia durata massima audio",
            Action::ChangeDuration.token(),
        )],
        vec![InlineButton::new(
            "🔔 Comunica l'eliminazione dei messaggi",
            Action::NotifyOn.token(),
        )],
        vec![InlineButton::new(
            "🔕 Nascondi l'eliminazione dei messaggi",
            Action::NotifyOff.token(),
        )],
    ])
}

/// Duration picker: the fixed choices laid out three per row.
pub fn duration_keyboard() -> InlineKeyboard {
    let rows = DURATION_CHOICES
        .chunks(3)
        .map(|chunk| {
            chunk
                .iter()
                .map(|secs| InlineButton::new(format!("{secs} sec"), Action::Duration(*secs).token()))
                .collect()
        })
        .collect();
    InlineKeyboard::new(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BotSettings {
        BotSettings {
            token: "t".to_string(),
            group_id: -1,
            mode: BotMode::VoiceOnly,
            max_voice_secs: 15,
            notify_on_delete: true,
            delete_confirmation_expire_secs: 10,
        }
    }

    #[test]
    fn action_tokens_round_trip() {
        let actions = [
            Action::AllowEverything,
            Action::VoiceOnly,
            Action::TextMediaOnly,
            Action::NotifyOn,
            Action::NotifyOff,
            Action::ChangeDuration,
            Action::Duration(30),
        ];
        for action in actions {
            assert_eq!(Action::parse(&action.token()), Some(action));
        }
    }

    #[test]
    fn parses_every_duration_choice() {
        for secs in DURATION_CHOICES {
            assert_eq!(
                Action::parse(&format!("but_duration_{secs}")),
                Some(Action::Duration(secs))
            );
        }
    }

    #[test]
    fn rejects_unknown_tokens() {
        assert_eq!(Action::parse("but_duration_7"), None);
        assert_eq!(Action::parse("but_duration_"), None);
        assert_eq!(Action::parse("but_duration_abc"), None);
        assert_eq!(Action::parse("but_nonsense"), None);
        assert_eq!(Action::parse(""), None);
    }

    #[test]
    fn change_duration_maps_to_no_update() {
        assert_eq!(Action::ChangeDuration.update(), None);
        assert!(Action::Duration(30).update().is_some());
        assert!(Action::AllowEverything.update().is_some());
    }

    #[test]
    fn summary_is_deterministic() {
        let s = sample();
        let first = render_summary(&s);
        let second = render_summary(&s);
        assert_eq!(first, second);
        assert!(first.contains("Solo vocali ammessi"));
        assert!(first.contains("15 secondi"));
        assert!(first.contains("Sì"));
    }

    #[test]
    fn summary_tracks_every_visible_field() {
        let mut s = sample();
        s.mode = BotMode::TextMediaOnly;
        s.notify_on_delete = false;
        s.max_voice_secs = 90;
        let text = render_summary(&s);
        assert!(text.contains("Solo testo/immagini ammesse"));
        assert!(text.contains("90 secondi"));
        assert!(text.contains("No"));
    }

    #[test]
    fn main_keyboard_layout() {
        let kb = main_keyboard();
        assert_eq!(kb.rows.len(), 4);
        assert_eq!(kb.rows[0].len(), 3);
        assert_eq!(kb.rows[1][0].callback_data, "but_change_duration");
        assert!(!kb.is_empty());
    }

    #[test]
    fn duration_keyboard_covers_all_choices() {
        let kb = duration_keyboard();
        assert_eq!(kb.rows.len(), 4);
        let data: Vec<&str> = kb
            .rows
            .iter()
            .flatten()
            .map(|b| b.callback_data.as_str())
            .collect();
        assert_eq!(data.len(), DURATION_CHOICES.len());
        assert!(data.contains(&"but_duration_10"));
        assert!(data.contains(&"but_duration_90"));
    }
}
