//! Pure policy evaluator: given a message kind and the current settings,
//! decide whether the message stays or goes.

use crate::formatting::escape_html;
use crate::settings::{BotMode, BotSettings};

/// Discriminated payload kind of an incoming message.
///
/// `Service` covers everything outside the recognized deletable set (pin
/// notices, membership changes, ...) and is never deleted under any mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Text,
    Voice { duration_secs: u32 },
    Audio,
    Document,
    Photo,
    Sticker,
    Video,
    VideoNote,
    Contact,
    Poll,
    Location,
    Service,
}

impl MessageKind {
    pub fn is_deletable(self) -> bool {
        !matches!(self, MessageKind::Service)
    }
}

/// User-facing explanation attached to a deletion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeleteReason {
    /// Non-admins may never use commands, regardless of mode.
    CommandNotAllowed,
    /// Voice-only mode: not a voice message, or over the duration cap.
    VoiceOverLimit { max_secs: u32 },
    /// Text/media-only mode: voice messages are forbidden.
    VoiceNotAllowed,
}

impl DeleteReason {
    /// Render the notification text sent as a reply before deletion.
    /// The first name is user-supplied and must be escaped for HTML mode.
    pub fn text(&self, first_name: &str) -> String {
        let name = escape_html(first_name);
        match self {
            DeleteReason::CommandNotAllowed => {
                format!("Hey {name}, non puoi usare i comandi!")
            }
            DeleteReason::VoiceOverLimit { max_secs } => {
                format!("Hey {name}, invia solo audio inferiori a {max_secs} secondi!")
            }
            DeleteReason::VoiceNotAllowed => {
                format!("Hey {name}, non puoi inviare audio!")
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    Delete(DeleteReason),
}

/// Evaluate a non-admin message against the active mode. Pure and
/// deterministic; first matching rule wins.
pub fn evaluate(kind: MessageKind, settings: &BotSettings) -> Verdict {
    match settings.mode {
        BotMode::AllowAll => Verdict::Keep,

        BotMode::VoiceOnly => match kind {
            MessageKind::Voice { duration_secs } if duration_secs <= settings.max_voice_secs => {
                Verdict::Keep
            }
            kind if kind.is_deletable() => Verdict::Delete(DeleteReason::VoiceOverLimit {
                max_secs: settings.max_voice_secs,
            }),
            _ => Verdict::Keep,
        },

        BotMode::TextMediaOnly => match kind {
            MessageKind::Voice { .. } => Verdict::Delete(DeleteReason::VoiceNotAllowed),
            _ => Verdict::Keep,
        },
    }
}
