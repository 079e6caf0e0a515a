//! Command surface: a static table of commands resolved once at startup
//! against the bot's username. No regexes; a text matches a command iff it
//! is exactly `/name` or `/name@<botUsername>`.

use crate::messaging::types::CommandSpec;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    ChatId,
    Settings,
}

/// Authorization level required to run a command in the moderated group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthLevel {
    Anyone,
    Admin,
}

struct CommandEntry {
    command: Command,
    name: &'static str,
    description: &'static str,
    auth: AuthLevel,
}

const COMMANDS: &[CommandEntry] = &[
    CommandEntry {
        command: Command::Help,
        name: "help",
        description: "spiega i comandi disponibili del bot",
        auth: AuthLevel::Admin,
    },
    CommandEntry {
        command: Command::ChatId,
        name: "chatid",
        description: "id della chat",
        auth: AuthLevel::Anyone,
    },
    CommandEntry {
        command: Command::Settings,
        name: "audiobot",
        description: "apre le impostazioni del bot",
        auth: AuthLevel::Admin,
    },
];

/// Command table bound to the bot's username (resolved from the transport at
/// startup and cached for the process lifetime).
#[derive(Clone, Debug)]
pub struct CommandTable {
    bot_username: String,
}

impl CommandTable {
    pub fn new(bot_username: impl Into<String>) -> Self {
        Self {
            bot_username: bot_username.into(),
        }
    }

    /// Match a message text against the table. Anchored at both ends: a
    /// trailing `@<botUsername>` is accepted, anything else is not a match.
    pub fn match_command(&self, text: &str) -> Option<Command> {
        let text = text.trim();
        let body = text.strip_prefix('/')?;
        for entry in COMMANDS {
            let Some(rest) = body.strip_prefix(entry.name) else {
                continue;
            };
            if rest.is_empty() {
                return Some(entry.command);
            }
            if rest.strip_prefix('@') == Some(self.bot_username.as_str()) {
                return Some(entry.command);
            }
        }
        None
    }

    /// Whether the text is any recognized command (used to delete command
    /// attempts by non-admins, regardless of mode).
    pub fn is_command(&self, text: &str) -> bool {
        self.match_command(text).is_some()
    }

    pub fn auth_level(command: Command) -> AuthLevel {
        COMMANDS
            .iter()
            .find(|e| e.command == command)
            .map(|e| e.auth)
            .unwrap_or(AuthLevel::Admin)
    }

    /// Help text generated from the same table that drives registration.
    pub fn help_text(&self) -> String {
        let mut out = String::new();
        for entry in COMMANDS {
            out.push_str(&format!("/{} - {}\n\n", entry.name, entry.description));
        }
        out
    }

    /// Registrations pushed to the platform at startup.
    pub fn registrations() -> Vec<CommandSpec> {
        COMMANDS
            .iter()
            .map(|e| CommandSpec {
                name: e.name.to_string(),
                description: e.description.to_string(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> CommandTable {
        CommandTable::new("adf_audio_bot")
    }

    #[test]
    fn matches_bare_commands() {
        let t = table();
        assert_eq!(t.match_command("/help"), Some(Command::Help));
        assert_eq!(t.match_command("/chatid"), Some(Command::ChatId));
        assert_eq!(t.match_command("/audiobot"), Some(Command::Settings));
    }

    #[test]
    fn matches_bot_suffixed_commands() {
        let t = table();
        assert_eq!(t.match_command("/help@adf_audio_bot"), Some(Command::Help));
        assert_eq!(
            t.match_command("/audiobot@adf_audio_bot"),
            Some(Command::Settings)
        );
    }

    #[test]
    fn rejects_other_bots_and_prefixes() {
        let t = table();
        assert_eq!(t.match_command("/help@other_bot"), None);
        assert_eq!(t.match_command("/helper"), None);
        assert_eq!(t.match_command("/help extra"), None);
        assert_eq!(t.match_command("say /help"), None);
        assert_eq!(t.match_command("/unknown"), None);
        assert_eq!(t.match_command("hello"), None);
    }

    #[test]
    fn is_command_covers_whole_surface() {
        let t = table();
        assert!(t.is_command("/help"));
        assert!(t.is_command("/chatid@adf_audio_bot"));
        assert!(!t.is_command("ciao a tutti"));
    }

    #[test]
    fn chatid_is_open_to_anyone() {
        assert_eq!(CommandTable::auth_level(Command::ChatId), AuthLevel::Anyone);
        assert_eq!(CommandTable::auth_level(Command::Help), AuthLevel::Admin);
        assert_eq!(CommandTable::auth_level(Command::Settings), AuthLevel::Admin);
    }

    #[test]
    fn help_text_lists_every_registration() {
        let help = table().help_text();
        for spec in CommandTable::registrations() {
            assert!(help.contains(&format!("/{} - {}", spec.name, spec.description)));
        }
    }
}
