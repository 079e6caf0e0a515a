use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{errors::Error, Result};

/// Default settings file, relative to the working directory.
pub const DEFAULT_SETTINGS_FILE: &str = "bot-settings.json";

/// The active content policy for the moderated group.
///
/// Serialized as the historical numeric `botmode` (0/1/2) so existing
/// settings files keep working.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BotMode {
    AllowAll,
    VoiceOnly,
    TextMediaOnly,
}

impl From<BotMode> for u8 {
    fn from(mode: BotMode) -> u8 {
        match mode {
            BotMode::AllowAll => 0,
            BotMode::VoiceOnly => 1,
            BotMode::TextMediaOnly => 2,
        }
    }
}

impl TryFrom<u8> for BotMode {
    type Error = String;

    fn try_from(raw: u8) -> std::result::Result<Self, String> {
        match raw {
            0 => Ok(BotMode::AllowAll),
            1 => Ok(BotMode::VoiceOnly),
            2 => Ok(BotMode::TextMediaOnly),
            other => Err(format!("invalid botmode: {other}")),
        }
    }
}

/// The single, process-wide settings record.
///
/// Loaded once at startup and rewritten in full on every admin mutation
/// (last writer wins; the process is single-instance). JSON field names
/// match the historical on-disk format.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BotSettings {
    /// Transport credential. Immutable after load.
    pub token: String,
    /// The one chat this instance moderates. Immutable after load.
    #[serde(rename = "groupid")]
    pub group_id: i64,
    #[serde(rename = "botmode")]
    pub mode: BotMode,
    /// Duration cap for voice messages, relevant under `VoiceOnly`.
    #[serde(rename = "maxaudiosecs")]
    pub max_voice_secs: u32,
    /// Whether a deletion produces a visible explanatory reply first.
    #[serde(rename = "senddelmsg")]
    pub notify_on_delete: bool,
    /// Lifetime of the explanatory reply before it too is removed.
    #[serde(rename = "delconfirmationexpireseconds")]
    pub delete_confirmation_expire_secs: u64,
}

/// A single admin-driven mutation of the settings record.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsUpdate {
    Mode(BotMode),
    NotifyOnDelete(bool),
    MaxVoiceSecs(u32),
}

/// Apply an update to the record. Returns whether the record actually
/// changed; setting a field to the value it already holds is a no-op for
/// refresh purposes, but callers still persist unconditionally.
pub fn apply_update(settings: &mut BotSettings, update: SettingsUpdate) -> bool {
    match update {
        SettingsUpdate::Mode(mode) => {
            let changed = settings.mode != mode;
            settings.mode = mode;
            changed
        }
        SettingsUpdate::NotifyOnDelete(notify) => {
            let changed = settings.notify_on_delete != notify;
            settings.notify_on_delete = notify;
            changed
        }
        SettingsUpdate::MaxVoiceSecs(secs) => {
            let changed = settings.max_voice_secs != secs;
            settings.max_voice_secs = secs;
            changed
        }
    }
}

/// Durable storage for the settings record: one flat JSON file, read once at
/// startup, rewritten in full after every mutation.
#[derive(Clone, Debug)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Settings path from `SETTINGS_FILE`, falling back to the default.
    pub fn from_env() -> Self {
        let path = env::var_os("SETTINGS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
        Self::new(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load and validate the record. A missing or malformed file is fatal:
    /// the process must not start without a usable settings record.
    pub fn load(&self) -> Result<BotSettings> {
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            Error::Config(format!(
                "cannot read settings file {}: {e}",
                self.path.display()
            ))
        })?;
        let settings: BotSettings = serde_json::from_str(&raw).map_err(|e| {
            Error::Config(format!(
                "malformed settings file {}: {e}",
                self.path.display()
            ))
        })?;

        if settings.token.trim().is_empty() {
            return Err(Error::Config("settings: token must not be empty".to_string()));
        }
        if settings.group_id == 0 {
            return Err(Error::Config("settings: groupid must be set".to_string()));
        }
        if settings.max_voice_secs == 0 {
            return Err(Error::Config(
                "settings: maxaudiosecs must be positive".to_string(),
            ));
        }

        Ok(settings)
    }

    /// Rewrite the whole record. Callers treat failures as non-fatal and log
    /// them; there is no retry.
    pub fn persist(&self, settings: &BotSettings) -> Result<()> {
        let json = serde_json::to_string_pretty(settings)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}
