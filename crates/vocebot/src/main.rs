use vocebot_core::settings::SettingsStore;

#[tokio::main]
async fn main() -> Result<(), vocebot_core::Error> {
    vocebot_core::logging::init("vocebot")?;

    // The settings file is the whole configuration surface; failing to read
    // or parse it means the process must not start.
    let store = SettingsStore::from_env();
    let settings = store.load()?;

    vocebot_telegram::router::run_polling(store, settings)
        .await
        .map_err(|e| vocebot_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
