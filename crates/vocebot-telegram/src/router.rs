use std::sync::Arc;

use teloxide::{dispatching::Dispatcher, dptree, prelude::*};

use tracing::{info, warn};

use vocebot_core::{
    commands::CommandTable,
    domain::ChatId,
    manager::SettingsManager,
    messaging::port::MessagingPort,
    moderation::Moderator,
    scheduler::{Scheduler, TokioClock},
    settings::{BotSettings, SettingsStore},
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub group_id: ChatId,
    pub commands: Arc<CommandTable>,
    pub messenger: Arc<dyn MessagingPort>,
    pub manager: Arc<SettingsManager>,
    pub moderator: Arc<Moderator>,
}

pub async fn run_polling(store: SettingsStore, settings: BotSettings) -> anyhow::Result<()> {
    let bot = Bot::new(settings.token.clone());
    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));

    // The bot username is resolved once and cached in the command table for
    // the process lifetime.
    let username = messenger.bot_username().await?;
    info!("vocebot started as @{username}, moderating group {}", settings.group_id);

    if let Err(e) = messenger.set_commands(&CommandTable::registrations()).await {
        warn!("failed to register command list: {e}");
    }

    let scheduler = Scheduler::new(Arc::new(TokioClock));
    let group_id = ChatId(settings.group_id);

    let state = Arc::new(AppState {
        group_id,
        commands: Arc::new(CommandTable::new(username)),
        messenger: messenger.clone(),
        manager: Arc::new(SettingsManager::new(
            store,
            settings,
            messenger.clone(),
            scheduler.clone(),
        )),
        moderator: Arc::new(Moderator::new(messenger, scheduler)),
    });

    let handler = dptree::entry()
        .branch(Update::filter_callback_query().endpoint(handlers::handle_callback))
        .branch(Update::filter_message().endpoint(handlers::handle_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .build()
        .dispatch()
        .await;

    Ok(())
}
