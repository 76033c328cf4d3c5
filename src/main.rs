mod background_processing;
mod config;
mod engine;
mod error;
mod logging;
mod matcher;
mod model;
mod registry;
mod schema;
mod utils;

use crate::config::Config;
use crate::matcher::ProximityMatcher;
use crate::model::commands::BotCommand;
use crate::registry::Registry;
use anyhow::{Context, Result};
use dotenv::dotenv;
use schema::schema;
use secrecy::ExposeSecret;
use std::sync::Arc;
use teloxide::types::MenuButton;
use teloxide::{prelude::*, utils::command::BotCommands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let config = Config::from_env().context("loading configuration")?;

    logging::init(&config.log, config.log_level()?)?;

    log::info!("Starting proximity bot...");

    let token = config
        .bot_token
        .as_ref()
        .context("bot token is missing")?
        .expose_secret()
        .clone();
    let bot = Bot::new(token);

    bot.set_my_commands(BotCommand::bot_commands()).await?;
    bot.set_chat_menu_button()
        .menu_button(MenuButton::Commands)
        .await?;

    let registry = Arc::new(Registry::new());
    let matcher = ProximityMatcher::new(config.search_radius_km);
    log::info!("Search radius is {} km", matcher.radius_km());
    if config.admin().is_none() {
        log::warn!("ADMIN_CHAT_ID is not set, broadcasting is disabled");
    }

    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![registry, matcher, Arc::new(config)])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
