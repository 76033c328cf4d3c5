use crate::background_processing::broadcast::broadcast;
use crate::config::Config;
use crate::engine::handle_event;
use crate::error::CoreError;
use crate::matcher::ProximityMatcher;
use crate::model::commands::BotCommand;
use crate::model::event::{Event, Outcome};
use crate::model::participant::{Coordinates, Match};
use crate::model::role::Role;
use crate::model::types::*;
use crate::registry::Registry;
use crate::utils::constants::{FINISH_MESSAGE, REFRESH_MESSAGE};
use crate::utils::keyboard::*;
use std::sync::Arc;
use teloxide::types::{KeyboardMarkup, ParseMode};
use teloxide::utils::html;
use teloxide::{dispatching::UpdateHandler, prelude::*, utils::command::BotCommands};

type Classified = Result<Event, CoreError>;

pub(crate) fn schema() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use dptree::case;

    let command_handler = teloxide::filter_command::<BotCommand, _>()
        .branch(case![BotCommand::Start].endpoint(start))
        .branch(case![BotCommand::Help].endpoint(help))
        .branch(case![BotCommand::Broadcast(text)].endpoint(send_broadcast));

    Update::filter_message()
        .branch(command_handler)
        .branch(dptree::filter_map(classify_message).endpoint(receive_event))
        .branch(dptree::endpoint(invalid_input))
}

/// Turns a raw message into a core event. `None` means the message is not
/// part of the conversation at all.
fn classify_message(msg: Message) -> Option<Classified> {
    if let Some(contact) = msg.contact() {
        return Some(Ok(Event::ContactShared(contact.phone_number.clone())));
    }
    if let Some(location) = msg.location() {
        return Some(
            Coordinates::new(location.latitude, location.longitude).map(Event::LocationShared),
        );
    }
    msg.text().and_then(classify_text).map(Ok)
}

fn classify_text(text: &str) -> Option<Event> {
    match text.trim() {
        REFRESH_MESSAGE => Some(Event::RefreshRequested),
        FINISH_MESSAGE => Some(Event::FinishRequested),
        other => Role::from_label(other).map(Event::RoleSelected),
    }
}

async fn invalid_input(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, "Please, send /start.").await?;
    Ok(())
}

/// COMMAND HANDLERS
async fn help(bot: Bot, msg: Message) -> HandlerResult {
    bot.send_message(msg.chat.id, BotCommand::descriptions().to_string())
        .await?;
    Ok(())
}

async fn start(
    registry: Arc<Registry>,
    matcher: ProximityMatcher,
    bot: Bot,
    msg: Message,
) -> HandlerResult {
    let outcome = handle_event(&registry, &matcher, msg.chat.id, Event::Started).await;
    reply(&bot, &msg, outcome).await
}

async fn send_broadcast(
    registry: Arc<Registry>,
    config: Arc<Config>,
    bot: Bot,
    msg: Message,
    text: String,
) -> HandlerResult {
    let text = match broadcast_permission(&config, msg.chat.id, &text) {
        Ok(text) => text,
        Err(refusal) => {
            bot.send_message(msg.chat.id, refusal).await?;
            return Ok(());
        }
    };

    let recipients = registry.known_identities().await;
    let total = recipients.len();
    let delivered = broadcast(bot.clone(), recipients, text.to_owned()).await;
    log::info!("Broadcast delivered to {} of {} chats", delivered, total);

    bot.send_message(
        msg.chat.id,
        format!("✅ Announcement delivered to {delivered} users."),
    )
    .await?;
    Ok(())
}

/// Announcement text to send, or the reply explaining why not.
fn broadcast_permission<'a>(
    config: &Config,
    chat: ChatId,
    text: &'a str,
) -> Result<&'a str, &'static str> {
    if config.admin() != Some(chat) {
        log::warn!("Chat id = {} tried to broadcast", chat.0);
        return Err("⛔ You are not allowed to do this.");
    }

    let text = text.trim();
    if text.is_empty() {
        return Err("ℹ️ Please add the announcement text: /broadcast <text>");
    }
    Ok(text)
}

/// EVENT HANDLERS
async fn receive_event(
    registry: Arc<Registry>,
    matcher: ProximityMatcher,
    bot: Bot,
    msg: Message,
    classified: Classified,
) -> HandlerResult {
    let location_shared = matches!(classified, Ok(Event::LocationShared(_)));
    let outcome = match classified {
        Ok(event) => handle_event(&registry, &matcher, msg.chat.id, event).await,
        Err(err) => Err(err),
    };

    if location_shared && outcome.is_ok() {
        bot.send_message(msg.chat.id, "📍 Location accepted.")
            .await?;
    }
    reply(&bot, &msg, outcome).await
}

async fn reply(bot: &Bot, msg: &Message, outcome: Result<Outcome, CoreError>) -> HandlerResult {
    let (text, keyboard) = match &outcome {
        Ok(outcome) => render_outcome(outcome),
        Err(err) => {
            log::info!("Chat id = {}: {}", msg.chat.id.0, err);
            (render_error(err).to_owned(), make_main_menu_keyboard())
        }
    };

    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::Html)
        .disable_web_page_preview(true)
        .reply_markup(keyboard)
        .await?;
    Ok(())
}

fn render_outcome(outcome: &Outcome) -> (String, KeyboardMarkup) {
    match outcome {
        Outcome::SessionReset => (
            "👋 Welcome! Who are you?\nChoose a role:".to_owned(),
            make_role_keyboard(),
        ),
        Outcome::RoleSelected(role) => (
            format!(
                "Role: {}.\n📞 Send your phone number:",
                role.label().to_lowercase()
            ),
            make_contact_keyboard(),
        ),
        Outcome::ContactRegistered(role) => (
            format!(
                "✅ Number accepted, you are registered as a {}.\n📍 Now send your location.",
                role.label().to_lowercase()
            ),
            make_main_menu_keyboard(),
        ),
        Outcome::Matches { role, matches } => {
            (format_matches(*role, matches), make_main_menu_keyboard())
        }
        Outcome::Finished(role) => (
            format!(
                "🔚 Your activity as a {} has ended. Send /start to begin again.",
                role.label().to_lowercase()
            ),
            make_main_menu_keyboard(),
        ),
    }
}

fn render_error(err: &CoreError) -> &'static str {
    match err {
        CoreError::NotRegistered => "Please choose a role first. Send /start.",
        CoreError::NoSuchParticipant => "Please send your phone number first.",
        CoreError::NoLocation => "Your location is unknown. Please share your location.",
        CoreError::InvalidLocation { .. } => "This location cannot be used. Please try again.",
    }
}

fn format_matches(role: Role, matches: &[Match]) -> String {
    let (icon, heading, nobody) = match role.opposite() {
        Role::Provider => ("🚗", "🟢 Nearby drivers:", "❌ No drivers found nearby."),
        Role::Requester => ("👤", "🟢 Nearby clients:", "❌ No clients found nearby."),
    };
    if matches.is_empty() {
        return nobody.to_owned();
    }

    let mut formatted = format!("{heading}\n");
    for found in matches {
        formatted.push_str(&format!(
            "{icon} {} — <a href=\"{}\">View</a>\n",
            html::escape(&found.contact),
            html::escape(found.map_link().as_str())
        ));
    }
    formatted
}
