use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq)]
#[command(rename_rule = "lowercase")]
pub(crate) enum BotCommand {
    #[command(description = "Choose a role and start over")]
    Start,
    #[command(description = "Show all commands")]
    Help,
    #[command(description = "Send an announcement to every user (admin only)")]
    Broadcast(String),
}
