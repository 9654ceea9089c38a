use crate::services::{CompletionClient, ExecutionClient};

/// Behavior switches of the bot.
#[derive(Clone, Debug, Default)]
pub struct BotSettings {
    /// Post an explanation comment with an empty body when the completion API fails,
    /// instead of posting nothing.
    pub comment_on_failed_explanation: bool,
}

/// Dependencies shared by the handling of all events.
pub struct BotContext {
    pub execution: ExecutionClient,
    pub completion: CompletionClient,
    pub settings: BotSettings,
}

impl BotContext {
    pub fn new(
        execution: ExecutionClient,
        completion: CompletionClient,
        settings: BotSettings,
    ) -> Self {
        Self {
            execution,
            completion,
            settings,
        }
    }
}
