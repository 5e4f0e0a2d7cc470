use async_trait::async_trait;
use macrobuttons_core::{Command, CommandHandler, HandlerError};

pub struct LogHandler;

#[async_trait]
impl CommandHandler for LogHandler {
    fn name(&self) -> &str {
        "log"
    }

    fn description(&self) -> &str {
        "Write a message to the log"
    }

    async fn execute(&self, command: &Command) -> Result<(), HandlerError> {
        let message = command
            .str_arg("value")
            .ok_or_else(|| HandlerError::missing("value"))?;
        tracing::info!(target: "macrobuttons::macro", "{message}");
        Ok(())
    }
}
