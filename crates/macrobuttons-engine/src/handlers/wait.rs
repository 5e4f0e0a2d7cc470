use std::time::Duration;

use async_trait::async_trait;
use macrobuttons_core::command::DEFAULT_WAIT_MS;
use macrobuttons_core::{Command, CommandHandler, HandlerError};

/// Pauses the sequence for `ms` milliseconds.
pub struct WaitHandler;

#[async_trait]
impl CommandHandler for WaitHandler {
    fn name(&self) -> &str {
        "wait"
    }

    fn description(&self) -> &str {
        "Pause before the next command"
    }

    async fn execute(&self, command: &Command) -> Result<(), HandlerError> {
        let ms = match command.args.get("ms") {
            None => DEFAULT_WAIT_MS,
            Some(value) => command.u64_arg("ms").ok_or_else(|| {
                HandlerError::InvalidArguments(format!(
                    "ms must be a non-negative integer, got {value}"
                ))
            })?,
        };
        tracing::debug!(ms, "waiting");
        tokio::time::sleep(Duration::from_millis(ms)).await;
        Ok(())
    }
}
