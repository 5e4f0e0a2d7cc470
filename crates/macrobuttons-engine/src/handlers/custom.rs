use std::sync::Arc;

use async_trait::async_trait;
use macrobuttons_core::{Command, CommandHandler, HandlerError, Page};

/// Evaluates `value` as script in the page.
///
/// Runs arbitrary user code, so it only ever executes in advanced mode.
pub struct CustomHandler {
    page: Arc<dyn Page>,
}

impl CustomHandler {
    pub fn new(page: Arc<dyn Page>) -> Self {
        Self { page }
    }
}

#[async_trait]
impl CommandHandler for CustomHandler {
    fn name(&self) -> &str {
        "custom"
    }

    fn description(&self) -> &str {
        "Evaluate user script against the page"
    }

    fn requires_advanced(&self) -> bool {
        true
    }

    async fn execute(&self, command: &Command) -> Result<(), HandlerError> {
        let script = command
            .str_arg("value")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| HandlerError::missing("value"))?;
        tracing::info!(bytes = script.len(), "evaluating custom script");
        self.page.evaluate(script).await?;
        Ok(())
    }
}
