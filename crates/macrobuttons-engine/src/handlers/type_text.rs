use std::sync::Arc;

use async_trait::async_trait;
use macrobuttons_core::{Command, CommandHandler, HandlerError, Page};

/// Types `value` into the focused element.
pub struct TypeHandler {
    page: Arc<dyn Page>,
}

impl TypeHandler {
    pub fn new(page: Arc<dyn Page>) -> Self {
        Self { page }
    }
}

#[async_trait]
impl CommandHandler for TypeHandler {
    fn name(&self) -> &str {
        "type"
    }

    fn description(&self) -> &str {
        "Type text into the focused element"
    }

    async fn execute(&self, command: &Command) -> Result<(), HandlerError> {
        let text = command
            .str_arg("value")
            .ok_or_else(|| HandlerError::missing("value"))?;
        tracing::debug!(chars = text.chars().count(), "typing text");
        self.page.type_text(text).await?;
        Ok(())
    }
}
