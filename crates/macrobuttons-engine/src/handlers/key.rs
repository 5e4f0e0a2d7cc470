use std::sync::Arc;

use async_trait::async_trait;
use macrobuttons_core::{Command, CommandHandler, HandlerError, KeyCombo, Page};

/// Presses the key combo in `value`, e.g. `Enter` or `Ctrl+Shift+k`.
pub struct KeyHandler {
    page: Arc<dyn Page>,
}

impl KeyHandler {
    pub fn new(page: Arc<dyn Page>) -> Self {
        Self { page }
    }
}

#[async_trait]
impl CommandHandler for KeyHandler {
    fn name(&self) -> &str {
        "key"
    }

    fn description(&self) -> &str {
        "Press a key combination on the focused element"
    }

    async fn execute(&self, command: &Command) -> Result<(), HandlerError> {
        let raw = command
            .str_arg("value")
            .ok_or_else(|| HandlerError::missing("value"))?;
        let combo: KeyCombo = raw.parse()?;
        tracing::debug!(combo = %combo, "pressing key");
        self.page.press_key(&combo).await?;
        Ok(())
    }
}
