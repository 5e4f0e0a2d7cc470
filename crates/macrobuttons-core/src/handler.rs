use async_trait::async_trait;

use crate::command::Command;
use crate::keys::KeyComboError;
use crate::page::PageError;

/// Trait implemented by each command handler.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Name matched against `Command::name`.
    fn name(&self) -> &str;
    fn description(&self) -> &str;

    /// Handlers that carry elevated capability opt into the advanced-mode
    /// gate regardless of the command's own flag.
    fn requires_advanced(&self) -> bool {
        false
    }

    async fn execute(&self, command: &Command) -> Result<(), HandlerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("invalid key combo: {0}")]
    KeyCombo(#[from] KeyComboError),
    #[error("page error: {0}")]
    Page(#[from] PageError),
}

impl HandlerError {
    /// Shorthand for a missing string argument.
    pub fn missing(key: &str) -> Self {
        Self::InvalidArguments(format!("{key} is required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = HandlerError::missing("value");
        assert_eq!(err.to_string(), "invalid arguments: value is required");

        let err: HandlerError = PageError::NoFocus.into();
        assert_eq!(err.to_string(), "page error: no focused element to receive input");

        let err: HandlerError = KeyComboError::Empty.into();
        assert!(err.to_string().contains("empty key combo"));
    }
}
