use async_trait::async_trait;

use crate::keys::KeyCombo;

#[derive(Debug, thiserror::Error)]
pub enum PageError {
    #[error("no focused element to receive input")]
    NoFocus,
}

/// The active page that command handlers act on.
///
/// Implemented by whatever hosts the macro engine (a browser bridge, a test
/// double, or the CLI's logging page).
#[async_trait]
pub trait Page: Send + Sync {
    /// Type `text` into the focused element, one character at a time.
    async fn type_text(&self, text: &str) -> Result<(), PageError>;

    /// Dispatch a key press to the focused element.
    async fn press_key(&self, combo: &KeyCombo) -> Result<(), PageError>;

    /// Evaluate user-supplied script against the page context.
    async fn evaluate(&self, script: &str) -> Result<(), PageError>;
}
