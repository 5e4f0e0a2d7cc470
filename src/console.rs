//! Terminal stand-ins for the browser page and the sidebar.

use std::io::Write;

use async_trait::async_trait;
use macrobuttons_core::{Item, KeyCombo, Page, PageError, Renderer, View};
use tracing::{info, warn};

/// Page that reports every action instead of touching a real document.
pub struct LoggingPage;

#[async_trait]
impl Page for LoggingPage {
    async fn type_text(&self, text: &str) -> Result<(), PageError> {
        info!(text, "type");
        Ok(())
    }

    async fn press_key(&self, combo: &KeyCombo) -> Result<(), PageError> {
        info!(combo = %combo, "key");
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> Result<(), PageError> {
        info!(script, "evaluate");
        Ok(())
    }
}

/// Prints each view as an indexed list under its breadcrumb trail.
pub struct TextRenderer<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write + Send> Renderer for TextRenderer<W> {
    fn render(&mut self, view: &View<'_>) {
        if let Err(e) = writeln!(self.out, "{}", format_view(view)) {
            warn!(error = %e, "failed to write view");
        }
    }
}

pub fn format_view(view: &View<'_>) -> String {
    let mut lines = Vec::with_capacity(view.items.len() + 1);
    if view.is_root() {
        lines.push("/".to_string());
    } else {
        lines.push(format!("/ {}", view.breadcrumbs.join(" / ")));
    }
    if view.items.is_empty() {
        lines.push("  (no macros)".to_string());
    }
    for (i, item) in view.items.iter().enumerate() {
        let line = match item {
            Item::Group(g) => format!("  [{i}] {} >  ({})", g.label, g.id),
            Item::Button(b) => format!("  [{i}] {}  ({})", b.label, b.id),
        };
        lines.push(line);
    }
    lines.join("\n")
}
