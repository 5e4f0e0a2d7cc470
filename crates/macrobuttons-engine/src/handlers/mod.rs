pub mod custom;
pub mod key;
pub mod log;
pub mod type_text;
pub mod wait;

use std::sync::Arc;

use macrobuttons_core::Page;

use crate::registry::HandlerRegistry;

/// Create a HandlerRegistry with all built-in handlers acting on `page`.
pub fn create_default_registry(page: Arc<dyn Page>) -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();

    // Runtime
    registry.register(Arc::new(wait::WaitHandler));
    registry.register(Arc::new(log::LogHandler));

    // Page input
    registry.register(Arc::new(type_text::TypeHandler::new(Arc::clone(&page))));
    registry.register(Arc::new(key::KeyHandler::new(Arc::clone(&page))));

    // Elevated
    registry.register(Arc::new(custom::CustomHandler::new(page)));

    registry
}
