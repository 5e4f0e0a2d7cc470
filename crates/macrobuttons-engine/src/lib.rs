pub mod dispatcher;
pub mod handlers;
pub mod navigation;
pub mod paths;
pub mod registry;
pub mod resolver;
pub mod session;
pub mod tree;
pub mod watcher;

pub use dispatcher::{CommandDispatcher, CommandOutcome, DispatchReport};
pub use handlers::create_default_registry;
pub use navigation::NavigationStack;
pub use paths::enumerate_path_prefixes;
pub use registry::HandlerRegistry;
pub use resolver::{resolve_configs, resolve_url};
pub use session::Session;
pub use tree::build_root_items;
pub use watcher::UrlWatcher;
