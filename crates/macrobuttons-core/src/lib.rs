pub mod bundle;
pub mod command;
pub mod handler;
pub mod keys;
pub mod page;
pub mod render;
pub mod settings;
pub mod sitemap;

pub use bundle::{
    display_order, find_item, sorted_for_display, BundleMeta, Button, ConfigBundle, Configs, Group,
    Item,
};
pub use command::{parse_script, Command};
pub use handler::{CommandHandler, HandlerError};
pub use keys::{KeyCombo, KeyComboError, Modifiers};
pub use page::{Page, PageError};
pub use render::{Renderer, View};
pub use settings::Settings;
pub use sitemap::{normalize_hostname, normalize_path, PathEntry, SiteMap, Sitemap};
