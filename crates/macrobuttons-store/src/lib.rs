pub mod backend;
pub mod backup;
pub mod database;
pub mod error;
pub mod lazy;
pub mod schema;
pub mod stores;

pub use backend::{KvBackend, MemoryBackend};
pub use backup::{export_backup, parse_backup, Backup, ImportError};
pub use database::Database;
pub use error::StoreError;
pub use lazy::LazyStore;
pub use stores::{Stores, CONFIGS_KEY, SETTINGS_KEY, SITEMAP_KEY};
