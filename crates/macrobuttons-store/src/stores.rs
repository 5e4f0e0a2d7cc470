use std::sync::Arc;

use macrobuttons_core::{Configs, Settings, Sitemap};
use tracing::{info, warn};

use crate::backend::KvBackend;
use crate::backup::Backup;
use crate::error::StoreError;
use crate::lazy::LazyStore;

pub const SETTINGS_KEY: &str = "macrobuttons:settings";
pub const SITEMAP_KEY: &str = "macrobuttons:siteMap";
pub const CONFIGS_KEY: &str = "macrobuttons:configs";

/// The three persisted datasets with an explicit lifecycle.
///
/// `init` loads settings and the sitemap; configs load on first use. Nothing
/// is written until `checkpoint`, `reset_all`, `apply_backup`, or `teardown`.
pub struct Stores {
    settings: LazyStore<Settings>,
    sitemap: LazyStore<Sitemap>,
    configs: LazyStore<Configs>,
}

impl Stores {
    pub fn new(backend: Arc<dyn KvBackend>) -> Self {
        Self {
            settings: LazyStore::new(SETTINGS_KEY, Settings::default(), Arc::clone(&backend)),
            sitemap: LazyStore::new(SITEMAP_KEY, Sitemap::default(), Arc::clone(&backend)),
            configs: LazyStore::new(CONFIGS_KEY, Configs::default(), backend),
        }
    }

    /// Create and load the eagerly needed datasets.
    pub fn init(backend: Arc<dyn KvBackend>) -> Result<Self, StoreError> {
        let mut stores = Self::new(backend);
        stores.settings.load()?;
        stores.sitemap.load()?;
        Ok(stores)
    }

    pub fn settings(&self) -> Result<&Settings, StoreError> {
        self.settings.get()
    }

    pub fn settings_mut(&mut self) -> Result<&mut Settings, StoreError> {
        self.settings.get_mut()
    }

    pub fn sitemap(&self) -> Result<&Sitemap, StoreError> {
        self.sitemap.get()
    }

    pub fn sitemap_mut(&mut self) -> Result<&mut Sitemap, StoreError> {
        self.sitemap.get_mut()
    }

    /// Bundles, loading them on first access.
    pub fn configs(&mut self) -> Result<&Configs, StoreError> {
        self.configs.load()?;
        self.configs.get()
    }

    pub fn configs_mut(&mut self) -> Result<&mut Configs, StoreError> {
        self.configs.load()?;
        self.configs.get_mut()
    }

    pub fn configs_loaded(&self) -> bool {
        self.configs.is_loaded()
    }

    /// Persist every loaded dataset. Unloaded ones are left untouched.
    pub fn checkpoint(&self) -> Result<(), StoreError> {
        if self.settings.is_loaded() {
            self.settings.save()?;
        }
        if self.sitemap.is_loaded() {
            self.sitemap.save()?;
        }
        if self.configs.is_loaded() {
            self.configs.save()?;
        }
        Ok(())
    }

    /// Restore every dataset to defaults and persist immediately.
    pub fn reset_all(&mut self) -> Result<(), StoreError> {
        self.settings.reset()?;
        self.sitemap.reset()?;
        self.configs.reset()?;
        info!("all stores reset to defaults");
        Ok(())
    }

    /// Adopt an already validated backup and persist it.
    ///
    /// A backup without settings keeps the stored ones, unless they cannot be
    /// read, in which case settings fall back to defaults.
    pub fn apply_backup(&mut self, backup: Backup) -> Result<(), StoreError> {
        match backup.settings {
            Some(settings) => self.settings.replace(settings)?,
            None => {
                if let Err(e) = self.settings.load() {
                    warn!(error = %e, "stored settings unreadable, restoring defaults");
                    self.settings.reset()?;
                }
            }
        }
        self.sitemap.replace(backup.sitemap)?;
        self.configs.replace(backup.configs)?;
        info!("backup applied");
        Ok(())
    }

    /// Snapshot of all three datasets for export.
    pub fn export(&mut self) -> Result<Backup, StoreError> {
        Ok(Backup {
            settings: Some(self.settings()?.clone()),
            sitemap: self.sitemap()?.clone(),
            configs: self.configs()?.clone(),
        })
    }

    /// Final checkpoint; the stores are unusable afterwards.
    pub fn teardown(self) -> Result<(), StoreError> {
        self.checkpoint()
    }
}
