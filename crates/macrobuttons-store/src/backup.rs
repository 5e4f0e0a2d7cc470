//! Import/export of all three datasets as one JSON document.
//!
//! Import is all-or-nothing: the text is parsed and validated completely
//! before anything is handed to [`Stores::apply_backup`](crate::Stores::apply_backup).

use macrobuttons_core::{Configs, Settings, Sitemap};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shape of an exported document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Backup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
    pub sitemap: Sitemap,
    pub configs: Configs,
}

/// Why an import was rejected. Messages are meant to be shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("nothing to import: paste or select some JSON first")]
    Empty,

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("invalid format: expected a JSON object at the top level")]
    NotAnObject,

    #[error("invalid format: missing required key \"{0}\"")]
    MissingKey(&'static str),

    #[error("invalid {dataset}: {message}")]
    InvalidDataset {
        dataset: &'static str,
        message: String,
    },

    #[error("invalid sitemap: empty hostname")]
    EmptyHostname,

    #[error("invalid sitemap: {host}{path} references an empty config id")]
    EmptyConfigId { host: String, path: String },

    #[error("invalid configs: bundle \"{bundle}\" repeats item id \"{id}\"")]
    DuplicateItemId { bundle: String, id: String },
}

const REQUIRED_KEYS: [&str; 2] = ["sitemap", "configs"];

/// Parse and validate an import document.
pub fn parse_backup(text: &str) -> Result<Backup, ImportError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ImportError::Empty);
    }

    let value: Value = serde_json::from_str(text)?;
    let Value::Object(mut root) = value else {
        return Err(ImportError::NotAnObject);
    };
    for key in REQUIRED_KEYS {
        if !root.contains_key(key) {
            return Err(ImportError::MissingKey(key));
        }
    }

    let settings = match root.remove("settings") {
        Some(Value::Null) | None => None,
        Some(v) => Some(dataset::<Settings>("settings", v)?),
    };
    let sitemap = dataset::<Sitemap>("sitemap", root.remove("sitemap").unwrap_or_default())?;
    let configs = dataset::<Configs>("configs", root.remove("configs").unwrap_or_default())?;

    let backup = Backup {
        settings,
        sitemap,
        configs,
    };
    validate(&backup)?;
    Ok(backup)
}

/// Pretty-printed export document.
pub fn export_backup(backup: &Backup) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(backup)
}

fn dataset<T: serde::de::DeserializeOwned>(
    name: &'static str,
    value: Value,
) -> Result<T, ImportError> {
    serde_json::from_value(value).map_err(|e| ImportError::InvalidDataset {
        dataset: name,
        message: e.to_string(),
    })
}

fn validate(backup: &Backup) -> Result<(), ImportError> {
    for (host, site) in backup.sitemap.iter() {
        if host.trim().is_empty() {
            return Err(ImportError::EmptyHostname);
        }
        for (path, entry) in site.iter() {
            if entry.configs.iter().any(|c| c.trim().is_empty()) {
                return Err(ImportError::EmptyConfigId {
                    host: host.to_string(),
                    path: path.to_string(),
                });
            }
        }
    }

    for (id, bundle) in backup.configs.iter() {
        if let Some(dupe) = bundle.duplicate_ids().into_iter().next() {
            return Err(ImportError::DuplicateItemId {
                bundle: id.to_string(),
                id: dupe,
            });
        }
    }
    Ok(())
}
