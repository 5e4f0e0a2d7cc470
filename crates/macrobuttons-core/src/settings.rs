use serde::{Deserialize, Serialize};

/// Version stamped into freshly created settings.
pub const SETTINGS_VERSION: &str = "1.2.0";

/// User-level switches persisted alongside the sitemap and configs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub sidebar_open: bool,
    /// Opt-in for commands flagged `advanced` (arbitrary page script).
    #[serde(default)]
    pub advanced_mode: bool,
}

fn default_version() -> String {
    SETTINGS_VERSION.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            sidebar_open: false,
            advanced_mode: false,
        }
    }
}
