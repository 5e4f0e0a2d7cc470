//! Runtime configuration: compiled defaults, then environment, then CLI flags.

use std::path::PathBuf;
use std::str::FromStr;

use macrobuttons_telemetry::TelemetryConfig;
use tracing::Level;

pub const ENV_DB: &str = "MACROBUTTONS_DB";
pub const ENV_LOG_LEVEL: &str = "MACROBUTTONS_LOG_LEVEL";
pub const ENV_JSON_LOGS: &str = "MACROBUTTONS_JSON_LOGS";
/// Comma-separated `module=level` pairs, e.g. `macrobuttons_store=debug`.
pub const ENV_LOG_MODULES: &str = "MACROBUTTONS_LOG_MODULES";

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_level: Level,
    pub module_levels: Vec<(String, Level)>,
    pub json_logs: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            log_level: Level::WARN,
            module_levels: Vec::new(),
            json_logs: false,
        }
    }
}

impl AppConfig {
    pub fn telemetry(&self) -> TelemetryConfig {
        TelemetryConfig {
            log_level: self.log_level,
            module_levels: self.module_levels.clone(),
            json: self.json_logs,
        }
    }
}

/// `~/.macrobuttons/macrobuttons.db`
pub fn default_db_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(home).join(".macrobuttons").join("macrobuttons.db")
}

/// An environment value that was present but could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IgnoredEnv {
    pub key: &'static str,
    pub value: String,
}

/// Apply environment overrides read through `lookup`.
///
/// Invalid values leave the field untouched and are returned so the caller
/// can warn once logging is up.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Vec<IgnoredEnv>
where
    F: Fn(&str) -> Option<String>,
{
    let read = |key: &str| lookup(key).filter(|v| !v.is_empty());
    let mut ignored = Vec::new();

    if let Some(v) = read(ENV_DB) {
        config.db_path = PathBuf::from(v);
    }
    if let Some(v) = read(ENV_LOG_LEVEL) {
        match Level::from_str(&v) {
            Ok(level) => config.log_level = level,
            Err(_) => ignored.push(IgnoredEnv {
                key: ENV_LOG_LEVEL,
                value: v,
            }),
        }
    }
    if let Some(v) = read(ENV_LOG_MODULES) {
        match parse_module_levels(&v) {
            Some(levels) => config.module_levels = levels,
            None => ignored.push(IgnoredEnv {
                key: ENV_LOG_MODULES,
                value: v,
            }),
        }
    }
    if let Some(v) = read(ENV_JSON_LOGS) {
        match parse_bool(&v) {
            Some(b) => config.json_logs = b,
            None => ignored.push(IgnoredEnv {
                key: ENV_JSON_LOGS,
                value: v,
            }),
        }
    }

    ignored
}

/// Parse `module=level[,module=level...]`. Any malformed pair rejects the whole value.
pub fn parse_module_levels(val: &str) -> Option<Vec<(String, Level)>> {
    val.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (module, level) = pair.split_once('=')?;
            let module = module.trim();
            if module.is_empty() {
                return None;
            }
            let level = Level::from_str(level.trim()).ok()?;
            Some((module.to_string(), level))
        })
        .collect()
}

/// Parse a string as a boolean (case-insensitive).
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.log_level, Level::WARN);
        assert!(!config.json_logs);
        assert!(config.db_path.ends_with(".macrobuttons/macrobuttons.db"));
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = AppConfig::default();
        let ignored = apply_env_overrides(
            &mut config,
            env(&[
                (ENV_DB, "/var/lib/mb.db"),
                (ENV_LOG_LEVEL, "debug"),
                (ENV_JSON_LOGS, "yes"),
                (ENV_LOG_MODULES, "macrobuttons_store=trace"),
            ]),
        );
        assert!(ignored.is_empty());
        assert_eq!(config.db_path, PathBuf::from("/var/lib/mb.db"));
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(
            config.module_levels,
            vec![("macrobuttons_store".to_string(), Level::TRACE)]
        );
        assert!(config.json_logs);
    }

    #[test]
    fn invalid_values_are_ignored_and_reported() {
        let mut config = AppConfig::default();
        let ignored = apply_env_overrides(
            &mut config,
            env(&[
                (ENV_LOG_LEVEL, "loud"),
                (ENV_LOG_MODULES, "macrobuttons_engine"),
                (ENV_JSON_LOGS, "maybe"),
                (ENV_DB, ""),
            ]),
        );
        assert_eq!(config, AppConfig::default());
        assert_eq!(
            ignored,
            vec![
                IgnoredEnv {
                    key: ENV_LOG_LEVEL,
                    value: "loud".into()
                },
                IgnoredEnv {
                    key: ENV_LOG_MODULES,
                    value: "macrobuttons_engine".into()
                },
                IgnoredEnv {
                    key: ENV_JSON_LOGS,
                    value: "maybe".into()
                },
            ]
        );
    }

    #[test]
    fn parse_bool_variants() {
        for v in ["true", "TRUE", "1", "yes", "on"] {
            assert_eq!(parse_bool(v), Some(true), "{v}");
        }
        for v in ["false", "0", "No", "off"] {
            assert_eq!(parse_bool(v), Some(false), "{v}");
        }
        assert_eq!(parse_bool("2"), None);
    }

    #[test]
    fn module_levels_parse() {
        assert_eq!(
            parse_module_levels(" macrobuttons_engine=debug, macrobuttons_store = warn ,"),
            Some(vec![
                ("macrobuttons_engine".to_string(), Level::DEBUG),
                ("macrobuttons_store".to_string(), Level::WARN),
            ])
        );
        assert_eq!(parse_module_levels("a=debug,b=loud"), None);
        assert_eq!(parse_module_levels("=debug"), None);
    }

    #[test]
    fn telemetry_carries_level_modules_and_format() {
        let config = AppConfig {
            log_level: Level::DEBUG,
            module_levels: vec![("macrobuttons_engine".into(), Level::TRACE)],
            json_logs: true,
            ..AppConfig::default()
        };
        let t = config.telemetry();
        assert_eq!(t.log_level, Level::DEBUG);
        assert!(t.json);
        assert_eq!(
            macrobuttons_telemetry::filter_directive(&t),
            "debug,macrobuttons_engine=trace"
        );
    }
}
