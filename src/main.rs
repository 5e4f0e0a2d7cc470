mod config;
mod console;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use macrobuttons_engine::{create_default_registry, CommandDispatcher, CommandOutcome, Session};
use macrobuttons_store::{export_backup, parse_backup, Database, KvBackend, Stores};
use tracing::{info, warn, Level};
use url::Url;

use crate::config::AppConfig;
use crate::console::{LoggingPage, TextRenderer};

#[derive(Parser, Debug)]
#[command(name = "macrobuttons", version, about = "Per-site macro buttons")]
struct Cli {
    /// SQLite database holding settings, sitemap, and bundles.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[arg(long, global = true)]
    log_level: Option<Level>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the config ids that apply to a URL.
    Resolve { url: Url },
    /// Show the sidebar for a URL, optionally descending into groups.
    Items {
        url: Url,
        /// Display index of a group to open; repeat to go deeper.
        #[arg(long = "open")]
        open: Vec<usize>,
    },
    /// Run a button by id.
    Run { url: Url, button: String },
    /// Attach a config id to a host path.
    Attach {
        host: String,
        path: String,
        config: String,
        /// Stop ancestor paths from contributing configs.
        #[arg(long)]
        no_inherit: bool,
    },
    /// Remove a config id from a host path.
    Detach {
        host: String,
        path: String,
        config: String,
    },
    /// Replace all data with a backup document.
    Import { file: PathBuf },
    /// Write all data as a backup document.
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Restore every dataset to its defaults.
    Reset,
    /// Toggle advanced mode.
    Advanced { state: Toggle },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Toggle {
    On,
    Off,
}

impl Cli {
    fn apply_to(&self, config: &mut AppConfig) {
        if let Some(db) = &self.db {
            config.db_path = db.clone();
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if self.json_logs {
            config.json_logs = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::default();
    let ignored = config::apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    cli.apply_to(&mut config);

    macrobuttons_telemetry::init_telemetry(&config.telemetry());
    for env in ignored {
        warn!(key = env.key, value = %env.value, "invalid env var, ignoring");
    }

    let db = Database::open(&config.db_path)
        .with_context(|| format!("opening {}", config.db_path.display()))?;
    let mut stores = open_stores(Arc::new(db), &cli.command)?;

    let result = execute(cli.command, &mut stores).await;
    stores.teardown()?;
    result
}

/// Reset and import replace every dataset, so they skip the eager load and
/// can recover a store whose stored documents no longer parse.
fn open_stores(backend: Arc<dyn KvBackend>, command: &Command) -> Result<Stores> {
    match command {
        Command::Reset | Command::Import { .. } => Ok(Stores::new(backend)),
        _ => Stores::init(backend).context(
            "loading stored data; run `macrobuttons reset` or `macrobuttons import <file>` to recover",
        ),
    }
}

async fn execute(command: Command, stores: &mut Stores) -> Result<()> {
    match command {
        Command::Resolve { url } => {
            let ids = macrobuttons_engine::resolve_url(stores.sitemap()?, &url);
            for id in ids {
                println!("{id}");
            }
        }
        Command::Items { url, open } => {
            let mut session = new_session(true);
            session.navigate(stores, &url)?;
            for index in open {
                if !session.on_group_activate(index) {
                    bail!("no group at index {index}");
                }
            }
        }
        Command::Run { url, button } => {
            let mut session = new_session(false);
            session.navigate(stores, &url)?;
            let settings = stores.settings()?.clone();
            let Some(report) = session.run_button(&button, &settings).await else {
                bail!("no button \"{button}\" at {url}");
            };
            for (name, outcome) in &report.outcomes {
                match outcome {
                    CommandOutcome::Executed => println!("ok       {name}"),
                    CommandOutcome::SkippedAdvanced => println!("skipped  {name} (advanced mode is off)"),
                    CommandOutcome::SkippedUnknown => println!("skipped  {name} (unknown command)"),
                    CommandOutcome::Failed(msg) => println!("failed   {name}: {msg}"),
                }
            }
        }
        Command::Attach {
            host,
            path,
            config,
            no_inherit,
        } => {
            let config = config.trim();
            if config.is_empty() {
                bail!("config id must not be empty");
            }
            let entry = stores.sitemap_mut()?.attach(&host, &path, config);
            entry.inherit = !no_inherit;
            stores.checkpoint()?;
            info!(host = %host, path = %path, config = %config, "attached");
        }
        Command::Detach { host, path, config } => {
            if !stores.sitemap_mut()?.detach(&host, &path, &config) {
                bail!("{config} is not attached to {host}{path}");
            }
            stores.checkpoint()?;
        }
        Command::Import { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            let backup = parse_backup(&text)?;
            stores.apply_backup(backup)?;
            println!("imported {}", file.display());
        }
        Command::Export { out } => {
            let text = export_backup(&stores.export()?)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, text)
                        .with_context(|| format!("writing {}", path.display()))?;
                    println!("exported to {}", path.display());
                }
                None => println!("{text}"),
            }
        }
        Command::Reset => {
            stores.reset_all()?;
            println!("all data reset to defaults");
        }
        Command::Advanced { state } => {
            let on = matches!(state, Toggle::On);
            stores.settings_mut()?.advanced_mode = on;
            stores.checkpoint()?;
            println!("advanced mode {}", if on { "on" } else { "off" });
        }
    }
    Ok(())
}

fn new_session(render: bool) -> Session {
    let dispatcher = CommandDispatcher::new(create_default_registry(Arc::new(LoggingPage)));
    let renderer: Box<dyn macrobuttons_core::Renderer + Send> = if render {
        Box::new(TextRenderer::new(std::io::stdout()))
    } else {
        Box::new(TextRenderer::new(std::io::sink()))
    };
    Session::new(dispatcher, renderer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_flags_override_config() {
        let cli = Cli::parse_from([
            "macrobuttons",
            "--db",
            "/tmp/x.db",
            "--log-level",
            "debug",
            "--json-logs",
            "reset",
        ]);
        let mut config = AppConfig::default();
        cli.apply_to(&mut config);
        assert_eq!(config.db_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(config.log_level, Level::DEBUG);
        assert!(config.json_logs);
    }

    #[test]
    fn parses_attach_and_items() {
        let cli = Cli::parse_from([
            "macrobuttons",
            "attach",
            "youtube.com",
            "/watch",
            "yt",
            "--no-inherit",
        ]);
        assert!(matches!(
            cli.command,
            Command::Attach { no_inherit: true, ref config, .. } if config == "yt"
        ));

        let cli = Cli::parse_from([
            "macrobuttons",
            "items",
            "https://youtube.com/watch",
            "--open",
            "1",
            "--open",
            "0",
        ]);
        assert!(matches!(cli.command, Command::Items { ref open, .. } if open == &[1, 0]));
    }

    #[test]
    fn rejects_bad_url() {
        assert!(Cli::try_parse_from(["macrobuttons", "resolve", "not a url"]).is_err());
    }

    #[tokio::test]
    async fn attach_then_resolve_roundtrip() {
        let mut stores =
            Stores::init(Arc::new(Database::in_memory().unwrap())).unwrap();
        execute(
            Command::Attach {
                host: "www.Example.com".into(),
                path: "/docs".into(),
                config: "docs".into(),
                no_inherit: true,
            },
            &mut stores,
        )
        .await
        .unwrap();

        let site = stores.sitemap().unwrap().site("example.com").unwrap();
        let entry = site.entry("/docs").unwrap();
        assert_eq!(entry.configs, vec!["docs".to_string()]);
        assert!(!entry.inherit);

        execute(
            Command::Advanced { state: Toggle::On },
            &mut stores,
        )
        .await
        .unwrap();
        assert!(stores.settings().unwrap().advanced_mode);
    }

    fn attach(config: &str, no_inherit: bool) -> Command {
        Command::Attach {
            host: "example.com".into(),
            path: "/docs".into(),
            config: config.into(),
            no_inherit,
        }
    }

    #[tokio::test]
    async fn attach_rejects_empty_config_id() {
        let mut stores =
            Stores::init(Arc::new(Database::in_memory().unwrap())).unwrap();
        for config in ["", "   "] {
            let err = execute(attach(config, false), &mut stores).await.unwrap_err();
            assert!(err.to_string().contains("must not be empty"));
        }
        assert!(stores.sitemap().unwrap().is_empty());
    }

    #[tokio::test]
    async fn reattach_without_flag_restores_inherit() {
        let mut stores =
            Stores::init(Arc::new(Database::in_memory().unwrap())).unwrap();
        execute(attach("docs", true), &mut stores).await.unwrap();
        execute(attach("docs", false), &mut stores).await.unwrap();

        let entry = stores.sitemap().unwrap().site("example.com").unwrap().entry("/docs").unwrap();
        assert_eq!(entry.configs, vec!["docs".to_string()]);
        assert!(entry.inherit);
    }

    fn corrupt_backend() -> Arc<dyn KvBackend> {
        let db = Database::in_memory().unwrap();
        db.write(
            macrobuttons_store::SETTINGS_KEY,
            &serde_json::json!({"advancedMode": "yes"}),
        )
        .unwrap();
        Arc::new(db)
    }

    #[tokio::test]
    async fn corrupt_store_names_recovery_commands() {
        let Err(err) = open_stores(
            corrupt_backend(),
            &Command::Resolve {
                url: Url::parse("https://example.com/").unwrap(),
            },
        ) else {
            panic!("corrupt settings should fail to load");
        };
        let text = format!("{err:#}");
        assert!(text.contains("macrobuttons reset"), "{text}");
        assert!(text.contains("macrobuttons:settings"), "{text}");
    }

    #[tokio::test]
    async fn reset_recovers_corrupt_store() {
        let backend = corrupt_backend();
        let mut stores = open_stores(Arc::clone(&backend), &Command::Reset).unwrap();
        execute(Command::Reset, &mut stores).await.unwrap();
        stores.teardown().unwrap();

        let stores = Stores::init(backend).unwrap();
        assert!(!stores.settings().unwrap().advanced_mode);
    }

    #[tokio::test]
    async fn import_recovers_corrupt_store() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("backup.json");
        std::fs::write(
            &file,
            r#"{"sitemap": {"example.com": {"/": {"configs": ["a"]}}}, "configs": {}}"#,
        )
        .unwrap();

        let backend = corrupt_backend();
        let command = Command::Import { file: file.clone() };
        let mut stores = open_stores(Arc::clone(&backend), &command).unwrap();
        execute(command, &mut stores).await.unwrap();
        stores.teardown().unwrap();

        let stores = Stores::init(backend).unwrap();
        assert_eq!(stores.sitemap().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn run_unknown_button_fails() {
        let mut stores =
            Stores::init(Arc::new(Database::in_memory().unwrap())).unwrap();
        let err = execute(
            Command::Run {
                url: Url::parse("https://example.com/").unwrap(),
                button: "nope".into(),
            },
            &mut stores,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("no button"));
    }
}
