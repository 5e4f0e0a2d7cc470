use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use macrobuttons_core::{Command, Settings};
use tracing::{debug, error, info, warn};

use crate::registry::HandlerRegistry;

/// What happened to one command of a button press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    Executed,
    /// Gated behind advanced mode, which is off.
    SkippedAdvanced,
    /// No handler registered under the command's name.
    SkippedUnknown,
    /// The handler returned an error or panicked.
    Failed(String),
}

/// Per-command outcomes of one `run_commands` call, in command order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub outcomes: Vec<(String, CommandOutcome)>,
}

impl DispatchReport {
    pub fn executed(&self) -> usize {
        self.count(|o| matches!(o, CommandOutcome::Executed))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| {
            matches!(
                o,
                CommandOutcome::SkippedAdvanced | CommandOutcome::SkippedUnknown
            )
        })
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, CommandOutcome::Failed(_)))
    }

    fn count(&self, pred: impl Fn(&CommandOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Runs a button's commands one after another through the handler registry.
///
/// Clones share the registry, so separate presses can be spawned and overlap.
#[derive(Clone)]
pub struct CommandDispatcher {
    registry: Arc<HandlerRegistry>,
}

impl CommandDispatcher {
    pub fn new(registry: HandlerRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Run `commands` strictly in order.
    ///
    /// Each command is awaited before the next starts. Advanced commands are
    /// skipped unless `settings.advanced_mode` is on, unknown names are
    /// skipped, and handler failures are logged; none of these stop the
    /// sequence.
    pub async fn run_commands(&self, commands: &[Command], settings: &Settings) -> DispatchReport {
        let mut report = DispatchReport::default();
        for command in commands {
            let outcome = self.run_one(command, settings).await;
            report.outcomes.push((command.name.clone(), outcome));
        }
        debug!(
            executed = report.executed(),
            skipped = report.skipped(),
            failed = report.failed(),
            "command sequence finished"
        );
        report
    }

    async fn run_one(&self, command: &Command, settings: &Settings) -> CommandOutcome {
        if command.advanced && !settings.advanced_mode {
            warn!(command = %command.name, "skipping advanced command");
            return CommandOutcome::SkippedAdvanced;
        }

        let Some(handler) = self.registry.get(&command.name) else {
            warn!(command = %command.name, "unknown command");
            return CommandOutcome::SkippedUnknown;
        };

        if handler.requires_advanced() && !settings.advanced_mode {
            warn!(command = %command.name, "handler requires advanced mode, skipping");
            return CommandOutcome::SkippedAdvanced;
        }

        let start = Instant::now();
        let result = AssertUnwindSafe(handler.execute(command))
            .catch_unwind()
            .await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(Ok(())) => {
                info!(command = %command.name, elapsed_ms, "command executed");
                CommandOutcome::Executed
            }
            Ok(Err(e)) => {
                warn!(command = %command.name, error = %e, "command failed");
                CommandOutcome::Failed(e.to_string())
            }
            Err(panic) => {
                let msg = panic_message(&*panic);
                error!(command = %command.name, panic = %msg, "command handler panicked");
                CommandOutcome::Failed(format!("handler panicked: {msg}"))
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
