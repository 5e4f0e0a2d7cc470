use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Delay used by `/wait` lines with no parseable duration.
pub const DEFAULT_WAIT_MS: u64 = 500;

/// One step of a button's payload.
///
/// `name` selects the handler; every other field is handler-specific and kept
/// verbatim in `args`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub name: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub advanced: bool,
    #[serde(flatten)]
    pub args: Map<String, Value>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            advanced: false,
            args: Map::new(),
        }
    }

    pub fn with_arg(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.args.insert(key.to_string(), value.into());
        self
    }

    pub fn advanced(mut self) -> Self {
        self.advanced = true;
        self
    }

    pub fn str_arg(&self, key: &str) -> Option<&str> {
        self.args.get(key).and_then(Value::as_str)
    }

    pub fn u64_arg(&self, key: &str) -> Option<u64> {
        self.args.get(key).and_then(Value::as_u64)
    }
}

/// Parse a legacy action script into commands.
///
/// One command per line. Lines that don't start with `/` are plain text and
/// are dropped.
pub fn parse_script(script: &str) -> Vec<Command> {
    script
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('/'))
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Command {
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    let name = head.trim_start_matches('/').to_lowercase();

    match name.as_str() {
        "type" => Command::new("type").with_arg("value", strip_quotes(rest)),
        "wait" => Command::new("wait").with_arg("ms", parse_wait_ms(rest)),
        _ => Command::new(name).with_arg("value", rest),
    }
}

/// Leading digits of `text` as milliseconds, so `250ms` reads as 250.
/// Zero or no digits fall back to [`DEFAULT_WAIT_MS`].
fn parse_wait_ms(text: &str) -> u64 {
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    text[..end]
        .parse::<u64>()
        .ok()
        .filter(|ms| *ms > 0)
        .unwrap_or(DEFAULT_WAIT_MS)
}

fn strip_quotes(text: &str) -> &str {
    let text = text.strip_prefix(['"', '\'']).unwrap_or(text);
    text.strip_suffix(['"', '\'']).unwrap_or(text)
}
