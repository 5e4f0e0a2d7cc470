use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    pub meta: bool,
}

/// A key press such as `Ctrl+Shift+A` or `Enter`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyCombo {
    pub modifiers: Modifiers,
    pub key: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum KeyComboError {
    #[error("empty key combo")]
    Empty,
    #[error("unknown modifier in key combo: {0}")]
    UnknownModifier(String),
}

impl FromStr for KeyCombo {
    type Err = KeyComboError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(KeyComboError::Empty);
        }

        // A trailing `++` (or a lone `+`) names the plus key itself.
        let (mods, key) = match s.strip_suffix('+').map(str::trim_end) {
            Some("") => ("", "+"),
            Some(head) if head.ends_with('+') => (&head[..head.len() - 1], "+"),
            _ => match s.rsplit_once('+') {
                Some((mods, key)) => (mods, key.trim()),
                None => ("", s),
            },
        };
        if key.is_empty() {
            return Err(KeyComboError::Empty);
        }
        let mods: Vec<&str> = if mods.trim().is_empty() {
            Vec::new()
        } else {
            mods.split('+').map(str::trim).collect()
        };

        let mut modifiers = Modifiers::default();
        for m in mods {
            match m.to_ascii_lowercase().as_str() {
                "" => return Err(KeyComboError::Empty),
                "ctrl" | "control" => modifiers.ctrl = true,
                "shift" => modifiers.shift = true,
                "alt" | "option" => modifiers.alt = true,
                "meta" | "cmd" | "super" => modifiers.meta = true,
                _ => return Err(KeyComboError::UnknownModifier((*m).to_string())),
            }
        }

        Ok(Self {
            modifiers,
            key: key.to_string(),
        })
    }
}

impl fmt::Display for KeyCombo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.modifiers;
        for (on, label) in [
            (m.ctrl, "Ctrl"),
            (m.shift, "Shift"),
            (m.alt, "Alt"),
            (m.meta, "Meta"),
        ] {
            if on {
                write!(f, "{label}+")?;
            }
        }
        f.write_str(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_modifiers_and_key() {
        let combo: KeyCombo = "Ctrl+Shift+a".parse().unwrap();
        assert!(combo.modifiers.ctrl);
        assert!(combo.modifiers.shift);
        assert!(!combo.modifiers.alt);
        assert_eq!(combo.key, "a");
    }

    #[test]
    fn bare_key() {
        let combo: KeyCombo = " Enter ".parse().unwrap();
        assert_eq!(combo.modifiers, Modifiers::default());
        assert_eq!(combo.key, "Enter");
    }

    #[test]
    fn aliases() {
        let combo: KeyCombo = "control+cmd+x".parse().unwrap();
        assert!(combo.modifiers.ctrl && combo.modifiers.meta);
    }

    #[test]
    fn errors() {
        assert_eq!("".parse::<KeyCombo>(), Err(KeyComboError::Empty));
        assert_eq!("Ctrl+".parse::<KeyCombo>(), Err(KeyComboError::Empty));
        assert_eq!("Ctrl++Shift+x".parse::<KeyCombo>(), Err(KeyComboError::Empty));
        assert!(matches!(
            "Hyper+x".parse::<KeyCombo>(),
            Err(KeyComboError::UnknownModifier(_))
        ));
    }

    #[test]
    fn trailing_plus_is_the_plus_key() {
        let combo: KeyCombo = "Ctrl++".parse().unwrap();
        assert!(combo.modifiers.ctrl);
        assert_eq!(combo.key, "+");
        assert_eq!(combo.to_string(), "Ctrl++");

        let combo: KeyCombo = " + ".parse().unwrap();
        assert_eq!(combo.modifiers, Modifiers::default());
        assert_eq!(combo.key, "+");

        let combo: KeyCombo = "ctrl + shift + +".parse().unwrap();
        assert!(combo.modifiers.ctrl && combo.modifiers.shift);
        assert_eq!(combo.key, "+");
    }

    #[test]
    fn display_is_canonical() {
        let combo: KeyCombo = "shift+ctrl+k".parse().unwrap();
        assert_eq!(combo.to_string(), "Ctrl+Shift+k");
    }
}
