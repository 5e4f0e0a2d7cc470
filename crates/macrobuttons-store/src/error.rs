#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A dataset was read before `load()`. Always a caller ordering bug.
    #[error("store \"{0}\" accessed before load()")]
    NotLoaded(String),

    /// The stored document exists but does not fit the dataset's shape.
    #[error("stored dataset \"{key}\" is corrupt: {message}")]
    Corrupt { key: String, message: String },

    #[error("database error: {0}")]
    Database(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Database(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_loaded_names_the_key() {
        let err = StoreError::NotLoaded("macrobuttons:settings".into());
        assert_eq!(
            err.to_string(),
            "store \"macrobuttons:settings\" accessed before load()"
        );
    }

    #[test]
    fn corrupt_names_the_key() {
        let err = StoreError::Corrupt {
            key: "macrobuttons:settings".into(),
            message: "invalid type".into(),
        };
        assert_eq!(
            err.to_string(),
            "stored dataset \"macrobuttons:settings\" is corrupt: invalid type"
        );
    }

    #[test]
    fn json_error_converts() {
        let json_err = serde_json::from_str::<serde_json::Value>("{bad}").unwrap_err();
        let err: StoreError = json_err.into();
        assert!(matches!(err, StoreError::Serialization(_)));
    }
}
