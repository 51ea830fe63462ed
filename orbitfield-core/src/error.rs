/// Error type shared by the scene crates
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(String),

    #[error("invalid config value for `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("invalid color `{0}`: expected #rrggbb")]
    InvalidColor(String),
}

pub type Result<T> = std::result::Result<T, SceneError>;
