//! Error types for themesync operations.

use thiserror::Error;

/// Primary error type for themesync operations.
///
/// Per-target patch failures are not represented here: those are captured in
/// the apply report and the run continues.
#[derive(Error, Debug)]
pub enum ThemeError {
    // Status errors
    #[error("Status file not found: {path}")]
    StatusNotFound { path: String },

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("Configuration already exists: {path}")]
    ConfigExists { path: String },

    #[error("Invalid pattern for target '{target}' edit {index}: {reason}")]
    InvalidPattern {
        target: String,
        index: usize,
        reason: String,
    },

    // Run errors
    #[error("Unknown target '{name}' (known: {known:?})")]
    UnknownTarget { name: String, known: Vec<String> },

    #[error("{failed} target(s) failed to update")]
    TargetsFailed { failed: usize },

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl ThemeError {
    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::StatusNotFound { .. }
                | Self::ConfigNotFound { .. }
                | Self::ConfigInvalid(_)
                | Self::ConfigExists { .. }
                | Self::InvalidPattern { .. }
                | Self::UnknownTarget { .. }
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::StatusNotFound { .. } => {
                Some("Run: themesync set --mode dark, or pass --status <PATH>")
            }
            Self::ConfigNotFound { .. } => Some("Run: themesync init"),
            Self::ConfigExists { .. } => Some("Use --force to overwrite"),
            Self::InvalidPattern { .. } => {
                Some("Patterns must compile and contain a (?P<value>...) group")
            }
            Self::UnknownTarget { .. } => Some("Run: themesync targets"),
            Self::TargetsFailed { .. } => Some("Re-run with -v for per-target details"),
            _ => None,
        }
    }
}

/// Convenience type alias for Results using ThemeError.
pub type Result<T> = std::result::Result<T, ThemeError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E: std::error::Error> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| ThemeError::Other(format!("{}: {e}", f().into())))
    }
}
