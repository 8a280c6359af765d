use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Startup errors
// ---------------------------------------------------------------------------

/// Invalid process configuration (environment variables).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {name} value '{value}': {reason}")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// A startup artifact is missing, corrupt, or inconsistent with the others.
/// Always fatal: the server must not start.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("artifact not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {reason}", path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error("malformed model bundle: {0}")]
    MalformedBundle(String),

    #[error("feature '{0}' is not a column of the demo table")]
    UnknownFeature(String),

    #[error("feature column '{column}' holds non-numeric value '{value}' in row {row}")]
    NonNumericFeature {
        column: String,
        row: usize,
        value: String,
    },
}

// ---------------------------------------------------------------------------
// Per-request errors
// ---------------------------------------------------------------------------

/// Bad input on `POST /`. Rendered back to the user as the form page with a
/// message; see `web::handlers`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RequestError {
    #[error("could not read the submitted form: {0}")]
    MalformedBody(String),

    #[error("'{0}' is not a valid row number")]
    Parse(String),

    #[error("row {index} does not exist (the demo table has {rows} rows)")]
    IndexOutOfRange { index: i64, rows: usize },

    #[error("row {row} has no value for feature '{feature}'")]
    MissingFeature { row: usize, feature: String },
}
