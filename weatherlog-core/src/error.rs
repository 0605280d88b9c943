use thiserror::Error;

/// Errors surfaced by the core pipeline.
///
/// Absent rows (read/update/delete on an unknown id) are not errors; the
/// store reports them as `Option`/`bool` results instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed caller input: bad date, bad lat/lon pair, empty label.
    /// Reported before anything is fetched or written.
    #[error("{0}")]
    InvalidInput(String),

    /// The weather provider rejected the request or could not be reached.
    /// Carries the provider's own message when one was returned.
    #[error("provider request failed: {0}")]
    Provider(String),

    /// The provider could not be reached at all (DNS, TLS, timeout).
    #[error("provider unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// The underlying SQLite storage is unusable. Fatal for the current
    /// operation; never retried.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("export I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
