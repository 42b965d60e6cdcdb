use thiserror::Error;

/// Submit was requested without a file.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a file (CSV, XLSX, or PDF) first!")]
    NoFileSelected,
}

/// Any failure of the analysis exchange. Callers treat every variant the same.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("service answered with status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed response body: {0}")]
    Body(String),

    #[error("service reported an error: {0}")]
    Service(String),

    #[error("analysis task aborted: {0}")]
    Aborted(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("unknown industry segment '{0}'")]
    UnknownIndustry(String),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no dashboard to export")]
    NothingToExport,

    #[error("failed to write report to {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
