// FinHealth Client - Core Library
// Upload/analysis lifecycle, result normalization and dashboard mapping,
// shared by the CLI, the terminal UI and the integration tests.

pub mod industry;
pub mod error;
pub mod result;
pub mod chart;
pub mod client;
pub mod controller;
pub mod dashboard;
pub mod export;
pub mod config;

// Re-export commonly used types
pub use industry::IndustrySegment;
pub use error::{AnalysisError, ConfigError, ExportError, ValidationError};
pub use result::{
    normalize, credit_category, Advice, CreditCategory, ResultModel,
    POSITIVE_CREDIT_SCORE, UNKNOWN_CREDIT_SCORE,
};
pub use chart::{hue_for_index, to_series, ChartSeriesEntry, Hue, SeriesName};
pub use client::{
    parse_response, upload_url, AnalysisClient, HttpAnalysisClient, UploadFile,
    DEFAULT_API_URL,
};
pub use controller::{
    Completion, Notice, NoticeKind, SessionState, Submission, UploadController,
    UploadSelection, FAILURE_MESSAGE,
};
pub use dashboard::{
    build_dashboard, format_amount, render_text, AdvicePanel, CardValue, ChartBar,
    DashboardView, MetricCard,
};
pub use export::{FileReportSink, Report, ReportSink};
pub use config::ClientConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
