// Client configuration - resolved once at startup from CLI flags and env

use crate::client::{HttpAnalysisClient, DEFAULT_API_URL};
use crate::controller::UploadController;
use crate::error::ConfigError;
use crate::export::FileReportSink;
use crate::industry::IndustrySegment;
use std::path::PathBuf;
use std::sync::Arc;

pub const API_URL_ENV: &str = "FINHEALTH_API_URL";
pub const INDUSTRY_ENV: &str = "FINHEALTH_INDUSTRY";
pub const REPORT_DIR_ENV: &str = "FINHEALTH_REPORT_DIR";
pub const LOG_FILE_ENV: &str = "FINHEALTH_LOG_FILE";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Analysis service base URL; `/upload` is appended.
    pub api_url: String,
    pub industry: IndustrySegment,
    pub report_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            industry: IndustrySegment::default(),
            report_dir: PathBuf::from("."),
        }
    }
}

impl ClientConfig {
    pub fn analysis_client(&self) -> Result<HttpAnalysisClient, ConfigError> {
        HttpAnalysisClient::new(&self.api_url)
    }

    /// Controller wired to the HTTP client, with the configured industry preselected.
    pub fn controller(&self) -> Result<UploadController, ConfigError> {
        let client = self.analysis_client()?;
        Ok(UploadController::new(Arc::new(client)).with_industry(self.industry))
    }

    pub fn report_sink(&self) -> FileReportSink {
        FileReportSink::new(self.report_dir.clone())
    }
}
