// Report export - "download report" hands the rendered dashboard to a sink
//
// The sink stands in for the host print facility. The default one writes a
// dated plain-text file.

use crate::dashboard::{render_text, DashboardView};
use crate::error::ExportError;
use crate::industry::IndustrySegment;
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing::info;

pub const REPORT_TITLE: &str = "SME FinHealth AI - Investor-Ready Report";

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    pub industry: IndustrySegment,
    pub body: String,
}

impl Report {
    /// Fails when no dashboard is currently shown.
    pub fn from_view(
        view: Option<&DashboardView>,
        industry: IndustrySegment,
        generated_at: DateTime<Utc>,
    ) -> Result<Self, ExportError> {
        let view = view.ok_or(ExportError::NothingToExport)?;
        Ok(Self {
            generated_at,
            industry,
            body: render_text(view),
        })
    }

    pub fn file_name(&self) -> String {
        format!(
            "finhealth-report-{}.txt",
            self.generated_at.format("%Y%m%d-%H%M%S")
        )
    }

    pub fn to_text(&self) -> String {
        format!(
            "{}\nIndustry: {}\nGenerated: {}\n\n{}",
            REPORT_TITLE,
            self.industry.label(),
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.body
        )
    }
}

pub trait ReportSink {
    /// Deliver the report and describe where it went.
    fn deliver(&self, report: &Report) -> Result<String, ExportError>;
}

#[derive(Debug, Clone)]
pub struct FileReportSink {
    dir: PathBuf,
}

impl FileReportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ReportSink for FileReportSink {
    fn deliver(&self, report: &Report) -> Result<String, ExportError> {
        let path = self.dir.join(report.file_name());
        std::fs::write(&path, report.to_text()).map_err(|source| ExportError::Io {
            path: path.display().to_string(),
            source,
        })?;

        info!("Report written to {}", path.display());
        Ok(path.display().to_string())
    }
}
