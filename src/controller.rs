// Upload Controller - owns the upload/analysis session state machine
//
// States: Idle -> FileSelected -> Submitting -> Success | Failed
// At most one analysis request is outstanding at any time.

use crate::client::{AnalysisClient, UploadFile};
use crate::dashboard::{build_dashboard, DashboardView};
use crate::error::{AnalysisError, ValidationError};
use crate::industry::IndustrySegment;
use crate::result::{normalize, ResultModel};
use futures::future::BoxFuture;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

pub const FAILURE_MESSAGE: &str =
    "Analysis failed. Check if the backend is live and reachable.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    FileSelected,
    Submitting,
    Success,
    Failed,
}

impl SessionState {
    pub fn name(&self) -> &str {
        match self {
            SessionState::Idle => "Idle",
            SessionState::FileSelected => "FileSelected",
            SessionState::Submitting => "Submitting",
            SessionState::Success => "Success",
            SessionState::Failed => "Failed",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadSelection {
    pub file: Option<UploadFile>,
    pub industry: IndustrySegment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Validation,
    Failure,
    Info,
}

/// A single user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn validation(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Validation, message: message.into() }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Failure, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Info, message: message.into() }
    }
}

/// An accepted request, not yet executed. Run it exactly once and hand the
/// `Completion` back to the controller that issued it.
pub struct Submission {
    id: Uuid,
    request: BoxFuture<'static, Result<Value, AnalysisError>>,
}

impl Submission {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub async fn run(self) -> Completion {
        let outcome = self.request.await;
        Completion { id: self.id, outcome }
    }
}

#[derive(Debug)]
pub struct Completion {
    id: Uuid,
    outcome: Result<Value, AnalysisError>,
}

impl Completion {
    /// The request task for `id` ended without producing an outcome.
    pub fn aborted(id: Uuid, reason: impl Into<String>) -> Self {
        Self { id, outcome: Err(AnalysisError::Aborted(reason.into())) }
    }

    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

pub struct UploadController {
    client: Arc<dyn AnalysisClient>,
    selection: UploadSelection,
    state: SessionState,
    in_flight: Option<Uuid>,
    result: Option<ResultModel>,
    notice: Option<Notice>,
}

impl UploadController {
    pub fn new(client: Arc<dyn AnalysisClient>) -> Self {
        Self {
            client,
            selection: UploadSelection::default(),
            state: SessionState::Idle,
            in_flight: None,
            result: None,
            notice: None,
        }
    }

    pub fn with_industry(mut self, industry: IndustrySegment) -> Self {
        self.selection.industry = industry;
        self
    }

    /// Replace the pending file. `None` clears it.
    ///
    /// While a request is in flight the session stays `Submitting`; the new
    /// file is used by the next submit.
    pub fn select_file(&mut self, file: Option<UploadFile>) {
        debug!(
            "select_file: {:?} (state {})",
            file.as_ref().map(|f| f.file_name.as_str()),
            self.state.name()
        );

        let present = file.is_some();
        self.selection.file = file;

        if self.state != SessionState::Submitting {
            self.state = if present {
                SessionState::FileSelected
            } else {
                SessionState::Idle
            };
        }
    }

    pub fn select_industry(&mut self, industry: IndustrySegment) {
        debug!("select_industry: {}", industry);
        self.selection.industry = industry;
    }

    /// Start an analysis of the current selection.
    ///
    /// Returns `Ok(None)` when a request is already in flight; the call is
    /// ignored. Without a file no request is created and a validation notice
    /// is raised.
    pub fn submit(&mut self) -> Result<Option<Submission>, ValidationError> {
        if self.state == SessionState::Submitting {
            warn!("submit ignored: analysis {:?} still in flight", self.in_flight);
            return Ok(None);
        }

        let Some(file) = self.selection.file.clone() else {
            let err = ValidationError::NoFileSelected;
            warn!("submit rejected: {}", err);
            self.notice = Some(Notice::validation(err.to_string()));
            return Err(err);
        };

        let id = Uuid::new_v4();
        info!(
            "submit {}: file='{}' industry={}",
            id, file.file_name, self.selection.industry
        );

        let request = self.client.analyze(file, self.selection.industry);
        self.state = SessionState::Submitting;
        self.in_flight = Some(id);
        self.notice = None;

        Ok(Some(Submission { id, request }))
    }

    /// Consume the outcome of the in-flight request.
    pub fn complete(&mut self, completion: Completion) {
        if self.in_flight != Some(completion.id) {
            warn!("ignoring completion {} (not in flight)", completion.id);
            return;
        }
        self.in_flight = None;

        match completion.outcome {
            Ok(raw) => {
                let model = normalize(&raw);
                info!(
                    "analysis {} succeeded: revenue={} profit={} credit_score={}",
                    completion.id, model.revenue, model.profit, model.credit_score
                );
                self.result = Some(model);
                self.state = SessionState::Success;
            }
            Err(e) => {
                error!("analysis {} failed: {}", completion.id, e);
                self.notice = Some(Notice::failure(FAILURE_MESSAGE));
                self.state = SessionState::Failed;
            }
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.state == SessionState::Submitting
    }

    pub fn selection(&self) -> &UploadSelection {
        &self.selection
    }

    pub fn result(&self) -> Option<&ResultModel> {
        self.result.as_ref()
    }

    pub fn dashboard(&self) -> Option<DashboardView> {
        build_dashboard(self.result.as_ref())
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}
