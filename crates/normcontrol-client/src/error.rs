//! Error types for the normcontrol client
//!
//! `Display` on every user-facing variant is the exact message the
//! front-end shows, so callers can pass `err.to_string()` straight to the
//! Error panel or the alert dialog.

use normcontrol_types::ErrorBody;
use thiserror::Error;

/// Generic message for a failed upload
pub const UPLOAD_FAILED: &str = "Ошибка загрузки файла";

/// Generic message for a failed analysis when the server gave no reason
pub const ANALYSIS_FAILED: &str = "Ошибка анализа документа";

/// Fixed message shown when the text report cannot be produced
pub const REPORT_FAILED: &str = "Ошибка при генерации отчета";

/// Rejection of the file selection, raised before any network call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Пожалуйста, выберите файл")]
    NoFile,

    #[error("Пожалуйста, выберите PDF файл")]
    WrongType { mime_type: String },
}

/// Failure talking to the compliance service
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Server responded with status {status}")]
    Status { status: u16, error: Option<String> },

    #[error("Malformed response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Failure for a non-2xx status, keeping the body's `error` text if it has one
    pub fn from_failure(status: u16, body: Option<&str>) -> Self {
        ApiError::Status {
            status,
            error: body.and_then(ErrorBody::message_from),
        }
    }
}

/// Anything that aborts an upload/analyze run
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{}", UPLOAD_FAILED)]
    Upload(#[source] ApiError),

    #[error("{}", UPLOAD_FAILED)]
    MissingFileId,

    #[error("{message}")]
    Analysis {
        message: String,
        #[source]
        source: ApiError,
    },

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

impl WorkflowError {
    /// Build an analysis failure, preferring the server's own `error` text
    pub fn analysis(source: ApiError) -> Self {
        let message = match &source {
            ApiError::Status {
                error: Some(message),
                ..
            } if !message.is_empty() => message.clone(),
            _ => ANALYSIS_FAILED.to_string(),
        };
        WorkflowError::Analysis { message, source }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, WorkflowError::Validation(_))
    }
}

/// Failure producing or saving the downloadable report
///
/// These go to the front-end's alert channel, not the Error panel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    #[error("{}", REPORT_FAILED)]
    Request(#[source] ApiError),

    #[error("Не удалось сохранить отчет: {0}")]
    Save(String),

    #[error("Отчет недоступен: проверка не завершена")]
    NotReady,
}

/// An event the workflow state machine refuses in its current state
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Workflow ended with an error; start a new session to check another document")]
    Terminal,

    #[error("Event {event} is not valid in state {state}")]
    Invalid {
        state: &'static str,
        event: &'static str,
    },

    #[error("Progress cannot move back from {current}% to {requested}%")]
    ProgressRegressed { current: u8, requested: u8 },
}
