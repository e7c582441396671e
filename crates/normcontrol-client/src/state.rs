//! Workflow state machine
//!
//! `transition` is a pure function: it never touches the network or the
//! view. The controller feeds it events and renders whatever comes out.
//!
//! ```text
//! Form --Submitted--> InProgress --Progressed*--> InProgress --Completed--> Results --Reset--> Form
//! Form --Failed(validation)--> Error(validation) --Submitted--> InProgress
//! InProgress --Failed(workflow)--> Error(workflow)   (terminal)
//! ```

use normcontrol_types::{AnalysisResponse, AnalyzeRequest, UploadResult};

use crate::error::{TransitionError, WorkflowError};
use crate::progress::{Checkpoint, Progress};

/// Identifiers of the uploaded file, owned by a single run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowContext {
    file_id: String,
    filename: Option<String>,
}

impl WorkflowContext {
    /// Build a context from the upload response; `None` without a file id
    pub fn from_upload(upload: UploadResult) -> Option<Self> {
        let file_id = upload.file_id.filter(|id| !id.is_empty())?;
        Some(Self {
            file_id,
            filename: upload.filename,
        })
    }

    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn analyze_request(&self) -> AnalyzeRequest {
        AnalyzeRequest {
            file_id: self.file_id.clone(),
            filename: self.filename.clone(),
        }
    }
}

/// Everything a finished run leaves behind
#[derive(Debug, Clone, PartialEq)]
pub struct RunResults {
    pub context: WorkflowContext,
    pub response: AnalysisResponse,
}

/// Where a failure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOrigin {
    /// Rejected selection; the form stays usable
    Validation,
    /// Upload or analysis failed; the run is over
    Workflow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub message: String,
    pub origin: FailureOrigin,
}

impl From<&WorkflowError> for Failure {
    fn from(err: &WorkflowError) -> Self {
        let origin = if err.is_validation() {
            FailureOrigin::Validation
        } else {
            FailureOrigin::Workflow
        };
        Failure {
            message: err.to_string(),
            origin,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowState {
    Form,
    InProgress(Progress),
    Results(Box<RunResults>),
    Error(Failure),
}

impl WorkflowState {
    pub fn name(&self) -> &'static str {
        match self {
            WorkflowState::Form => "Form",
            WorkflowState::InProgress(_) => "InProgress",
            WorkflowState::Results(_) => "Results",
            WorkflowState::Error(_) => "Error",
        }
    }

    pub fn context(&self) -> Option<&WorkflowContext> {
        match self {
            WorkflowState::Results(results) => Some(&results.context),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            WorkflowState::Error(Failure {
                origin: FailureOrigin::Workflow,
                ..
            })
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Submitted,
    Progressed(Progress),
    Completed(Box<RunResults>),
    Failed(Failure),
    Reset,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::Submitted => "Submitted",
            Event::Progressed(_) => "Progressed",
            Event::Completed(_) => "Completed",
            Event::Failed(_) => "Failed",
            Event::Reset => "Reset",
        }
    }
}

/// Compute the next state, or refuse the event
pub fn transition(state: &WorkflowState, event: Event) -> Result<WorkflowState, TransitionError> {
    if state.is_terminal() {
        return Err(TransitionError::Terminal);
    }

    let invalid = |event: &Event| TransitionError::Invalid {
        state: state.name(),
        event: event.name(),
    };

    match (state, event) {
        (WorkflowState::Form | WorkflowState::Error(_), Event::Submitted) => Ok(
            WorkflowState::InProgress(Checkpoint::Uploading.progress()),
        ),

        (WorkflowState::Form | WorkflowState::Error(_), Event::Failed(failure))
            if failure.origin == FailureOrigin::Validation =>
        {
            Ok(WorkflowState::Error(failure))
        }

        (WorkflowState::InProgress(current), Event::Progressed(next)) => {
            if next.percent < current.percent {
                return Err(TransitionError::ProgressRegressed {
                    current: current.percent,
                    requested: next.percent,
                });
            }
            Ok(WorkflowState::InProgress(next))
        }

        (WorkflowState::InProgress(_), Event::Completed(results)) => {
            Ok(WorkflowState::Results(results))
        }

        (WorkflowState::InProgress(_), Event::Failed(failure))
            if failure.origin == FailureOrigin::Workflow =>
        {
            Ok(WorkflowState::Error(failure))
        }

        (WorkflowState::Form | WorkflowState::Results(_) | WorkflowState::Error(_), Event::Reset) => {
            Ok(WorkflowState::Form)
        }

        (_, event) => Err(invalid(&event)),
    }
}
