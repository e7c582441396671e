//! Upload-Analyze-Report controller
//!
//! Drives one workflow at a time: validate, upload, analyze, show results,
//! and on demand fetch the text report. Every state change goes through
//! [`transition`] and is immediately rendered to the front-end.

use chrono::NaiveDate;
use normcontrol_types::ReportRequest;
use tracing::{debug, info, warn};

use crate::api::{ComplianceApi, Frontend, Timer};
use crate::error::{ReportError, TransitionError, WorkflowError};
use crate::progress::{Checkpoint, Pacing, SimulatedProgress};
use crate::report::{self, ReportFile};
use crate::state::{transition, Event, Failure, RunResults, WorkflowContext, WorkflowState};
use crate::validation::{validate_selection, SelectedFile};
use crate::view::render;

pub struct Controller<A, T, F> {
    api: A,
    timer: T,
    frontend: F,
    pacing: Pacing,
    state: WorkflowState,
}

impl<A, T, F> Controller<A, T, F>
where
    A: ComplianceApi,
    T: Timer,
    F: Frontend,
{
    /// Create a controller showing the initial form
    pub fn new(api: A, timer: T, frontend: F, pacing: Pacing) -> Self {
        let mut controller = Self {
            api,
            timer,
            frontend,
            pacing,
            state: WorkflowState::Form,
        };
        controller.redraw();
        controller
    }

    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// Identifiers of the current run's upload, once results are in
    pub fn context(&self) -> Option<&WorkflowContext> {
        self.state.context()
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn frontend(&self) -> &F {
        &self.frontend
    }

    pub fn frontend_mut(&mut self) -> &mut F {
        &mut self.frontend
    }

    /// Handle a form submission
    ///
    /// Validation failures are reported before any request is made. Upload
    /// and analysis failures end the run in the Error state.
    pub async fn submit(&mut self, file: Option<SelectedFile>) -> Result<(), WorkflowError> {
        let file = match validate_selection(file) {
            Ok(file) => file,
            Err(err) => {
                let err = WorkflowError::from(err);
                debug!("Selection rejected: {}", err);
                self.apply(Event::Failed(Failure::from(&err)))?;
                return Err(err);
            }
        };

        self.apply(Event::Submitted)?;

        match self.run(file).await {
            Ok(results) => {
                self.timer.sleep(self.pacing.results_delay).await;
                self.apply(Event::Completed(results))?;
                Ok(())
            }
            Err(err @ WorkflowError::Transition(_)) => Err(err),
            Err(err) => {
                warn!("Workflow failed: {} ({:?})", err, err);
                self.apply(Event::Failed(Failure::from(&err)))?;
                Err(err)
            }
        }
    }

    async fn run(&mut self, file: SelectedFile) -> Result<Box<RunResults>, WorkflowError> {
        info!("Uploading {} ({} bytes)", file.name, file.size());
        let uploaded = self
            .api
            .upload(&file)
            .await
            .map_err(WorkflowError::Upload)?;
        let context = WorkflowContext::from_upload(uploaded).ok_or(WorkflowError::MissingFileId)?;

        info!("Uploaded as file_id={}", context.file_id());
        self.checkpoint(Checkpoint::ExtractingText)?;

        let response = self
            .api
            .analyze(&context.analyze_request())
            .await
            .map_err(WorkflowError::analysis)?;

        for stage in SimulatedProgress::ANALYSIS_STAGES {
            self.checkpoint(stage)?;
            self.timer.sleep(self.pacing.stage_delay).await;
        }
        self.checkpoint(Checkpoint::Done)?;

        let result = &response.analysis_result;
        info!(
            "Analysis finished: compliant={}, violations={}",
            result.is_compliant,
            result.violations.len()
        );

        Ok(Box::new(RunResults { context, response }))
    }

    /// Fetch the text report for the current results and hand it to the front-end
    ///
    /// Failures are shown through [`Frontend::alert`], never the Error panel.
    pub async fn download_report(&mut self) -> Result<ReportFile, ReportError> {
        self.download_report_dated(report::today()).await
    }

    /// Same as [`Self::download_report`] with an explicit file date
    pub async fn download_report_dated(
        &mut self,
        date: NaiveDate,
    ) -> Result<ReportFile, ReportError> {
        let outcome = self.fetch_and_save(date).await;
        if let Err(err) = &outcome {
            warn!("Report download failed: {:?}", err);
            self.frontend.alert(&err.to_string());
        }
        outcome
    }

    async fn fetch_and_save(&mut self, date: NaiveDate) -> Result<ReportFile, ReportError> {
        let request = match &self.state {
            WorkflowState::Results(results) => ReportRequest {
                red_pencil_report: results.response.red_pencil_report.clone(),
            },
            _ => return Err(ReportError::NotReady),
        };

        let response = self
            .api
            .report(&request)
            .await
            .map_err(ReportError::Request)?;

        let file = ReportFile::new(date, response.report_text);
        self.frontend
            .save_report(&file)
            .map_err(ReportError::Save)?;

        info!("Report saved as {}", file.filename);
        Ok(file)
    }

    /// Return to the empty form, dropping the previous run's identifiers
    pub fn reset(&mut self) -> Result<(), TransitionError> {
        self.apply(Event::Reset)
    }

    fn checkpoint(&mut self, checkpoint: Checkpoint) -> Result<(), TransitionError> {
        debug!("Progress {}% {}", checkpoint.percent(), checkpoint.label());
        self.apply(Event::Progressed(checkpoint.progress()))
    }

    fn apply(&mut self, event: Event) -> Result<(), TransitionError> {
        self.state = transition(&self.state, event)?;
        self.redraw();
        Ok(())
    }

    fn redraw(&mut self) {
        let view = render(&self.state);
        self.frontend.render(&view);
    }
}
