//! Client for the normcontrol document checking service
//!
//! A user picks a PDF; the client uploads it, asks the service to analyze
//! it, shows a pass/fail verdict with the list of rule violations, and can
//! fetch a plain-text "red pencil" report. The service does all of the
//! checking; this crate is the workflow around it.
//!
//! ## Architecture
//!
//! - [`state`]: pure state machine (Form, InProgress, Results, Error)
//! - [`view`]: pure rendering of a state into a front-end neutral view-model
//! - [`controller`]: runs the upload → analyze sequence and feeds events in
//! - [`api`]: traits for the service, the timer and the front-end
//! - [`http`]: reqwest implementation of the service API (`native` feature)
//!
//! Front-ends (terminal, browser) implement [`Frontend`] and draw [`View`]s.

pub mod api;
pub mod config;
pub mod controller;
pub mod error;
#[cfg(feature = "native")]
pub mod http;
pub mod progress;
pub mod report;
pub mod state;
pub mod validation;
pub mod view;

pub use api::{ComplianceApi, Frontend, NoDelay, Timer};
#[cfg(feature = "native")]
pub use api::TokioTimer;
pub use config::{ClientConfig, ConfigError, ServerConfig};
pub use controller::Controller;
pub use error::{ApiError, ReportError, TransitionError, ValidationError, WorkflowError};
#[cfg(feature = "native")]
pub use http::HttpApi;
pub use progress::{Checkpoint, Pacing, Progress, SimulatedProgress};
pub use report::{report_filename, ReportFile};
pub use state::{transition, Event, Failure, FailureOrigin, RunResults, WorkflowContext, WorkflowState};
pub use validation::{validate_selection, SelectedFile, PDF_MIME_TYPE};
pub use view::{render, ResultsView, View, ViolationView};
