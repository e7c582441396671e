//! Seams between the controller and the outside world
//!
//! The traits are `?Send` so the same controller runs on a tokio runtime and
//! on the single-threaded browser event loop.

use std::time::Duration;

use async_trait::async_trait;
use normcontrol_types::{
    AnalysisResponse, AnalyzeRequest, ReportRequest, ReportResponse, UploadResult,
};

use crate::error::ApiError;
use crate::report::ReportFile;
use crate::validation::SelectedFile;
use crate::view::View;

/// The three endpoints of the compliance service
#[async_trait(?Send)]
pub trait ComplianceApi {
    /// `POST /upload` as multipart form data, field `file`
    async fn upload(&self, file: &SelectedFile) -> Result<UploadResult, ApiError>;

    /// `POST /analyze`
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResponse, ApiError>;

    /// `POST /report`
    async fn report(&self, request: &ReportRequest) -> Result<ReportResponse, ApiError>;
}

/// Source of the cosmetic progress delays
#[async_trait(?Send)]
pub trait Timer {
    async fn sleep(&self, duration: Duration);
}

/// Surface the controller draws on
pub trait Frontend {
    /// Apply a freshly rendered view
    fn render(&mut self, view: &View);

    /// Blocking notice for report failures
    fn alert(&mut self, message: &str);

    /// Hand the report to the user (download, write to disk)
    fn save_report(&mut self, report: &ReportFile) -> Result<(), String>;
}

/// Timer that never waits
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

#[async_trait(?Send)]
impl Timer for NoDelay {
    async fn sleep(&self, _duration: Duration) {}
}

/// Timer backed by `tokio::time`
#[cfg(feature = "native")]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

#[cfg(feature = "native")]
#[async_trait(?Send)]
impl Timer for TokioTimer {
    async fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            tokio::time::sleep(duration).await;
        }
    }
}
