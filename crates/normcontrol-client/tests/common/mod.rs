//! Test doubles for the controller: scripted API, recording front-end and timer

#![allow(dead_code)]

use std::cell::RefCell;
use std::time::Duration;

use async_trait::async_trait;
use normcontrol_client::{
    ApiError, ComplianceApi, Frontend, ReportFile, SelectedFile, Timer, View, PDF_MIME_TYPE,
};
use normcontrol_types::{
    AnalysisResponse, AnalysisResult, AnalyzeRequest, ReportRequest, ReportResponse, Statistics,
    UploadResult, Violation,
};
use serde_json::json;

/// Service double that returns scripted replies and records every call
pub struct ScriptedApi {
    pub upload_reply: Result<UploadResult, ApiError>,
    pub analyze_reply: Result<AnalysisResponse, ApiError>,
    pub report_reply: Result<ReportResponse, ApiError>,
    pub calls: RefCell<Vec<String>>,
    pub analyze_requests: RefCell<Vec<AnalyzeRequest>>,
    pub report_requests: RefCell<Vec<ReportRequest>>,
}

impl ScriptedApi {
    pub fn succeeding(response: AnalysisResponse) -> Self {
        Self {
            upload_reply: Ok(UploadResult {
                file_id: Some("0b7e5c1a".to_string()),
                filename: Some("drawing.pdf".to_string()),
            }),
            analyze_reply: Ok(response),
            report_reply: Ok(ReportResponse {
                report_text: "ОТЧЕТ НОРМОКОНТРОЛЯ (ПО ТЗ)\nКонец отчета".to_string(),
                download_url: Some("/download/report.txt".to_string()),
            }),
            calls: RefCell::new(Vec::new()),
            analyze_requests: RefCell::new(Vec::new()),
            report_requests: RefCell::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

#[async_trait(?Send)]
impl ComplianceApi for ScriptedApi {
    async fn upload(&self, file: &SelectedFile) -> Result<UploadResult, ApiError> {
        self.calls.borrow_mut().push(format!("upload:{}", file.name));
        self.upload_reply.clone()
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResponse, ApiError> {
        self.calls.borrow_mut().push("analyze".to_string());
        self.analyze_requests.borrow_mut().push(request.clone());
        self.analyze_reply.clone()
    }

    async fn report(&self, request: &ReportRequest) -> Result<ReportResponse, ApiError> {
        self.calls.borrow_mut().push("report".to_string());
        self.report_requests.borrow_mut().push(request.clone());
        self.report_reply.clone()
    }
}

/// Front-end double keeping everything it was asked to show
#[derive(Default)]
pub struct RecordingFrontend {
    pub views: Vec<View>,
    pub alerts: Vec<String>,
    pub saved: Vec<ReportFile>,
    pub fail_save: bool,
}

impl RecordingFrontend {
    pub fn last_view(&self) -> &View {
        self.views.last().expect("at least the initial view is rendered")
    }

    pub fn max_progress(&self) -> Option<u8> {
        self.views
            .iter()
            .filter_map(|v| v.progress.as_ref().map(|p| p.percent))
            .max()
    }

    pub fn progress_labels(&self) -> Vec<&'static str> {
        self.views
            .iter()
            .filter_map(|v| v.progress.as_ref().map(|p| p.label))
            .collect()
    }
}

impl Frontend for RecordingFrontend {
    fn render(&mut self, view: &View) {
        self.views.push(view.clone());
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn save_report(&mut self, report: &ReportFile) -> Result<(), String> {
        if self.fail_save {
            return Err("read-only file system".to_string());
        }
        self.saved.push(report.clone());
        Ok(())
    }
}

/// Timer that records requested pauses without waiting
#[derive(Default)]
pub struct RecordingTimer {
    pub pauses: RefCell<Vec<Duration>>,
}

#[async_trait(?Send)]
impl Timer for RecordingTimer {
    async fn sleep(&self, duration: Duration) {
        self.pauses.borrow_mut().push(duration);
    }
}

pub fn pdf(name: &str) -> SelectedFile {
    SelectedFile::new(name, PDF_MIME_TYPE, b"%PDF-1.7\n%%EOF".to_vec())
}

pub fn violation(text: &str, severity: &str, quote: Option<&str>) -> Violation {
    Violation {
        violation: text.to_string(),
        severity: severity.to_string(),
        location: "Основная надпись".to_string(),
        rule_text: "Код документа должен соответствовать классификатору".to_string(),
        quote: quote.map(str::to_string),
        rule_id: Some("1.1.1_code_missing".to_string()),
    }
}

pub fn analysis(violations: Vec<Violation>) -> AnalysisResponse {
    let high = violations.iter().filter(|v| v.severity == "high").count() as u32;
    AnalysisResponse {
        success: Some(true),
        analysis_result: AnalysisResult {
            is_compliant: violations.is_empty(),
            statistics: Statistics {
                total_violations: violations.len() as u32,
                high_severity: high,
                ..Default::default()
            },
            violations,
        },
        red_pencil_report: json!({
            "summary": {"total_issues": 0, "compliance_status": "СООТВЕТСТВУЕТ"},
            "detailed_issues": []
        }),
        document_metadata: None,
    }
}
