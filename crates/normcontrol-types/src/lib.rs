pub mod types;

pub use types::{
    AnalysisResponse, AnalysisResult, AnalyzeRequest, DocumentMetadata, ErrorBody,
    ReportRequest, ReportResponse, Severity, Statistics, UploadResult, Violation,
    UNKNOWN_SEVERITY,
};
