//! Wire types for the normcontrol HTTP service
//!
//! Field names follow the service's JSON exactly. Optional fields the
//! service only sometimes sends are `#[serde(default)]` so older servers
//! keep working.

use serde_json::Value;

/// Response of `POST /upload`
///
/// Both fields are optional on the wire: a success status without a
/// `file_id` is still an upload failure and the client has to see it.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UploadResult {
    #[serde(default)]
    pub file_id: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
}

/// Body of `POST /analyze`
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnalyzeRequest {
    pub file_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

/// Response of `POST /analyze`
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnalysisResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    pub analysis_result: AnalysisResult,
    /// Opaque payload handed back to `/report` unchanged
    #[serde(default)]
    pub red_pencil_report: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_metadata: Option<DocumentMetadata>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnalysisResult {
    pub is_compliant: bool,
    pub statistics: Statistics,
    #[serde(default)]
    pub violations: Vec<Violation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Statistics {
    pub total_violations: u32,
    pub high_severity: u32,
    #[serde(default)]
    pub medium_severity: u32,
    #[serde(default)]
    pub low_severity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DocumentMetadata {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub analysis_date: Option<String>,
    #[serde(default)]
    pub total_pages: Option<u32>,
}

/// One reported deviation from a checked rule
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Violation {
    pub violation: String,
    /// Raw severity as sent by the server ("high", "medium", "low", ...)
    #[serde(default = "unknown_severity", deserialize_with = "lenient_severity")]
    pub severity: String,
    pub location: String,
    pub rule_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
}

/// Stored in place of a missing or non-string wire severity
pub const UNKNOWN_SEVERITY: &str = "unknown";

fn unknown_severity() -> String {
    UNKNOWN_SEVERITY.to_string()
}

/// Any JSON value is accepted; only strings are kept as sent
fn lenient_severity<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    Ok(match Value::deserialize(deserializer)? {
        Value::String(raw) => raw,
        _ => unknown_severity(),
    })
}

impl Violation {
    /// Severity classified through the fixed lookup table
    pub fn severity_level(&self) -> Severity {
        Severity::parse(&self.severity)
    }

    /// The quoted excerpt, if the server sent a non-empty one
    pub fn quote_text(&self) -> Option<&str> {
        self.quote.as_deref().filter(|q| !q.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Critical,
    Medium,
    Low,
    Unknown,
}

impl Severity {
    /// Classify a wire severity; unrecognized values map to `Unknown`
    pub fn parse(raw: &str) -> Self {
        match raw {
            "high" => Severity::Critical,
            "medium" => Severity::Medium,
            "low" => Severity::Low,
            _ => Severity::Unknown,
        }
    }

    /// Label shown next to a violation
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "КРИТИЧЕСКОЕ",
            Severity::Medium => "СРЕДНЕЕ",
            Severity::Low => "НИЗКОЕ",
            Severity::Unknown => "НЕИЗВЕСТНО",
        }
    }
}

/// Error envelope the service returns with non-2xx statuses
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// `error` text of a raw failure body; `None` unless it is the JSON envelope
    pub fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|parsed| parsed.error)
    }
}

/// Body of `POST /report`
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReportRequest {
    pub red_pencil_report: Value,
}

/// Response of `POST /report`
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ReportResponse {
    pub report_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_analysis_response_minimal() {
        let json = r#"{
            "analysis_result": {
                "is_compliant": false,
                "statistics": {"total_violations": 1, "high_severity": 1},
                "violations": [{
                    "violation": "Код документа не найден",
                    "severity": "high",
                    "location": "Основная надпись",
                    "rule_text": "1.1.1"
                }]
            },
            "red_pencil_report": {"summary": {"total_issues": 1}}
        }"#;

        let parsed: AnalysisResponse = serde_json::from_str(json).unwrap();
        assert!(!parsed.analysis_result.is_compliant);
        assert_eq!(parsed.analysis_result.statistics.medium_severity, 0);
        assert_eq!(parsed.analysis_result.violations[0].quote, None);
        assert_eq!(
            parsed.red_pencil_report["summary"]["total_issues"],
            serde_json::json!(1)
        );
        assert!(parsed.document_metadata.is_none());
    }

    #[test]
    fn test_upload_result_without_file_id() {
        let parsed: UploadResult = serde_json::from_str(r#"{"filename": "a.pdf"}"#).unwrap();
        assert_eq!(parsed.file_id, None);
        assert_eq!(parsed.filename.as_deref(), Some("a.pdf"));
    }

    #[test]
    fn test_analyze_request_omits_missing_filename() {
        let req = AnalyzeRequest {
            file_id: "abc".to_string(),
            filename: None,
        };
        assert_eq!(serde_json::to_string(&req).unwrap(), r#"{"file_id":"abc"}"#);
    }

    #[test]
    fn test_severity_lookup() {
        assert_eq!(Severity::parse("high"), Severity::Critical);
        assert_eq!(Severity::parse("medium"), Severity::Medium);
        assert_eq!(Severity::parse("low"), Severity::Low);
        assert_eq!(Severity::parse("HIGH"), Severity::Unknown);
        assert_eq!(Severity::parse(""), Severity::Unknown);
        assert_eq!(Severity::Unknown.label(), "НЕИЗВЕСТНО");
    }

    #[test]
    fn test_non_string_severity_is_unknown() {
        let variants = [
            r#""severity": null,"#,
            r#""severity": 3,"#,
            r#""severity": {"level": "high"},"#,
            "",
        ];
        for severity in variants {
            let json = format!(
                r#"{{"violation": "Масштаб не указан", {} "location": "Основная надпись", "rule_text": "2.1"}}"#,
                severity
            );
            let parsed: Violation = serde_json::from_str(&json).unwrap();
            assert_eq!(parsed.severity, UNKNOWN_SEVERITY);
            assert_eq!(parsed.severity_level(), Severity::Unknown);
        }
    }

    #[test]
    fn test_string_severity_kept_verbatim() {
        let parsed: Violation = serde_json::from_str(
            r#"{"violation": "v", "severity": "cosmetic", "location": "l", "rule_text": "r"}"#,
        )
        .unwrap();
        assert_eq!(parsed.severity, "cosmetic");
        assert_eq!(parsed.severity_level(), Severity::Unknown);
    }

    #[test]
    fn test_empty_quote_is_absent() {
        let violation = Violation {
            quote: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(violation.quote_text(), None);

        let violation = Violation {
            quote: Some("РНАТ.301276.001".to_string()),
            ..Default::default()
        };
        assert_eq!(violation.quote_text(), Some("РНАТ.301276.001"));
    }

    #[test]
    fn test_error_body_tolerates_other_fields() {
        let parsed: ErrorBody =
            serde_json::from_str(r#"{"error": "Invalid structure", "status": 400}"#).unwrap();
        assert_eq!(parsed.error.as_deref(), Some("Invalid structure"));
    }

    #[test]
    fn test_error_message_from_raw_body() {
        assert_eq!(
            ErrorBody::message_from(r#"{"error": "Invalid structure"}"#).as_deref(),
            Some("Invalid structure")
        );
        assert_eq!(ErrorBody::message_from("Internal Server Error"), None);
        assert_eq!(ErrorBody::message_from(r#"{"status": "failed"}"#), None);
        assert_eq!(ErrorBody::message_from(""), None);
    }
}
