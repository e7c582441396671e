//! View-model rendering
//!
//! `render` is a deterministic function of the workflow state. Front-ends
//! apply the resulting `View` to whatever surface they have (DOM, terminal)
//! and hold no workflow logic of their own.

use normcontrol_types::{AnalysisResult, Violation};

use crate::progress::Progress;
use crate::state::{FailureOrigin, WorkflowState};

pub const COMPLIANT_TEXT: &str = "СООТВЕТСТВУЕТ";
pub const NON_COMPLIANT_TEXT: &str = "НЕ СООТВЕТСТВУЕТ";
pub const COMPLIANT_CLASS: &str = "status compliant";
pub const NON_COMPLIANT_CLASS: &str = "status non-compliant";
pub const NO_ISSUES_TEXT: &str = "Замечаний не выявлено. Документ соответствует требованиям.";

/// Which of the four panels are shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelVisibility {
    pub form: bool,
    pub progress: bool,
    pub results: bool,
    pub error: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    pub percent: u8,
    pub fill_width: String,
    pub label: &'static str,
    pub active_steps: [bool; 5],
}

impl From<&Progress> for ProgressView {
    fn from(progress: &Progress) -> Self {
        Self {
            percent: progress.percent,
            fill_width: progress.fill_width(),
            label: progress.label,
            active_steps: progress.active_steps(),
        }
    }
}

/// One rendered violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViolationView {
    /// 1-based position in the server's list
    pub number: usize,
    pub title: String,
    pub item_class: String,
    pub severity_class: String,
    pub severity_text: &'static str,
    pub location: String,
    pub rule_text: String,
    pub quote: Option<String>,
}

impl ViolationView {
    pub fn new(violation: &Violation, number: usize) -> Self {
        Self {
            number,
            title: format!("Замечание {}: {}", number, violation.violation),
            item_class: format!("violation-item {}", violation.severity),
            severity_class: format!("violation-severity severity-{}", violation.severity),
            severity_text: violation.severity_level().label(),
            location: violation.location.clone(),
            rule_text: violation.rule_text.clone(),
            quote: violation.quote_text().map(str::to_string),
        }
    }

    /// The quote as displayed, wrapped in quotation marks
    pub fn quoted(&self) -> Option<String> {
        self.quote.as_ref().map(|q| format!("\"{}\"", q))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsView {
    pub compliance_text: &'static str,
    pub compliance_class: &'static str,
    pub total_issues: u32,
    pub critical_issues: u32,
    pub violations: Vec<ViolationView>,
    /// Set instead of `violations` when the list is empty
    pub empty_message: Option<&'static str>,
}

impl ResultsView {
    pub fn new(result: &AnalysisResult) -> Self {
        let (compliance_text, compliance_class) = if result.is_compliant {
            (COMPLIANT_TEXT, COMPLIANT_CLASS)
        } else {
            (NON_COMPLIANT_TEXT, NON_COMPLIANT_CLASS)
        };

        let violations: Vec<ViolationView> = result
            .violations
            .iter()
            .enumerate()
            .map(|(idx, violation)| ViolationView::new(violation, idx + 1))
            .collect();

        let empty_message = violations.is_empty().then_some(NO_ISSUES_TEXT);

        Self {
            compliance_text,
            compliance_class,
            total_issues: result.statistics.total_violations,
            critical_issues: result.statistics.high_severity,
            violations,
            empty_message,
        }
    }

    /// HTML for the violations container
    pub fn violations_html(&self) -> String {
        if let Some(message) = self.empty_message {
            return format!("<p>{}</p>", escape_html(message));
        }

        let mut html = String::new();
        for item in &self.violations {
            html.push_str(&format!(
                "<div class=\"{}\">\n\
                 <div class=\"violation-header\">\n\
                 <h4>{}</h4>\n\
                 <span class=\"{}\">{}</span>\n\
                 </div>\n\
                 <div class=\"violation-location\"><strong>Местоположение:</strong> {}</div>\n\
                 <div class=\"violation-rule\"><strong>Требование:</strong> {}</div>\n",
                escape_html(&item.item_class),
                escape_html(&item.title),
                escape_html(&item.severity_class),
                item.severity_text,
                escape_html(&item.location),
                escape_html(&item.rule_text),
            ));
            if let Some(quoted) = item.quoted() {
                html.push_str(&format!(
                    "<div class=\"violation-quote\"><strong>Цитата:</strong> {}</div>\n",
                    escape_html(&quoted)
                ));
            }
            html.push_str("</div>\n");
        }
        html
    }

    /// Full results fragment: summary plus violations
    pub fn to_html(&self) -> String {
        format!(
            "<div class=\"results-summary\">\n\
             <div id=\"complianceStatus\" class=\"{}\">{}</div>\n\
             <div>Всего замечаний: <span id=\"totalIssues\">{}</span></div>\n\
             <div>Критических: <span id=\"criticalIssues\">{}</span></div>\n\
             </div>\n\
             <div id=\"violationsContainer\">\n{}</div>\n",
            self.compliance_class,
            self.compliance_text,
            self.total_issues,
            self.critical_issues,
            self.violations_html()
        )
    }

    /// Plain-text rendering for terminals
    pub fn to_text(&self) -> String {
        let mut lines = vec![
            format!("Статус: {}", self.compliance_text),
            format!("Всего замечаний: {}", self.total_issues),
            format!("Критических: {}", self.critical_issues),
            String::new(),
        ];

        if let Some(message) = self.empty_message {
            lines.push(message.to_string());
        }

        for item in &self.violations {
            lines.push(format!("{} [{}]", item.title, item.severity_text));
            lines.push(format!("   Местоположение: {}", item.location));
            lines.push(format!("   Требование: {}", item.rule_text));
            if let Some(quoted) = item.quoted() {
                lines.push(format!("   Цитата: {}", quoted));
            }
            lines.push(String::new());
        }

        lines.join("\n")
    }
}

/// Everything a front-end needs to draw the current state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub panels: PanelVisibility,
    pub progress: Option<ProgressView>,
    pub results: Option<ResultsView>,
    pub error_message: Option<String>,
    /// The file input should be emptied
    pub clear_file_input: bool,
}

pub fn render(state: &WorkflowState) -> View {
    match state {
        WorkflowState::Form => View {
            panels: PanelVisibility {
                form: true,
                ..Default::default()
            },
            progress: None,
            results: None,
            error_message: None,
            clear_file_input: true,
        },
        WorkflowState::InProgress(progress) => View {
            panels: PanelVisibility {
                progress: true,
                ..Default::default()
            },
            progress: Some(ProgressView::from(progress)),
            results: None,
            error_message: None,
            clear_file_input: false,
        },
        WorkflowState::Results(results) => View {
            panels: PanelVisibility {
                results: true,
                ..Default::default()
            },
            progress: None,
            results: Some(ResultsView::new(&results.response.analysis_result)),
            error_message: None,
            clear_file_input: false,
        },
        WorkflowState::Error(failure) => View {
            panels: PanelVisibility {
                // A rejected selection leaves the form in place
                form: failure.origin == FailureOrigin::Validation,
                error: true,
                ..Default::default()
            },
            progress: None,
            results: None,
            error_message: Some(failure.message.clone()),
            clear_file_input: false,
        },
    }
}

/// Escape text for inclusion in HTML element content or attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
