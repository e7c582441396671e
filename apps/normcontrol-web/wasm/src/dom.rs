//! DOM front-end: draws views into the normcontrol page

use normcontrol_client::report::REPORT_MIME_TYPE;
use normcontrol_client::validation::FALLBACK_MIME_TYPE;
use normcontrol_client::view::ProgressView;
use normcontrol_client::{validate_selection, Frontend, ReportFile, ResultsView, SelectedFile, View};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Blob, BlobPropertyBag, Document, Element, HtmlAnchorElement, HtmlElement, HtmlInputElement,
    Url,
};

pub const UPLOAD_FORM: &str = "uploadForm";
pub const FILE_INPUT: &str = "fileInput";
pub const PROGRESS_SECTION: &str = "progressSection";
pub const RESULTS_SECTION: &str = "resultsSection";
pub const ERROR_SECTION: &str = "errorSection";
pub const COMPLIANCE_STATUS: &str = "complianceStatus";
pub const TOTAL_ISSUES: &str = "totalIssues";
pub const CRITICAL_ISSUES: &str = "criticalIssues";
pub const VIOLATIONS_CONTAINER: &str = "violationsContainer";
pub const ERROR_MESSAGE: &str = "errorMessage";
pub const DOWNLOAD_REPORT: &str = "downloadReport";
pub const NEW_CHECK: &str = "newCheck";

const PROGRESS_FILL: &str = ".progress-fill";
const STEP: &str = ".step";

/// `display` value for a panel
pub fn display_value(visible: bool) -> &'static str {
    if visible {
        "block"
    } else {
        "none"
    }
}

pub struct DomFrontend {
    document: Document,
}

impl DomFrontend {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn element(&self, id: &str) -> Result<Element, JsValue> {
        self.document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("Missing element #{}", id)))
    }

    fn html_element(&self, id: &str) -> Result<HtmlElement, JsValue> {
        self.element(id)?.dyn_into::<HtmlElement>().map_err(JsValue::from)
    }

    fn set_visible(&self, id: &str, visible: bool) -> Result<(), JsValue> {
        self.html_element(id)?
            .style()
            .set_property("display", display_value(visible))
    }

    fn set_text(&self, id: &str, text: &str) -> Result<(), JsValue> {
        self.element(id)?.set_text_content(Some(text));
        Ok(())
    }

    fn draw(&self, view: &View) -> Result<(), JsValue> {
        self.set_visible(UPLOAD_FORM, view.panels.form)?;
        self.set_visible(PROGRESS_SECTION, view.panels.progress)?;
        self.set_visible(RESULTS_SECTION, view.panels.results)?;
        self.set_visible(ERROR_SECTION, view.panels.error)?;

        if let Some(progress) = &view.progress {
            self.draw_progress(progress)?;
        }
        if let Some(results) = &view.results {
            self.draw_results(results)?;
        }
        if let Some(message) = &view.error_message {
            self.set_text(ERROR_MESSAGE, message)?;
        }
        if view.clear_file_input {
            self.element(FILE_INPUT)?
                .dyn_into::<HtmlInputElement>()
                .map_err(JsValue::from)?
                .set_value("");
        }
        Ok(())
    }

    fn draw_progress(&self, progress: &ProgressView) -> Result<(), JsValue> {
        if let Some(fill) = self.document.query_selector(PROGRESS_FILL)? {
            if let Ok(fill) = fill.dyn_into::<HtmlElement>() {
                fill.style().set_property("width", &progress.fill_width)?;
            }
        }

        let steps = self.document.query_selector_all(STEP)?;
        for (index, active) in progress.active_steps.iter().enumerate() {
            let step = steps
                .get(index as u32)
                .and_then(|node| node.dyn_into::<Element>().ok());
            if let Some(step) = step {
                step.class_list().toggle_with_force("active", *active)?;
            }
        }
        Ok(())
    }

    fn draw_results(&self, results: &ResultsView) -> Result<(), JsValue> {
        let status = self.element(COMPLIANCE_STATUS)?;
        status.set_text_content(Some(results.compliance_text));
        status.set_class_name(results.compliance_class);

        self.set_text(TOTAL_ISSUES, &results.total_issues.to_string())?;
        self.set_text(CRITICAL_ISSUES, &results.critical_issues.to_string())?;
        self.element(VIOLATIONS_CONTAINER)?
            .set_inner_html(&results.violations_html());
        Ok(())
    }

    fn download(&self, report: &ReportFile) -> Result<(), JsValue> {
        let parts = js_sys::Array::of1(&JsValue::from_str(&report.contents));
        let opts = BlobPropertyBag::new();
        opts.set_type(REPORT_MIME_TYPE);
        let blob = Blob::new_with_str_sequence_and_options(&parts, &opts)?;
        let url = Url::create_object_url_with_blob(&blob)?;

        let anchor = self
            .document
            .create_element("a")?
            .dyn_into::<HtmlAnchorElement>()
            .map_err(JsValue::from)?;
        anchor.set_href(&url);
        anchor.set_download(&report.filename);

        let body = self
            .document
            .body()
            .ok_or_else(|| JsValue::from_str("No document body"))?;
        body.append_child(&anchor)?;
        anchor.click();
        body.remove_child(&anchor)?;
        Url::revoke_object_url(&url)
    }
}

impl Frontend for DomFrontend {
    fn render(&mut self, view: &View) {
        if let Err(err) = self.draw(view) {
            web_sys::console::error_1(&err);
        }
    }

    fn alert(&mut self, message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }

    fn save_report(&mut self, report: &ReportFile) -> Result<(), String> {
        self.download(report)
            .map_err(|err| err.as_string().unwrap_or_else(|| format!("{:?}", err)))
    }
}

/// Read the first file of `#fileInput`, `None` when nothing is chosen
pub async fn selected_file(document: &Document) -> Result<Option<SelectedFile>, JsValue> {
    let input = document
        .get_element_by_id(FILE_INPUT)
        .ok_or_else(|| JsValue::from_str("Missing element #fileInput"))?
        .dyn_into::<HtmlInputElement>()
        .map_err(JsValue::from)?;

    let file = match input.files().and_then(|files| files.get(0)) {
        Some(file) => file,
        None => return Ok(None),
    };

    let mime_type = browser_mime_type(file.type_());
    let bytes = if should_read(&mime_type) {
        let buffer = JsFuture::from(file.array_buffer()).await?;
        js_sys::Uint8Array::new(&buffer).to_vec()
    } else {
        Vec::new()
    };

    Ok(Some(SelectedFile::new(file.name(), mime_type, bytes)))
}

/// Browsers report an unknown type as the empty string
pub fn browser_mime_type(reported: String) -> String {
    if reported.is_empty() {
        FALLBACK_MIME_TYPE.to_string()
    } else {
        reported
    }
}

/// Only a PDF is read into memory; any other type fails validation as is
pub fn should_read(mime_type: &str) -> bool {
    validate_selection(Some(SelectedFile::new("", mime_type, Vec::new()))).is_ok()
}
