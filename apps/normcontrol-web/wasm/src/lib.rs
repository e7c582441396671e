//! WASM bindings for the normcontrol page
//!
//! The whole workflow (validation, upload, analysis, progress, results,
//! report download) runs in Rust through `normcontrol-client`. This crate
//! only supplies the browser pieces: `fetch`, `setTimeout` and the DOM.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { NormControlApp } from './pkg/normcontrol_wasm.js';
//!
//! await init();
//!
//! // Same origin as the page
//! const app = new NormControlApp();
//! app.mount(); // binds #uploadForm, #downloadReport and #newCheck
//!
//! // Or drive it by hand
//! const ok = await app.submit();
//! if (ok) await app.downloadReport();
//! app.newCheck();
//! ```

pub mod dom;
pub mod fetch;
pub mod timer;

use std::cell::RefCell;
use std::rc::Rc;

use normcontrol_client::{Controller, Pacing, ServerConfig};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::future_to_promise;
use web_sys::Document;

pub use dom::DomFrontend;
pub use fetch::FetchApi;
pub use timer::BrowserTimer;

type AppController = Controller<FetchApi, BrowserTimer, DomFrontend>;

/// Initialize the WASM module
/// Called automatically by wasm-bindgen
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Get the library version
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// The normcontrol page controller
#[wasm_bindgen]
pub struct NormControlApp {
    controller: Rc<RefCell<AppController>>,
    document: Document,
}

#[wasm_bindgen]
impl NormControlApp {
    /// `base_url` defaults to the page's own origin
    #[wasm_bindgen(constructor)]
    pub fn new(base_url: Option<String>) -> Result<NormControlApp, JsValue> {
        let window = web_sys::window().ok_or("No window")?;
        let document = window.document().ok_or("No document")?;

        // An empty base keeps the endpoints relative to the page
        let server = ServerConfig::with_base_url(base_url.unwrap_or_default());
        let controller = Controller::new(
            FetchApi::new(&server),
            BrowserTimer,
            DomFrontend::new(document.clone()),
            Pacing::default(),
        );

        Ok(NormControlApp {
            controller: Rc::new(RefCell::new(controller)),
            document,
        })
    }

    /// Name of the current workflow state, `None` while a request is running
    #[wasm_bindgen(getter)]
    pub fn state(&self) -> Option<String> {
        self.controller
            .try_borrow()
            .ok()
            .map(|controller| controller.state().name().to_string())
    }

    /// Validate the chosen file and run upload → analyze.
    /// Resolves to `false` when the run ended on the Error panel.
    pub fn submit(&self) -> js_sys::Promise {
        let controller = self.controller.clone();
        let document = self.document.clone();

        future_to_promise(async move {
            let file = dom::selected_file(&document).await?;
            let mut controller = controller
                .try_borrow_mut()
                .map_err(|_| JsValue::from_str("A check is already running"))?;
            let ok = controller.submit(file).await.is_ok();
            Ok(JsValue::from_bool(ok))
        })
    }

    /// Fetch the text report and hand it to the browser as a download.
    /// Failures are reported through `window.alert`.
    #[wasm_bindgen(js_name = downloadReport)]
    pub fn download_report(&self) -> js_sys::Promise {
        let controller = self.controller.clone();

        future_to_promise(async move {
            let mut controller = controller
                .try_borrow_mut()
                .map_err(|_| JsValue::from_str("A check is already running"))?;
            let ok = controller.download_report().await.is_ok();
            Ok(JsValue::from_bool(ok))
        })
    }

    /// Back to an empty form
    #[wasm_bindgen(js_name = newCheck)]
    pub fn new_check(&self) -> Result<(), JsValue> {
        let mut controller = self
            .controller
            .try_borrow_mut()
            .map_err(|_| JsValue::from_str("A check is already running"))?;
        controller
            .reset()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Bind the form submit and the two result buttons
    pub fn mount(&self) -> Result<(), JsValue> {
        let form = self.element(dom::UPLOAD_FORM)?;
        let app = self.handle();
        let on_submit = Closure::wrap(Box::new(move |event: web_sys::Event| {
            event.prevent_default();
            let _ = app.submit();
        }) as Box<dyn FnMut(_)>);
        form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;
        on_submit.forget();

        let button = self.element(dom::DOWNLOAD_REPORT)?;
        let app = self.handle();
        let on_download = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            let _ = app.download_report();
        }) as Box<dyn FnMut(_)>);
        button.add_event_listener_with_callback("click", on_download.as_ref().unchecked_ref())?;
        on_download.forget();

        let button = self.element(dom::NEW_CHECK)?;
        let app = self.handle();
        let on_new_check = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            if let Err(err) = app.new_check() {
                web_sys::console::warn_1(&err);
            }
        }) as Box<dyn FnMut(_)>);
        button.add_event_listener_with_callback("click", on_new_check.as_ref().unchecked_ref())?;
        on_new_check.forget();

        Ok(())
    }
}

impl NormControlApp {
    /// Second handle on the same controller for event closures
    fn handle(&self) -> NormControlApp {
        NormControlApp {
            controller: self.controller.clone(),
            document: self.document.clone(),
        }
    }

    fn element(&self, id: &str) -> Result<web_sys::Element, JsValue> {
        self.document
            .get_element_by_id(id)
            .ok_or_else(|| JsValue::from_str(&format!("Missing element #{}", id)))
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use std::time::Duration;

    use normcontrol_client::{render, Checkpoint, Frontend, Timer, WorkflowState};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const PAGE: &str = r#"
        <form id="uploadForm"><input type="file" id="fileInput"></form>
        <div id="progressSection">
            <div class="progress-fill"></div>
            <div class="step"></div><div class="step"></div><div class="step"></div>
            <div class="step"></div><div class="step"></div>
        </div>
        <div id="resultsSection">
            <div id="complianceStatus"></div>
            <span id="totalIssues"></span><span id="criticalIssues"></span>
            <div id="violationsContainer"></div>
            <button id="downloadReport"></button><button id="newCheck"></button>
        </div>
        <div id="errorSection"><p id="errorMessage"></p></div>
    "#;

    fn page() -> Document {
        let document = web_sys::window().unwrap().document().unwrap();
        document.body().unwrap().set_inner_html(PAGE);
        document
    }

    fn display(document: &Document, id: &str) -> String {
        document
            .get_element_by_id(id)
            .unwrap()
            .dyn_into::<web_sys::HtmlElement>()
            .unwrap()
            .style()
            .get_property_value("display")
            .unwrap()
    }

    #[wasm_bindgen_test]
    fn test_progress_view_is_drawn() {
        let document = page();
        let mut frontend = DomFrontend::new(document.clone());

        frontend.render(&render(&WorkflowState::InProgress(
            Checkpoint::AnalyzingStructure.progress(),
        )));

        assert_eq!(display(&document, dom::PROGRESS_SECTION), "block");
        assert_eq!(display(&document, dom::UPLOAD_FORM), "none");
        let active = document.query_selector_all(".step.active").unwrap();
        assert_eq!(active.length(), 2);
    }

    #[wasm_bindgen_test]
    fn test_form_view_shows_only_form() {
        let document = page();
        let mut frontend = DomFrontend::new(document.clone());

        frontend.render(&render(&WorkflowState::Form));

        assert_eq!(display(&document, dom::UPLOAD_FORM), "block");
        assert_eq!(display(&document, dom::RESULTS_SECTION), "none");
        assert_eq!(display(&document, dom::ERROR_SECTION), "none");
    }

    #[wasm_bindgen_test]
    async fn test_browser_timer_resolves() {
        BrowserTimer.sleep(Duration::from_millis(5)).await;
        BrowserTimer.sleep(Duration::ZERO).await;
    }

    #[wasm_bindgen_test]
    fn test_new_app_starts_on_form() {
        page();
        let app = NormControlApp::new(None).unwrap();
        assert_eq!(app.state().as_deref(), Some("Form"));
        app.mount().unwrap();
    }
}
