//! `fetch`-backed implementation of the compliance service API

use async_trait::async_trait;
use normcontrol_client::{ApiError, ComplianceApi, SelectedFile, ServerConfig};
use normcontrol_types::{
    AnalysisResponse, AnalyzeRequest, ReportRequest, ReportResponse, UploadResult,
};
use serde::{de::DeserializeOwned, Serialize};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Blob, BlobPropertyBag, FormData, Request, RequestInit, Response};

/// Service client running on the browser's `fetch`
#[derive(Debug, Clone)]
pub struct FetchApi {
    upload_url: String,
    analyze_url: String,
    report_url: String,
}

impl FetchApi {
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            upload_url: config.upload_url(),
            analyze_url: config.analyze_url(),
            report_url: config.report_url(),
        }
    }
}

fn transport(err: JsValue) -> ApiError {
    ApiError::Transport(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

async fn post(url: &str, body: &JsValue, content_type: Option<&str>) -> Result<Response, ApiError> {
    let window = web_sys::window().ok_or_else(|| ApiError::Transport("No window".to_string()))?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_body(body);

    let request = Request::new_with_str_and_init(url, &opts).map_err(transport)?;
    if let Some(content_type) = content_type {
        request
            .headers()
            .set("Content-Type", content_type)
            .map_err(transport)?;
    }

    let response = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(transport)?;
    response.dyn_into::<Response>().map_err(transport)
}

async fn post_json<B: Serialize>(url: &str, body: &B) -> Result<Response, ApiError> {
    let json = serde_json::to_string(body).map_err(|e| ApiError::Decode(e.to_string()))?;
    post(url, &JsValue::from_str(&json), Some("application/json")).await
}

async fn body_text(response: &Response) -> Option<String> {
    let promise = response.text().ok()?;
    JsFuture::from(promise).await.ok()?.as_string()
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let text = body_text(&response).await;

    if !response.ok() {
        return Err(ApiError::from_failure(response.status(), text.as_deref()));
    }

    let text = text.ok_or_else(|| ApiError::Decode("Empty response body".to_string()))?;
    serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
}

fn file_form(file: &SelectedFile) -> Result<FormData, JsValue> {
    let bytes = js_sys::Uint8Array::from(file.bytes.as_slice());
    let parts = js_sys::Array::of1(&bytes);

    let opts = BlobPropertyBag::new();
    opts.set_type(&file.mime_type);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &opts)?;

    let form = FormData::new()?;
    form.append_with_blob_and_filename("file", &blob, &file.name)?;
    Ok(form)
}

#[async_trait(?Send)]
impl ComplianceApi for FetchApi {
    async fn upload(&self, file: &SelectedFile) -> Result<UploadResult, ApiError> {
        let form = file_form(file).map_err(transport)?;
        // The browser sets the multipart boundary itself
        let response = post(&self.upload_url, &form, None).await?;
        decode(response).await
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResponse, ApiError> {
        let response = post_json(&self.analyze_url, request).await?;
        decode(response).await
    }

    async fn report(&self, request: &ReportRequest) -> Result<ReportResponse, ApiError> {
        let response = post_json(&self.report_url, request).await?;
        decode(response).await
    }
}
