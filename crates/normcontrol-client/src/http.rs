//! reqwest-backed implementation of the compliance service API

use std::time::Duration;

use async_trait::async_trait;
use normcontrol_types::{
    AnalysisResponse, AnalyzeRequest, ReportRequest, ReportResponse, UploadResult,
};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::ComplianceApi;
use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::validation::SelectedFile;

/// HTTP client for the three service endpoints
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    upload_url: String,
    analyze_url: String,
    report_url: String,
}

impl HttpApi {
    pub fn new(config: &ServerConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(ms) = config.request_timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let client = builder.build().map_err(transport)?;

        Ok(Self {
            client,
            upload_url: config.upload_url(),
            analyze_url: config.analyze_url(),
            report_url: config.report_url(),
        })
    }
}

#[async_trait(?Send)]
impl ComplianceApi for HttpApi {
    async fn upload(&self, file: &SelectedFile) -> Result<UploadResult, ApiError> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(transport)?;
        let form = Form::new().part("file", part);

        debug!("POST {} ({} bytes)", self.upload_url, file.size());
        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(transport)?;

        decode(response).await
    }

    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisResponse, ApiError> {
        debug!("POST {} file_id={}", self.analyze_url, request.file_id);
        let response = self
            .client
            .post(&self.analyze_url)
            .json(request)
            .send()
            .await
            .map_err(transport)?;

        decode(response).await
    }

    async fn report(&self, request: &ReportRequest) -> Result<ReportResponse, ApiError> {
        debug!("POST {}", self.report_url);
        let response = self
            .client
            .post(&self.report_url)
            .json(request)
            .send()
            .await
            .map_err(transport)?;

        decode(response).await
    }
}

fn transport(err: reqwest::Error) -> ApiError {
    ApiError::Transport(err.to_string())
}

/// Decode a success body, or capture the status and `error` field of a failure
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.ok();
        return Err(ApiError::from_failure(status.as_u16(), body.as_deref()));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}
