//! Thin HTTP client for the OpenAI image-generation endpoint.
//!
//! The response body is parsed regardless of the HTTP status: OpenAI reports
//! request problems as an `error` object in the body, and that message is
//! what the caller surfaces to the user.
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct ImagesRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u32,
    size: &'a str,
    quality: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ImagesResponse {
    #[serde(default)]
    pub data: Vec<GeneratedImage>,
    pub error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
pub struct GeneratedImage {
    pub url: Option<String>,
    pub b64_json: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    pub message: String,
}

impl OpenAiClient {
    pub fn new(client: Client, base_url: String, api_key: String) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        OpenAiClient {
            client,
            base_url: base,
            api_key,
        }
    }

    /// Request a single image at 1024x1024. `quality` is the OpenAI quality
    /// tier ("standard" or "hd").
    pub async fn generate_image(
        &self,
        model: &str,
        prompt: &str,
        quality: &str,
    ) -> AppResult<ImagesResponse> {
        tracing::info!("Sending images request to OpenAI model {}", model);
        let url = format!("{}/images/generations", self.base_url);
        let body = ImagesRequest {
            model,
            prompt,
            n: 1,
            size: "1024x1024",
            quality,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(AppError::HttpClient)?;

        response.json().await.map_err(AppError::HttpClient)
    }
}
