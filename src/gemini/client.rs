//! Thin HTTP client for the Gemini generative-language endpoints.
//!
//! - `generate_text` posts to `models/<model>:generateContent` and returns
//!   the concatenated text parts of the first candidate.
//! - `generate_image` uses the same endpoint with the IMAGE response modality
//!   and normalizes inline bytes to a data URI.
//! - `generate_imagen` posts to `models/<model>:predict` (Imagen) and
//!   normalizes base64 predictions to a data URI.
//!
//! The API key travels in the request URL, so URLs are never logged; log
//! lines carry the model name instead.
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<&'static str>>,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    data: Option<String>,
}

#[derive(Serialize)]
struct PredictRequest<'a> {
    instances: Vec<ImagenInstance<'a>>,
    parameters: ImagenParameters,
}

#[derive(Serialize)]
struct ImagenInstance<'a> {
    prompt: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImagenParameters {
    sample_count: u32,
    aspect_ratio: &'static str,
}

#[derive(Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<ImagenPrediction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImagenPrediction {
    bytes_base64_encoded: Option<String>,
    mime_type: Option<String>,
}

impl GeminiClient {
    pub fn new(client: Client, base_url: String, api_key: String) -> Self {
        let base = base_url.trim_end_matches('/').to_string();
        GeminiClient {
            client,
            base_url: base,
            api_key,
        }
    }

    /// Generate text with fixed sampling parameters. The prompt is sent as a
    /// single user turn.
    pub async fn generate_text(
        &self,
        model: &str,
        prompt: &str,
        temperature: f32,
        max_output_tokens: u32,
    ) -> AppResult<String> {
        tracing::info!("Sending generateContent request to Gemini model {}", model);
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: Some(GenerationConfig {
                temperature: Some(temperature),
                max_output_tokens: Some(max_output_tokens),
                response_modalities: None,
            }),
        };

        let response: GenerateContentResponse =
            self.post_generate_content(model, &body).await?;

        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(AppError::Upstream(format!(
                "Gemini model {} returned no text content",
                model
            )));
        }
        Ok(text)
    }

    /// Generate an image inline. Returns `Ok(None)` when the model answered
    /// without inline image data; the caller decides how to report that.
    pub async fn generate_image(&self, model: &str, prompt: &str) -> AppResult<Option<String>> {
        tracing::info!("Sending image generateContent request to Gemini model {}", model);
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            generation_config: Some(GenerationConfig {
                temperature: None,
                max_output_tokens: None,
                response_modalities: Some(vec!["TEXT", "IMAGE"]),
            }),
        };

        let response: GenerateContentResponse =
            self.post_generate_content(model, &body).await?;

        let inline = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .into_iter()
            .flat_map(|content| content.parts)
            .filter_map(|p| p.inline_data)
            .find(|blob| blob.data.is_some());

        Ok(inline.map(|blob| {
            let mime = blob.mime_type.unwrap_or_else(|| "image/png".to_string());
            format!("data:{};base64,{}", mime, blob.data.unwrap_or_default())
        }))
    }

    /// Generate an image through the Imagen predict endpoint. Returns
    /// `Ok(None)` when no prediction carries image bytes.
    pub async fn generate_imagen(&self, model: &str, prompt: &str) -> AppResult<Option<String>> {
        tracing::info!("Sending predict request to Imagen model {}", model);
        let url = format!(
            "{}/models/{}:predict?key={}",
            self.base_url, model, self.api_key
        );
        let body = PredictRequest {
            instances: vec![ImagenInstance { prompt }],
            parameters: ImagenParameters {
                sample_count: 1,
                aspect_ratio: "1:1",
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(AppError::HttpClient)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            let message = format!(
                "Imagen request failed. Status: {}, Body: {}",
                status, error_body
            );
            tracing::error!("{}", message);
            return Err(AppError::Upstream(message));
        }

        let parsed: PredictResponse = response.json().await.map_err(AppError::HttpClient)?;
        let prediction = parsed
            .predictions
            .into_iter()
            .find(|p| p.bytes_base64_encoded.is_some());

        Ok(prediction.map(|p| {
            let mime = p.mime_type.unwrap_or_else(|| "image/png".to_string());
            format!("data:{};base64,{}", mime, p.bytes_base64_encoded.unwrap_or_default())
        }))
    }

    async fn post_generate_content(
        &self,
        model: &str,
        body: &GenerateContentRequest<'_>,
    ) -> AppResult<GenerateContentResponse> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, model, self.api_key
        );
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(AppError::HttpClient)?;

        if response.status().is_success() {
            response.json().await.map_err(AppError::HttpClient)
        } else {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());
            let message = format!(
                "Gemini request failed. Status: {}, Body: {}",
                status, error_body
            );
            tracing::error!("{}", message);
            Err(AppError::Upstream(message))
        }
    }
}
