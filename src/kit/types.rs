//! Wire types for the generation endpoints.
//!
//! Field names are camelCase on the wire. Required-ness is enforced by the
//! orchestrators rather than the deserializer so that a missing field yields
//! a structured 400 instead of a body rejection.
use serde::{Deserialize, Serialize};

/// Image-generation provider selection. Each non-`None` variant implies a
/// credential source: `Gemini` uses the server-side secret, `Openai` and
/// `GeminiImagen` use request-supplied keys. Unknown strings deserialize to
/// `None` rather than rejecting the request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageProvider {
    Openai,
    Gemini,
    GeminiImagen,
    #[default]
    #[serde(other)]
    None,
}

/// Body of `POST /api/generate`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub topic: Option<String>,
    pub business_type: Option<String>,
    pub website_url: Option<String>,
    pub booking_url: Option<String>,
    pub phone: Option<String>,
    pub openai_key: Option<String>,
    pub user_gemini_key: Option<String>,
    #[serde(default)]
    pub image_provider: ImageProvider,
}

impl GenerationRequest {
    pub fn topic(&self) -> Option<&str> {
        non_empty(&self.topic)
    }

    pub fn business_type(&self) -> Option<&str> {
        non_empty(&self.business_type)
    }

    pub fn website_url(&self) -> Option<&str> {
        non_empty(&self.website_url)
    }

    pub fn booking_url(&self) -> Option<&str> {
        non_empty(&self.booking_url)
    }

    pub fn phone(&self) -> Option<&str> {
        non_empty(&self.phone)
    }

    pub fn openai_key(&self) -> Option<&str> {
        non_empty(&self.openai_key)
    }

    pub fn user_gemini_key(&self) -> Option<&str> {
        non_empty(&self.user_gemini_key)
    }
}

/// Body of `POST /api/regenerate-image`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegenerateRequest {
    pub image_prompt: Option<String>,
    #[serde(default)]
    pub image_provider: ImageProvider,
    pub openai_key: Option<String>,
    pub user_gemini_key: Option<String>,
}

impl RegenerateRequest {
    pub fn image_prompt(&self) -> Option<&str> {
        non_empty(&self.image_prompt)
    }

    pub fn openai_key(&self) -> Option<&str> {
        non_empty(&self.openai_key)
    }

    pub fn user_gemini_key(&self) -> Option<&str> {
        non_empty(&self.user_gemini_key)
    }
}

/// The four-field kit the text model is instructed to emit as one JSON
/// object. Parsed once per request and immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentKit {
    pub article_markdown: String,
    pub image_prompt: String,
    pub medium_copy: String,
    pub linkedin_copy: String,
}

/// Aggregated payload of `POST /api/generate`. `image_url` and `image_error`
/// are mutually exclusive; both stay null when no generation was attempted.
/// The nulls are serialized explicitly so the response shape is stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub success: bool,
    pub article_markdown: String,
    pub article_html: String,
    pub image_prompt: String,
    pub image_url: Option<String>,
    pub image_error: Option<String>,
    pub medium_copy: String,
    pub linkedin_copy: String,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_provider_uses_kebab_case_names() {
        let p: ImageProvider = serde_json::from_str("\"gemini-imagen\"").unwrap();
        assert_eq!(p, ImageProvider::GeminiImagen);
        let p: ImageProvider = serde_json::from_str("\"openai\"").unwrap();
        assert_eq!(p, ImageProvider::Openai);
    }

    #[test]
    fn unknown_provider_degrades_to_none() {
        let p: ImageProvider = serde_json::from_str("\"stable-diffusion\"").unwrap();
        assert_eq!(p, ImageProvider::None);
    }

    #[test]
    fn absent_provider_defaults_to_none() {
        let req: GenerationRequest =
            serde_json::from_str(r#"{"topic":"T","businessType":"B"}"#).unwrap();
        assert_eq!(req.image_provider, ImageProvider::None);
        assert_eq!(req.topic(), Some("T"));
        assert_eq!(req.business_type(), Some("B"));
    }

    #[test]
    fn blank_fields_read_as_absent() {
        let req: GenerationRequest =
            serde_json::from_str(r#"{"topic":"  ","websiteUrl":""}"#).unwrap();
        assert_eq!(req.topic(), None);
        assert_eq!(req.website_url(), None);
    }

    #[test]
    fn result_serializes_explicit_nulls() {
        let result = GenerationResult {
            success: true,
            article_markdown: "md".to_string(),
            article_html: "<div></div>".to_string(),
            image_prompt: "prompt".to_string(),
            image_url: None,
            image_error: None,
            medium_copy: "m".to_string(),
            linkedin_copy: "l".to_string(),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("imageUrl").unwrap().is_null());
        assert!(json.get("imageError").unwrap().is_null());
        assert_eq!(json.get("articleMarkdown").unwrap(), "md");
    }
}
