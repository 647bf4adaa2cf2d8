//! Generation orchestration: text call, response parsing, image dispatch,
//! and aggregation into the response payload.
//!
//! Two flows share the image dispatch: `generate` treats image failures as
//! soft (reported inside a successful payload), `regenerate` treats them as
//! request failures.
use crate::api::routes::AppState;
use crate::error::{AppError, AppResult};
use crate::gemini::client::GeminiClient;
use crate::kit::types::{
    ContentKit, GenerationRequest, GenerationResult, ImageProvider, RegenerateRequest,
};
use crate::markdown;
use crate::openai::client::OpenAiClient;
use crate::prompt::builder::PromptBuilder;

const TEXT_TEMPERATURE: f32 = 0.7;
const TEXT_MAX_OUTPUT_TOKENS: u32 = 4096;

/// Appended to every model-produced image prompt before dispatch.
const STYLE_SUFFIX: &str =
    "The style should be professional, high-quality, suitable for a business blog.";

const MISSING_REQUIRED_FIELDS: &str = "Topic and Business Type are required";
const MISSING_SERVER_KEY: &str = "Gemini API key not configured on server";

/// Resolved image dispatch decision. Each variant carries the credential and
/// model identifier it needs, so the per-provider requirements live in the
/// type rather than in branch conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePlan {
    Skip,
    Gemini { api_key: String, model: String },
    GeminiImagen { api_key: String, model: String },
    OpenAi { api_key: String, model: String },
}

impl ImagePlan {
    /// Resolution for the main generation flow: a requested provider without
    /// its credential quietly resolves to `Skip` (no attempt is not an
    /// error).
    pub fn for_generation(request: &GenerationRequest, config: &crate::Config) -> Self {
        match request.image_provider {
            ImageProvider::None => ImagePlan::Skip,
            ImageProvider::Gemini => match &config.gemini_api_key {
                Some(key) => ImagePlan::Gemini {
                    api_key: key.clone(),
                    model: config.gemini_image_model.clone(),
                },
                None => ImagePlan::Skip,
            },
            ImageProvider::GeminiImagen => match request.user_gemini_key() {
                Some(key) => ImagePlan::GeminiImagen {
                    api_key: key.to_string(),
                    model: config.gemini_imagen_model.clone(),
                },
                None => ImagePlan::Skip,
            },
            ImageProvider::Openai => match request.openai_key() {
                Some(key) => ImagePlan::OpenAi {
                    api_key: key.to_string(),
                    model: config.openai_image_model.clone(),
                },
                None => ImagePlan::Skip,
            },
        }
    }

    /// Resolution for standalone regeneration: a missing credential is a
    /// request failure. The server-side secret is an operator problem
    /// (`Config`); request-supplied keys are client-correctable
    /// (`Validation`).
    pub fn for_regeneration(
        request: &RegenerateRequest,
        config: &crate::Config,
    ) -> AppResult<Self> {
        match request.image_provider {
            ImageProvider::None => Err(AppError::Validation(
                "Please select an image provider".to_string(),
            )),
            ImageProvider::Gemini => {
                let key = config
                    .gemini_api_key
                    .clone()
                    .ok_or_else(|| AppError::Config(MISSING_SERVER_KEY.to_string()))?;
                Ok(ImagePlan::Gemini {
                    api_key: key,
                    model: config.gemini_image_model.clone(),
                })
            }
            ImageProvider::GeminiImagen => {
                let key = request.user_gemini_key().ok_or_else(|| {
                    AppError::Validation(
                        "A Gemini API key is required for the gemini-imagen provider".to_string(),
                    )
                })?;
                Ok(ImagePlan::GeminiImagen {
                    api_key: key.to_string(),
                    model: config.gemini_imagen_model.clone(),
                })
            }
            ImageProvider::Openai => {
                let key = request.openai_key().ok_or_else(|| {
                    AppError::Validation(
                        "An OpenAI API key is required for the openai provider".to_string(),
                    )
                })?;
                Ok(ImagePlan::OpenAi {
                    api_key: key.to_string(),
                    model: config.openai_image_model.clone(),
                })
            }
        }
    }
}

/// Normalized result of executing an image plan: exactly one of a usable URL
/// or a provider-reported failure, or nothing attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageOutcome {
    Skipped,
    Generated(String),
    Failed(String),
}

/// Run the full generation pipeline for one request.
pub async fn generate(
    state: &AppState,
    request: GenerationRequest,
) -> AppResult<GenerationResult> {
    let topic = request
        .topic()
        .ok_or_else(|| AppError::Validation(MISSING_REQUIRED_FIELDS.to_string()))?;
    let business_type = request
        .business_type()
        .ok_or_else(|| AppError::Validation(MISSING_REQUIRED_FIELDS.to_string()))?;
    let gemini = state
        .gemini
        .as_ref()
        .ok_or_else(|| AppError::Config(MISSING_SERVER_KEY.to_string()))?;

    tracing::info!(
        topic,
        business_type,
        provider = ?request.image_provider,
        "generating content kit"
    );

    let prompts = PromptBuilder::new().build(&request);
    let raw = gemini
        .generate_text(
            &state.config.gemini_text_model,
            &prompts.combined(),
            TEXT_TEMPERATURE,
            TEXT_MAX_OUTPUT_TOKENS,
        )
        .await?;
    let kit = parse_content_kit(&raw)?;

    // The model occasionally omits the prompt; nothing to dispatch then.
    let plan = if kit.image_prompt.is_empty() {
        ImagePlan::Skip
    } else {
        ImagePlan::for_generation(&request, &state.config)
    };

    let outcome = match run_image_plan(state, plan, &kit.image_prompt, "standard").await {
        Ok(outcome) => outcome,
        // Image failures never fail the kit; they ride along as a message.
        Err(e) => {
            tracing::error!(error = %e, "image generation failed");
            ImageOutcome::Failed(format!("Failed to generate image: {}", e))
        }
    };
    let (image_url, image_error) = match outcome {
        ImageOutcome::Skipped => (None, None),
        ImageOutcome::Generated(url) => (Some(url), None),
        ImageOutcome::Failed(message) => (None, Some(message)),
    };

    let article_html = markdown::render(&kit.article_markdown);

    Ok(GenerationResult {
        success: true,
        article_markdown: kit.article_markdown,
        article_html,
        image_prompt: kit.image_prompt,
        image_url,
        image_error,
        medium_copy: kit.medium_copy,
        linkedin_copy: kit.linkedin_copy,
    })
}

/// Re-run image generation for an existing prompt. Unlike `generate`, a
/// provider-reported failure here is a hard, client-visible error.
pub async fn regenerate(state: &AppState, request: RegenerateRequest) -> AppResult<String> {
    let image_prompt = request
        .image_prompt()
        .ok_or_else(|| AppError::Validation("Image prompt is required".to_string()))?
        .to_string();
    let plan = ImagePlan::for_regeneration(&request, &state.config)?;

    tracing::info!(provider = ?request.image_provider, "regenerating image");

    match run_image_plan(state, plan, &image_prompt, "hd").await? {
        ImageOutcome::Generated(url) => Ok(url),
        ImageOutcome::Failed(message) => Err(AppError::Provider(message)),
        ImageOutcome::Skipped => Err(AppError::Validation(
            "Please select an image provider".to_string(),
        )),
    }
}

/// Parse the raw model output as the kit JSON. Two stages: the trimmed text
/// directly, then the contents of the first fenced code block. Anything else
/// is a parse failure; the caller must not continue to image generation.
pub fn parse_content_kit(raw: &str) -> AppResult<ContentKit> {
    let trimmed = raw.trim();
    match serde_json::from_str(trimmed) {
        Ok(kit) => Ok(kit),
        Err(direct_err) => {
            let Some(inner) = extract_fenced_block(trimmed) else {
                return Err(AppError::Parse(format!(
                    "Failed to parse AI response as JSON: {}",
                    direct_err
                )));
            };
            serde_json::from_str(inner.trim()).map_err(|e| {
                AppError::Parse(format!("Failed to parse AI response as JSON: {}", e))
            })
        }
    }
}

/// Contents of the first triple-backtick fence, tolerating an optional
/// `json` language tag.
fn extract_fenced_block(raw: &str) -> Option<&str> {
    let start = raw.find("```")?;
    let mut body = &raw[start + 3..];
    if let Some(rest) = body.strip_prefix("json") {
        body = rest;
    }
    let end = body.find("```")?;
    Some(&body[..end])
}

/// Execute a resolved plan. `Err` means transport or endpoint failure;
/// `Failed` means the provider answered but produced no usable image. The
/// two flows map these differently.
async fn run_image_plan(
    state: &AppState,
    plan: ImagePlan,
    image_prompt: &str,
    openai_quality: &str,
) -> AppResult<ImageOutcome> {
    let styled = format!("{}. {}", image_prompt, STYLE_SUFFIX);
    match plan {
        ImagePlan::Skip => Ok(ImageOutcome::Skipped),
        ImagePlan::Gemini { api_key, model } => {
            let client = GeminiClient::new(
                state.http.clone(),
                state.config.gemini_base_url.clone(),
                api_key,
            );
            Ok(match client.generate_image(&model, &styled).await? {
                Some(url) => ImageOutcome::Generated(url),
                None => ImageOutcome::Failed(
                    "Gemini did not return an image. Try a different prompt.".to_string(),
                ),
            })
        }
        ImagePlan::GeminiImagen { api_key, model } => {
            let client = GeminiClient::new(
                state.http.clone(),
                state.config.gemini_base_url.clone(),
                api_key,
            );
            Ok(match client.generate_imagen(&model, &styled).await? {
                Some(url) => ImageOutcome::Generated(url),
                None => ImageOutcome::Failed(
                    "Gemini Imagen did not return an image. Try a different prompt.".to_string(),
                ),
            })
        }
        ImagePlan::OpenAi { api_key, model } => {
            let client = OpenAiClient::new(
                state.http.clone(),
                state.config.openai_base_url.clone(),
                api_key,
            );
            let response = client
                .generate_image(&model, &styled, openai_quality)
                .await?;
            if let Some(error) = response.error {
                return Ok(ImageOutcome::Failed(error.message));
            }
            let outcome = response
                .data
                .into_iter()
                .next()
                .and_then(|image| match (image.url, image.b64_json) {
                    (Some(url), _) => Some(ImageOutcome::Generated(url)),
                    (None, Some(b64)) => Some(ImageOutcome::Generated(format!(
                        "data:image/png;base64,{}",
                        b64
                    ))),
                    (None, None) => None,
                });
            Ok(outcome.unwrap_or_else(|| {
                ImageOutcome::Failed(
                    "OpenAI did not return an image. Try a different prompt.".to_string(),
                )
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    fn test_config(gemini_key: Option<&str>) -> Config {
        Config {
            gemini_api_key: gemini_key.map(String::from),
            gemini_base_url: "https://gemini.test/v1beta".to_string(),
            openai_base_url: "https://openai.test/v1".to_string(),
            gemini_text_model: "text-model".to_string(),
            gemini_image_model: "flash-image-model".to_string(),
            gemini_imagen_model: "imagen-model".to_string(),
            openai_image_model: "openai-image-model".to_string(),
            api_host: "127.0.0.1".to_string(),
            api_port: "0".to_string(),
        }
    }

    const KIT_JSON: &str = r##"{
        "articleMarkdown": "# Title",
        "imagePrompt": "a storefront at dusk",
        "mediumCopy": "TITLE: T",
        "linkedinCopy": "post"
    }"##;

    #[test]
    fn parses_bare_json() {
        let kit = parse_content_kit(KIT_JSON).unwrap();
        assert_eq!(kit.article_markdown, "# Title");
        assert_eq!(kit.image_prompt, "a storefront at dusk");
    }

    #[test]
    fn parses_fenced_json_identically() {
        let fenced = format!("```json\n{}\n```", KIT_JSON);
        let tagged = parse_content_kit(&fenced).unwrap();
        let bare = parse_content_kit(KIT_JSON).unwrap();
        assert_eq!(tagged.article_markdown, bare.article_markdown);
        assert_eq!(tagged.linkedin_copy, bare.linkedin_copy);
    }

    #[test]
    fn parses_untagged_fence() {
        let fenced = format!("Here is your kit:\n```\n{}\n```", KIT_JSON);
        assert!(parse_content_kit(&fenced).is_ok());
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let err = parse_content_kit("I'm sorry, I can't produce JSON today.").unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }

    #[test]
    fn fence_with_garbage_inside_is_a_parse_error() {
        let err = parse_content_kit("```json\nnot json\n```").unwrap_err();
        assert!(matches!(err, AppError::Parse(_)));
    }

    #[test]
    fn generation_plan_skips_without_credential() {
        let config = test_config(Some("server-key"));
        let request = GenerationRequest {
            image_provider: ImageProvider::Openai,
            ..Default::default()
        };
        assert_eq!(ImagePlan::for_generation(&request, &config), ImagePlan::Skip);

        let request = GenerationRequest {
            image_provider: ImageProvider::GeminiImagen,
            ..Default::default()
        };
        assert_eq!(ImagePlan::for_generation(&request, &config), ImagePlan::Skip);
    }

    #[test]
    fn generation_plan_skips_gemini_without_server_key() {
        let config = test_config(None);
        let request = GenerationRequest {
            image_provider: ImageProvider::Gemini,
            ..Default::default()
        };
        assert_eq!(ImagePlan::for_generation(&request, &config), ImagePlan::Skip);
    }

    #[test]
    fn generation_plan_carries_configured_models() {
        let config = test_config(Some("server-key"));
        let request = GenerationRequest {
            image_provider: ImageProvider::Gemini,
            ..Default::default()
        };
        assert_eq!(
            ImagePlan::for_generation(&request, &config),
            ImagePlan::Gemini {
                api_key: "server-key".to_string(),
                model: "flash-image-model".to_string(),
            }
        );

        let request = GenerationRequest {
            image_provider: ImageProvider::Openai,
            openai_key: Some("sk-user".to_string()),
            ..Default::default()
        };
        assert_eq!(
            ImagePlan::for_generation(&request, &config),
            ImagePlan::OpenAi {
                api_key: "sk-user".to_string(),
                model: "openai-image-model".to_string(),
            }
        );
    }

    #[test]
    fn provider_none_never_plans_an_attempt() {
        let config = test_config(Some("server-key"));
        let request = GenerationRequest {
            openai_key: Some("sk-user".to_string()),
            user_gemini_key: Some("user-gemini".to_string()),
            ..Default::default()
        };
        assert_eq!(ImagePlan::for_generation(&request, &config), ImagePlan::Skip);
    }

    #[test]
    fn regeneration_rejects_provider_none() {
        let config = test_config(Some("server-key"));
        let request = RegenerateRequest::default();
        let err = ImagePlan::for_regeneration(&request, &config).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn regeneration_missing_server_key_is_config_error() {
        let config = test_config(None);
        let request = RegenerateRequest {
            image_provider: ImageProvider::Gemini,
            ..Default::default()
        };
        let err = ImagePlan::for_regeneration(&request, &config).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn regeneration_missing_user_key_is_validation_error() {
        let config = test_config(Some("server-key"));
        for provider in [ImageProvider::Openai, ImageProvider::GeminiImagen] {
            let request = RegenerateRequest {
                image_provider: provider,
                ..Default::default()
            };
            let err = ImagePlan::for_regeneration(&request, &config).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
    }

    #[test]
    fn regeneration_resolves_with_credentials() {
        let config = test_config(Some("server-key"));
        let request = RegenerateRequest {
            image_provider: ImageProvider::GeminiImagen,
            user_gemini_key: Some("user-gemini".to_string()),
            ..Default::default()
        };
        assert_eq!(
            ImagePlan::for_regeneration(&request, &config).unwrap(),
            ImagePlan::GeminiImagen {
                api_key: "user-gemini".to_string(),
                model: "imagen-model".to_string(),
            }
        );
    }
}
