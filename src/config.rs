//! Env-driven configuration for the service and library.
//!
//! Values are read from the process environment; `dotenv` is loaded on demand
//! by the binaries. Defaults are provided for convenience during development.
//! Model identifiers are configuration rather than code so the text and image
//! paths can be repointed without a rebuild.
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// Server-side Gemini secret. Optional at startup; endpoints that need it
    /// report its absence per request.
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub openai_base_url: String,
    pub gemini_text_model: String,
    pub gemini_image_model: String,
    pub gemini_imagen_model: String,
    pub openai_image_model: String,
    pub api_host: String,
    pub api_port: String,
}

impl Config {
    pub fn dotenv_load() {
        dotenv::dotenv().ok();
    }

    pub fn new() -> Result<Self, env::VarError> {
        Ok(Config {
            gemini_api_key: env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".to_string()),
            openai_base_url: env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            gemini_text_model: env::var("GEMINI_TEXT_MODEL")
                .unwrap_or_else(|_| "gemini-2.0-flash".to_string()),
            gemini_image_model: env::var("GEMINI_IMAGE_MODEL")
                .unwrap_or_else(|_| "gemini-2.5-flash".to_string()),
            gemini_imagen_model: env::var("GEMINI_IMAGEN_MODEL")
                .unwrap_or_else(|_| "imagen-3.0-generate-002".to_string()),
            openai_image_model: env::var("OPENAI_IMAGE_MODEL")
                .unwrap_or_else(|_| "dall-e-3".to_string()),
            api_host: env::var("API_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            api_port: env::var("API_PORT").unwrap_or_else(|_| "8189".to_string()),
        })
    }

    pub fn print_env_vars() {
        // The secret itself never reaches stdout or the logs.
        println!(
            "GEMINI_API_KEY: {}",
            if env::var("GEMINI_API_KEY").map(|k| !k.is_empty()).unwrap_or(false) {
                "<set>"
            } else {
                "<unset>"
            }
        );
        println!("GEMINI_BASE_URL: {}", env::var("GEMINI_BASE_URL").unwrap_or_else(|_| "<unset>".to_string()));
        println!("OPENAI_BASE_URL: {}", env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "<unset>".to_string()));
        println!("GEMINI_TEXT_MODEL: {}", env::var("GEMINI_TEXT_MODEL").unwrap_or_else(|_| "<unset>".to_string()));
        println!("GEMINI_IMAGE_MODEL: {}", env::var("GEMINI_IMAGE_MODEL").unwrap_or_else(|_| "<unset>".to_string()));
        println!("GEMINI_IMAGEN_MODEL: {}", env::var("GEMINI_IMAGEN_MODEL").unwrap_or_else(|_| "<unset>".to_string()));
        println!("OPENAI_IMAGE_MODEL: {}", env::var("OPENAI_IMAGE_MODEL").unwrap_or_else(|_| "<unset>".to_string()));
        println!("API_HOST: {}", env::var("API_HOST").unwrap_or_else(|_| "<unset>".to_string()));
        println!("API_PORT: {}", env::var("API_PORT").unwrap_or_else(|_| "<unset>".to_string()));
    }
}
