use clap::{Parser, Subcommand};
use content_kit_server::kit::types::GenerationResult;
use content_kit_server::presenter::{self, CopyField, ImagePane, LoadingPhase, ViewState};
use content_kit_server::Config;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

#[derive(Parser, Debug)]
#[command(name = "kitctl", about = "CLI for the Content Kit Server", version)]
struct Cli {
    /// Override the server base URL (defaults to API_HOST/API_PORT)
    #[arg(global = true, long)]
    server_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a full publishing kit
    Generate {
        /// Topic or question the article should answer
        #[arg(long)]
        topic: String,
        /// Business type or industry
        #[arg(long)]
        business_type: String,
        /// Website URL for the contact section
        #[arg(long)]
        website_url: Option<String>,
        /// Booking/evaluation URL for the contact section
        #[arg(long)]
        booking_url: Option<String>,
        /// Phone number for the contact section
        #[arg(long)]
        phone: Option<String>,
        /// Image provider: none, openai, gemini, or gemini-imagen
        #[arg(long, default_value = "none")]
        image_provider: String,
        /// OpenAI API key (required for --image-provider openai)
        #[arg(long)]
        openai_key: Option<String>,
        /// Gemini API key (required for --image-provider gemini-imagen)
        #[arg(long)]
        user_gemini_key: Option<String>,
        /// Write the article markdown to this path
        #[arg(long, value_name = "PATH")]
        out_markdown: Option<PathBuf>,
        /// Write the article HTML to this path
        #[arg(long, value_name = "PATH")]
        out_html: Option<PathBuf>,
        /// Write the generated image to this path
        #[arg(long, value_name = "PATH")]
        out_image: Option<PathBuf>,
        /// Print the raw JSON response instead of formatted sections
        #[arg(long)]
        json: bool,
    },
    /// Re-run image generation for an existing prompt
    RegenerateImage {
        /// The image prompt to render
        #[arg(long)]
        image_prompt: String,
        /// Image provider: openai, gemini, or gemini-imagen
        #[arg(long)]
        image_provider: String,
        /// OpenAI API key (required for --image-provider openai)
        #[arg(long)]
        openai_key: Option<String>,
        /// Gemini API key (required for --image-provider gemini-imagen)
        #[arg(long)]
        user_gemini_key: Option<String>,
        /// Write the image to this path
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },
    /// Check server health and key configuration
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load env and parse CLI
    Config::dotenv_load();
    let cli = Cli::parse();

    let conf = Config::new().expect("Failed to load config");
    let server_url = cli
        .server_url
        .unwrap_or_else(|| format!("http://{}:{}", conf.api_host, conf.api_port));
    let server_url = server_url.trim_end_matches('/').to_string();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Generate {
            topic,
            business_type,
            website_url,
            booking_url,
            phone,
            image_provider,
            openai_key,
            user_gemini_key,
            out_markdown,
            out_html,
            out_image,
            json,
        } => {
            let image_requested = image_provider != "none";
            let body = json!({
                "topic": topic,
                "businessType": business_type,
                "websiteUrl": website_url,
                "bookingUrl": booking_url,
                "phone": phone,
                "imageProvider": image_provider,
                "openaiKey": openai_key,
                "userGeminiKey": user_gemini_key,
            });

            let mut phase = LoadingPhase::start();
            eprintln!("{}", phase.label());

            let response = client
                .post(format!("{}/api/generate", server_url))
                .json(&body)
                .send()
                .await?;
            if !response.status().is_success() {
                eprintln!("{}", error_body_message(response).await);
                std::process::exit(1);
            }

            if image_requested {
                phase = phase.advance(true);
                eprintln!("{}", phase.label());
            }
            phase = phase.advance(image_requested);
            eprintln!("{}", phase.label());

            let result: GenerationResult = response.json().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }

            render_result(&result, out_image.as_deref(), &client).await?;

            if let Some(path) = out_markdown {
                tokio::fs::write(&path, presenter::copy_text(&result, CopyField::Markdown))
                    .await?;
                eprintln!("Wrote markdown to {}", path.display());
            }
            if let Some(path) = out_html {
                tokio::fs::write(&path, presenter::copy_text(&result, CopyField::Html)).await?;
                eprintln!("Wrote HTML to {}", path.display());
            }
            Ok(())
        }
        Commands::RegenerateImage {
            image_prompt,
            image_provider,
            openai_key,
            user_gemini_key,
            out,
        } => {
            let body = json!({
                "imagePrompt": image_prompt,
                "imageProvider": image_provider,
                "openaiKey": openai_key,
                "userGeminiKey": user_gemini_key,
            });
            let response = client
                .post(format!("{}/api/regenerate-image", server_url))
                .json(&body)
                .send()
                .await?;
            if !response.status().is_success() {
                eprintln!("{}", error_body_message(response).await);
                std::process::exit(1);
            }
            let payload: Value = response.json().await?;
            let image_url = payload
                .get("imageUrl")
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            match out {
                Some(path) => {
                    write_image(&image_url, &path, &client).await?;
                    eprintln!("Wrote image to {}", path.display());
                }
                None => println!("{}", summarize_image_url(&image_url)),
            }
            Ok(())
        }
        Commands::Health => {
            let response = client
                .get(format!("{}/api/health", server_url))
                .send()
                .await?;
            let payload: Value = response.json().await?;
            println!("{}", serde_json::to_string_pretty(&payload)?);
            Ok(())
        }
    }
}

async fn render_result(
    result: &GenerationResult,
    out_image: Option<&Path>,
    client: &reqwest::Client,
) -> Result<(), Box<dyn std::error::Error>> {
    let view = ViewState::from_result(result);

    println!("=== Article (markdown) ===");
    println!("{}", presenter::copy_text(result, CopyField::Markdown));
    println!();
    println!("=== Medium copy ===");
    println!("{}", presenter::copy_text(result, CopyField::MediumCopy));
    println!();
    println!("=== LinkedIn copy ===");
    println!("{}", presenter::copy_text(result, CopyField::LinkedinCopy));
    println!();
    println!("=== Image ===");
    println!("Prompt: {}", result.image_prompt);
    match &view.image_pane {
        ImagePane::Image(url) => {
            println!("{}", summarize_image_url(url));
            if let Some(path) = out_image {
                write_image(url, path, client).await?;
                eprintln!("Wrote image to {}", path.display());
            }
        }
        pane => println!("{}", pane.message()),
    }
    Ok(())
}

/// Data URIs are too long to print; report the payload size instead.
fn summarize_image_url(url: &str) -> String {
    match url.split_once(";base64,") {
        Some((head, payload)) => format!("{};base64,<{} bytes>", head, payload.len()),
        None => url.to_string(),
    }
}

/// Write an image to disk from either a data URI or a hosted URL.
async fn write_image(
    url: &str,
    path: &Path,
    client: &reqwest::Client,
) -> Result<(), Box<dyn std::error::Error>> {
    let bytes = if let Some((_, payload)) = url.split_once(";base64,") {
        STANDARD.decode(payload)?
    } else {
        client.get(url).send().await?.bytes().await?.to_vec()
    };
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

async fn error_body_message(response: reqwest::Response) -> String {
    let status = response.status();
    let message = response
        .json::<Value>()
        .await
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(String::from))
        .unwrap_or_else(|| "request failed".to_string());
    format!("Error ({}): {}", status, message)
}
