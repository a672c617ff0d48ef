// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Basecoat contributors

//! Google Gemini API client for image analysis

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use image::GenericImageView;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::{BasecoatError, Result, Settings};

/// Longest image side sent to the API; larger images are downscaled first
const MAX_UPLOAD_PX: u32 = 1024;

/// SEO title and alt text generated for one image
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Caption {
    pub title: String,
    pub alt_text: String,
}

/// Seam between the batch processor and the analysis backend.
///
/// Lets tests substitute a scripted analyzer for the real API client.
#[async_trait]
pub trait ImageAnalysis: Send + Sync {
    /// Analyze one image, optionally steered by enabled context-tag labels
    async fn analyze(&self, path: &Path, tags: &[String]) -> Result<Caption>;
}

/// Gemini REST API client
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum Part {
    Text(String),
    InlineData(InlineData),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Deserialize)]
struct ResponseCandidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

#[derive(Deserialize)]
struct ModelInfo {
    name: String,
}

impl GeminiClient {
    /// Create a new client. Fails with an authentication error when no API
    /// key is configured, so a batch never starts without one.
    pub fn new(settings: &Settings) -> Result<Self> {
        if !settings.has_key() {
            return Err(BasecoatError::Auth(
                "No Gemini API key configured. Set one with: basecoat config set-key".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Ok(Self {
            client,
            api_key: settings.api_key.trim().to_string(),
            model: settings.model.clone(),
            base_url: settings.endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// List model names visible to the configured key
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/models", self.base_url);

        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(BasecoatError::Auth(format!(
                "Gemini rejected the API key (status {})",
                status
            )));
        }
        if !status.is_success() {
            return Err(BasecoatError::InvalidResponse(format!(
                "Gemini returned status {}",
                status
            )));
        }

        let models: ModelsResponse = response.json().await?;
        Ok(models.models.into_iter().map(|m| m.name).collect())
    }

    /// Whether the configured vision model is visible to the key
    pub async fn model_available(&self) -> Result<bool> {
        let models = self.list_models().await?;
        Ok(models
            .iter()
            .any(|m| m.trim_start_matches("models/") == self.model))
    }

    /// Read the image and prepare the upload payload.
    ///
    /// Large images are downscaled and re-encoded as JPEG to keep requests
    /// small; anything the image crate cannot decode is sent as-is with a
    /// guessed mime type and left for the API to judge.
    fn prepare_payload(path: &Path) -> Result<(String, Vec<u8>)> {
        if let Ok(img) = image::open(path) {
            if img.width() > MAX_UPLOAD_PX || img.height() > MAX_UPLOAD_PX {
                let img = img.resize(
                    MAX_UPLOAD_PX,
                    MAX_UPLOAD_PX,
                    image::imageops::FilterType::Triangle,
                );
                let mut buffer = Vec::new();
                let mut cursor = std::io::Cursor::new(&mut buffer);
                img.write_to(&mut cursor, image::ImageFormat::Jpeg)?;
                return Ok(("image/jpeg".to_string(), buffer));
            }
        }

        let mime = mime_guess::from_path(path)
            .first_or(mime_guess::mime::IMAGE_JPEG)
            .to_string();
        Ok((mime, std::fs::read(path)?))
    }
}

#[async_trait]
impl ImageAnalysis for GeminiClient {
    async fn analyze(&self, path: &Path, tags: &[String]) -> Result<Caption> {
        let (mime, data) = Self::prepare_payload(path)?;
        let encoded = general_purpose::STANDARD.encode(&data);

        let request = GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![
                    Part::Text(build_prompt(tags)),
                    Part::InlineData(InlineData {
                        mime_type: mime,
                        data: encoded,
                    }),
                ],
            }],
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        debug!("Sending vision request to Gemini: model={}", self.model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(BasecoatError::Auth(format!(
                "Gemini rejected the API key (status {})",
                status
            )));
        }
        if !status.is_success() {
            return Err(BasecoatError::InvalidResponse(format!(
                "Gemini returned status {}",
                status
            )));
        }

        let raw = response.text().await?;
        let body: GenerateResponse = serde_json::from_str(&raw).map_err(|e| {
            BasecoatError::InvalidResponse(format!("Undecodable response body: {}", e))
        })?;
        let text = response_text(&body)?;
        parse_caption(&text)
    }
}

/// Build the analysis prompt, with a context hint when tags are enabled
pub fn build_prompt(tags: &[String]) -> String {
    let mut prompt = String::from(
        "You are an SEO specialist for painting companies across the US. \
         Analyze this image and return ONLY a JSON object with two keys:\n\
         \"title\": A short, SEO-friendly title (2-5 words) suitable as a web page title \
         and filename. Use title case. Examples: 'Exterior House Painting', \
         'Interior Door Painting', 'White Brick Exterior Home Painting'.\n\
         \"alt_text\": An SEO-optimized alt text description under 125 characters. \
         Be descriptive of colors, setting, and objects. Naturally include \
         painting/staining related keywords.\n\n\
         Rules:\n\
         - Analyze the VISUAL content, not the filename.\n\
         - Title should work as a filename (no special characters besides spaces).\n\
         - Alt text must be under 125 characters.\n\
         - Return ONLY valid JSON, no markdown, no explanation.",
    );

    if !tags.is_empty() {
        prompt.push_str(&format!(
            "\n\nContext: This image is from a painting company's portfolio. \
             The likely categories are: {}. \
             Use these as SEO keyword hints if they match the visual content.",
            tags.join(", ")
        ));
    }

    prompt
}

/// Concatenate the text parts of the first candidate
fn response_text(response: &GenerateResponse) -> Result<String> {
    let candidate = response
        .candidates
        .first()
        .ok_or_else(|| BasecoatError::InvalidResponse("No candidates in response".to_string()))?;

    let text: String = candidate
        .content
        .parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect();

    if text.is_empty() {
        return Err(BasecoatError::InvalidResponse(
            "Response contains no text".to_string(),
        ));
    }

    Ok(text)
}

/// Parse model output into a [`Caption`], tolerating markdown code fences.
///
/// Anything that does not decode to the expected two fields, or decodes
/// with an empty title, is an invalid response.
pub fn parse_caption(text: &str) -> Result<Caption> {
    let cleaned = strip_code_fences(text.trim());

    let caption: Caption = serde_json::from_str(cleaned).map_err(|e| {
        BasecoatError::InvalidResponse(format!("Expected {{title, alt_text}} JSON: {}", e))
    })?;

    if caption.title.trim().is_empty() {
        return Err(BasecoatError::InvalidResponse(
            "Response title is empty".to_string(),
        ));
    }

    Ok(caption)
}

fn strip_code_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim_start()
        .strip_suffix("```")
        .unwrap_or(rest)
        .trim()
}
