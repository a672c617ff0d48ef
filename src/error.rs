// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Basecoat contributors

//! Error types for Basecoat

use thiserror::Error;

/// Result type alias for Basecoat operations
pub type Result<T> = std::result::Result<T, BasecoatError>;

/// Basecoat error types
#[derive(Error, Debug)]
pub enum BasecoatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    Filesystem(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Invalid analysis response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}
