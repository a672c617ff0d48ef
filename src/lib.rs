// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Basecoat contributors

//! Basecoat: AI-powered SEO image titler and batch renamer
//!
//! Scans a folder of images, asks Google Gemini for an SEO title and alt
//! text per image, and renames the files to slugified titles with
//! deterministic collision avoidance. The CLI in `main.rs` is the reference
//! front end; a GUI is expected to call the same entry points.

pub mod batch;
pub mod error;
pub mod gemini;
pub mod history;
pub mod naming;
pub mod rename;
pub mod settings;
pub mod tags;
pub mod thumbnail;

pub use error::{BasecoatError, Result};
pub use settings::Settings;
