// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Basecoat contributors

//! Small JPEG previews for result rows

use std::path::Path;

use crate::Result;

/// Default preview edge length in pixels
pub const DEFAULT_MAX_PX: u32 = 80;

/// Render a JPEG preview of the image, at most `max_px` on the longest side
pub fn render(path: &Path, max_px: u32) -> Result<Vec<u8>> {
    let img = image::open(path)?;
    let thumb = img.thumbnail(max_px, max_px);

    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    // JPEG has no alpha channel
    thumb
        .into_rgb8()
        .write_to(&mut cursor, image::ImageFormat::Jpeg)?;

    Ok(buffer)
}

/// Write a preview next to `out_dir`, named after the image's stem
pub fn write_preview(path: &Path, out_dir: &Path, max_px: u32) -> Result<std::path::PathBuf> {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("preview");
    let out_path = out_dir.join(format!("{}.jpg", stem));
    std::fs::write(&out_path, render(path, max_px)?)?;
    Ok(out_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    #[test]
    fn render_fits_within_bounds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.png");
        image::RgbImage::from_pixel(400, 200, image::Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();

        let bytes = render(&path, DEFAULT_MAX_PX).unwrap();
        let thumb = image::load_from_memory(&bytes).unwrap();
        let (w, h) = thumb.dimensions();
        assert!(w <= DEFAULT_MAX_PX && h <= DEFAULT_MAX_PX);
        // Aspect ratio preserved (2:1)
        assert_eq!(w, 80);
        assert_eq!(h, 40);
    }

    #[test]
    fn write_preview_names_after_the_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("porch.png");
        image::RgbImage::from_pixel(16, 16, image::Rgb([1, 2, 3]))
            .save(&path)
            .unwrap();

        let out = write_preview(&path, dir.path(), DEFAULT_MAX_PX).unwrap();
        assert!(out.ends_with("porch.jpg"));
        assert!(out.exists());
    }

    #[test]
    fn undecodable_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.jpg");
        std::fs::write(&path, b"not an image").unwrap();

        assert!(render(&path, DEFAULT_MAX_PX).is_err());
    }
}
