// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Basecoat contributors

//! Slugification and filename collision resolution
//!
//! Both are deterministic: `slugify` is a pure function, and the resolver
//! always returns the same final name for the same directory contents and
//! reservation set.

use std::collections::HashSet;
use std::io;
use std::path::Path;

use crate::Result;

/// Upper bound on collision suffixes before giving up
const MAX_SUFFIX: u32 = 10_000;

/// Convert a title like "Exterior House Painting" into the filename-safe
/// slug "Exterior-House-Painting".
///
/// Keeps alphanumerics, underscores and hyphens; drops everything else
/// (including path separators); joins the remaining words with hyphens.
/// Case is preserved. Idempotent: `slugify(slugify(t)) == slugify(t)`.
pub fn slugify(title: &str) -> String {
    let filtered: String = title
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-' || c.is_whitespace())
        .collect();

    filtered.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Split a filename into (stem, extension-with-dot).
fn split_name(name: &str) -> (&str, &str) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, &name[stem.len()..]),
        _ => (name, ""),
    }
}

/// Pure collision core: return `desired` unchanged if its stem is free,
/// otherwise append `-2`, `-3`, ... before the extension until a free stem
/// is found. `is_taken` is queried with candidate stems as written; the
/// caller decides comparison semantics (lowercased here, see [`resolve`]).
///
/// Stems are compared rather than whole names so one slug is claimed once
/// per directory regardless of extension: `Title.jpg` and a second image
/// titled the same become `Title.jpg` and `Title-2.png`.
pub fn resolve_against(desired: &str, is_taken: impl Fn(&str) -> bool) -> Result<String> {
    let (stem, ext) = split_name(desired);

    if !is_taken(stem) {
        return Ok(desired.to_string());
    }

    for n in 2..=MAX_SUFFIX {
        let candidate = format!("{}-{}", stem, n);
        if !is_taken(&candidate) {
            return Ok(format!("{}{}", candidate, ext));
        }
    }

    Err(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!("No free name for '{}' after {} suffixes", desired, MAX_SUFFIX),
    )
    .into())
}

/// Lowercased stems of the supported image files currently in `dir`.
///
/// Non-image entries (sidecar files, the batch file itself) do not claim
/// stems, so a title is only suffixed when it would collide with another
/// image.
pub fn existing_stems(dir: &Path) -> Result<HashSet<String>> {
    let mut stems = HashSet::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !crate::batch::is_supported(&path) {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            let (stem, _) = split_name(name);
            stems.insert(stem.to_lowercase());
        }
    }
    Ok(stems)
}

/// Resolve `desired` against the contents of `dir` and the stems already
/// reserved earlier in the same batch. Comparison is case-insensitive on
/// every platform so behavior is portable across filesystems.
pub fn resolve(desired: &str, dir: &Path, reserved: &HashSet<String>) -> Result<String> {
    let existing = existing_stems(dir)?;
    resolve_against(desired, |stem| {
        let key = stem.to_lowercase();
        existing.contains(&key) || reserved.contains(&key)
    })
}

/// Record a final name's stem in the reservation set.
pub fn reserve(reserved: &mut HashSet<String>, final_name: &str) {
    let (stem, _) = split_name(final_name);
    reserved.insert(stem.to_lowercase());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_joins_words_with_hyphens() {
        assert_eq!(slugify("Exterior House Painting"), "Exterior-House-Painting");
    }

    #[test]
    fn slugify_drops_reserved_characters() {
        assert_eq!(slugify("a/b\\c: d?"), "abc-d");
        assert_eq!(slugify("  White  Brick!  "), "White-Brick");
    }

    #[test]
    fn slugify_is_idempotent() {
        let cases = ["Exterior House Painting", "a/b c", "already-a-slug", ""];
        for case in cases {
            let once = slugify(case);
            assert_eq!(slugify(&once), once);
        }
    }

    #[test]
    fn resolve_returns_free_names_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let reserved = HashSet::new();
        assert_eq!(
            resolve("house.jpg", dir.path(), &reserved).unwrap(),
            "house.jpg"
        );
    }

    #[test]
    fn resolve_appends_first_unused_suffix() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("house.jpg"), b"x").unwrap();
        let reserved = HashSet::new();

        assert_eq!(
            resolve("house.jpg", dir.path(), &reserved).unwrap(),
            "house-2.jpg"
        );

        std::fs::write(dir.path().join("house-2.jpg"), b"x").unwrap();
        assert_eq!(
            resolve("house.jpg", dir.path(), &reserved).unwrap(),
            "house-3.jpg"
        );
    }

    #[test]
    fn resolve_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("House.JPG"), b"x").unwrap();
        let reserved = HashSet::new();

        assert_eq!(
            resolve("house.jpg", dir.path(), &reserved).unwrap(),
            "house-2.jpg"
        );
    }

    #[test]
    fn resolve_honors_reservations_across_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let mut reserved = HashSet::new();
        reserve(&mut reserved, "Exterior-House-Painting.jpg");

        assert_eq!(
            resolve("Exterior-House-Painting.png", dir.path(), &reserved).unwrap(),
            "Exterior-House-Painting-2.png"
        );
    }

    #[test]
    fn disjoint_names_are_both_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let mut reserved = HashSet::new();

        let a = resolve("front-porch.jpg", dir.path(), &reserved).unwrap();
        reserve(&mut reserved, &a);
        let b = resolve("back-deck.jpg", dir.path(), &reserved).unwrap();

        assert_eq!(a, "front-porch.jpg");
        assert_eq!(b, "back-deck.jpg");
    }

    #[test]
    fn resolve_against_is_deterministic() {
        let taken: HashSet<String> = ["report", "report-2"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let check = |stem: &str| taken.contains(&stem.to_lowercase());

        assert_eq!(resolve_against("report.pdf", check).unwrap(), "report-3.pdf");
        assert_eq!(resolve_against("report.pdf", check).unwrap(), "report-3.pdf");
    }

    #[test]
    fn names_without_extension_are_handled() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.jpg"), b"x").unwrap();
        let reserved = HashSet::new();

        assert_eq!(resolve("notes", dir.path(), &reserved).unwrap(), "notes-2");
    }

    #[test]
    fn non_image_files_do_not_claim_stems() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        std::fs::write(dir.path().join("basecoat_batch.json"), b"{}").unwrap();
        let reserved = HashSet::new();

        assert_eq!(
            resolve("Notes.jpg", dir.path(), &reserved).unwrap(),
            "Notes.jpg"
        );
        assert_eq!(
            resolve("Basecoat-Batch.png", dir.path(), &reserved).unwrap(),
            "Basecoat-Batch.png"
        );
    }
}
