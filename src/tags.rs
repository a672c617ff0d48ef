// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2026 Basecoat contributors

//! Predefined context tags describing painting-industry subjects
//!
//! Tags are optional hints passed to the analysis call; selecting the ones
//! that match a folder's content steers the model toward the right SEO
//! keywords.

use serde::{Deserialize, Serialize};

use crate::{BasecoatError, Result};

/// The predefined tag labels
pub const TAG_LABELS: [&str; 33] = [
    "Interior House Painting",
    "Exterior House Painting",
    "Deck Painting",
    "Deck Staining",
    "Fence Painting",
    "Fence Staining",
    "Interior Commercial Painting",
    "Exterior Commercial Painting",
    "Arbor Painting",
    "Gazebo Painting",
    "Shed Painting",
    "Shed Staining",
    "Playhouse Staining",
    "Barn Painting",
    "School Painting",
    "Hospital Painting",
    "Medical Facility Painting",
    "Hotel & Motel Painting",
    "Apartment Complex Painting",
    "Restaurant Painting",
    "Church Painting",
    "Religious Building Painting",
    "Gym Painting",
    "Fitness Center Painting",
    "Retail Store Painting",
    "Storefront Painting",
    "Office Painting",
    "Cabinet Painting",
    "Epoxy Floor Coating",
    "Epoxy Countertop Coating",
    "Popcorn Ceiling Removal",
    "Concrete Coating",
    "Pressure Washing",
];

/// A context tag and its selection state
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContextTag {
    pub label: String,
    pub enabled: bool,
}

/// The full predefined tag set, all deselected
pub fn default_tags() -> Vec<ContextTag> {
    TAG_LABELS
        .iter()
        .map(|label| ContextTag {
            label: label.to_string(),
            enabled: false,
        })
        .collect()
}

/// Set the selection state of every tag
pub fn set_all(tags: &mut [ContextTag], enabled: bool) {
    for tag in tags.iter_mut() {
        tag.enabled = enabled;
    }
}

/// Labels of the currently enabled tags
pub fn enabled_labels(tags: &[ContextTag]) -> Vec<String> {
    tags.iter()
        .filter(|t| t.enabled)
        .map(|t| t.label.clone())
        .collect()
}

/// Enable the tags matching the given labels (case-insensitive).
///
/// Unknown labels are an error so typos on the command line are caught
/// before any network call is made.
pub fn select(tags: &mut [ContextTag], labels: &[String]) -> Result<()> {
    for label in labels {
        let tag = tags
            .iter_mut()
            .find(|t| t.label.eq_ignore_ascii_case(label))
            .ok_or_else(|| BasecoatError::Config(format!("Unknown context tag: '{}'", label)))?;
        tag.enabled = true;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_is_complete_and_deselected() {
        let tags = default_tags();
        assert_eq!(tags.len(), TAG_LABELS.len());
        assert!(tags.iter().all(|t| !t.enabled));
    }

    #[test]
    fn select_is_case_insensitive() {
        let mut tags = default_tags();
        select(&mut tags, &["deck painting".to_string()]).unwrap();
        assert_eq!(enabled_labels(&tags), vec!["Deck Painting".to_string()]);
    }

    #[test]
    fn select_rejects_unknown_labels() {
        let mut tags = default_tags();
        let err = select(&mut tags, &["Submarine Painting".to_string()]);
        assert!(err.is_err());
    }

    #[test]
    fn set_all_toggles_every_tag() {
        let mut tags = default_tags();
        set_all(&mut tags, true);
        assert_eq!(enabled_labels(&tags).len(), TAG_LABELS.len());
        set_all(&mut tags, false);
        assert!(enabled_labels(&tags).is_empty());
    }
}
