//! Guides bundled with the crate.

use std::path::Path;

use crate::error::{GuideError, Result};
use crate::guide::content::GuideContent;

const BUNDLED: &[(&str, &str)] = &[
    ("annual-returns", include_str!("../../content/annual-returns.yaml")),
    (
        "business-registration",
        include_str!("../../content/business-registration.yaml"),
    ),
    ("land-disputes", include_str!("../../content/land-disputes.yaml")),
    (
        "succession-probate",
        include_str!("../../content/succession-probate.yaml"),
    ),
    (
        "occupational-safety",
        include_str!("../../content/occupational-safety.yaml"),
    ),
    (
        "employment-termination",
        include_str!("../../content/employment-termination.yaml"),
    ),
];

/// Slugs of every bundled guide, in catalog order.
pub fn slugs() -> impl Iterator<Item = &'static str> {
    BUNDLED.iter().map(|(slug, _)| *slug)
}

pub fn load(slug: &str) -> Result<GuideContent> {
    let (_, src) = BUNDLED
        .iter()
        .find(|(s, _)| *s == slug)
        .ok_or_else(|| GuideError::UnknownGuide(slug.to_string()))?;
    let content = GuideContent::from_yaml(src)?;
    if content.slug != slug {
        return Err(GuideError::InvalidContent {
            slug: slug.to_string(),
            message: format!("file declares slug \"{}\"", content.slug),
        });
    }
    Ok(content)
}

/// Load a guide from a YAML file on disk.
pub fn load_path(path: &Path) -> Result<GuideContent> {
    let src = std::fs::read_to_string(path)?;
    log::debug!("loaded {} bytes from {}", src.len(), path.display());
    GuideContent::from_yaml(&src)
}

/// Resolve a command-line argument: a bundled slug, else a file path.
pub fn resolve(arg: &str) -> Result<GuideContent> {
    if slugs().any(|s| s == arg) {
        return load(arg);
    }
    let path = Path::new(arg);
    if path.exists() {
        return load_path(path);
    }
    Err(GuideError::UnknownGuide(arg.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guide::template::{check_anchors, render_guide};

    #[test]
    fn every_bundled_guide_is_valid() {
        for slug in slugs() {
            let content = load(slug).unwrap_or_else(|e| panic!("{}: {}", slug, e));
            let sections = content.section_list().expect("sections");
            assert!(sections.len() >= 2, "{} has too few sections", slug);
            assert!(!content.faqs.is_empty(), "{} has no FAQs", slug);

            let doc = render_guide(&content);
            assert!(check_anchors(&doc, &sections).is_clean(), "{}", slug);

            let meta = content.page_metadata();
            assert!(meta
                .structured_data
                .iter()
                .any(|v| v["@type"] == "FAQPage"));
        }
    }

    #[test]
    fn six_topics_are_bundled() {
        assert_eq!(slugs().count(), 6);
    }

    #[test]
    fn unknown_slug_is_an_error() {
        assert!(matches!(load("tax-appeals"), Err(GuideError::UnknownGuide(_))));
        assert!(matches!(
            resolve("no/such/guide.yaml"),
            Err(GuideError::UnknownGuide(_))
        ));
    }

    #[test]
    fn behavior_overrides_survive_loading() {
        let content = load("occupational-safety").expect("bundled guide");
        assert_eq!(content.behavior.header_offset, 96.0);
        assert_eq!(content.behavior.root_margin.top_px, 96.0);
    }
}
