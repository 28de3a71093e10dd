//! Content sections and their validated, ordered list.

use std::collections::HashSet;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{GuideError, Result};

/// One navigable section of a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Stable DOM anchor; external `#fragment` links depend on it.
    pub id: String,
    pub label: String,
    pub order: u32,
}

impl Section {
    pub fn new(id: impl Into<String>, label: impl Into<String>, order: u32) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            order,
        }
    }

    pub fn href(&self) -> String {
        format!("#{}", self.id)
    }
}

/// Non-empty section list with unique ids and strictly increasing `order`.
///
/// Cheap to clone; the tracker and navigator share one allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionList {
    sections: Arc<[Section]>,
}

impl SectionList {
    pub fn new(sections: Vec<Section>) -> Result<Self> {
        if sections.is_empty() {
            return Err(GuideError::InvalidSections("no sections".into()));
        }

        let mut seen = HashSet::new();
        for (i, s) in sections.iter().enumerate() {
            if s.id.trim().is_empty() {
                return Err(GuideError::InvalidSections(format!(
                    "section {} has an empty id",
                    i
                )));
            }
            if s.id.chars().any(char::is_whitespace) {
                return Err(GuideError::InvalidSections(format!(
                    "section id \"{}\" contains whitespace",
                    s.id
                )));
            }
            if !seen.insert(s.id.as_str()) {
                return Err(GuideError::InvalidSections(format!(
                    "duplicate section id \"{}\"",
                    s.id
                )));
            }
            if i > 0 && s.order <= sections[i - 1].order {
                return Err(GuideError::InvalidSections(format!(
                    "section \"{}\" order {} does not follow {}",
                    s.id,
                    s.order,
                    sections[i - 1].order
                )));
            }
        }

        Ok(Self {
            sections: sections.into(),
        })
    }

    /// Build from `(id, label)` pairs, numbering them in the given order.
    pub fn from_pairs<I, S, L>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, L)>,
        S: Into<String>,
        L: Into<String>,
    {
        let sections = pairs
            .into_iter()
            .enumerate()
            .map(|(i, (id, label))| Section::new(id, label, i as u32))
            .collect();
        Self::new(sections)
    }

    pub fn first(&self) -> &Section {
        // Non-empty by construction.
        &self.sections[0]
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.id.as_str())
    }
}

impl Deref for SectionList {
    type Target = [Section];

    fn deref(&self) -> &[Section] {
        &self.sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pairs_numbers_sections() {
        let list = SectionList::from_pairs([("overview", "Overview"), ("fees", "Fees")])
            .expect("valid");
        assert_eq!(list.len(), 2);
        assert_eq!(list.first().id, "overview");
        assert_eq!(list.get("fees").map(|s| s.order), Some(1));
        assert_eq!(list.position("fees"), Some(1));
        assert_eq!(list[1].href(), "#fees");
    }

    #[test]
    fn rejects_duplicates_and_bad_order() {
        assert!(matches!(
            SectionList::from_pairs([("a", "A"), ("a", "A again")]),
            Err(GuideError::InvalidSections(_))
        ));
        let out_of_order = vec![Section::new("a", "A", 2), Section::new("b", "B", 2)];
        assert!(SectionList::new(out_of_order).is_err());
        assert!(SectionList::new(Vec::new()).is_err());
        assert!(SectionList::from_pairs([("has space", "X")]).is_err());
    }
}
