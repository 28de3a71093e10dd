//! Guide content data.
//!
//! A guide is pure data: metadata, ordered sections made of blocks, FAQs and
//! optional HowTo details. One template renders every guide.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::BehaviorConfig;
use crate::error::{GuideError, Result};
use crate::head::metadata::PageMetadata;
use crate::head::schema::{self, Breadcrumb, Faq, HowToStep, MonetaryAmount, OrganizationInfo};
use crate::nav::section::{Section, SectionList};

/// Section id used for the generated FAQ section.
pub const FAQ_SECTION_ID: &str = "faqs";
pub const FAQ_SECTION_LABEL: &str = "Frequently Asked Questions";

/// Suffix of the id the template gives each section's `<h2>`.
pub const HEADING_SUFFIX: &str = "-heading";

/// Ids the template uses for its own elements.
pub const RESERVED_IDS: &[&str] = &["main", "toc", FAQ_SECTION_ID];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Paragraph {
        text: String,
    },
    List {
        items: Vec<String>,
        #[serde(default)]
        ordered: bool,
    },
    Table {
        #[serde(default)]
        caption: Option<String>,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// Numbered procedure; also feeds the HowTo structured data.
    Steps {
        steps: Vec<HowToStep>,
    },
    Callout {
        #[serde(default)]
        title: Option<String>,
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentSection {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HowToSpec {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// ISO 8601 duration, e.g. `P14D`.
    #[serde(default)]
    pub total_time: Option<String>,
    #[serde(default)]
    pub estimated_cost: Option<MonetaryAmount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuideContent {
    pub slug: String,
    pub heading: String,
    #[serde(default)]
    pub summary: Option<String>,
    pub metadata: PageMetadata,
    #[serde(default)]
    pub organization: Option<OrganizationInfo>,
    #[serde(default)]
    pub breadcrumbs: Vec<Breadcrumb>,
    #[serde(default)]
    pub behavior: BehaviorConfig,
    pub sections: Vec<ContentSection>,
    #[serde(default)]
    pub faqs: Vec<Faq>,
    #[serde(default)]
    pub howto: Option<HowToSpec>,
}

impl GuideContent {
    /// Parse and validate a YAML guide.
    pub fn from_yaml(src: &str) -> Result<Self> {
        let content: GuideContent = serde_yaml::from_str(src)?;
        content.validate()?;
        Ok(content)
    }

    fn invalid(&self, message: impl Into<String>) -> GuideError {
        GuideError::InvalidContent {
            slug: self.slug.clone(),
            message: message.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.metadata.validate()?;

        let mut seen = HashSet::new();
        for section in &self.sections {
            if RESERVED_IDS.contains(&section.id.as_str()) {
                return Err(self.invalid(format!("section id \"{}\" is reserved", section.id)));
            }
            if section.id.starts_with(FAQ_SECTION_ID) {
                return Err(self.invalid(format!(
                    "section id \"{}\" collides with FAQ ids",
                    section.id
                )));
            }
            if !seen.insert(section.id.as_str()) {
                return Err(self.invalid(format!("duplicate section id \"{}\"", section.id)));
            }
            for block in &section.blocks {
                if let Block::Table { headers, rows, .. } = block {
                    if let Some(bad) = rows.iter().position(|r| r.len() != headers.len()) {
                        return Err(self.invalid(format!(
                            "table in \"{}\": row {} has {} cells, expected {}",
                            section.id,
                            bad,
                            rows[bad].len(),
                            headers.len()
                        )));
                    }
                }
            }
        }

        // The template gives each section heading the id `{id}-heading`.
        for section in &self.sections {
            if let Some(stem) = section.id.strip_suffix(HEADING_SUFFIX) {
                if seen.contains(stem) {
                    return Err(self.invalid(format!(
                        "section id \"{}\" collides with the heading of \"{}\"",
                        section.id, stem
                    )));
                }
            }
        }

        if self.faqs.iter().any(|f| f.question.trim().is_empty()) {
            return Err(self.invalid("FAQ with empty question"));
        }

        // Id syntax and ordering are checked by SectionList itself.
        self.section_list().map(|_| ())
    }

    /// Navigable sections in page order, FAQ section last when present.
    pub fn section_list(&self) -> Result<SectionList> {
        let mut sections: Vec<Section> = self
            .sections
            .iter()
            .enumerate()
            .map(|(i, s)| Section::new(s.id.clone(), s.label.clone(), i as u32))
            .collect();
        if !self.faqs.is_empty() {
            let order = sections.len() as u32;
            sections.push(Section::new(FAQ_SECTION_ID, FAQ_SECTION_LABEL, order));
        }
        SectionList::new(sections)
    }

    /// All step-list entries in page order.
    pub fn steps(&self) -> Vec<HowToStep> {
        self.sections
            .iter()
            .flat_map(|s| s.blocks.iter())
            .filter_map(|b| match b {
                Block::Steps { steps } => Some(steps.iter().cloned()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// Metadata with JSON-LD generated from the content appended.
    ///
    /// Hand-written entries in `metadata.structured_data` come first; then
    /// Organization, BreadcrumbList, WebPage, HowTo and FAQPage as applicable.
    pub fn page_metadata(&self) -> PageMetadata {
        let mut meta = self.metadata.clone();

        if let Some(org) = &self.organization {
            meta.structured_data.push(schema::organization(org));
        }
        if !self.breadcrumbs.is_empty() {
            meta.structured_data.push(schema::breadcrumb_list(&self.breadcrumbs));
        }
        meta.structured_data
            .push(schema::web_page(&self.metadata, self.organization.as_ref()));

        let steps = self.steps();
        if let Some(howto) = &self.howto {
            if steps.is_empty() {
                log::warn!("{}: howto configured but the page has no steps", self.slug);
            } else {
                meta.structured_data.push(schema::how_to(
                    &howto.name,
                    howto.description.as_deref(),
                    &steps,
                    howto.total_time.as_deref(),
                    howto.estimated_cost.as_ref(),
                ));
            }
        }
        if !self.faqs.is_empty() {
            meta.structured_data.push(schema::faq_page(&self.faqs));
        }
        meta
    }
}
