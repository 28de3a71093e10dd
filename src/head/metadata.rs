//! Page metadata and the head tags it expands to.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::dom::DomNode;
use crate::error::{GuideError, Result};

fn default_og_type() -> String {
    "article".into()
}

fn default_twitter_card() -> String {
    "summary_large_image".into()
}

/// Open Graph fields; unset ones fall back to the page's own values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenGraph {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default = "default_og_type")]
    pub og_type: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Twitter Card fields; unset ones fall back to Open Graph, then the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwitterCard {
    #[serde(default = "default_twitter_card")]
    pub card: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Default for OpenGraph {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            og_type: default_og_type(),
            url: None,
            image: None,
        }
    }
}

impl Default for TwitterCard {
    fn default() -> Self {
        Self {
            card: default_twitter_card(),
            title: None,
            description: None,
            image: None,
        }
    }
}

/// `robots` directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Robots {
    pub index: bool,
    pub follow: bool,
    /// Adds `max-snippet:-1, max-image-preview:large, max-video-preview:-1`.
    pub rich_previews: bool,
}

impl Default for Robots {
    fn default() -> Self {
        Self {
            index: true,
            follow: true,
            rich_previews: true,
        }
    }
}

impl Robots {
    pub fn content(&self) -> String {
        let mut parts = vec![
            if self.index { "index" } else { "noindex" },
            if self.follow { "follow" } else { "nofollow" },
        ];
        if self.rich_previews {
            parts.extend(["max-snippet:-1", "max-image-preview:large", "max-video-preview:-1"]);
        }
        parts.join(", ")
    }
}

/// Everything a page writes into `<head>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub keywords: Option<String>,
    pub canonical_url: String,
    #[serde(default)]
    pub open_graph: OpenGraph,
    #[serde(default)]
    pub twitter: TwitterCard,
    #[serde(default)]
    pub robots: Robots,
    /// JSON-LD objects, one `<script>` each, in this order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub structured_data: Vec<serde_json::Value>,
}

impl PageMetadata {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        canonical_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            keywords: None,
            canonical_url: canonical_url.into(),
            open_graph: OpenGraph::default(),
            twitter: TwitterCard::default(),
            robots: Robots::default(),
            structured_data: Vec::new(),
        }
    }

    pub fn with_keywords(mut self, keywords: impl Into<String>) -> Self {
        self.keywords = Some(keywords.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.open_graph.image = Some(image.into());
        self
    }

    pub fn with_structured_data(mut self, value: serde_json::Value) -> Self {
        self.structured_data.push(value);
        self
    }

    /// Check URLs are absolute and the title is present.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(GuideError::InvalidContent {
                slug: self.canonical_url.clone(),
                message: "empty title".into(),
            });
        }
        let urls = [
            ("canonical_url", Some(&self.canonical_url)),
            ("og:url", self.open_graph.url.as_ref()),
            ("og:image", self.open_graph.image.as_ref()),
            ("twitter:image", self.twitter.image.as_ref()),
        ];
        for (field, url) in urls {
            if let Some(url) = url {
                Url::parse(url).map_err(|source| GuideError::InvalidUrl { field, source })?;
            }
        }
        Ok(())
    }

    /// Tags in the order they are written to the head.
    ///
    /// Optional values (keywords, images) are omitted when unset.
    pub fn tags(&self) -> Vec<HeadTag> {
        let og_title = self.open_graph.title.as_deref().unwrap_or(&self.title);
        let og_description = self
            .open_graph
            .description
            .as_deref()
            .unwrap_or(&self.description);
        let og_url = self.open_graph.url.as_deref().unwrap_or(&self.canonical_url);
        let og_image = self.open_graph.image.as_deref();
        let tw_image = self.twitter.image.as_deref().or(og_image);

        let mut tags = vec![
            HeadTag::new(HeadTarget::Title, &self.title),
            HeadTag::new(HeadTarget::name("description"), &self.description),
        ];
        if let Some(keywords) = &self.keywords {
            tags.push(HeadTag::new(HeadTarget::name("keywords"), keywords));
        }
        tags.push(HeadTag::new(HeadTarget::Canonical, &self.canonical_url));

        tags.push(HeadTag::new(HeadTarget::property("og:title"), og_title));
        tags.push(HeadTag::new(HeadTarget::property("og:description"), og_description));
        tags.push(HeadTag::new(HeadTarget::property("og:type"), &self.open_graph.og_type));
        tags.push(HeadTag::new(HeadTarget::property("og:url"), og_url));
        if let Some(image) = og_image {
            tags.push(HeadTag::new(HeadTarget::property("og:image"), image));
        }

        tags.push(HeadTag::new(HeadTarget::name("twitter:card"), &self.twitter.card));
        tags.push(HeadTag::new(
            HeadTarget::name("twitter:title"),
            self.twitter.title.as_deref().unwrap_or(og_title),
        ));
        tags.push(HeadTag::new(
            HeadTarget::name("twitter:description"),
            self.twitter.description.as_deref().unwrap_or(og_description),
        ));
        if let Some(image) = tw_image {
            tags.push(HeadTag::new(HeadTarget::name("twitter:image"), image));
        }

        tags.push(HeadTag::new(HeadTarget::name("robots"), self.robots.content()));
        tags
    }
}

/// Selector for one upsertable head element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HeadTarget {
    /// `<title>`
    Title,
    /// `meta[name="X"]`
    MetaName(String),
    /// `meta[property="X"]`
    MetaProperty(String),
    /// `link[rel="canonical"]`
    Canonical,
}

impl HeadTarget {
    pub fn name(name: &str) -> Self {
        HeadTarget::MetaName(name.to_string())
    }

    pub fn property(property: &str) -> Self {
        HeadTarget::MetaProperty(property.to_string())
    }

    /// Whether `node` is the element this selector addresses.
    pub fn matches(&self, node: &DomNode) -> bool {
        match self {
            HeadTarget::Title => node.tag == "title",
            HeadTarget::MetaName(n) => node.tag == "meta" && node.attr("name") == Some(n.as_str()),
            HeadTarget::MetaProperty(p) => {
                node.tag == "meta" && node.attr("property") == Some(p.as_str())
            }
            HeadTarget::Canonical => {
                node.tag == "link"
                    && node
                        .attr("rel")
                        .map(|rel| rel.eq_ignore_ascii_case("canonical"))
                        .unwrap_or(false)
            }
        }
    }

    /// Current value: text for `<title>`, `href` for the canonical link,
    /// `content` for meta tags.
    pub fn read(&self, node: &DomNode) -> Option<String> {
        match self {
            HeadTarget::Title => Some(node.collect_text()),
            HeadTarget::Canonical => node.attr("href").map(str::to_string),
            HeadTarget::MetaName(_) | HeadTarget::MetaProperty(_) => {
                node.attr("content").map(str::to_string)
            }
        }
    }

    pub fn write(&self, node: &mut DomNode, value: &str) {
        match self {
            HeadTarget::Title => node.set_text_content(value),
            HeadTarget::Canonical => node.set_attr("href", value),
            HeadTarget::MetaName(_) | HeadTarget::MetaProperty(_) => {
                node.set_attr("content", value)
            }
        }
    }

    /// Fresh element carrying `value`.
    pub fn create(&self, value: &str) -> DomNode {
        let mut node = match self {
            HeadTarget::Title => DomNode::tag("title"),
            HeadTarget::MetaName(n) => DomNode::tag("meta").with_attr("name", n.as_str()),
            HeadTarget::MetaProperty(p) => DomNode::tag("meta").with_attr("property", p.as_str()),
            HeadTarget::Canonical => DomNode::tag("link").with_attr("rel", "canonical"),
        };
        self.write(&mut node, value);
        node
    }

    /// Human-readable key, e.g. `og:title` or `canonical`.
    pub fn key(&self) -> &str {
        match self {
            HeadTarget::Title => "title",
            HeadTarget::MetaName(n) => n.as_str(),
            HeadTarget::MetaProperty(p) => p.as_str(),
            HeadTarget::Canonical => "canonical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadTag {
    pub target: HeadTarget,
    pub value: String,
}

impl HeadTag {
    pub fn new(target: HeadTarget, value: impl Into<String>) -> Self {
        Self {
            target,
            value: value.into(),
        }
    }
}
