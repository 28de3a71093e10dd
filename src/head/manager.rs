//! Upserting head manager.
//!
//! Tags are located by selector and updated in place, or created and appended
//! when absent, so repeated mounts never duplicate them. JSON-LD scripts are
//! tagged with [`MANAGED_ATTR`] and replaced wholesale on every `set`. The
//! first value seen for each selector is remembered so `clear` can put the
//! head back the way it was found.

use std::collections::HashSet;

use crate::dom::{DomNode, DomTree};
use crate::head::metadata::{HeadTarget, PageMetadata};

/// Marker attribute on scripts created by the manager.
pub const MANAGED_ATTR: &str = "data-guide-head";

pub const JSON_LD_TYPE: &str = "application/ld+json";

/// Declarative head management: pages supply data, the manager does the DOM work.
pub trait HeadManager {
    /// Make the head reflect `meta`.
    fn set(&mut self, doc: &mut DomTree, meta: &PageMetadata);

    /// Undo everything `set` did.
    fn clear(&mut self, doc: &mut DomTree);
}

/// What was at a selector before the manager first touched it.
#[derive(Debug, Clone, PartialEq)]
enum Original {
    /// Existed with this value.
    Value(String),
    /// Did not exist; the manager created it.
    Absent,
}

#[derive(Debug, Default)]
pub struct MetadataInjector {
    originals: Vec<(HeadTarget, Original)>,
    scripts: usize,
}

impl MetadataInjector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of JSON-LD scripts currently owned by this injector.
    pub fn script_count(&self) -> usize {
        self.scripts
    }

    pub fn apply_metadata(&mut self, doc: &mut DomTree, meta: &PageMetadata) {
        let head = doc.head_mut();
        let tags = meta.tags();

        // Selectors a previous page set but this one does not are put back first,
        // so nothing stale (e.g. keywords) outlives the page that wrote it.
        let wanted: HashSet<&HeadTarget> = tags.iter().map(|t| &t.target).collect();
        let (keep, stale): (Vec<_>, Vec<_>) = self
            .originals
            .drain(..)
            .partition(|(target, _)| wanted.contains(target));
        self.originals = keep;
        for (target, original) in stale.into_iter().rev() {
            restore(head, &target, original);
        }

        let mut touched: HashSet<HeadTarget> =
            self.originals.iter().map(|(t, _)| t.clone()).collect();

        for tag in tags {
            let previous = upsert(head, &tag.target, &tag.value);
            if touched.insert(tag.target.clone()) {
                let original = previous.map(Original::Value).unwrap_or(Original::Absent);
                self.originals.push((tag.target, original));
            }
        }

        remove_managed_scripts(head);
        self.scripts = 0;
        for data in &meta.structured_data {
            match serde_json::to_string(data) {
                Ok(text) => {
                    head.children.push(
                        DomNode::tag("script")
                            .with_attr("type", JSON_LD_TYPE)
                            .with_attr(MANAGED_ATTR, "")
                            .with_text(text),
                    );
                    self.scripts += 1;
                }
                Err(e) => log::warn!("skipping unserializable JSON-LD block: {}", e),
            }
        }

        log::debug!(
            "head: {} tags upserted, {} JSON-LD scripts for {}",
            self.originals.len(),
            self.scripts,
            meta.canonical_url
        );
    }

    pub fn remove_metadata(&mut self, doc: &mut DomTree) {
        let head = doc.head_mut();
        let removed = remove_managed_scripts(head);

        for (target, original) in self.originals.drain(..).rev() {
            restore(head, &target, original);
        }
        self.scripts = 0;
        log::debug!("head: cleared, {} JSON-LD scripts removed", removed);
    }
}

impl HeadManager for MetadataInjector {
    fn set(&mut self, doc: &mut DomTree, meta: &PageMetadata) {
        self.apply_metadata(doc, meta);
    }

    fn clear(&mut self, doc: &mut DomTree) {
        self.remove_metadata(doc);
    }
}

/// Update the first element matching `target`, or append a new one.
///
/// Returns the previous value when an element existed.
fn upsert(head: &mut DomNode, target: &HeadTarget, value: &str) -> Option<String> {
    match head.children.iter_mut().find(|n| target.matches(n)) {
        Some(node) => {
            let previous = target.read(node).unwrap_or_default();
            target.write(node, value);
            Some(previous)
        }
        None => {
            head.children.push(target.create(value));
            None
        }
    }
}

fn restore(head: &mut DomNode, target: &HeadTarget, original: Original) {
    match original {
        Original::Value(value) => {
            if let Some(node) = head.children.iter_mut().find(|n| target.matches(n)) {
                target.write(node, &value);
            }
        }
        Original::Absent => {
            if let Some(pos) = head.children.iter().position(|n| target.matches(n)) {
                head.children.remove(pos);
            }
        }
    }
}

fn remove_managed_scripts(head: &mut DomNode) -> usize {
    head.remove_where(&|n: &DomNode| n.tag == "script" && n.attr(MANAGED_ATTR).is_some())
}

/// Read-back view of a document head.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadSnapshot {
    pub titles: Vec<String>,
    /// `(name-or-property, content)` in document order.
    pub metas: Vec<(String, String)>,
    pub canonicals: Vec<String>,
    pub json_ld: Vec<serde_json::Value>,
}

impl HeadSnapshot {
    pub fn read(doc: &DomTree) -> Self {
        let mut snap = HeadSnapshot {
            titles: Vec::new(),
            metas: Vec::new(),
            canonicals: Vec::new(),
            json_ld: Vec::new(),
        };
        let Some(head) = doc.head() else {
            return snap;
        };

        for node in &head.children {
            if HeadTarget::Title.matches(node) {
                snap.titles.push(node.collect_text());
            } else if HeadTarget::Canonical.matches(node) {
                snap.canonicals.push(node.attr("href").unwrap_or_default().to_string());
            } else if node.tag == "meta" {
                let key = node.attr("name").or_else(|| node.attr("property"));
                if let Some(key) = key {
                    let content = node.attr("content").unwrap_or_default();
                    snap.metas.push((key.to_string(), content.to_string()));
                }
            } else if node.tag == "script" && node.attr("type") == Some(JSON_LD_TYPE) {
                match serde_json::from_str(&node.collect_text()) {
                    Ok(v) => snap.json_ld.push(v),
                    Err(e) => log::warn!("unparseable JSON-LD in head: {}", e),
                }
            }
        }
        snap
    }

    /// Content of the first meta tag keyed by `key`.
    pub fn meta(&self, key: &str) -> Option<&str> {
        self.metas
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// How many meta tags share `key`.
    pub fn meta_count(&self, key: &str) -> usize {
        self.metas.iter().filter(|(k, _)| k == key).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parser::parse_html;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn meta() -> PageMetadata {
        PageMetadata::new(
            "Succession & Probate in Kenya",
            "Grant of probate and letters of administration explained.",
            "https://example.co.ke/guides/succession",
        )
        .with_keywords("succession, probate, Kenya")
        .with_structured_data(json!({"@type": "FAQPage"}))
        .with_structured_data(json!({"@type": "HowTo"}))
    }

    #[test]
    fn set_twice_is_idempotent() {
        let mut doc = DomTree::new("https://example.co.ke");
        let mut head = MetadataInjector::new();
        head.set(&mut doc, &meta());
        let once = HeadSnapshot::read(&doc);
        head.set(&mut doc, &meta());
        let twice = HeadSnapshot::read(&doc);

        assert_eq!(once, twice);
        assert_eq!(twice.titles.len(), 1);
        assert_eq!(twice.canonicals.len(), 1);
        assert_eq!(twice.json_ld.len(), 2);
        for (key, _) in &twice.metas {
            assert_eq!(twice.meta_count(key), 1, "duplicate meta {}", key);
        }
    }

    #[test]
    fn fresh_injectors_do_not_duplicate_either() {
        let mut doc = DomTree::new("https://example.co.ke");
        MetadataInjector::new().set(&mut doc, &meta());
        MetadataInjector::new().set(&mut doc, &meta());
        let snap = HeadSnapshot::read(&doc);
        assert_eq!(snap.titles.len(), 1);
        assert_eq!(snap.json_ld.len(), 2);
        assert_eq!(snap.meta_count("description"), 1);
    }

    #[test]
    fn updates_existing_tags_in_place() {
        let mut doc = parse_html(
            r#"<html><head>
                <title>Old</title>
                <meta name="description" content="old description">
                <link rel="canonical" href="https://example.co.ke/old">
            </head><body></body></html>"#,
            "https://example.co.ke",
        );
        let mut head = MetadataInjector::new();
        head.set(&mut doc, &meta());

        let snap = HeadSnapshot::read(&doc);
        assert_eq!(snap.titles, vec!["Succession & Probate in Kenya".to_string()]);
        assert_eq!(
            snap.meta("description"),
            Some("Grant of probate and letters of administration explained.")
        );
        assert_eq!(snap.canonicals, vec!["https://example.co.ke/guides/succession".to_string()]);
    }

    #[test]
    fn clear_restores_originals_and_removes_created() {
        let mut doc = parse_html(
            r#"<html><head>
                <title>Home</title>
                <meta name="description" content="site description">
                <script type="application/ld+json">{"@type":"WebSite"}</script>
            </head><body></body></html>"#,
            "https://example.co.ke",
        );
        let before = HeadSnapshot::read(&doc);

        let mut head = MetadataInjector::new();
        head.set(&mut doc, &meta());
        assert_eq!(head.script_count(), 2);
        head.clear(&mut doc);

        assert_eq!(HeadSnapshot::read(&doc), before);
        assert_eq!(head.script_count(), 0);
    }

    #[test]
    fn switching_pages_replaces_scripts() {
        let mut doc = DomTree::new("https://example.co.ke");
        let mut head = MetadataInjector::new();
        head.set(&mut doc, &meta());

        let other = PageMetadata::new(
            "Land Disputes",
            "Resolving land disputes.",
            "https://example.co.ke/guides/land",
        )
        .with_structured_data(json!({"@type": "WebPage"}));
        head.set(&mut doc, &other);

        let snap = HeadSnapshot::read(&doc);
        assert_eq!(snap.titles, vec!["Land Disputes".to_string()]);
        assert_eq!(snap.json_ld, vec![json!({"@type": "WebPage"})]);
        // The first page's keywords must not leak into the second.
        assert_eq!(snap.meta_count("keywords"), 0);

        head.clear(&mut doc);
        let cleared = HeadSnapshot::read(&doc);
        assert!(cleared.titles.is_empty());
        assert!(cleared.metas.is_empty());
        assert!(cleared.json_ld.is_empty());
    }
}
