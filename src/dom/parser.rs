use crate::dom::{DomNode, DomTree};
use scraper::{ElementRef, Html, Node};
use std::collections::HashMap;

/// Tags whose children are dropped. `<script>` is kept because JSON-LD lives there.
const SKIP_CHILDREN: &[&str] = &["style", "noscript", "svg"];

/// Parse an HTML document into a [`DomTree`].
///
/// html5ever always synthesizes `<html>`, `<head>` and `<body>`, so the
/// resulting tree satisfies the `DomTree` skeleton invariant.
pub fn parse_html(html: &str, url: &str) -> DomTree {
    let document = Html::parse_document(html);
    let root = convert_element(document.root_element());

    DomTree {
        root,
        url: url.to_string(),
    }
}

fn convert_element(el: ElementRef<'_>) -> DomNode {
    let tag = el.value().name.local.as_ref().to_string();
    let attributes: HashMap<String, String> = el
        .value()
        .attrs()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    if SKIP_CHILDREN.contains(&tag.as_str()) {
        return DomNode::element(tag, attributes, Vec::new());
    }

    let keep_whitespace = tag == "script";
    let mut children = Vec::new();

    for child_ref in el.children() {
        match child_ref.value() {
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child_ref) {
                    children.push(convert_element(child_el));
                }
            }
            Node::Text(t) => {
                let s = t.text.to_string();
                if keep_whitespace || !s.trim().is_empty() {
                    children.push(DomNode::text(s));
                }
            }
            _ => {}
        }
    }

    DomNode::element(tag, attributes, children)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_html() {
        let html = r#"
        <html>
            <head><title>Annual Returns in Kenya</title></head>
            <body>
                <h1>Filing annual returns</h1>
                <section id="penalties"><p>Late filing attracts penalties.</p></section>
            </body>
        </html>
        "#;

        let tree = parse_html(html, "https://example.com/annual-returns");
        assert_eq!(tree.title().as_deref(), Some("Annual Returns in Kenya"));
        assert!(tree.element_by_id("penalties").is_some());
        assert_eq!(tree.url, "https://example.com/annual-returns");
    }

    #[test]
    fn keeps_json_ld_script_text() {
        let html = r#"<html><head>
            <script type="application/ld+json">{"@type":"FAQPage"}</script>
            <style>body { color: red }</style>
        </head><body></body></html>"#;

        let tree = parse_html(html, "https://example.com");
        let head = tree.head().expect("head");
        let script = head.find(&|n: &DomNode| n.tag == "script").expect("script");
        assert!(script.collect_text().contains("FAQPage"));
        let style = head.find(&|n: &DomNode| n.tag == "style").expect("style");
        assert!(style.children.is_empty());
    }

    #[test]
    fn fragment_without_skeleton_gets_head_and_body() {
        let tree = parse_html("<p>Only a paragraph</p>", "https://example.com");
        assert!(tree.head().is_some());
        assert!(tree.body().is_some());
    }
}
