//! HTML serialization for [`DomTree`].

use crate::dom::{DomNode, DomTree, NodeType};

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Raw-text elements: children are written unescaped.
const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

/// Serialize a whole document, doctype included.
pub fn to_html(tree: &DomTree) -> String {
    let mut out = String::from("<!DOCTYPE html>");
    write_node(&tree.root, &mut out, false);
    out
}

/// Serialize a single subtree.
pub fn node_to_html(node: &DomNode) -> String {
    let mut out = String::new();
    write_node(node, &mut out, false);
    out
}

fn write_node(node: &DomNode, out: &mut String, raw: bool) {
    match node.node_type {
        NodeType::Text => {
            if raw {
                // `</script>` inside JSON-LD would terminate the element early
                out.push_str(&node.text.replace("</", "<\\/"));
            } else {
                escape_into(&node.text, out, false);
            }
        }
        NodeType::Document => {
            for child in &node.children {
                write_node(child, out, false);
            }
        }
        NodeType::Element => {
            out.push('<');
            out.push_str(&node.tag);

            let mut attrs: Vec<(&String, &String)> = node.attributes.iter().collect();
            attrs.sort();
            for (name, value) in attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_into(value, out, true);
                out.push('"');
            }
            out.push('>');

            if VOID_TAGS.contains(&node.tag.as_str()) {
                return;
            }

            let child_raw = RAW_TEXT_TAGS.contains(&node.tag.as_str());
            for child in &node.children {
                write_node(child, out, child_raw);
            }

            out.push_str("</");
            out.push_str(&node.tag);
            out.push('>');
        }
    }
}

fn escape_into(s: &str, out: &mut String, attr: bool) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attr => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::parser::parse_html;

    #[test]
    fn escapes_text_and_attributes() {
        let node = DomNode::tag("p")
            .with_attr("title", "\"Fees\" & <charges>")
            .with_text("KES 1,000 < KES 2,000 & more");
        assert_eq!(
            node_to_html(&node),
            "<p title=\"&quot;Fees&quot; &amp; &lt;charges&gt;\">KES 1,000 &lt; KES 2,000 &amp; more</p>"
        );
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let node = DomNode::tag("meta")
            .with_attr("name", "robots")
            .with_attr("content", "index, follow");
        assert_eq!(node_to_html(&node), "<meta content=\"index, follow\" name=\"robots\">");
    }

    #[test]
    fn script_text_is_raw_but_cannot_close_early() {
        let node = DomNode::tag("script")
            .with_attr("type", "application/ld+json")
            .with_text(r#"{"text":"a < b </script>"}"#);
        let html = node_to_html(&node);
        assert!(html.contains(r#"a < b <\/script>"#));
        assert!(html.ends_with("</script>"));
    }

    #[test]
    fn reparse_preserves_ids_and_title() {
        let tree = parse_html(
            "<html><head><title>Land Disputes</title></head><body><section id=\"tribunals\">x</section></body></html>",
            "https://example.com",
        );
        let again = parse_html(&to_html(&tree), "https://example.com");
        assert_eq!(again.title().as_deref(), Some("Land Disputes"));
        assert!(again.element_by_id("tribunals").is_some());
    }
}
