use std::collections::HashMap;

use crate::dom::css::parse_inline_style;
use crate::dom::{DomNode, DomTree, NodeType};
use crate::error::{GuideError, Result};

/// Document-relative bounding box for a laid-out node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl LayoutBox {
    pub fn top(&self) -> f32 {
        self.y
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Whether the box overlaps the half-open vertical band `[start, end)`.
    pub fn overlaps(&self, start: f32, end: f32) -> bool {
        self.top() < end && self.bottom() > start
    }
}

/// A DOM node with computed layout
#[derive(Debug, Clone)]
pub struct LayoutNode {
    pub tag: String,
    pub id: Option<String>,
    pub bounds: LayoutBox,
    pub children: Vec<LayoutNode>,
    pub is_block: bool,
    pub font_size: f32,
}

const BLOCK_TAGS: &[&str] = &[
    "html",
    "body",
    "div",
    "p",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "ul",
    "ol",
    "li",
    "table",
    "caption",
    "thead",
    "tbody",
    "tr",
    "form",
    "section",
    "article",
    "aside",
    "main",
    "header",
    "footer",
    "nav",
    "blockquote",
    "pre",
    "figure",
    "figcaption",
    "details",
    "summary",
    "dl",
    "dt",
    "dd",
];

/// Elements that never produce boxes.
const NON_RENDERED: &[&str] = &[
    "head", "title", "meta", "link", "script", "style", "noscript", "template",
];

/// Per-tag vertical margins (top, bottom) in pixels.
fn tag_margins(tag: &str) -> (f32, f32) {
    match tag {
        "h1" => (24.0, 16.0),
        "h2" => (20.0, 12.0),
        "h3" | "h4" => (16.0, 10.0),
        "h5" | "h6" => (12.0, 8.0),
        "p" => (4.0, 10.0),
        "ul" | "ol" => (8.0, 8.0),
        "li" => (2.0, 2.0),
        "table" => (8.0, 8.0),
        "section" | "article" | "main" => (16.0, 16.0),
        "nav" | "header" | "footer" => (12.0, 12.0),
        "blockquote" => (12.0, 12.0),
        "pre" => (8.0, 8.0),
        "hr" => (8.0, 8.0),
        _ => (0.0, 0.0),
    }
}

/// Per-tag padding in pixels.
fn tag_padding(tag: &str, is_block: bool) -> f32 {
    match tag {
        "section" | "article" | "main" | "aside" => 16.0,
        "nav" | "header" | "footer" => 12.0,
        "blockquote" => 20.0,
        "td" | "th" => 6.0,
        _ if is_block => 4.0,
        _ => 0.0,
    }
}

fn is_rendered(node: &DomNode) -> bool {
    match node.node_type {
        NodeType::Text => true,
        NodeType::Document => true,
        NodeType::Element => {
            !NON_RENDERED.contains(&node.tag.as_str())
                && node.attr("hidden").is_none()
                && !node
                    .attr("style")
                    .map(|s| parse_inline_style(s).display_none)
                    .unwrap_or(false)
        }
    }
}

/// Compute layout for a DOM tree (simple top-to-bottom block model).
pub fn compute_layout(root: &DomNode, viewport_width: f32) -> LayoutNode {
    let mut cursor_y = 0.0;
    layout_node(root, 0.0, &mut cursor_y, viewport_width, 16.0)
}

fn layout_node(
    node: &DomNode,
    x: f32,
    cursor_y: &mut f32,
    available_width: f32,
    parent_font_size: f32,
) -> LayoutNode {
    let is_block =
        node.node_type == NodeType::Element && BLOCK_TAGS.contains(&node.tag.as_str());
    let style = node.attr("style").map(parse_inline_style).unwrap_or_default();

    let font_size = style.font_size.unwrap_or(match node.tag.as_str() {
        "h1" => 32.0,
        "h2" => 24.0,
        "h3" => 20.0,
        "h4" => 18.0,
        "h5" | "h6" => 16.0,
        "small" => 12.0,
        _ => parent_font_size,
    });

    let (default_top, default_bottom) = tag_margins(&node.tag);
    let margin_top = style.margin_top.unwrap_or(default_top);
    let margin_bottom = style.margin_bottom.unwrap_or(default_bottom);
    let padding = tag_padding(&node.tag, is_block);

    if is_block {
        *cursor_y += margin_top;
    }

    let start_y = *cursor_y;

    if padding > 0.0 {
        *cursor_y += padding;
    }

    let child_x = x + padding;
    let child_width = (available_width - padding * 2.0).max(0.0);
    let mut children = Vec::new();

    for child in &node.children {
        if !is_rendered(child) {
            continue;
        }
        let laid_out = layout_node(child, child_x, cursor_y, child_width, font_size);
        children.push(laid_out);
    }

    // Text content contributes to height
    if node.node_type == NodeType::Text && !node.text.trim().is_empty() {
        let line_height = font_size * 1.4;
        let chars_per_line = (available_width / (font_size * 0.6)).max(1.0) as usize;
        let lines = (node.text.len() as f32 / chars_per_line as f32).ceil().max(1.0);
        *cursor_y += lines * line_height;
    }

    if padding > 0.0 {
        *cursor_y += padding;
    }

    // Explicit heights override the flow height; min-height only grows it.
    let flow_height = *cursor_y - start_y;
    let height = match (style.height, style.min_height) {
        (Some(h), _) => h,
        (None, Some(min)) => flow_height.max(min),
        (None, None) => flow_height,
    };
    *cursor_y = start_y + height;

    if is_block {
        *cursor_y += margin_bottom;
    }

    LayoutNode {
        tag: node.tag.clone(),
        id: node.id().map(str::to_string),
        bounds: LayoutBox {
            x,
            y: start_y,
            width: available_width,
            height,
        },
        children,
        is_block,
        font_size,
    }
}

/// Source of section geometry.
///
/// Implemented by [`PageLayout`]; tests substitute fixed tables.
pub trait SectionGeometry {
    /// Document-relative box of the element carrying `id`.
    fn section_rect(&self, id: &str) -> Result<LayoutBox>;
}

/// Laid-out document plus an index of anchored elements.
#[derive(Debug, Clone)]
pub struct PageLayout {
    root: LayoutNode,
    anchors: HashMap<String, LayoutBox>,
    document_height: f32,
}

impl PageLayout {
    pub fn compute(tree: &DomTree, viewport_width: f32) -> Self {
        let root = compute_layout(&tree.root, viewport_width);
        let mut anchors = HashMap::new();
        index_anchors(&root, &mut anchors);
        let document_height = root.bounds.bottom();
        Self {
            root,
            anchors,
            document_height,
        }
    }

    pub fn root(&self) -> &LayoutNode {
        &self.root
    }

    pub fn rect(&self, id: &str) -> Option<LayoutBox> {
        self.anchors.get(id).copied()
    }

    /// Distance from the document top to the element's top edge.
    pub fn offset_top(&self, id: &str) -> Option<f32> {
        self.rect(id).map(|b| b.top())
    }

    pub fn document_height(&self) -> f32 {
        self.document_height
    }
}

impl SectionGeometry for PageLayout {
    fn section_rect(&self, id: &str) -> Result<LayoutBox> {
        self.rect(id)
            .ok_or_else(|| GuideError::MissingAnchor(id.to_string()))
    }
}

fn index_anchors(node: &LayoutNode, anchors: &mut HashMap<String, LayoutBox>) {
    if let Some(id) = &node.id {
        if anchors.contains_key(id) {
            log::warn!("duplicate element id \"{}\"; keeping the first", id);
        } else {
            anchors.insert(id.clone(), node.bounds);
        }
    }
    for child in &node.children {
        index_anchors(child, anchors);
    }
}
