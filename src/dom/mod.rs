pub mod css;
pub mod parser;
pub mod serialize;

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Document,
    Element,
    Text,
}

/// In-memory document node.
///
/// Element attributes are unordered; the serializer sorts them so output is
/// stable across runs.
#[derive(Debug, Clone, PartialEq)]
pub struct DomNode {
    pub tag: String,
    pub attributes: HashMap<String, String>,
    pub text: String,
    pub children: Vec<DomNode>,
    pub node_type: NodeType,
}

impl DomNode {
    pub fn document(children: Vec<DomNode>) -> Self {
        Self {
            tag: "#document".into(),
            attributes: HashMap::new(),
            text: String::new(),
            children,
            node_type: NodeType::Document,
        }
    }

    pub fn element(
        tag: impl Into<String>,
        attrs: HashMap<String, String>,
        children: Vec<DomNode>,
    ) -> Self {
        Self {
            tag: tag.into(),
            attributes: attrs,
            text: String::new(),
            children,
            node_type: NodeType::Element,
        }
    }

    pub fn text(content: impl Into<String>) -> Self {
        Self {
            tag: String::new(),
            attributes: HashMap::new(),
            text: content.into(),
            children: Vec::new(),
            node_type: NodeType::Text,
        }
    }

    /// Bare element with no attributes or children.
    pub fn tag(tag: impl Into<String>) -> Self {
        Self::element(tag, HashMap::new(), Vec::new())
    }

    /// Builder: set an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Builder: append a child node.
    pub fn with_child(mut self, child: DomNode) -> Self {
        self.children.push(child);
        self
    }

    /// Builder: append a text child.
    pub fn with_text(self, content: impl Into<String>) -> Self {
        self.with_child(DomNode::text(content))
    }

    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    /// Recursively count all nodes in this subtree
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(|c| c.node_count()).sum::<usize>()
    }

    /// Collect all text content recursively
    pub fn collect_text(&self) -> String {
        let mut buf = String::new();
        self.collect_text_inner(&mut buf);
        buf
    }

    fn collect_text_inner(&self, buf: &mut String) {
        if !self.text.is_empty() {
            if !buf.is_empty() {
                buf.push(' ');
            }
            buf.push_str(self.text.trim());
        }
        for child in &self.children {
            child.collect_text_inner(buf);
        }
    }

    /// Replace all children with a single text node.
    pub fn set_text_content(&mut self, content: impl Into<String>) {
        self.children = vec![DomNode::text(content)];
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Depth-first search for the first node matching `pred`, self included.
    pub fn find(&self, pred: &dyn Fn(&DomNode) -> bool) -> Option<&DomNode> {
        if pred(self) {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(pred))
    }

    pub fn find_mut(&mut self, pred: &dyn Fn(&DomNode) -> bool) -> Option<&mut DomNode> {
        if pred(self) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(pred))
    }

    /// All nodes matching `pred`, in document order.
    pub fn find_all<'a>(&'a self, pred: &dyn Fn(&DomNode) -> bool) -> Vec<&'a DomNode> {
        let mut out = Vec::new();
        collect_matching(self, pred, &mut out);
        out
    }

    /// Apply `f` to every node matching `pred`. Returns how many matched.
    pub fn for_each_mut(
        &mut self,
        pred: &dyn Fn(&DomNode) -> bool,
        f: &mut dyn FnMut(&mut DomNode),
    ) -> usize {
        let mut hits = 0;
        if pred(self) {
            f(self);
            hits += 1;
        }
        for child in &mut self.children {
            hits += child.for_each_mut(pred, f);
        }
        hits
    }

    /// Remove every descendant matching `pred`. Returns the number removed.
    pub fn remove_where(&mut self, pred: &dyn Fn(&DomNode) -> bool) -> usize {
        let before = self.children.len();
        self.children.retain(|c| !pred(c));
        let mut removed = before - self.children.len();
        for child in &mut self.children {
            removed += child.remove_where(pred);
        }
        removed
    }

    pub fn element_by_id(&self, id: &str) -> Option<&DomNode> {
        self.find(&|n: &DomNode| n.is_element() && n.id() == Some(id))
    }

    pub fn element_by_id_mut(&mut self, id: &str) -> Option<&mut DomNode> {
        self.find_mut(&|n: &DomNode| n.is_element() && n.id() == Some(id))
    }
}

fn collect_matching<'a>(
    node: &'a DomNode,
    pred: &dyn Fn(&DomNode) -> bool,
    out: &mut Vec<&'a DomNode>,
) {
    if pred(node) {
        out.push(node);
    }
    for child in &node.children {
        collect_matching(child, pred, out);
    }
}

/// Parsed document with its source URL.
///
/// `root` is always the `<html>` element; `head` and `body` are guaranteed to
/// exist for trees built by [`DomTree::new`] or the parser.
#[derive(Debug, Clone, PartialEq)]
pub struct DomTree {
    pub root: DomNode,
    pub url: String,
}

impl DomTree {
    /// Empty `<html><head></head><body></body></html>` skeleton.
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_body(url, DomNode::tag("body"))
    }

    pub fn with_body(url: impl Into<String>, body: DomNode) -> Self {
        let root = DomNode::tag("html")
            .with_attr("lang", "en")
            .with_child(DomNode::tag("head"))
            .with_child(body);
        Self {
            root,
            url: url.into(),
        }
    }

    fn ensure_child(&mut self, tag: &str) -> usize {
        match self.root.children.iter().position(|c| c.tag == tag) {
            Some(idx) => idx,
            None => {
                let idx = if tag == "head" { 0 } else { self.root.children.len() };
                self.root.children.insert(idx, DomNode::tag(tag));
                idx
            }
        }
    }

    pub fn head(&self) -> Option<&DomNode> {
        self.root.children.iter().find(|c| c.tag == "head")
    }

    /// Mutable `<head>`, created if the tree lacks one.
    pub fn head_mut(&mut self) -> &mut DomNode {
        let idx = self.ensure_child("head");
        &mut self.root.children[idx]
    }

    pub fn body(&self) -> Option<&DomNode> {
        self.root.children.iter().find(|c| c.tag == "body")
    }

    pub fn body_mut(&mut self) -> &mut DomNode {
        let idx = self.ensure_child("body");
        &mut self.root.children[idx]
    }

    /// Text of the first `<title>` in the head.
    pub fn title(&self) -> Option<String> {
        self.head()
            .and_then(|h| h.find(&|n: &DomNode| n.tag == "title"))
            .map(|t| t.collect_text())
    }

    pub fn element_by_id(&self, id: &str) -> Option<&DomNode> {
        self.root.element_by_id(id)
    }

    pub fn element_by_id_mut(&mut self, id: &str) -> Option<&mut DomNode> {
        self.root.element_by_id_mut(id)
    }
}
