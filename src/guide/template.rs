//! The one long-form guide template.

use crate::dom::{DomNode, DomTree};
use crate::guide::content::{
    Block, GuideContent, FAQ_SECTION_ID, FAQ_SECTION_LABEL, HEADING_SUFFIX,
};
use crate::nav::accordion::FaqAccordion;
use crate::nav::section::SectionList;

pub const TOC_ID: &str = "toc";

/// Render a guide into a full document (head left empty for the head manager).
pub fn render_guide(content: &GuideContent) -> DomTree {
    let mut body =
        DomNode::tag("body").with_child(site_header(content, content.behavior.header_offset));

    if !content.breadcrumbs.is_empty() {
        body.children.push(breadcrumbs(content));
    }

    let mut article = DomNode::tag("article")
        .with_attr("class", "guide")
        .with_child(DomNode::tag("h1").with_text(content.heading.as_str()));
    if let Some(summary) = &content.summary {
        article.children.push(
            DomNode::tag("p")
                .with_attr("class", "guide-summary")
                .with_text(summary.as_str()),
        );
    }

    match content.section_list() {
        Ok(sections) => article.children.push(toc(&sections)),
        Err(e) => log::warn!("{}: rendering without a table of contents: {}", content.slug, e),
    }

    for section in &content.sections {
        let mut el = section_shell(&section.id, &section.label);
        el.children.extend(section.blocks.iter().map(render_block));
        article.children.push(el);
    }

    if !content.faqs.is_empty() {
        article.children.push(faq_section(content));
    }

    body.children.push(
        DomNode::tag("main")
            .with_attr("id", "main")
            .with_child(article),
    );
    body.children.push(site_footer(content));

    DomTree::with_body(content.metadata.canonical_url.as_str(), body)
}

fn site_header(content: &GuideContent, height: f32) -> DomNode {
    let (name, url) = match &content.organization {
        Some(org) => (org.name.as_str(), org.url.as_str()),
        None => ("Home", "/"),
    };
    DomNode::tag("header")
        .with_attr("class", "site-header")
        .with_attr("role", "banner")
        .with_attr("style", format!("height: {}px; margin: 0", height))
        .with_child(
            DomNode::tag("a")
                .with_attr("class", "brand")
                .with_attr("href", url)
                .with_text(name),
        )
}

fn site_footer(content: &GuideContent) -> DomNode {
    let mut footer = DomNode::tag("footer").with_attr("class", "site-footer");
    if let Some(org) = &content.organization {
        let mut line = org.name.clone();
        if let Some(phone) = &org.telephone {
            line.push_str(" · ");
            line.push_str(phone);
        }
        footer.children.push(DomNode::tag("p").with_text(line));
    }
    footer.children.push(
        DomNode::tag("p")
            .with_attr("class", "disclaimer")
            .with_text("This guide is general information, not legal advice."),
    );
    footer
}

fn breadcrumbs(content: &GuideContent) -> DomNode {
    let mut list = DomNode::tag("ol");
    let last = content.breadcrumbs.len().saturating_sub(1);
    for (i, crumb) in content.breadcrumbs.iter().enumerate() {
        let item = if i == last {
            DomNode::tag("span")
                .with_attr("aria-current", "page")
                .with_text(crumb.name.as_str())
        } else {
            DomNode::tag("a")
                .with_attr("href", crumb.url.as_str())
                .with_text(crumb.name.as_str())
        };
        list.children.push(DomNode::tag("li").with_child(item));
    }
    DomNode::tag("nav")
        .with_attr("class", "breadcrumbs")
        .with_attr("aria-label", "Breadcrumb")
        .with_child(list)
}

fn toc(sections: &SectionList) -> DomNode {
    let mut list = DomNode::tag("ol");
    for section in sections.iter() {
        let link = DomNode::tag("a")
            .with_attr("class", "toc-link")
            .with_attr("href", section.href())
            .with_attr("data-section", section.id.as_str())
            .with_text(section.label.as_str());
        list.children.push(DomNode::tag("li").with_child(link));
    }
    let mut nav = DomNode::tag("nav")
        .with_attr("id", TOC_ID)
        .with_attr("class", "toc")
        .with_attr("aria-label", "Table of contents")
        .with_child(DomNode::tag("h2").with_text("On this page"))
        .with_child(list);
    mark_active_toc(&mut nav, &sections.first().id);
    nav
}

fn section_shell(id: &str, label: &str) -> DomNode {
    let heading_id = format!("{}{}", id, HEADING_SUFFIX);
    DomNode::tag("section")
        .with_attr("id", id)
        .with_attr("class", "guide-section")
        .with_attr("aria-labelledby", heading_id.as_str())
        .with_child(
            DomNode::tag("h2")
                .with_attr("id", heading_id)
                .with_text(label),
        )
}

fn render_block(block: &Block) -> DomNode {
    match block {
        Block::Paragraph { text } => DomNode::tag("p").with_text(text.as_str()),
        Block::List { items, ordered } => {
            let mut list = DomNode::tag(if *ordered { "ol" } else { "ul" });
            for item in items {
                list.children.push(DomNode::tag("li").with_text(item.as_str()));
            }
            list
        }
        Block::Table {
            caption,
            headers,
            rows,
        } => {
            let mut table = DomNode::tag("table");
            if let Some(caption) = caption {
                table.children.push(DomNode::tag("caption").with_text(caption.as_str()));
            }
            let mut head_row = DomNode::tag("tr");
            for h in headers {
                head_row.children.push(
                    DomNode::tag("th")
                        .with_attr("scope", "col")
                        .with_text(h.as_str()),
                );
            }
            table.children.push(DomNode::tag("thead").with_child(head_row));

            let mut tbody = DomNode::tag("tbody");
            for row in rows {
                let mut tr = DomNode::tag("tr");
                for cell in row {
                    tr.children.push(DomNode::tag("td").with_text(cell.as_str()));
                }
                tbody.children.push(tr);
            }
            table.children.push(tbody);
            DomNode::tag("div")
                .with_attr("class", "table-wrap")
                .with_child(table)
        }
        Block::Steps { steps } => {
            let mut list = DomNode::tag("ol").with_attr("class", "steps");
            for step in steps {
                list.children.push(
                    DomNode::tag("li")
                        .with_attr("class", "step")
                        .with_child(DomNode::tag("h3").with_text(step.name.as_str()))
                        .with_child(DomNode::tag("p").with_text(step.text.as_str())),
                );
            }
            list
        }
        Block::Callout { title, text } => {
            let mut aside = DomNode::tag("aside")
                .with_attr("class", "callout")
                .with_attr("role", "note");
            if let Some(title) = title {
                aside.children.push(DomNode::tag("strong").with_text(title.as_str()));
            }
            aside.with_child(DomNode::tag("p").with_text(text.as_str()))
        }
    }
}

fn faq_section(content: &GuideContent) -> DomNode {
    let accordion = FaqAccordion::new(FAQ_SECTION_ID, content.faqs.len());
    let mut list = DomNode::tag("div").with_attr("class", "faq-list");

    for (i, faq) in content.faqs.iter().enumerate() {
        let trigger = DomNode::tag("button")
            .with_attr("type", "button")
            .with_attr("class", "faq-trigger")
            .with_attr("id", accordion.trigger_id(i))
            .with_attr("aria-expanded", accordion.aria_expanded(i))
            .with_attr("aria-controls", accordion.panel_id(i))
            .with_text(faq.question.as_str());
        let panel = DomNode::tag("div")
            .with_attr("class", "faq-panel")
            .with_attr("id", accordion.panel_id(i))
            .with_attr("role", "region")
            .with_attr("aria-labelledby", accordion.trigger_id(i))
            .with_attr("hidden", "")
            .with_child(DomNode::tag("p").with_text(faq.answer.as_str()));
        list.children.push(
            DomNode::tag("div")
                .with_attr("class", "faq-item")
                .with_child(DomNode::tag("h3").with_child(trigger))
                .with_child(panel),
        );
    }

    section_shell(FAQ_SECTION_ID, FAQ_SECTION_LABEL).with_child(list)
}

/// Move `aria-current` and the `active` class to the TOC link for `active_id`.
///
/// `root` may be the whole document or just the TOC nav. Returns how many
/// links were visited.
pub fn mark_active_toc(root: &mut DomNode, active_id: &str) -> usize {
    root.for_each_mut(
        &|n: &DomNode| n.tag == "a" && n.attr("data-section").is_some(),
        &mut |link: &mut DomNode| {
            if link.attr("data-section") == Some(active_id) {
                link.set_attr("aria-current", "true");
                link.set_attr("class", "toc-link active");
            } else {
                link.remove_attr("aria-current");
                link.set_attr("class", "toc-link");
            }
        },
    )
}

/// Reflect accordion state in trigger `aria-expanded` and panel `hidden`.
pub fn sync_faq(root: &mut DomNode, accordion: &FaqAccordion) {
    for i in 0..accordion.len() {
        let expanded = accordion.is_expanded(i);
        if let Some(trigger) = root.element_by_id_mut(&accordion.trigger_id(i)) {
            trigger.set_attr("aria-expanded", accordion.aria_expanded(i));
        }
        if let Some(panel) = root.element_by_id_mut(&accordion.panel_id(i)) {
            if expanded {
                panel.remove_attr("hidden");
            } else {
                panel.set_attr("hidden", "");
            }
        }
    }
}

/// Mismatches between the section list and the rendered document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorReport {
    /// Section ids with no element.
    pub missing: Vec<String>,
    /// Section ids carried by more than one element.
    pub duplicated: Vec<String>,
}

impl AnchorReport {
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty() && self.duplicated.is_empty()
    }
}

/// Check that every section id resolves to exactly one element.
pub fn check_anchors(doc: &DomTree, sections: &SectionList) -> AnchorReport {
    let mut report = AnchorReport::default();
    for id in sections.ids() {
        let hits = doc
            .root
            .find_all(&|n: &DomNode| n.is_element() && n.id() == Some(id))
            .len();
        match hits {
            0 => report.missing.push(id.to_string()),
            1 => {}
            _ => report.duplicated.push(id.to_string()),
        }
    }
    report
}
