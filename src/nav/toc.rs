//! Table-of-contents navigation.

use std::cell::RefCell;

use crate::error::{GuideError, Result};
use crate::nav::section::SectionList;
use crate::nav::tracker::SectionTracker;
use crate::render::layout::PageLayout;
use crate::window::{ScrollBehavior, Window};

/// Render-ready TOC entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub id: String,
    pub label: String,
    pub href: String,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct TocNavigator {
    sections: SectionList,
    header_offset: f32,
    smooth_frames: u32,
}

impl TocNavigator {
    pub fn new(sections: SectionList, header_offset: f32, smooth_frames: u32) -> Self {
        Self {
            sections,
            header_offset,
            smooth_frames,
        }
    }

    pub fn header_offset(&self) -> f32 {
        self.header_offset
    }

    /// Entries with the active flag taken from the tracker's state.
    pub fn entries(&self, active_id: &str) -> Vec<TocEntry> {
        self.sections
            .iter()
            .map(|s| TocEntry {
                id: s.id.clone(),
                label: s.label.clone(),
                href: s.href(),
                active: s.id == active_id,
            })
            .collect()
    }

    /// Scroll position that puts the section's top just below the header.
    pub fn scroll_target(&self, layout: &PageLayout, id: &str) -> Result<f32> {
        if self.sections.get(id).is_none() {
            return Err(GuideError::UnknownSection(id.to_string()));
        }
        let top = layout
            .offset_top(id)
            .ok_or_else(|| GuideError::MissingAnchor(id.to_string()))?;
        Ok((top - self.header_offset).max(0.0))
    }

    /// Target for a `#fragment` deep link.
    pub fn resolve_fragment(&self, layout: &PageLayout, fragment: &str) -> Result<f32> {
        self.scroll_target(layout, fragment.trim_start_matches('#'))
    }

    /// Handle a click on the entry for `id`.
    ///
    /// The tracker is marked active before the scroll starts; animation frames
    /// leave it alone and the settled frame confirms it. Returns the computed
    /// target (before clamping to the scrollable range).
    pub fn scroll_to_section(
        &self,
        window: &mut Window,
        tracker: &RefCell<SectionTracker>,
        id: &str,
    ) -> Result<f32> {
        let target = self.scroll_target(window.layout(), id)?;
        tracker.borrow_mut().begin_navigation(id)?;
        log::debug!("toc: scrolling to #{} at {}", id, target);
        window.scroll_to(
            target,
            ScrollBehavior::Smooth {
                frames: self.smooth_frames,
            },
        );
        Ok(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RootMargin;
    use crate::dom::{DomNode, DomTree};

    fn window_with(ids: &[(&str, f32)]) -> Window {
        let mut body = DomNode::tag("body");
        for (id, h) in ids {
            body.children.push(
                DomNode::tag("section")
                    .with_attr("id", *id)
                    .with_attr("style", format!("height: {}px; margin: 0", h)),
            );
        }
        Window::new(DomTree::with_body("https://example.com", body), 1280.0, 800.0)
    }

    fn sections() -> SectionList {
        SectionList::from_pairs([("s1", "One"), ("s2", "Two"), ("s3", "Three")]).expect("valid")
    }

    #[test]
    fn target_subtracts_header_offset() {
        let w = window_with(&[("s1", 900.0), ("s2", 900.0), ("s3", 900.0)]);
        let toc = TocNavigator::new(sections(), 96.0, 8);
        let top = w.layout().offset_top("s2").expect("s2");
        assert_eq!(toc.scroll_target(w.layout(), "s2").expect("target"), top - 96.0);
        assert_eq!(toc.resolve_fragment(w.layout(), "#s2").expect("target"), top - 96.0);
    }

    #[test]
    fn target_never_negative() {
        let w = window_with(&[("s1", 900.0), ("s2", 900.0), ("s3", 900.0)]);
        let toc = TocNavigator::new(sections(), 500.0, 8);
        assert_eq!(toc.scroll_target(w.layout(), "s1").expect("target"), 0.0);
    }

    #[test]
    fn click_marks_active_and_scrolls() {
        let mut w = window_with(&[("s1", 900.0), ("s2", 900.0), ("s3", 900.0)]);
        let toc = TocNavigator::new(sections(), 80.0, 8);
        let tracker = RefCell::new(SectionTracker::new(sections(), RootMargin::default()));

        let target = toc.scroll_to_section(&mut w, &tracker, "s2").expect("scroll");
        assert_eq!(w.scroll_y(), target);
        assert_eq!(tracker.borrow().active_id(), "s2");
        let entries = toc.entries(tracker.borrow().active_id());
        assert_eq!(entries.iter().filter(|e| e.active).count(), 1);
        assert_eq!(entries[1].href, "#s2");
        assert!(entries[1].active);
    }

    #[test]
    fn unknown_and_missing_ids_do_not_scroll() {
        let mut w = window_with(&[("s1", 900.0), ("s3", 900.0)]);
        let toc = TocNavigator::new(sections(), 80.0, 8);
        let tracker = RefCell::new(SectionTracker::new(sections(), RootMargin::default()));

        assert!(matches!(
            toc.scroll_to_section(&mut w, &tracker, "nope"),
            Err(GuideError::UnknownSection(_))
        ));
        assert!(matches!(
            toc.scroll_to_section(&mut w, &tracker, "s2"),
            Err(GuideError::MissingAnchor(_))
        ));
        assert_eq!(w.scroll_y(), 0.0);
        assert_eq!(tracker.borrow().active_id(), "s1");
    }
}
