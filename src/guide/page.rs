//! Mount/unmount lifecycle for a guide page.
//!
//! Mounting renders the guide into the window's body, applies its metadata,
//! and registers exactly one scroll listener feeding the section tracker.
//! Unmounting detaches the listener and clears the head. Without a window
//! (server-side pass) the guide is "detached": state works, DOM work is skipped.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::BehaviorConfig;
use crate::error::Result;
use crate::guide::content::{GuideContent, FAQ_SECTION_ID};
use crate::guide::template::{mark_active_toc, render_guide, sync_faq};
use crate::head::{apply_metadata, clear_metadata, MetadataInjector, PageMetadata};
use crate::nav::accordion::FaqAccordion;
use crate::nav::section::SectionList;
use crate::nav::toc::{TocEntry, TocNavigator};
use crate::nav::tracker::SectionTracker;
use crate::window::{ListenerId, ScrollBehavior, ScrollEvent, Window};

pub struct MountedGuide {
    slug: String,
    metadata: PageMetadata,
    behavior: BehaviorConfig,
    tracker: Rc<RefCell<SectionTracker>>,
    toc: TocNavigator,
    faq: FaqAccordion,
    head: MetadataInjector,
    listener: Option<ListenerId>,
}

impl MountedGuide {
    pub fn mount(window: Option<&mut Window>, content: &GuideContent) -> Result<Self> {
        let sections = content.section_list()?;
        let behavior = content.behavior;
        let tracker = Rc::new(RefCell::new(SectionTracker::new(
            sections.clone(),
            behavior.root_margin,
        )));

        let mut guide = Self {
            slug: content.slug.clone(),
            metadata: content.page_metadata(),
            behavior,
            tracker,
            toc: TocNavigator::new(
                sections,
                behavior.header_offset,
                behavior.smooth_scroll_frames,
            ),
            faq: FaqAccordion::new(FAQ_SECTION_ID, content.faqs.len()),
            head: MetadataInjector::new(),
            listener: None,
        };

        let Some(window) = window else {
            log::debug!("{}: mounted detached", guide.slug);
            return Ok(guide);
        };

        if !behavior.root_margin.is_usable(window.viewport_height()) {
            log::warn!(
                "{}: root margin leaves no observation band at viewport height {}",
                guide.slug,
                window.viewport_height()
            );
        }

        let rendered = render_guide(content);
        window.mutate(|doc| {
            if let Some(body) = rendered.body() {
                *doc.body_mut() = body.clone();
            }
            doc.url = rendered.url.clone();
        });
        window.scroll_to(0.0, ScrollBehavior::Instant);
        apply_metadata(Some(&mut *window), &mut guide.head, &guide.metadata);

        let sink = Rc::clone(&guide.tracker);
        guide.listener = Some(window.add_scroll_listener(move |event, layout| {
            sink.borrow_mut().observe(event, layout);
        }));

        // Seed intersection state for the initial position.
        let initial = ScrollEvent {
            scroll_y: window.scroll_y(),
            viewport_height: window.viewport_height(),
            settled: true,
        };
        guide.tracker.borrow_mut().observe(&initial, window.layout());
        guide.sync_toc(window);

        log::info!(
            "{}: mounted with {} sections",
            guide.slug,
            guide.toc_entries().len()
        );
        Ok(guide)
    }

    /// Tear down: detach the scroll listener and clear managed head state.
    pub fn unmount(mut self, window: Option<&mut Window>) {
        match window {
            Some(window) => {
                if let Some(id) = self.listener.take() {
                    window.remove_scroll_listener(id);
                }
                clear_metadata(Some(window), &mut self.head);
                log::info!("{}: unmounted", self.slug);
            }
            None => {
                if self.listener.take().is_some() {
                    log::warn!("{}: unmounted without its window; listener leaked", self.slug);
                }
            }
        }
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn metadata(&self) -> &PageMetadata {
        &self.metadata
    }

    pub fn behavior(&self) -> BehaviorConfig {
        self.behavior
    }

    pub fn is_attached(&self) -> bool {
        self.listener.is_some()
    }

    pub fn sections(&self) -> SectionList {
        self.tracker.borrow().sections().clone()
    }

    pub fn active_section(&self) -> String {
        self.tracker.borrow().active_id().to_string()
    }

    pub fn tracker(&self) -> Rc<RefCell<SectionTracker>> {
        Rc::clone(&self.tracker)
    }

    pub fn toc_entries(&self) -> Vec<TocEntry> {
        self.toc.entries(self.tracker.borrow().active_id())
    }

    /// TOC click: mark `id` active now and smooth-scroll to it.
    pub fn navigate(&self, window: &mut Window, id: &str) -> Result<f32> {
        let target = self.toc.scroll_to_section(window, &self.tracker, id)?;
        self.sync_toc(window);
        Ok(target)
    }

    /// Jump straight to a `#fragment` deep link.
    pub fn open_fragment(&self, window: &mut Window, fragment: &str) -> Result<f32> {
        let target = self.toc.resolve_fragment(window.layout(), fragment)?;
        self.tracker
            .borrow_mut()
            .begin_navigation(fragment.trim_start_matches('#'))?;
        window.scroll_to(target, ScrollBehavior::Instant);
        self.sync_toc(window);
        Ok(target)
    }

    /// Write the tracker's active section into the TOC markup.
    pub fn sync_toc(&self, window: &mut Window) {
        let active = self.active_section();
        window.mutate(|doc| mark_active_toc(&mut doc.root, &active));
    }

    pub fn faq(&self) -> &FaqAccordion {
        &self.faq
    }

    /// FAQ click. Updates the markup (and so the layout) when attached.
    pub fn toggle_faq(&mut self, window: Option<&mut Window>, index: usize) -> Option<usize> {
        let expanded = self.faq.toggle(index);
        if let Some(window) = window {
            let faq = &self.faq;
            window.mutate(|doc| sync_faq(&mut doc.root, faq));
        }
        expanded
    }
}

impl Drop for MountedGuide {
    fn drop(&mut self) {
        if self.listener.is_some() {
            log::warn!("{}: dropped while mounted; call unmount", self.slug);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::DomTree;
    use crate::guide::catalog;
    use crate::guide::template::check_anchors;
    use crate::head::HeadSnapshot;
    use crate::window::DEFAULT_VIEWPORT;
    use pretty_assertions::assert_eq;

    fn window() -> Window {
        let (w, h) = DEFAULT_VIEWPORT;
        Window::new(DomTree::new("https://example.co.ke/"), w, h)
    }

    fn content() -> GuideContent {
        catalog::load("annual-returns").expect("bundled guide")
    }

    #[test]
    fn mount_registers_once_and_unmount_cleans_up() {
        let mut w = window();
        let before = HeadSnapshot::read(w.document());

        for _ in 0..3 {
            let guide = MountedGuide::mount(Some(&mut w), &content()).expect("mount");
            assert_eq!(w.listener_count(), 1);
            let snap = HeadSnapshot::read(w.document());
            assert_eq!(snap.titles.len(), 1);
            assert_eq!(snap.json_ld.len(), guide.metadata().structured_data.len());
            guide.unmount(Some(&mut w));
            assert_eq!(w.listener_count(), 0);
        }

        assert_eq!(HeadSnapshot::read(w.document()), before);
    }

    #[test]
    fn mount_renders_every_anchor() {
        let mut w = window();
        let guide = MountedGuide::mount(Some(&mut w), &content()).expect("mount");
        assert!(check_anchors(w.document(), &guide.sections()).is_clean());
        assert_eq!(guide.active_section(), guide.sections().first().id);
        guide.unmount(Some(&mut w));
    }

    #[test]
    fn click_to_scroll_accuracy() {
        let mut w = window();
        let guide = MountedGuide::mount(Some(&mut w), &content()).expect("mount");
        let second = guide.sections()[1].id.clone();

        // The listener registered by mount sees every frame; a probe added
        // after it records what the tracker reports mid-animation.
        let tracker = guide.tracker();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let probe = w.add_scroll_listener(move |e, _| {
            sink.borrow_mut().push((e.settled, tracker.borrow().active_id().to_string()));
        });

        let offset_top = w.layout().offset_top(&second).expect("anchor");
        let target = guide.navigate(&mut w, &second).expect("navigate");
        assert_eq!(target, offset_top - guide.behavior().header_offset);
        assert_eq!(w.scroll_y(), target);
        assert_eq!(guide.active_section(), second);

        let frames = seen.borrow();
        assert!(!frames.is_empty());
        assert!(frames.iter().all(|(_, id)| *id == second));

        let entries = guide.toc_entries();
        assert!(entries.iter().any(|e| e.id == second && e.active));
        let link = w
            .document()
            .root
            .find(&|n: &crate::dom::DomNode| n.attr("data-section") == Some(second.as_str()))
            .expect("toc link");
        assert_eq!(link.attr("aria-current"), Some("true"));

        w.remove_scroll_listener(probe);
        guide.unmount(Some(&mut w));
    }

    #[test]
    fn monotonic_highlighting_over_full_page() {
        let mut w = window();
        let guide = MountedGuide::mount(Some(&mut w), &content()).expect("mount");
        let sections = guide.sections();
        let order_of = |id: &str| sections.get(id).map(|s| s.order).expect("known id");

        let mut last = order_of(&guide.active_section());
        let mut visited = vec![guide.active_section()];
        while w.scroll_y() < w.max_scroll() {
            w.scroll_by(37.0);
            let active = guide.active_section();
            let order = order_of(&active);
            assert!(order >= last, "{} came after a later section", active);
            if visited.last() != Some(&active) {
                visited.push(active);
            }
            last = order;
        }
        assert!(visited.len() > 1);
        guide.unmount(Some(&mut w));
    }

    #[test]
    fn missing_anchor_degrades_gracefully() {
        let mut w = window();
        let guide = MountedGuide::mount(Some(&mut w), &content()).expect("mount");
        let sections = guide.sections();
        let broken = sections[1].id.clone();
        w.mutate(|doc| {
            if let Some(el) = doc.element_by_id_mut(&broken) {
                el.set_attr("id", "renamed");
            }
        });

        for _ in 0..40 {
            w.scroll_by(60.0);
        }
        let active = guide.active_section();
        assert_ne!(active, broken);
        assert!(sections.get(&active).is_some());

        assert!(matches!(
            guide.navigate(&mut w, &broken),
            Err(crate::error::GuideError::MissingAnchor(_))
        ));
        let third = sections[2].id.clone();
        assert!(guide.navigate(&mut w, &third).is_ok());
        assert_eq!(guide.active_section(), third);
        guide.unmount(Some(&mut w));
    }

    #[test]
    fn detached_mount_does_no_dom_work() {
        let guide = MountedGuide::mount(None, &content()).expect("mount");
        assert!(!guide.is_attached());
        assert_eq!(guide.toc_entries().len(), guide.sections().len());
        guide.unmount(None);
    }

    #[test]
    fn faq_accordion_drives_markup() {
        let mut w = window();
        let mut guide = MountedGuide::mount(Some(&mut w), &content()).expect("mount");
        let panel = guide.faq().panel_id(1);

        assert_eq!(guide.toggle_faq(Some(&mut w), 1), Some(1));
        assert!(w.layout().rect(&panel).is_some());
        assert_eq!(guide.toggle_faq(Some(&mut w), 1), None);
        assert!(w.layout().rect(&panel).is_none());

        guide.toggle_faq(Some(&mut w), 0);
        assert_eq!(guide.toggle_faq(Some(&mut w), 2), Some(2));
        let open = w
            .document()
            .root
            .find_all(&|n: &crate::dom::DomNode| n.attr("aria-expanded") == Some("true"));
        assert_eq!(open.len(), 1);
        guide.unmount(Some(&mut w));
    }

    #[test]
    fn deep_link_resolves_to_section() {
        let mut w = window();
        let guide = MountedGuide::mount(Some(&mut w), &content()).expect("mount");
        let id = guide.sections()[1].id.clone();
        let target = guide
            .open_fragment(&mut w, &format!("#{}", id))
            .expect("fragment");
        assert_eq!(w.scroll_y(), target);
        assert_eq!(guide.active_section(), id);
        assert!(!guide.tracker().borrow().is_navigating());

        assert!(matches!(
            guide.open_fragment(&mut w, "#nowhere"),
            Err(crate::error::GuideError::UnknownSection(_))
        ));
        guide.unmount(Some(&mut w));
    }

    #[test]
    fn switching_guides_leaves_one_set_of_tags() {
        let mut w = window();
        let first = MountedGuide::mount(Some(&mut w), &content()).expect("mount");
        first.unmount(Some(&mut w));
        let other = catalog::load("land-disputes").expect("bundled guide");
        let second = MountedGuide::mount(Some(&mut w), &other).expect("mount");

        let snap = HeadSnapshot::read(w.document());
        assert_eq!(snap.titles, vec![other.metadata.title.clone()]);
        assert_eq!(snap.meta_count("description"), 1);
        assert_eq!(snap.json_ld.len(), second.metadata().structured_data.len());
        second.unmount(Some(&mut w));
    }
}
