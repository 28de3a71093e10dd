//! Scroll-spy: which section is the reader looking at.
//!
//! Every section is observed against a band near the top of the viewport
//! (see [`RootMargin`]). On each viewport change the tracker recomputes which
//! sections intersect the band, records the transitions the way an
//! intersection observer reports them, and activates the intersecting section
//! nearest the top of the document. When nothing intersects, the previous
//! section stays active.
//!
//! Because sections are laid out top to bottom without overlap, the first
//! intersecting section can only move forward while the band moves down, so a
//! continuous downward scroll never highlights an earlier entry.

use std::collections::HashSet;

use crate::config::RootMargin;
use crate::error::{GuideError, Result};
use crate::nav::section::{Section, SectionList};
use crate::render::layout::SectionGeometry;
use crate::window::ScrollEvent;

/// Intersection transition for one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntersectionEntry {
    pub id: String,
    pub is_intersecting: bool,
}

#[derive(Debug, Clone)]
pub struct SectionTracker {
    sections: SectionList,
    margin: RootMargin,
    active: usize,
    intersecting: Vec<bool>,
    /// Set while a programmatic scroll toward this index is animating.
    pending: Option<usize>,
    /// Ids already reported missing, so the warning is not repeated per frame.
    missing: HashSet<String>,
}

impl SectionTracker {
    pub fn new(sections: SectionList, margin: RootMargin) -> Self {
        let n = sections.len();
        Self {
            sections,
            margin,
            active: 0,
            intersecting: vec![false; n],
            pending: None,
            missing: HashSet::new(),
        }
    }

    pub fn sections(&self) -> &SectionList {
        &self.sections
    }

    pub fn margin(&self) -> RootMargin {
        self.margin
    }

    pub fn active(&self) -> &Section {
        &self.sections[self.active]
    }

    pub fn active_id(&self) -> &str {
        &self.sections[self.active].id
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active_id() == id
    }

    /// Ids currently inside the observation band, in document order.
    pub fn intersecting_ids(&self) -> Vec<&str> {
        self.sections
            .iter()
            .zip(&self.intersecting)
            .filter(|(_, hit)| **hit)
            .map(|(s, _)| s.id.as_str())
            .collect()
    }

    /// Force the active section, e.g. after a deep link.
    pub fn set_active(&mut self, id: &str) -> Result<()> {
        let idx = self
            .sections
            .position(id)
            .ok_or_else(|| GuideError::UnknownSection(id.to_string()))?;
        self.active = idx;
        Ok(())
    }

    /// Optimistically activate `id` ahead of a programmatic scroll.
    ///
    /// Frames of the scroll animation do not change the active section; the
    /// first settled event confirms or corrects it.
    pub fn begin_navigation(&mut self, id: &str) -> Result<()> {
        self.set_active(id)?;
        self.pending = Some(self.active);
        Ok(())
    }

    pub fn is_navigating(&self) -> bool {
        self.pending.is_some()
    }

    /// Recompute intersections for a viewport change.
    ///
    /// Returns the sections whose intersection state changed. Sections with
    /// no geometry are treated as not intersecting and do not stop the pass.
    pub fn observe<G>(&mut self, event: &ScrollEvent, geometry: &G) -> Vec<IntersectionEntry>
    where
        G: SectionGeometry + ?Sized,
    {
        let (start, end) = self.margin.band(event.scroll_y, event.viewport_height);
        let mut changes = Vec::new();

        for (i, section) in self.sections.iter().enumerate() {
            let hit = match geometry.section_rect(&section.id) {
                Ok(rect) => rect.overlaps(start, end),
                Err(e) => {
                    if self.missing.insert(section.id.clone()) {
                        log::warn!("scroll-spy skipping section: {}", e);
                    } else {
                        log::debug!("scroll-spy skipping section: {}", e);
                    }
                    false
                }
            };
            if hit != self.intersecting[i] {
                self.intersecting[i] = hit;
                changes.push(IntersectionEntry {
                    id: section.id.clone(),
                    is_intersecting: hit,
                });
            }
        }

        if self.pending.is_some() {
            if !event.settled {
                return changes;
            }
            self.pending = None;
        }

        if let Some(first) = self.intersecting.iter().position(|hit| *hit) {
            if first != self.active {
                log::debug!(
                    "active section {} -> {}",
                    self.sections[self.active].id,
                    self.sections[first].id
                );
            }
            self.active = first;
        }

        changes
    }
}
