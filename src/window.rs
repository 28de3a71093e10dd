//! Browser-side environment: the mounted document, its layout, the scroll
//! position and the scroll-listener registry.
//!
//! Everything runs on one thread. Listeners are invoked synchronously, in
//! registration order, for every scroll position the window passes through.
//! Code that may run outside a browser takes `Option<&mut Window>`; `None`
//! stands for a server-side pass where there is nothing to touch.

use crate::dom::DomTree;
use crate::render::layout::PageLayout;

/// Default viewport used by the inspector and tests.
pub const DEFAULT_VIEWPORT: (f32, f32) = (1280.0, 800.0);

/// One observed scroll position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollEvent {
    pub scroll_y: f32,
    pub viewport_height: f32,
    /// False for intermediate frames of a smooth scroll.
    pub settled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    /// Animate through `frames` eased positions; the last one is settled.
    Smooth { frames: u32 },
}

/// Handle returned by [`Window::add_scroll_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type ScrollListener = Box<dyn FnMut(&ScrollEvent, &PageLayout)>;

pub struct Window {
    document: DomTree,
    layout: PageLayout,
    viewport_width: f32,
    viewport_height: f32,
    scroll_y: f32,
    listeners: Vec<(ListenerId, ScrollListener)>,
    next_listener: u64,
}

impl Window {
    pub fn new(document: DomTree, viewport_width: f32, viewport_height: f32) -> Self {
        let layout = PageLayout::compute(&document, viewport_width);
        Self {
            document,
            layout,
            viewport_width,
            viewport_height,
            scroll_y: 0.0,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn document(&self) -> &DomTree {
        &self.document
    }

    /// Mutate the document and recompute layout afterwards.
    pub fn mutate<R>(&mut self, f: impl FnOnce(&mut DomTree) -> R) -> R {
        let out = f(&mut self.document);
        self.relayout();
        out
    }

    /// Replace the document (client-side navigation), keeping listeners.
    ///
    /// Scroll position resets to the top; no event is dispatched.
    pub fn replace_document(&mut self, document: DomTree) {
        self.document = document;
        self.scroll_y = 0.0;
        self.relayout();
    }

    pub fn relayout(&mut self) {
        self.layout = PageLayout::compute(&self.document, self.viewport_width);
        let max = self.max_scroll();
        if self.scroll_y > max {
            self.scroll_y = max;
        }
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn scroll_y(&self) -> f32 {
        self.scroll_y
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    /// Furthest the document can scroll.
    pub fn max_scroll(&self) -> f32 {
        (self.layout.document_height() - self.viewport_height).max(0.0)
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport_width = width;
        self.viewport_height = height;
        self.relayout();
        self.dispatch(true);
    }

    pub fn add_scroll_listener(
        &mut self,
        listener: impl FnMut(&ScrollEvent, &PageLayout) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        log::debug!("scroll listener {:?} added ({} total)", id, self.listeners.len());
        id
    }

    /// Detach a listener. Returns false if it was not registered.
    pub fn remove_scroll_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        let removed = self.listeners.len() < before;
        if removed {
            log::debug!("scroll listener {:?} removed ({} left)", id, self.listeners.len());
        }
        removed
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Scroll to `target`, clamped to the scrollable range.
    ///
    /// Returns the clamped position. Does nothing (and dispatches nothing) when
    /// already there.
    pub fn scroll_to(&mut self, target: f32, behavior: ScrollBehavior) -> f32 {
        let target = target.clamp(0.0, self.max_scroll());
        let from = self.scroll_y;
        if (target - from).abs() < f32::EPSILON {
            return target;
        }

        match behavior {
            ScrollBehavior::Instant => {
                self.scroll_y = target;
                self.dispatch(true);
            }
            ScrollBehavior::Smooth { frames } => {
                let frames = frames.max(1);
                for frame in 1..=frames {
                    let t = frame as f32 / frames as f32;
                    self.scroll_y = if frame == frames {
                        target
                    } else {
                        from + (target - from) * ease_in_out(t)
                    };
                    self.dispatch(frame == frames);
                }
            }
        }
        target
    }

    /// Scroll by a relative amount, as a wheel or keyboard would.
    pub fn scroll_by(&mut self, delta: f32) -> f32 {
        self.scroll_to(self.scroll_y + delta, ScrollBehavior::Instant)
    }

    fn dispatch(&mut self, settled: bool) {
        let event = ScrollEvent {
            scroll_y: self.scroll_y,
            viewport_height: self.viewport_height,
            settled,
        };
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event, &self.layout);
        }
    }
}

/// Cubic ease-in-out; monotonic on `[0, 1]`.
fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}
