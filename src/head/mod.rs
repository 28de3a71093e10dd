//! Document head: metadata, JSON-LD builders and the upserting manager.

pub mod manager;
pub mod metadata;
pub mod schema;

pub use manager::{HeadManager, HeadSnapshot, MetadataInjector};
pub use metadata::{HeadTag, HeadTarget, OpenGraph, PageMetadata, Robots, TwitterCard};

use crate::window::Window;

/// Apply `meta` through `manager` if there is a window to apply it to.
///
/// Outside a browser (`None`) this does nothing.
pub fn apply_metadata<H: HeadManager + ?Sized>(
    window: Option<&mut Window>,
    manager: &mut H,
    meta: &PageMetadata,
) {
    match window {
        Some(w) => w.mutate(|doc| manager.set(doc, meta)),
        None => log::debug!("no window; skipping head update for {}", meta.canonical_url),
    }
}

/// Counterpart of [`apply_metadata`].
pub fn clear_metadata<H: HeadManager + ?Sized>(window: Option<&mut Window>, manager: &mut H) {
    if let Some(w) = window {
        w.mutate(|doc| manager.clear(doc));
    }
}
