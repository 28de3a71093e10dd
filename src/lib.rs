//! Long-form legal guide pages: one template driven by content data, with
//! document-head management, scroll-spy section tracking, TOC navigation and
//! FAQ accordions.

pub mod config;
pub mod dom;
pub mod error;
pub mod guide;
pub mod head;
pub mod nav;
pub mod render;
pub mod window;

pub use error::{GuideError, Result};
