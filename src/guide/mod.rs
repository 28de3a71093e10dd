//! Long-form guide pages: content data, the shared template, the bundled
//! catalog and the mount lifecycle.

pub mod catalog;
pub mod content;
pub mod page;
pub mod template;

pub use content::{Block, ContentSection, GuideContent, HowToSpec};
pub use page::MountedGuide;
pub use template::{check_anchors, render_guide, AnchorReport};
