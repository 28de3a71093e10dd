//! In-page navigation: sections, scroll-spy, table of contents, FAQ accordion.

pub mod accordion;
pub mod section;
pub mod toc;
pub mod tracker;

pub use accordion::FaqAccordion;
pub use section::{Section, SectionList};
pub use toc::{TocEntry, TocNavigator};
pub use tracker::{IntersectionEntry, SectionTracker};
