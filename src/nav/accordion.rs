//! Single-open FAQ accordion.

/// At most one entry is expanded; toggling the expanded entry collapses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaqAccordion {
    prefix: String,
    len: usize,
    expanded: Option<usize>,
}

impl FaqAccordion {
    /// `prefix` namespaces the trigger/panel ids (`{prefix}-q-{i}`, `{prefix}-a-{i}`).
    pub fn new(prefix: impl Into<String>, len: usize) -> Self {
        Self {
            prefix: prefix.into(),
            len,
            expanded: None,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn expanded(&self) -> Option<usize> {
        self.expanded
    }

    /// Click on entry `index`. Out-of-range clicks are ignored.
    pub fn toggle(&mut self, index: usize) -> Option<usize> {
        if index >= self.len {
            log::warn!("faq toggle {} out of range (len {})", index, self.len);
            return self.expanded;
        }
        self.expanded = if self.expanded == Some(index) {
            None
        } else {
            Some(index)
        };
        self.expanded
    }

    pub fn collapse_all(&mut self) {
        self.expanded = None;
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded == Some(index)
    }

    /// Value for the trigger's `aria-expanded` attribute.
    pub fn aria_expanded(&self, index: usize) -> &'static str {
        if self.is_expanded(index) {
            "true"
        } else {
            "false"
        }
    }

    pub fn trigger_id(&self, index: usize) -> String {
        format!("{}-q-{}", self.prefix, index)
    }

    /// Panel id, referenced by the trigger's `aria-controls`.
    pub fn panel_id(&self, index: usize) -> String {
        format!("{}-a-{}", self.prefix, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn faq_scenario() {
        let mut faq = FaqAccordion::new("faq", 3);
        assert_eq!(faq.expanded(), None);

        assert_eq!(faq.toggle(1), Some(1));
        assert_eq!(faq.toggle(1), None);

        faq.toggle(0);
        assert_eq!(faq.toggle(2), Some(2));
        assert!(!faq.is_expanded(0));
        assert_eq!(faq.aria_expanded(2), "true");
        assert_eq!(faq.aria_expanded(0), "false");
    }

    #[test]
    fn out_of_range_is_ignored() {
        let mut faq = FaqAccordion::new("faq", 2);
        faq.toggle(0);
        assert_eq!(faq.toggle(7), Some(0));
        faq.collapse_all();
        assert_eq!(faq.expanded(), None);
    }

    #[test]
    fn ids_pair_triggers_with_panels() {
        let faq = FaqAccordion::new("faqs", 1);
        assert_eq!(faq.trigger_id(0), "faqs-q-0");
        assert_eq!(faq.panel_id(0), "faqs-a-0");
    }
}
