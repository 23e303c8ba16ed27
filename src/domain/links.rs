use std::collections::HashSet;

/// How resolved links are accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionMode {
    /// Keep every link in discovery order.
    Ordered,
    /// Drop repeats; the first occurrence keeps its position.
    Deduplicated,
}

/// Outcome of a resolution run.
///
/// An empty result is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Links(Vec<String>),
    NothingAvailable,
}

impl Resolution {
    pub fn links(&self) -> &[String] {
        match self {
            Resolution::Links(links) => links,
            Resolution::NothingAvailable => &[],
        }
    }

    pub fn into_links(self) -> Vec<String> {
        match self {
            Resolution::Links(links) => links,
            Resolution::NothingAvailable => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Resolution::NothingAvailable)
    }
}

/// Accumulates resolved links across seasons, pages and gates.
#[derive(Debug)]
pub struct LinkCollector {
    mode: CollectionMode,
    links: Vec<String>,
    seen: HashSet<String>,
}

impl LinkCollector {
    pub fn new(mode: CollectionMode) -> Self {
        Self {
            mode,
            links: Vec::new(),
            seen: HashSet::new(),
        }
    }

    /// Add a link. Returns false if it was dropped as a repeat.
    pub fn push(&mut self, link: impl Into<String>) -> bool {
        let link = link.into();
        if self.mode == CollectionMode::Deduplicated && !self.seen.insert(link.clone()) {
            return false;
        }
        self.links.push(link);
        true
    }

    pub fn extend<I, S>(&mut self, links: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for link in links {
            self.push(link);
        }
    }

    pub fn finish(self) -> Resolution {
        if self.links.is_empty() {
            Resolution::NothingAvailable
        } else {
            Resolution::Links(self.links)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_keeps_repeats_in_order() {
        let mut collector = LinkCollector::new(CollectionMode::Ordered);
        collector.extend(["a", "b", "a"]);
        assert_eq!(
            collector.finish(),
            Resolution::Links(vec!["a".into(), "b".into(), "a".into()])
        );
    }

    #[test]
    fn test_deduplicated_drops_repeats() {
        let mut collector = LinkCollector::new(CollectionMode::Deduplicated);
        assert!(collector.push("a"));
        assert!(collector.push("b"));
        assert!(!collector.push("a"));
        assert_eq!(collector.finish().links(), ["a", "b"]);
    }

    #[test]
    fn test_empty_is_nothing_available() {
        let collector = LinkCollector::new(CollectionMode::Ordered);
        let resolution = collector.finish();
        assert!(resolution.is_empty());
        assert!(resolution.into_links().is_empty());
    }
}
