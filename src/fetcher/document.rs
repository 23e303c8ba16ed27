//! Queries over a fetched HTML page.
//!
//! `scraper::Html` is not `Send`, so a [`Document`] is parsed, queried and
//! dropped between two awaits; everything it hands out is owned.

use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::domain::MatchPattern;

/// A link found on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchor {
    /// Whitespace-normalised link text.
    pub text: String,
    /// Absolute target, resolved against the page address.
    pub href: String,
}

pub struct Document {
    html: Html,
    base: Option<Url>,
}

impl Document {
    /// Parse a page body. `base` is the address the body was fetched from.
    pub fn parse(body: &[u8], base: &str) -> Self {
        let html = Html::parse_document(&String::from_utf8_lossy(body));
        Self {
            html,
            base: Url::parse(base).ok(),
        }
    }

    /// Every `<a href>` whose text matches, in document order.
    pub fn anchors_matching(&self, pattern: &MatchPattern) -> Vec<Anchor> {
        let anchors = anchor_selector();
        self.html
            .select(&anchors)
            .filter_map(|a| self.anchor(a))
            .filter(|anchor| pattern.is_match(&anchor.text))
            .collect()
    }

    /// The first `<a href>` whose text matches.
    pub fn first_anchor_matching(&self, pattern: &MatchPattern) -> Option<Anchor> {
        let anchors = anchor_selector();
        self.html
            .select(&anchors)
            .filter_map(|a| self.anchor(a))
            .find(|anchor| pattern.is_match(&anchor.text))
    }

    /// Links inside the first element matching `container`, e.g. a pagination bar.
    ///
    /// Returns `None` when no such container exists.
    pub fn links_within(&self, container: &str) -> Option<Vec<Anchor>> {
        let container = Selector::parse(container).ok()?;
        let element = self.html.select(&container).next()?;
        let anchors = anchor_selector();
        Some(
            element
                .select(&anchors)
                .filter_map(|a| self.anchor(a))
                .collect(),
        )
    }

    /// For every element matching `container`, its first descendant `<a>`
    /// whose `attr` attribute matches.
    pub fn anchors_with_attr(
        &self,
        container: &str,
        attr: &str,
        pattern: &MatchPattern,
    ) -> Vec<Anchor> {
        let Ok(container) = Selector::parse(container) else {
            return Vec::new();
        };

        let anchors = anchor_selector();
        self.html
            .select(&container)
            .filter_map(|element| {
                element
                    .select(&anchors)
                    .find(|a| a.value().attr(attr).is_some_and(|v| pattern.is_match(v)))
                    .and_then(|a| self.anchor(a))
            })
            .collect()
    }

    /// All `<a href>` children of elements matching `container`.
    pub fn anchors_in(&self, container: &str) -> Vec<Anchor> {
        let Ok(container) = Selector::parse(container) else {
            return Vec::new();
        };

        let anchors = anchor_selector();
        self.html
            .select(&container)
            .flat_map(|element| element.select(&anchors))
            .filter_map(|a| self.anchor(a))
            .collect()
    }

    fn anchor(&self, element: ElementRef<'_>) -> Option<Anchor> {
        let href = element.value().attr("href")?.trim();
        if href.is_empty() {
            return None;
        }

        let href = match &self.base {
            Some(base) => base.join(href).map(String::from).unwrap_or_else(|_| href.to_string()),
            None => href.to_string(),
        };

        Some(Anchor {
            text: normalize_text(&element.text().collect::<String>()),
            href,
        })
    }
}

fn anchor_selector() -> Selector {
    Selector::parse("a[href]").expect("static selector")
}

/// Trim and collapse runs of whitespace to single spaces.
fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
