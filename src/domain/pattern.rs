//! Builds the case-insensitive matchers used to pick anchors off a page.
//!
//! A site describes its link labels with a template containing `{season}`
//! and/or `{episode}` placeholders, e.g. `^Season {season} Episode {episode}$`.
//! Each placeholder is replaced by an alternation of the selected numbers,
//! optionally preceded by leading zeros (`Episode 02` vs `Episode 2`).

use regex::{Regex, RegexBuilder};

use crate::app::{KetterError, Result};
use crate::domain::selector::SelectorSet;

const SEASON_PLACEHOLDER: &str = "{season}";
const EPISODE_PLACEHOLDER: &str = "{episode}";

/// A compiled, case-insensitive predicate over link text.
#[derive(Debug, Clone)]
pub struct MatchPattern {
    regex: Regex,
}

impl MatchPattern {
    pub fn new(source: &str) -> Result<Self> {
        let regex = RegexBuilder::new(source).case_insensitive(true).build()?;
        Ok(Self { regex })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    pub fn captures<'t>(&self, text: &'t str) -> Option<regex::Captures<'t>> {
        self.regex.captures(text)
    }
}

/// Per-site pattern builder.
#[derive(Debug, Clone, Copy)]
pub struct PatternBuilder {
    /// How many leading zeros a site may put in front of a number.
    leading_zeros: usize,
}

impl PatternBuilder {
    pub const fn new(leading_zeros: usize) -> Self {
        Self { leading_zeros }
    }

    /// Render a selector set as a regex fragment.
    ///
    /// `Only({3, 5, 6})` becomes `0?(?:3|5|6)` with one permitted leading
    /// zero; `Any` becomes `\d+`.
    pub fn render(&self, set: &SelectorSet) -> String {
        match set {
            SelectorSet::Any => r"\d+".to_string(),
            SelectorSet::Only(numbers) => {
                let alternation = numbers
                    .iter()
                    .map(u32::to_string)
                    .collect::<Vec<_>>()
                    .join("|");
                format!("{}(?:{})", self.zero_prefix(), alternation)
            }
        }
    }

    fn zero_prefix(&self) -> String {
        match self.leading_zeros {
            0 => String::new(),
            1 => "0?".to_string(),
            n => format!("0{{0,{}}}", n),
        }
    }

    /// Substitute both axes into a label template and compile it.
    pub fn build(
        &self,
        template: &str,
        season: &SelectorSet,
        episode: &SelectorSet,
    ) -> Result<MatchPattern> {
        if !template.contains(SEASON_PLACEHOLDER) && !template.contains(EPISODE_PLACEHOLDER) {
            return Err(KetterError::InvalidInput(format!(
                "label template '{}' names neither season nor episode",
                template
            )));
        }

        let source = template
            .replace(SEASON_PLACEHOLDER, &self.render(season))
            .replace(EPISODE_PLACEHOLDER, &self.render(episode));

        MatchPattern::new(&source)
    }
}

/// Escape free text so it matches literally inside a larger pattern.
pub fn escape_literal(text: &str) -> String {
    regex::escape(text)
}
