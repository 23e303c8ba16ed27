//! Season/episode selector grammar.
//!
//! A selector token is either a bare integer (`"5"`) or a bracketed,
//! comma-separated list of integers and inclusive ranges (`"[1,4,9-11]"`).

use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::app::{KetterError, Result};

static SEASON_IN_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/season-(\d+)").expect("static regex"));
static EPISODE_IN_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)episode-(\d+)").expect("static regex"));

/// Most numbers one token may select. No site lists anywhere near this many
/// seasons or episodes.
pub const MAX_SELECTED: usize = 1000;

/// Which of the two selector axes a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Season,
    Episode,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Season => write!(f, "season"),
            Axis::Episode => write!(f, "episode"),
        }
    }
}

/// The set of integers a selector denotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorSet {
    /// No selector given and nothing bound by the URL: any number matches.
    Any,
    /// A non-empty, sorted set of explicit numbers.
    Only(BTreeSet<u32>),
}

impl SelectorSet {
    pub fn single(n: u32) -> Self {
        SelectorSet::Only(BTreeSet::from([n]))
    }

    /// Resolve the selector for one axis.
    ///
    /// `bound` is the number the target URL already names for this axis, if any.
    /// Supplying a token for a bound axis is rejected rather than silently
    /// overriding the URL.
    pub fn resolve(axis: Axis, token: Option<&str>, bound: Option<u32>) -> Result<Self> {
        match (token, bound) {
            (Some(token), Some(n)) => Err(KetterError::InvalidSelector(format!(
                "{} '{}' conflicts with {} {} already named in the URL",
                axis, token, axis, n
            ))),
            (None, Some(n)) => Ok(SelectorSet::single(n)),
            (None, None) => Ok(SelectorSet::Any),
            (Some(token), None) => Self::parse(token),
        }
    }

    /// Parse a selector token.
    pub fn parse(token: &str) -> Result<Self> {
        let token = token.trim_matches(' ');

        if let Some(c) = token
            .chars()
            .find(|c| !(c.is_ascii_digit() || matches!(c, ',' | '-' | '[' | ']' | ' ')))
        {
            return Err(invalid(token, &format!("unexpected character '{}'", c)));
        }

        if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
            return Ok(SelectorSet::single(parse_number(token, token)?));
        }

        let inner = token
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .ok_or_else(|| invalid(token, "expected a number or a bracketed list"))?;

        let mut numbers = BTreeSet::new();
        for item in inner.split(',') {
            let item = item.trim_matches(' ');
            if item.contains(['[', ']']) {
                return Err(invalid(token, "stray bracket inside list"));
            }
            if item.is_empty() {
                return Err(invalid(token, "empty list item"));
            }

            match item.split_once('-') {
                Some((first, last)) => {
                    let first = parse_number(first.trim_matches(' '), token)?;
                    let last = parse_number(last.trim_matches(' '), token)?;
                    if first > last {
                        return Err(invalid(
                            token,
                            &format!("range {}-{} runs backwards", first, last),
                        ));
                    }
                    if (last - first) as usize >= MAX_SELECTED {
                        return Err(too_many(token));
                    }
                    numbers.extend(first..=last);
                }
                None => {
                    numbers.insert(parse_number(item, token)?);
                }
            }

            if numbers.len() > MAX_SELECTED {
                return Err(too_many(token));
            }
        }

        if numbers.is_empty() {
            return Err(invalid(token, "selects nothing"));
        }

        Ok(SelectorSet::Only(numbers))
    }
}

fn parse_number(s: &str, token: &str) -> Result<u32> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid(token, &format!("'{}' is not a number", s)));
    }
    s.parse::<u32>()
        .map_err(|_| invalid(token, &format!("'{}' is out of range", s)))
}

fn too_many(token: &str) -> KetterError {
    invalid(token, &format!("selects more than {} numbers", MAX_SELECTED))
}

fn invalid(token: &str, reason: &str) -> KetterError {
    KetterError::InvalidSelector(format!("'{}': {}", token, reason))
}

/// Season and episode numbers that the target URL path already names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UrlBinding {
    pub season: Option<u32>,
    pub episode: Option<u32>,
}

impl UrlBinding {
    pub fn from_url(url: &Url) -> Self {
        let path = url.path();
        Self {
            season: capture_number(&SEASON_IN_PATH, path),
            episode: capture_number(&EPISODE_IN_PATH, path),
        }
    }
}

fn capture_number(re: &Regex, haystack: &str) -> Option<u32> {
    re.captures(haystack)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
