pub mod links;
pub mod pattern;
pub mod selector;

pub use links::{CollectionMode, LinkCollector, Resolution};
pub use pattern::{escape_literal, MatchPattern, PatternBuilder};
pub use selector::{Axis, SelectorSet, UrlBinding};
