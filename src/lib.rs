//! # Ketter
//!
//! Resolves direct download links for TV series episodes from a handful of
//! streaming index sites.
//!
//! ## Architecture
//!
//! Every run follows the same pipeline:
//!
//! ```text
//! URL + selectors → Navigator → (Gate) → LinkCollector → urls.txt
//! ```
//!
//! - [`domain`]: selector grammar, label patterns, link collection
//! - [`navigator`]: per-site walks over season and episode pages
//! - [`gate`]: browser sessions that get past download interstitials
//! - [`pipeline`]: ties the stages together
//!
//! ## Quick Start
//!
//! ```bash
//! # Episodes 1 to 3 of season 2
//! ketter scrape https://o2tvseries.com/Show/season-2 -e "[1-3]"
//!
//! # Every episode of seasons 1 and 4
//! ketter scrape https://www.thenetnaija.com/videos/series/1234-show -s "[1,4]"
//!
//! # Find a series page by title
//! ketter search netnaija "The Flash" --season 3
//! ```
//!
//! ## Selectors
//!
//! A selector is a single number (`5`) or a bracketed list of numbers and
//! inclusive ranges (`[1-3,7]`). An omitted selector means every season or
//! episode. A URL that already names a season or episode fixes that axis.

/// Application context and error handling.
///
/// The [`AppContext`](app::AppContext) struct wires together configuration,
/// HTTP sessions and the browser launcher.
pub mod app;

/// Command-line interface using clap.
///
/// - `scrape <url> [-s TOKEN] [-e TOKEN]` - Resolve download links
/// - `search <site> <series>` - Find series pages by title
pub mod cli;

/// Configuration loaded from `~/.config/ketter/config.toml`.
pub mod config;

/// Core domain models.
///
/// - [`SelectorSet`](domain::SelectorSet): parsed season/episode selector
/// - [`PatternBuilder`](domain::PatternBuilder): label matchers
/// - [`Resolution`](domain::Resolution): outcome of a run
pub mod domain;

/// Page fetching and HTML queries.
///
/// - [`Fetcher`](fetcher::Fetcher): Async trait for page fetching
/// - [`HttpFetcher`](fetcher::HttpFetcher): reqwest-based implementation
/// - [`Document`](fetcher::Document): anchor queries over a parsed page
pub mod fetcher;

/// Browser-driven resolution of gated links, using chromiumoxide.
pub mod gate;

/// Site navigators for NetNaija, LightDL and O2tvSeries.
pub mod navigator;

/// End-to-end resolution: validate, navigate, pass through the gate, collect.
pub mod pipeline;

/// Search by series title.
pub mod search;
