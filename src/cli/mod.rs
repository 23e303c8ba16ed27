pub mod commands;

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::search::SearchSite;

#[derive(Parser)]
#[command(name = "ketter")]
#[command(about = "Resolve direct download links for TV series episodes", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// File the links are written to (default from config: urls.txt)
    #[arg(short, long, global = true)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve download links starting from a series, season or episode URL
    Scrape {
        /// Series, season or episode page on a supported site
        url: String,

        /// Seasons to fetch, e.g. 2, [1-3] or [1,4,6-8]
        #[arg(short, long)]
        season: Option<String>,

        /// Episodes to fetch, e.g. 5, [1-3] or [1,4,6-8]
        #[arg(short, long)]
        episode: Option<String>,

        /// Run the browser without a window
        #[arg(long)]
        headless: bool,

        /// Seconds to wait for each gated page
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Find series pages by title
    Search {
        /// Site to search
        #[arg(value_enum)]
        site: SearchSite,

        /// Series title
        series: String,

        /// Narrow results to one season
        #[arg(long)]
        season: Option<u32>,

        /// Narrow results to one episode
        #[arg(long)]
        episode: Option<u32>,
    },
}
