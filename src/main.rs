use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ketter::app::AppContext;
use ketter::cli::{commands, Cli, Commands};
use ketter::pipeline::ScrapeRequest;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let mut ctx = AppContext::load()?;
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| ctx.config.output.file.clone());

    match cli.command {
        Commands::Scrape {
            url,
            season,
            episode,
            headless,
            timeout,
        } => {
            if headless || timeout.is_some() {
                let mut config = ctx.config.clone();
                config.gate.headless |= headless;
                if let Some(secs) = timeout {
                    config.gate.wait_timeout_secs = secs;
                }
                ctx = AppContext::new(config);
            }

            let request = ScrapeRequest {
                url,
                season,
                episode,
            };
            commands::scrape(&ctx, &request, &output).await?;
        }
        Commands::Search {
            site,
            series,
            season,
            episode,
        } => {
            commands::search(&ctx, site, &series, season, episode, &output).await?;
        }
    }

    Ok(())
}
