//! Command dispatch: build a client from the global flags and render the
//! requested feed.

use serde_json::json;

use salter_core::{ClientConfig, NepseClient};

use crate::cli::{Cli, Command};
use crate::error::CliError;
use crate::output;

fn config_from(cli: &Cli) -> ClientConfig {
    let mut config = ClientConfig::default()
        .with_cache_enabled(!cli.no_cache)
        .with_timeout_ms(cli.timeout_ms);
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.clone());
    }
    config
}

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    let client = NepseClient::new(config_from(cli));

    match cli.command {
        Command::Status => {
            let status = client.market_status().await?;
            if cli.json {
                output::render_json(&status, cli.pretty)?;
            } else {
                output::render_status(&status);
            }
        }
        Command::Summary => {
            let summary = client.market_summary().await?;
            if cli.json {
                output::render_json(&summary, cli.pretty)?;
            } else {
                output::render_summary(&summary);
            }
        }
        Command::Index => {
            let index = client.nepse_index().await?;
            if cli.json {
                output::render_json(&index, cli.pretty)?;
            } else {
                output::render_index(&index);
            }
        }
        Command::Gainers => {
            let gainers = output::truncated(client.top_gainers().await?, cli.limit);
            if cli.json {
                output::render_json(&gainers, cli.pretty)?;
            } else {
                output::render_top_table("Top gainers", &gainers, cli.limit);
            }
        }
        Command::Losers => {
            let losers = output::truncated(client.top_losers().await?, cli.limit);
            if cli.json {
                output::render_json(&losers, cli.pretty)?;
            } else {
                output::render_top_table("Top losers", &losers, cli.limit);
            }
        }
        Command::All => {
            let status = client.market_status().await?;
            let index = client.nepse_index().await?;
            let gainers = output::truncated(client.top_gainers().await?, cli.limit);
            let losers = output::truncated(client.top_losers().await?, cli.limit);

            if cli.json {
                let combined = json!({
                    "status": status,
                    "index": index,
                    "gainers": gainers,
                    "losers": losers,
                });
                output::render_json(&combined, cli.pretty)?;
            } else {
                output::render_status(&status);
                output::render_index(&index);
                output::render_top_table("Top gainers", &gainers, cli.limit);
                output::render_top_table("Top losers", &losers, cli.limit);
            }
        }
    }

    Ok(())
}
