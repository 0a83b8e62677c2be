pub mod cli;
pub mod core;
pub mod providers;

use crate::core::RateFetcher;
use crate::core::config::AppConfig;
use anyhow::Result;
use std::io::Write;
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{debug, info};

pub enum AppCommand {
    Convert {
        amount: Option<String>,
        from: Option<String>,
        to: Option<String>,
    },
    Rates {
        base: Option<String>,
    },
    Interactive,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    run_command_to(command, config_path, &mut std::io::stdout()).await
}

/// Runs `command`, writing the rendered views to `out`.
pub async fn run_command_to<W: Write>(
    command: AppCommand,
    config_path: Option<&str>,
    out: &mut W,
) -> Result<()> {
    info!("Currency converter starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let fetcher: Arc<dyn RateFetcher> =
        Arc::new(providers::exchangerate_api::ExchangeRateApiProvider::new(
            &config.provider.base_url,
            config.provider.resolved_api_key(),
        ));
    let mut request = config.defaults.to_request();

    match command {
        AppCommand::Convert { amount, from, to } => {
            if let Some(from) = from {
                request.base_currency = from.to_ascii_uppercase();
            }
            if let Some(to) = to {
                request.target_currency = to.to_ascii_uppercase();
            }
            if let Some(amount) = amount {
                request.amount = crate::core::conversion::coerce_amount(&amount);
            }
            cli::convert::run(fetcher.as_ref(), request, out).await
        }
        AppCommand::Rates { base } => {
            let base = base.map_or(request.base_currency, |b| b.to_ascii_uppercase());
            cli::rates::run(fetcher.as_ref(), &base, out).await
        }
        AppCommand::Interactive => {
            let session = cli::interactive::Session::new(fetcher, request);
            let stdin = BufReader::new(tokio::io::stdin());
            session.run(stdin, out).await
        }
    }
}
