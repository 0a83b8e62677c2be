use super::{ui, view};
use crate::core::{ConversionRequest, ConversionState, RateFetcher};
use anyhow::{Result, anyhow};
use std::io::Write;
use tracing::debug;

/// Fetches rates once, converts and prints the converter view.
pub async fn run<W: Write>(
    fetcher: &dyn RateFetcher,
    request: ConversionRequest,
    out: &mut W,
) -> Result<()> {
    let mut state = ConversionState::new(request);

    let pb = ui::new_spinner("Fetching rates...");
    let result = fetcher.fetch_snapshot(&state.request().base_currency).await;
    pb.finish_and_clear();

    state.apply_fetch(result);
    debug!(derived = ?state.derived(), "Conversion complete");
    writeln!(out, "{}", view::render(&state))?;

    match state.error() {
        Some(e) => Err(anyhow!("{}", view::error_view(e))),
        None => Ok(()),
    }
}
