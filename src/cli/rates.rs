use super::{ui, view};
use crate::core::RateFetcher;
use anyhow::Result;
use comfy_table::{Cell, CellAlignment};
use std::io::Write;

/// Prints every rate quoted for `base` as a table.
pub async fn run<W: Write>(fetcher: &dyn RateFetcher, base: &str, out: &mut W) -> Result<()> {
    let pb = ui::new_spinner("Fetching rates...");
    let result = fetcher.fetch_snapshot(base).await;
    pb.finish_and_clear();

    let snapshot = match result {
        Ok(snapshot) => snapshot,
        Err(e) => {
            let message = view::error_view(&e.to_string());
            writeln!(out, "{message}")?;
            return Err(anyhow::anyhow!(message));
        }
    };

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(""),
        ui::header_cell("Currency"),
        ui::header_cell(&format!("Rate (1 {})", snapshot.base_currency)),
    ]);
    for (code, rate) in &snapshot.rates {
        table.add_row(vec![
            Cell::new(ui::flag_glyph(snapshot.region(code))),
            Cell::new(code),
            Cell::new(format!("{rate:.4}")).set_alignment(CellAlignment::Right),
        ]);
    }

    writeln!(
        out,
        "Rates for: {}\n",
        ui::style_text(&snapshot.base_currency, ui::StyleType::Title)
    )?;
    let updated = Some(snapshot.fetched_at)
        .filter(|ts| *ts > 0)
        .and_then(ui::format_local_timestamp);
    if let Some(date) = updated {
        writeln!(
            out,
            "{}\n",
            ui::style_text(&format!("Last updated: {date}"), ui::StyleType::Subtle)
        )?;
    }
    writeln!(out, "{table}")?;

    Ok(())
}
