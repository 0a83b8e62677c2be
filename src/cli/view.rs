//! Renders the conversion state as the two-panel converter view.

use super::ui;
use crate::core::{ConversionState, RateSnapshot};
use comfy_table::Cell;

pub const TITLE: &str = "Exchange Currency Widget";
pub const SUBTITLE: &str = "Real-time widget for currency exchange";

pub fn error_view(description: &str) -> String {
    format!("Error fetching data: {description}")
}

fn currency_label(snapshot: Option<&RateSnapshot>, currency: &str) -> String {
    match snapshot {
        Some(s) => format!("{} {}", ui::flag_glyph(s.region(currency)), currency),
        None => currency.to_string(),
    }
}

/// Lists the currencies a user can pick from, wrapped to a fixed width.
pub fn render_currencies(snapshot: &RateSnapshot) -> String {
    let codes: Vec<&str> = snapshot.currencies().collect();
    let mut output = format!(
        "{} ({})\n",
        ui::style_text("Currencies", ui::StyleType::Label),
        codes.len()
    );
    for line in codes.chunks(12) {
        output.push_str(&line.join(" "));
        output.push('\n');
    }
    output.trim_end().to_string()
}

/// Renders the whole view. A failed fetch replaces everything with the
/// error message alone.
pub fn render(state: &ConversionState) -> String {
    if let Some(error) = state.error() {
        return error_view(error);
    }

    let request = state.request();
    let snapshot = state.snapshot();
    let derived = state.derived();

    let mut output = format!(
        "{}\n{}\n\n",
        ui::style_text(TITLE, ui::StyleType::Title),
        ui::style_text(SUBTITLE, ui::StyleType::Subtle)
    );

    match snapshot {
        // A zero timestamp means the provider did not report one.
        Some(s) if s.fetched_at > 0 => {
            if let Some(date) = ui::format_local_timestamp(s.fetched_at) {
                output.push_str(&ui::style_text(
                    &format!("Last updated: {date}"),
                    ui::StyleType::Subtle,
                ));
                output.push_str("\n\n");
            }
        }
        Some(_) => {}
        None => {
            output.push_str(&ui::style_text("Waiting for rates...", ui::StyleType::Subtle));
            output.push_str("\n\n");
        }
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("I have"),
        ui::header_cell("I want to buy"),
    ]);
    table.add_row(vec![
        Cell::new(currency_label(snapshot, &request.base_currency)),
        Cell::new(currency_label(snapshot, &request.target_currency)),
    ]);
    table.add_row(vec![
        ui::format_optional_cell(Some(request.amount), |a| a.to_string()),
        ui::format_optional_cell(derived.display_amount(), |v| v),
    ]);
    output.push_str(&table.to_string());

    if let Some(rate) = derived.rate {
        output.push_str(&format!(
            "\n1 {} = {} {}",
            request.base_currency,
            ui::style_text(&format!("{rate:.4}"), ui::StyleType::Value),
            request.target_currency
        ));
    }

    if let Some(s) = snapshot {
        output.push_str("\n\n");
        output.push_str(&render_currencies(s));
    }

    output
}
