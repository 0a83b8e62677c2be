use chrono::{Local, TimeZone};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Shown when a currency has no region to draw a flag for.
pub const NO_FLAG: &str = "\u{1F3F3}";

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Label,
    Value,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined().cyan(),
        StyleType::Label => style(text).bold(),
        StyleType::Value => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Formats an `Option<T>` into a right aligned `Cell`. `None` renders blank.
pub fn format_optional_cell<T>(value: Option<T>, format_fn: impl Fn(T) -> String) -> Cell {
    value.map_or(Cell::new("").set_alignment(CellAlignment::Right), |v| {
        Cell::new(format_fn(v))
            .add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Right)
    })
}

/// Turns an ISO 3166 alpha-2 region code into its flag emoji.
pub fn flag_glyph(region: Option<&str>) -> String {
    match region {
        Some(code) if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) => code
            .to_ascii_uppercase()
            .chars()
            .filter_map(|c| char::from_u32(0x1F1E6 + (c as u32 - 'A' as u32)))
            .collect(),
        _ => NO_FLAG.to_string(),
    }
}

pub fn format_timestamp<Tz: TimeZone>(epoch_seconds: i64, tz: &Tz) -> Option<String>
where
    Tz::Offset: std::fmt::Display,
{
    tz.timestamp_opt(epoch_seconds, 0)
        .single()
        .map(|dt| dt.format("%-m/%-d/%Y, %-I:%M:%S %p").to_string())
}

/// Formats an epoch timestamp as a date in the local timezone.
pub fn format_local_timestamp(epoch_seconds: i64) -> Option<String> {
    format_timestamp(epoch_seconds, &Local)
}

/// Creates a new `indicatif::ProgressBar` spinner with standard styling.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg} [{elapsed_precise}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
