//! Maps ISO 4217 currency codes to the ISO 3166 region whose flag represents them.

use std::collections::BTreeMap;

// Codes whose first two letters are not the issuing region.
const EXCEPTIONS: &[(&str, Option<&str>)] = &[("ANG", Some("CW")), ("XDR", None)];

pub fn region_for_currency(code: &str) -> Option<String> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let code = code.to_ascii_uppercase();

    if let Some((_, region)) = EXCEPTIONS.iter().find(|(c, _)| *c == code) {
        return region.map(str::to_string);
    }

    // X-prefixed codes are supranational units or metals.
    if code.starts_with('X') {
        return None;
    }

    Some(code[..2].to_string())
}

/// Builds the region map for every currency that has one.
pub fn regions_for<'a>(codes: impl IntoIterator<Item = &'a str>) -> BTreeMap<String, String> {
    codes
        .into_iter()
        .filter_map(|code| region_for_currency(code).map(|region| (code.to_string(), region)))
        .collect()
}
