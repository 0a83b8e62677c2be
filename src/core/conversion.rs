//! Conversion state: the user's request, the current rate snapshot and the
//! result derived from them.

use crate::core::rates::RateSnapshot;
use anyhow::Result;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionRequest {
    pub base_currency: String,
    pub target_currency: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedResult {
    pub rate: Option<f64>,
    pub converted_amount: Option<f64>,
}

impl DerivedResult {
    /// The converted amount with exactly two decimals, e.g. `830.00`.
    pub fn display_amount(&self) -> Option<String> {
        self.converted_amount.map(|v| format!("{v:.2}"))
    }
}

pub fn round_cents(value: f64) -> f64 {
    let scaled = value * 100.0;
    // Past this magnitude every f64 is already a whole number of cents.
    if !scaled.is_finite() {
        return value;
    }
    // Adding zero turns -0.0 into 0.0.
    scaled.round() / 100.0 + 0.0
}

/// Looks up the target rate in `snapshot` and applies it to `amount`.
///
/// The converted amount is absent when there is no snapshot, the target is
/// not quoted, or the product is not a finite number.
pub fn convert(snapshot: Option<&RateSnapshot>, target: &str, amount: f64) -> DerivedResult {
    let rate = snapshot.and_then(|s| s.rate(target));
    let converted_amount = rate
        .map(|r| amount * r)
        .filter(|v| v.is_finite())
        .map(round_cents)
        .filter(|v| v.is_finite());
    DerivedResult {
        rate,
        converted_amount,
    }
}

/// Coerces user text into an amount: blank is zero, anything unparseable is NaN.
pub fn coerce_amount(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }
    text.parse::<f64>().unwrap_or(f64::NAN)
}

#[derive(Debug, Clone)]
pub struct ConversionState {
    request: ConversionRequest,
    snapshot: Option<RateSnapshot>,
    error: Option<String>,
}

impl ConversionState {
    pub fn new(request: ConversionRequest) -> Self {
        Self {
            request,
            snapshot: None,
            error: None,
        }
    }

    pub fn request(&self) -> &ConversionRequest {
        &self.request
    }

    pub fn snapshot(&self) -> Option<&RateSnapshot> {
        self.snapshot.as_ref()
    }

    /// Description of the last fetch failure, if the last fetch failed.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn derived(&self) -> DerivedResult {
        convert(
            self.snapshot.as_ref(),
            &self.request.target_currency,
            self.request.amount,
        )
    }

    /// Returns the base currency to fetch when the base actually changed.
    pub fn set_base(&mut self, code: &str) -> Option<String> {
        if self.request.base_currency == code {
            return None;
        }
        self.request.base_currency = code.to_string();
        Some(self.request.base_currency.clone())
    }

    pub fn set_target(&mut self, code: &str) {
        self.request.target_currency = code.to_string();
    }

    pub fn set_amount(&mut self, amount: f64) {
        self.request.amount = amount;
    }

    pub fn set_amount_text(&mut self, text: &str) {
        self.set_amount(coerce_amount(text));
    }

    /// Exchanges base and target in one step. Returns the new base to fetch
    /// when it differs from the old one.
    pub fn swap(&mut self) -> Option<String> {
        let request = &mut self.request;
        std::mem::swap(&mut request.base_currency, &mut request.target_currency);
        if request.base_currency == request.target_currency {
            return None;
        }
        Some(request.base_currency.clone())
    }

    /// Replaces the snapshot with a fetch result. Responses are applied in
    /// arrival order, so a late response for an older base still wins.
    pub fn apply_fetch(&mut self, result: Result<RateSnapshot>) {
        match result {
            Ok(snapshot) => {
                if snapshot.base_currency != self.request.base_currency {
                    warn!(
                        snapshot_base = %snapshot.base_currency,
                        current_base = %self.request.base_currency,
                        "Applying snapshot fetched for a superseded base currency"
                    );
                }
                debug!(
                    base = %snapshot.base_currency,
                    rates = snapshot.rates.len(),
                    "Replacing rate snapshot"
                );
                self.snapshot = Some(snapshot);
                self.error = None;
            }
            Err(e) => {
                debug!("Rate fetch failed: {e}");
                self.snapshot = None;
                self.error = Some(e.to_string());
            }
        }
    }
}
