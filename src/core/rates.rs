//! Exchange rate snapshots and the abstraction used to fetch them

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// All exchange rates for one base currency at one point in time.
///
/// A snapshot is never patched. Every fetch produces a new one which
/// replaces the previous snapshot wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    pub base_currency: String,
    pub rates: BTreeMap<String, f64>,
    pub fetched_at: i64,
    pub region_by_code: BTreeMap<String, String>,
}

impl RateSnapshot {
    pub fn rate(&self, currency: &str) -> Option<f64> {
        self.rates.get(currency).copied()
    }

    pub fn region(&self, currency: &str) -> Option<&str> {
        self.region_by_code.get(currency).map(String::as_str)
    }

    /// Currency codes offered to the user, in alphabetical order.
    pub fn currencies(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }
}

#[async_trait]
pub trait RateFetcher: Send + Sync {
    async fn fetch_snapshot(&self, base: &str) -> Result<RateSnapshot>;
}
