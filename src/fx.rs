// Copyright (c) 2025 Spendlog Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Display-time currency normalization. Rates come from an external source
//! behind the [RateSource] trait and are cached per currency pair for a
//! bounded window. A failed lookup degrades to the identity rate and is
//! flagged on the result instead of failing the caller; the write path never
//! goes through this module.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::utils::http_client;

/// How long a fetched rate stays fresh.
pub const RATE_TTL: Duration = Duration::from_secs(60 * 60);

/// The external rate source could not produce a rate.
#[derive(Debug, thiserror::Error)]
#[error("exchange rate {from}->{to} unavailable: {reason}")]
pub struct RateUnavailable {
    pub from: String,
    pub to: String,
    pub reason: String,
}

/// Source of exchange rates for a currency pair.
pub trait RateSource {
    fn rate(&self, from: &str, to: &str) -> Result<Decimal, RateUnavailable>;
}

/// Frankfurter (ECB) rate lookup over HTTP with a bounded timeout.
pub struct FrankfurterSource {
    client: reqwest::blocking::Client,
}

#[derive(Debug, Deserialize)]
struct Latest {
    rates: HashMap<String, f64>,
}

impl FrankfurterSource {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            client: http_client()?,
        })
    }
}

impl RateSource for FrankfurterSource {
    fn rate(&self, from: &str, to: &str) -> Result<Decimal, RateUnavailable> {
        let unavailable = |reason: String| RateUnavailable {
            from: from.to_string(),
            to: to.to_string(),
            reason,
        };
        let url = format!("https://api.frankfurter.dev/latest?from={from}&to={to}");
        let resp = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| unavailable(e.to_string()))?;
        let latest: Latest = resp.json().map_err(|e| unavailable(e.to_string()))?;
        let rate = latest
            .rates
            .get(to)
            .copied()
            .ok_or_else(|| unavailable(format!("no rate for {} in response", to)))?;
        Decimal::try_from(rate).map_err(|e| unavailable(e.to_string()))
    }
}

/// Result of a conversion. `degraded` is set when the rate source was
/// unavailable and the identity rate was used; callers must surface this so
/// totals are not presented as currency-accurate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Conversion {
    pub amount: Decimal,
    pub degraded: bool,
}

/// Per-pair rate cache with a bounded time-to-live.
///
/// Owned by the caller for the duration of a command or request; never a
/// process-wide global.
pub struct FxCache<S: RateSource> {
    source: S,
    ttl: Duration,
    rates: HashMap<(String, String), (Decimal, Instant)>,
}

impl<S: RateSource> FxCache<S> {
    pub fn new(source: S) -> Self {
        Self::with_ttl(source, RATE_TTL)
    }

    pub fn with_ttl(source: S, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            rates: HashMap::new(),
        }
    }

    /// Convert `amount` from one currency to another, rounded to two decimal
    /// places.
    ///
    /// Identical currencies return the amount unchanged without consulting
    /// the source. A failed lookup falls back to rate 1.0 with `degraded`
    /// set, and the fallback is not cached so the next call retries.
    pub fn convert(&mut self, amount: Decimal, from: &str, to: &str) -> Conversion {
        let from = from.trim().to_uppercase();
        let to = to.trim().to_uppercase();
        if from == to {
            return Conversion {
                amount,
                degraded: false,
            };
        }
        match self.rate_for(&from, &to) {
            Ok(rate) => Conversion {
                amount: (amount * rate).round_dp(2),
                degraded: false,
            },
            Err(_) => Conversion {
                amount: amount.round_dp(2),
                degraded: true,
            },
        }
    }

    fn rate_for(&mut self, from: &str, to: &str) -> Result<Decimal, RateUnavailable> {
        let key = (from.to_string(), to.to_string());
        if let Some((rate, fetched_at)) = self.rates.get(&key) {
            if fetched_at.elapsed() < self.ttl {
                return Ok(*rate);
            }
        }
        let rate = self.source.rate(from, to)?;
        self.rates.insert(key, (rate, Instant::now()));
        Ok(rate)
    }
}
