// Copyright (c) 2025 Spendlog Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Category assigned when the caller does not provide one.
pub const DEFAULT_CATEGORY: &str = "General";

/// The income/expense classification of a transaction.
///
/// Canonical casing is lowercase; anything else is rejected at the parse
/// boundary and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Income,
    Expense,
}

impl Kind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Income => "income",
            Kind::Expense => "expense",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "income" => Ok(Kind::Income),
            "expense" => Ok(Kind::Expense),
            other => Err(LedgerError::Validation(format!(
                "kind must be 'income' or 'expense', got '{}'",
                other
            ))),
        }
    }
}

/// One recorded income or expense event.
///
/// The `kind` field lives in the `type` column on disk and is serialized
/// under that name for compatibility with the HTTP surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: Kind,
    pub category: String,
    pub currency: String,
    pub date: NaiveDate,
    pub notes: Option<String>,
}

/// Caller-supplied fields for `add` and `update`.
///
/// `category`, `currency` and `date` fall back to the default category, the
/// configured base currency and today's date respectively when absent.
#[derive(Debug, Clone)]
pub struct TransactionInput {
    pub amount: Decimal,
    pub kind: Kind,
    pub category: Option<String>,
    pub currency: Option<String>,
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
}
