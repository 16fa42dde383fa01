// Copyright (c) 2025 Spendlog Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

/// The errors a ledger operation can surface.
///
/// `Validation` and `NotFound` describe requests that can never succeed as
/// given and are reported to the caller without retry. `Storage` means the
/// underlying store could not complete the operation; whether to retry is the
/// caller's decision.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Malformed or out-of-range input, rejected before any storage access.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The operation addressed a transaction id that does not exist.
    #[error("no transaction with id {0}")]
    NotFound(i64),

    /// The underlying store could not complete the operation.
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}
