// Copyright (c) 2025 Spendlog Authors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Thin HTTP transport over the ledger operations. Carries no semantics of
//! its own: validation and defaults live in [crate::ledger].

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;

use crate::error::LedgerError;
use crate::ledger::{self, Filter};
use crate::models::{Kind, TransactionInput};

#[derive(Clone)]
pub struct AppState {
    connection: Arc<Mutex<Connection>>,
}

impl AppState {
    pub fn new(connection: Connection) -> Self {
        Self {
            connection: Arc::new(Mutex::new(connection)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct CreateTransaction {
    amount: f64,
    #[serde(rename = "type")]
    kind: String,
    category: Option<String>,
    currency: Option<String>,
    date: Option<NaiveDate>,
    notes: Option<String>,
}

async fn create_transaction(
    State(state): State<AppState>,
    Json(payload): Json<CreateTransaction>,
) -> Response {
    let amount = match Decimal::try_from(payload.amount) {
        Ok(amount) => amount,
        Err(error) => {
            return error_response(StatusCode::BAD_REQUEST, &format!("invalid amount: {error}"));
        }
    };
    let kind = match payload.kind.parse::<Kind>() {
        Ok(kind) => kind,
        Err(error) => return error_response(StatusCode::BAD_REQUEST, &error.to_string()),
    };
    let input = TransactionInput {
        amount,
        kind,
        category: payload.category,
        currency: payload.currency,
        date: payload.date,
        notes: payload.notes,
    };
    let connection = state.connection.lock().unwrap();
    match ledger::add(&connection, &input) {
        Ok(id) => (
            StatusCode::CREATED,
            Json(json!({"id": id, "message": "transaction recorded"})),
        )
            .into_response(),
        Err(error) => ledger_error_response(error),
    }
}

async fn list_transactions(State(state): State<AppState>) -> Response {
    let connection = state.connection.lock().unwrap();
    match ledger::list(&connection, &Filter::default()) {
        Ok(transactions) => Json(transactions).into_response(),
        Err(error) => ledger_error_response(error),
    }
}

fn ledger_error_response(error: LedgerError) -> Response {
    match error {
        LedgerError::Validation(message) => error_response(StatusCode::BAD_REQUEST, &message),
        LedgerError::NotFound(id) => error_response(
            StatusCode::NOT_FOUND,
            &format!("no transaction with id {id}"),
        ),
        LedgerError::Storage(error) => {
            tracing::error!("storage error: {}", error);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "the transaction store is unavailable",
            )
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"error": message}))).into_response()
}

/// Serve the ledger over HTTP until the process is stopped.
pub fn run(addr: SocketAddr, connection: Connection) -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
    let state = AppState::new(connection);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("listening on {}", addr);
        axum::serve(listener, build_router(state)).await?;
        anyhow::Ok(())
    })
}
