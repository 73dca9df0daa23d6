// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Runtime snapshot endpoint.

use std::sync::Arc;

use axum::{extract::State, Json};
use loom_vigil_metrics::RuntimeSnapshot;

use crate::{api::AppState, error::ServerError};

/// GET /vigil/metrics - Current process and host counters.
#[tracing::instrument(skip(state))]
pub async fn get_metrics(State(state): State<AppState>) -> Result<Json<RuntimeSnapshot>, ServerError> {
	let collector = Arc::clone(&state.collector);
	let snapshot = tokio::task::spawn_blocking(move || collector.snapshot()).await??;
	Ok(Json(snapshot))
}
