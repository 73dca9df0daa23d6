// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Router and shared application state.

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use loom_vigil_config::VigilConfig;
use loom_vigil_logs::LogHub;
use loom_vigil_metrics::RuntimeCollector;
use tower_http::{
	cors::{Any, CorsLayer},
	trace::TraceLayer,
};

use crate::{error::ServerError, routes};

/// State shared by all handlers.
#[derive(Clone)]
pub struct AppState {
	pub hub: LogHub,
	pub collector: Arc<RuntimeCollector>,
	/// Interval between SSE keep-alive comments.
	pub keep_alive: Duration,
	pub cors_allow_any: bool,
}

/// Build the state for `config`, publishing through `hub`.
pub fn create_app_state(config: &VigilConfig, hub: LogHub) -> Result<AppState, ServerError> {
	let collector = RuntimeCollector::new(env!("CARGO_PKG_VERSION"))?;
	Ok(AppState {
		hub,
		collector: Arc::new(collector),
		keep_alive: Duration::from_secs(config.stream.keep_alive_secs),
		cors_allow_any: config.http.cors_allow_any,
	})
}

pub fn create_router(state: AppState) -> Router {
	let cors_allow_any = state.cors_allow_any;

	let router = Router::new()
		.route("/vigil/logs/stream", get(routes::logs::stream_logs))
		.route("/vigil/metrics", get(routes::metrics::get_metrics))
		.with_state(state)
		.layer(TraceLayer::new_for_http());

	if cors_allow_any {
		router.layer(
			CorsLayer::new()
				.allow_origin(Any)
				.allow_methods(Any)
				.allow_headers(Any),
		)
	} else {
		router
	}
}
