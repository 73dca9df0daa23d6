// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Server error type and its HTTP mapping.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
	#[error("configuration error: {0}")]
	Config(#[from] loom_vigil_config::ConfigError),

	#[error("metrics collection failed: {0}")]
	Metrics(#[from] loom_vigil_metrics::MetricsError),

	#[error("background task failed: {0}")]
	Join(#[from] tokio::task::JoinError),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		tracing::error!(error = %self, "request failed");
		let body = Json(json!({ "error": self.to_string() }));
		(StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_error_renders_json_500() {
		let err = ServerError::Metrics(loom_vigil_metrics::MetricsError::ProcessNotFound(42));
		let response = err.into_response();
		assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

		let body = axum::body::to_bytes(response.into_body(), usize::MAX)
			.await
			.unwrap();
		let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
		assert_eq!(value["error"], "metrics collection failed: process 42 not found");
	}
}
