// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Error types for the log stream.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LogsError>;

/// Errors raised inside the log pipeline.
///
/// None of these ever reach code that emits log records; the hub swallows
/// them and counts the event as dropped.
#[derive(Debug, Error)]
pub enum LogsError {
	#[error("failed to serialize log event: {0}")]
	Serialization(#[from] serde_json::Error),

	#[error("failed to encode log event: {0}")]
	Encode(String),
}
