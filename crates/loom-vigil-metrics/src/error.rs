// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Error types for snapshot collection.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MetricsError>;

#[derive(Debug, Error)]
pub enum MetricsError {
	#[error("cannot determine current process id: {0}")]
	CurrentPid(String),

	#[error("process {0} not found")]
	ProcessNotFound(u32),
}
