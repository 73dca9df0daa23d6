// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Structured log event shared by the capture path and the stream.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Log severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
	Trace,
	Debug,
	Info,
	Warn,
	Error,
}

impl LogLevel {
	pub fn from_tracing(level: &tracing::Level) -> Self {
		match *level {
			tracing::Level::TRACE => Self::Trace,
			tracing::Level::DEBUG => Self::Debug,
			tracing::Level::INFO => Self::Info,
			tracing::Level::WARN => Self::Warn,
			tracing::Level::ERROR => Self::Error,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Trace => "TRACE",
			Self::Debug => "DEBUG",
			Self::Info => "INFO",
			Self::Warn => "WARN",
			Self::Error => "ERROR",
		}
	}
}

impl fmt::Display for LogLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Error attached to a log record before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorInfo {
	pub type_name: String,
	pub message: String,
	/// Frame descriptions, innermost call site first.
	pub frames: Vec<String>,
}

impl ErrorInfo {
	pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			type_name: type_name.into(),
			message: message.into(),
			frames: Vec::new(),
		}
	}

	pub fn with_frames<I, S>(mut self, frames: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.frames = frames.into_iter().map(Into::into).collect();
		self
	}
}

/// A normalized log event as delivered to stream subscribers.
///
/// Serialized as a flat camelCase JSON object. The error fields are omitted
/// when the record carried no error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
	pub level: LogLevel,
	pub logger_name: String,
	pub message: String,
	/// Epoch milliseconds.
	pub timestamp: i64,
	pub thread_name: String,
	#[serde(
		rename = "throwableMessage",
		default,
		skip_serializing_if = "Option::is_none"
	)]
	pub error_summary: Option<String>,
	#[serde(rename = "stackTrace", default, skip_serializing_if = "Option::is_none")]
	pub error_trace: Option<String>,
}
