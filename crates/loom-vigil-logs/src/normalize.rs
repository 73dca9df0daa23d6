// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Conversion of raw log records into [`LogEvent`]s.

use crate::entry::{ErrorInfo, LogEvent, LogLevel};

/// Upper bound on frames kept in a captured trace.
pub const MAX_TRACE_FRAMES: usize = 128;

/// Build a [`LogEvent`] from the parts of a raw record.
///
/// Pure and allocation-only; safe to call from any number of producer threads.
pub fn normalize(
	level: LogLevel,
	logger_name: &str,
	message: &str,
	timestamp: i64,
	thread_name: &str,
	error: Option<&ErrorInfo>,
	scope: Option<&str>,
) -> LogEvent {
	let (error_summary, error_trace) = match error {
		Some(info) => (Some(error_summary(info)), Some(error_trace(&info.frames, scope))),
		None => (None, None),
	};

	LogEvent {
		level,
		logger_name: logger_name.to_string(),
		message: message.to_string(),
		timestamp,
		thread_name: thread_name.to_string(),
		error_summary,
		error_trace,
	}
}

/// `"{type}: {message}"`, flattened onto a single line.
pub fn error_summary(info: &ErrorInfo) -> String {
	let summary = format!("{}: {}", info.type_name, info.message);
	if summary.contains(['\n', '\r']) {
		summary
			.lines()
			.map(str::trim_end)
			.filter(|l| !l.is_empty())
			.collect::<Vec<_>>()
			.join(" ")
	} else {
		summary
	}
}

/// Select the frames that make it into the trace.
///
/// With no scope only the first frame is kept. With a scope, leading frames
/// containing the scope are kept up to the first frame that does not; any
/// later matches are discarded.
pub fn scoped_frames<'a>(frames: &'a [String], scope: Option<&str>) -> &'a [String] {
	let scope = scope.filter(|s| !s.is_empty());
	let len = match scope {
		None => frames.len().min(1),
		Some(scope) => frames
			.iter()
			.take_while(|frame| frame.contains(scope))
			.count(),
	};
	&frames[..len.min(MAX_TRACE_FRAMES)]
}

/// Render the selected frames, one per line, each terminated by a newline.
pub fn error_trace(frames: &[String], scope: Option<&str>) -> String {
	let selected = scoped_frames(frames, scope);
	let mut trace = String::with_capacity(selected.iter().map(|f| f.len() + 1).sum());
	for frame in selected {
		trace.push_str(frame);
		trace.push('\n');
	}
	trace
}
