// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Stack frame capture for errors attached to log records.

use std::backtrace::Backtrace;

use rustc_demangle::demangle;

/// Frames from the capture path itself, stripped from the front of a trace.
///
/// Includes the thread-local and closure glue a scoped dispatcher puts
/// between the dispatcher and the layer.
const CAPTURE_PREFIXES: &[&str] = &[
	"std::backtrace",
	"<std::backtrace",
	"std::backtrace_rs::",
	"backtrace::",
	"loom_vigil_logs::",
	"<loom_vigil_logs::",
	"tracing::",
	"<tracing::",
	"tracing_core::",
	"<tracing_core::",
	"tracing_subscriber::",
	"<tracing_subscriber::",
	"core::ops::function::",
	"std::thread::local::",
	"<std::thread::local::",
	"std::sys::thread_local::",
	"core::option::",
	"core::result::",
	"<alloc::sync::Arc<",
	"<core::panic::unwind_safe::",
	"std::panicking::",
	"std::panic::",
	"__rust_try",
];

/// Capture the current call stack as `function (file:line)` descriptions,
/// innermost application frame first.
pub fn capture_frames() -> Vec<String> {
	let backtrace = Backtrace::force_capture();
	let frames = parse_backtrace_string(&backtrace.to_string());
	trim_capture_frames(frames)
}

/// Parse the textual form of a `std::backtrace::Backtrace`.
///
/// Frame lines look like `  3: some::function`; an optional following
/// `at path:line:col` line gives the location.
pub(crate) fn parse_backtrace_string(bt_string: &str) -> Vec<String> {
	let mut frames: Vec<String> = Vec::new();

	for line in bt_string.lines() {
		let line = line.trim();
		if line.is_empty() {
			continue;
		}

		if let Some(location) = line.strip_prefix("at ") {
			if let Some(last) = frames.last_mut() {
				if !last.ends_with(')') {
					last.push_str(&format!(" ({})", location.trim()));
				}
			}
			continue;
		}

		if let Some(function) = parse_frame_line(line) {
			frames.push(function);
		}
	}

	frames
}

fn parse_frame_line(line: &str) -> Option<String> {
	let (prefix, rest) = line.split_once(':')?;
	if prefix.trim().parse::<u32>().is_err() {
		return None;
	}
	let function = rest.trim();
	if function.is_empty() {
		return None;
	}
	Some(demangle(function).to_string())
}

fn trim_capture_frames(frames: Vec<String>) -> Vec<String> {
	let skip = frames
		.iter()
		.take_while(|frame| is_capture_frame(frame))
		.count();
	frames.into_iter().skip(skip).collect()
}

fn is_capture_frame(frame: &str) -> bool {
	CAPTURE_PREFIXES.iter().any(|prefix| frame.starts_with(prefix))
}

#[cfg(test)]
mod tests {
	use super::*;

	const SAMPLE: &str = "   0: std::backtrace_rs::backtrace::libunwind::trace
             at /rustc/abc/library/std/src/../../backtrace/src/backtrace/libunwind.rs:116:5
   1: std::backtrace::Backtrace::force_capture
             at /rustc/abc/library/std/src/backtrace.rs:312:9
   2: loom_vigil_logs::backtrace::capture_frames
   3: my_app::db::query
             at ./src/db.rs:42:13
   4: my_app::main
";

	#[test]
	fn test_parse_backtrace_string_attaches_locations() {
		let frames = parse_backtrace_string(SAMPLE);
		assert_eq!(frames.len(), 5);
		assert_eq!(frames[3], "my_app::db::query (./src/db.rs:42:13)");
		assert_eq!(frames[4], "my_app::main");
	}

	#[test]
	fn test_trim_capture_frames() {
		let frames = trim_capture_frames(parse_backtrace_string(SAMPLE));
		assert_eq!(frames[0], "my_app::db::query (./src/db.rs:42:13)");
		assert_eq!(frames.len(), 2);
	}

	const SCOPED_SAMPLE: &str = "   0: std::backtrace::Backtrace::force_capture
   1: loom_vigil_logs::backtrace::capture_frames
   2: <loom_vigil_logs::layer::CaptureLayer as tracing_subscriber::layer::Layer<S>>::on_event
   3: tracing_core::dispatcher::Dispatch::event
   4: tracing_core::event::Event::dispatch::{{closure}}
   5: tracing_core::dispatcher::get_default::{{closure}}
   6: std::thread::local::LocalKey<T>::try_with
             at /rustc/abc/library/std/src/thread/local.rs:513:12
   7: tracing_core::dispatcher::get_default
   8: tracing_core::event::Event::dispatch
   9: my_app::jobs::run::{{closure}}
             at ./src/jobs.rs:10:5
  10: my_app::jobs::run
  11: tracing_core::dispatcher::with_default
  12: my_app::main
";

	#[test]
	fn test_trim_passes_through_scoped_dispatcher_frames() {
		let frames = trim_capture_frames(parse_backtrace_string(SCOPED_SAMPLE));
		assert_eq!(frames[0], "my_app::jobs::run::{{closure}} (./src/jobs.rs:10:5)");
		assert_eq!(frames[1], "my_app::jobs::run");
		assert_eq!(frames.len(), 4);
	}

	#[test]
	fn test_parse_frame_line_rejects_non_frames() {
		assert!(parse_frame_line("not a frame").is_none());
		assert!(parse_frame_line("stack backtrace:").is_none());
		assert_eq!(parse_frame_line("  7: foo::bar"), Some("foo::bar".to_string()));
	}

	#[test]
	fn test_capture_frames_does_not_panic() {
		// Frame content depends on debug info, only check it runs.
		let _frames = capture_frames();
	}
}
