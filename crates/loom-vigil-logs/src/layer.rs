// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Tracing layer that feeds events into a [`CaptureBridge`].

use std::fmt::{self, Write as _};
use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use crate::backtrace::capture_frames;
use crate::bridge::{CaptureBridge, RawRecord, RecordSink};
use crate::entry::{ErrorInfo, LogLevel};

/// Targets never forwarded, so the pipeline cannot feed on itself.
const OWN_TARGET: &str = "loom_vigil_logs";

/// A tracing Layer that turns every event into a [`RawRecord`] for the bridge.
///
/// When the bridge is unattached or stopped the layer returns before
/// visiting any fields.
#[derive(Clone, Debug)]
pub struct CaptureLayer {
	bridge: CaptureBridge,
}

impl CaptureLayer {
	pub fn new(bridge: CaptureBridge) -> Self {
		Self { bridge }
	}

	pub fn bridge(&self) -> &CaptureBridge {
		&self.bridge
	}
}

impl<S> Layer<S> for CaptureLayer
where
	S: Subscriber + for<'a> LookupSpan<'a>,
{
	fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
		let Some(hub) = self.bridge.active_hub() else {
			return;
		};

		let metadata = event.metadata();
		if metadata.target().starts_with(OWN_TARGET) {
			return;
		}

		// A panicking Debug/Display impl loses this record, nothing more.
		let _ = catch_unwind(AssertUnwindSafe(|| {
			let mut visitor = CaptureVisitor::default();
			event.record(&mut visitor);
			let (message, mut error) = visitor.finish();

			if let Some(info) = error.as_mut() {
				if hub.has_subscribers() {
					info.frames = capture_frames();
				}
			}

			let thread = std::thread::current();
			let thread_name = match thread.name() {
				Some(name) => name.to_string(),
				None => format!("{:?}", thread.id()),
			};

			self.bridge.on_record(RawRecord {
				level: LogLevel::from_tracing(metadata.level()),
				logger_name: metadata.target(),
				message: &message,
				timestamp: chrono::Utc::now().timestamp_millis(),
				thread_name: &thread_name,
				error: error.as_ref(),
			});
		}));
	}
}

/// Collects the message, the first error, and the remaining fields.
#[derive(Default)]
struct CaptureVisitor {
	message: String,
	fields: String,
	error: Option<ErrorInfo>,
}

impl CaptureVisitor {
	fn push_field(&mut self, name: &str, value: fmt::Arguments<'_>) {
		let _ = write!(self.fields, " {name}={value}");
	}

	fn finish(self) -> (String, Option<ErrorInfo>) {
		let mut message = self.message;
		message.push_str(&self.fields);
		(message, self.error)
	}
}

impl Visit for CaptureVisitor {
	fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
		if field.name() == "message" {
			let _ = write!(self.message, "{value:?}");
		} else {
			self.push_field(field.name(), format_args!("{value:?}"));
		}
	}

	fn record_str(&mut self, field: &Field, value: &str) {
		if field.name() == "message" {
			self.message.push_str(value);
		} else {
			self.push_field(field.name(), format_args!("{value}"));
		}
	}

	fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
		let message = value.to_string();
		self.push_field(field.name(), format_args!("{message}"));
		if self.error.is_none() {
			let debug = format!("{value:?}");
			let type_name = error_type_name(&debug);
			self.error = Some(ErrorInfo::new(type_name, message));
		}
	}
}

/// Best-effort error type name from a `Debug` rendering.
///
/// Derived `Debug` output starts with the type or variant name, e.g.
/// `Os { code: 2, .. }` or `ParseIntError { kind: InvalidDigit }`.
fn error_type_name(debug: &str) -> &str {
	let end = debug
		.find(|c: char| !(c.is_alphanumeric() || c == '_' || c == ':'))
		.unwrap_or(debug.len());
	let name = debug[..end].trim_end_matches(':');
	let starts_upper = name
		.rsplit("::")
		.next()
		.and_then(|last| last.chars().next())
		.is_some_and(char::is_uppercase);
	if starts_upper {
		name
	} else {
		"Error"
	}
}
