// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Hand-off point between a logging backend and the [`LogHub`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crate::entry::{ErrorInfo, LogLevel};
use crate::hub::LogHub;
use crate::normalize::normalize;

/// One log record as produced by a logging backend.
#[derive(Debug, Clone, Copy)]
pub struct RawRecord<'a> {
	pub level: LogLevel,
	pub logger_name: &'a str,
	/// Already formatted; no further templating is applied.
	pub message: &'a str,
	/// Epoch milliseconds.
	pub timestamp: i64,
	pub thread_name: &'a str,
	pub error: Option<&'a ErrorInfo>,
}

/// Something a logging backend can hand records to.
///
/// Implementations must return promptly and must not panic.
pub trait RecordSink: Send + Sync {
	fn on_record(&self, record: RawRecord<'_>);
}

/// Receives records from a logging backend and publishes them to a hub.
///
/// Records arriving before a hub is attached, or while the bridge is
/// stopped, are discarded.
#[derive(Clone, Default)]
pub struct CaptureBridge {
	inner: Arc<BridgeInner>,
}

#[derive(Default)]
struct BridgeInner {
	hub: OnceLock<LogHub>,
	stopped: AtomicBool,
	scope: Option<String>,
}

impl CaptureBridge {
	/// Create a started, unattached bridge.
	///
	/// `scope` selects which stack frames are kept for errors; see
	/// [`crate::normalize::scoped_frames`].
	pub fn new(scope: Option<String>) -> Self {
		Self {
			inner: Arc::new(BridgeInner {
				hub: OnceLock::new(),
				stopped: AtomicBool::new(false),
				scope: scope.filter(|s| !s.is_empty()),
			}),
		}
	}

	/// Attach `hub`. Only the first attach takes effect; returns whether this
	/// call did.
	pub fn attach(&self, hub: LogHub) -> bool {
		self.inner.hub.set(hub).is_ok()
	}

	pub fn hub(&self) -> Option<&LogHub> {
		self.inner.hub.get()
	}

	pub fn is_attached(&self) -> bool {
		self.inner.hub.get().is_some()
	}

	pub fn scope(&self) -> Option<&str> {
		self.inner.scope.as_deref()
	}

	pub fn start(&self) {
		self.inner.stopped.store(false, Ordering::Release);
	}

	pub fn stop(&self) {
		self.inner.stopped.store(true, Ordering::Release);
	}

	pub fn is_started(&self) -> bool {
		!self.inner.stopped.load(Ordering::Acquire)
	}

	/// The hub to publish to, if the bridge is attached and started.
	pub(crate) fn active_hub(&self) -> Option<&LogHub> {
		if !self.is_started() {
			return None;
		}
		self.inner.hub.get()
	}
}

impl RecordSink for CaptureBridge {
	fn on_record(&self, record: RawRecord<'_>) {
		let Some(hub) = self.active_hub() else {
			return;
		};

		let event = normalize(
			record.level,
			record.logger_name,
			record.message,
			record.timestamp,
			record.thread_name,
			record.error,
			self.scope(),
		);
		hub.publish(&event);
	}
}

impl std::fmt::Debug for CaptureBridge {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CaptureBridge")
			.field("attached", &self.is_attached())
			.field("started", &self.is_started())
			.field("scope", &self.inner.scope)
			.finish()
	}
}

/// Attach `hub` to an already configured bridge, if there is one.
///
/// Never creates a bridge. Calling it again is harmless. Returns whether a
/// hub was newly attached.
pub fn attach_hub(bridge: Option<&CaptureBridge>, hub: &LogHub) -> bool {
	match bridge {
		Some(bridge) => bridge.attach(hub.clone()),
		None => false,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use futures::{FutureExt, StreamExt};

	fn record<'a>(message: &'a str, error: Option<&'a ErrorInfo>) -> RawRecord<'a> {
		RawRecord {
			level: LogLevel::Error,
			logger_name: "x",
			message,
			timestamp: 1000,
			thread_name: "t1",
			error,
		}
	}

	#[test]
	fn test_record_before_attach_is_dropped() {
		let bridge = CaptureBridge::new(None);
		bridge.on_record(record("too early", None));

		let hub = LogHub::new(16);
		let mut sub = hub.subscribe();
		assert!(attach_hub(Some(&bridge), &hub));

		assert!(sub.next().now_or_never().is_none());
		assert!(hub.retained().is_none());
	}

	#[test]
	fn test_attach_is_idempotent() {
		let bridge = CaptureBridge::new(None);
		let first = LogHub::new(16);
		let second = LogHub::new(16);

		assert!(attach_hub(Some(&bridge), &first));
		assert!(!attach_hub(Some(&bridge), &second));
		assert!(!attach_hub(Some(&bridge), &first));

		let mut sub = first.subscribe();
		let mut other = second.subscribe();
		bridge.on_record(record("hello", None));

		assert!(sub.next().now_or_never().flatten().is_some());
		assert!(other.next().now_or_never().is_none());
	}

	#[test]
	fn test_attach_without_bridge_is_noop() {
		let hub = LogHub::new(16);
		assert!(!attach_hub(None, &hub));
	}

	#[test]
	fn test_stopped_bridge_drops_records() {
		let bridge = CaptureBridge::new(None);
		let hub = LogHub::new(16);
		bridge.attach(hub.clone());
		let mut sub = hub.subscribe();

		bridge.stop();
		bridge.on_record(record("while stopped", None));
		assert!(sub.next().now_or_never().is_none());

		bridge.start();
		bridge.on_record(record("running", None));
		let payload = sub.next().now_or_never().flatten().unwrap();
		assert!(payload.contains("running"));
	}

	#[test]
	fn test_end_to_end_error_event() {
		let bridge = CaptureBridge::new(None);
		let hub = LogHub::new(16);
		bridge.attach(hub.clone());
		let mut sub = hub.subscribe();

		let info = ErrorInfo::new("RuntimeException", "boom")
			.with_frames(["com.app.Foo.run", "com.app.Main.main"]);
		bridge.on_record(record("boom", Some(&info)));

		let payload = sub.next().now_or_never().flatten().unwrap();
		assert!(sub.next().now_or_never().is_none());

		let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
		assert_eq!(value["level"], "ERROR");
		assert_eq!(value["loggerName"], "x");
		assert_eq!(value["message"], "boom");
		assert_eq!(value["timestamp"], 1000);
		assert_eq!(value["threadName"], "t1");
		assert_eq!(value["throwableMessage"], "RuntimeException: boom");
		let trace = value["stackTrace"].as_str().unwrap();
		assert_eq!(trace.lines().count(), 1);
		assert_eq!(trace, "com.app.Foo.run\n");
	}

	#[test]
	fn test_scope_applied_to_trace() {
		let bridge = CaptureBridge::new(Some("com.app".into()));
		let hub = LogHub::new(16);
		bridge.attach(hub.clone());
		let mut sub = hub.subscribe();

		let info = ErrorInfo::new("E", "m").with_frames([
			"com.app.Foo",
			"com.app.Bar",
			"com.lib.Baz",
			"com.app.Qux",
		]);
		bridge.on_record(record("scoped", Some(&info)));

		let payload = sub.next().now_or_never().flatten().unwrap();
		let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
		assert_eq!(value["stackTrace"], "com.app.Foo\ncom.app.Bar\n");
	}

	#[test]
	fn test_empty_scope_is_treated_as_absent() {
		let bridge = CaptureBridge::new(Some(String::new()));
		assert!(bridge.scope().is_none());
	}
}
