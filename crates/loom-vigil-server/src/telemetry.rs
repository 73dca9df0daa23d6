// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Global tracing setup.

use loom_vigil_config::{LogFormat, LoggingConfig, StreamConfig, VigilConfig};
use loom_vigil_logs::{CaptureBridge, CaptureLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// The capture bridge for `stream`, or `None` when streaming is disabled.
pub fn capture_bridge(stream: &StreamConfig) -> Option<CaptureBridge> {
	stream
		.enabled
		.then(|| CaptureBridge::new(stream.scope.clone()))
}

/// Install the global subscriber: stdout in the configured format plus the
/// capture layer when streaming is enabled.
///
/// `RUST_LOG` overrides the configured level. Must be called once.
pub fn init_tracing(logging: &LoggingConfig, stream: &StreamConfig) -> Option<CaptureBridge> {
	let bridge = capture_bridge(stream);
	let capture = bridge.clone().map(CaptureLayer::new);

	let (text, json) = match logging.format {
		LogFormat::Text => (Some(tracing_subscriber::fmt::layer()), None),
		LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
	};

	tracing_subscriber::registry()
		.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| logging.level.clone().into()))
		.with(text)
		.with(json)
		.with(capture)
		.init();

	bridge
}

/// Log the resolved configuration. Call after [`init_tracing`].
pub fn log_config(config: &VigilConfig) {
	tracing::info!(
		host = %config.http.host,
		port = config.http.port,
		cors_allow_any = config.http.cors_allow_any,
		log_level = %config.logging.level,
		log_format = %config.logging.format,
		stream_enabled = config.stream.enabled,
		stream_scope = config.stream.scope.as_deref().unwrap_or("-"),
		channel_capacity = config.stream.channel_capacity,
		"Vigil configuration loaded"
	);
}

#[cfg(test)]
mod tests {
	use super::*;
	use futures::{FutureExt, StreamExt};
	use loom_vigil_config::HttpConfig;
	use loom_vigil_logs::{attach_hub, LogHub};

	fn stream(enabled: bool, scope: Option<&str>) -> StreamConfig {
		StreamConfig {
			enabled,
			scope: scope.map(String::from),
			channel_capacity: 16,
			keep_alive_secs: 15,
		}
	}

	#[test]
	fn test_disabled_stream_has_no_bridge() {
		assert!(capture_bridge(&stream(false, None)).is_none());
	}

	#[test]
	fn test_enabled_stream_bridge_is_unattached() {
		let bridge = capture_bridge(&stream(true, Some("my_app"))).unwrap();
		assert!(!bridge.is_attached());
		assert!(bridge.is_started());
		assert_eq!(bridge.scope(), Some("my_app"));
	}

	#[test]
	fn test_log_config_reports_resolved_values() {
		let hub = LogHub::new(16);
		let bridge = capture_bridge(&stream(true, None)).unwrap();
		attach_hub(Some(&bridge), &hub);
		let mut sub = hub.subscribe();

		let config = VigilConfig {
			http: HttpConfig {
				port: 9200,
				..Default::default()
			},
			stream: stream(true, Some("my_app")),
			..Default::default()
		};

		let subscriber = tracing_subscriber::registry().with(CaptureLayer::new(bridge));
		tracing::subscriber::with_default(subscriber, || log_config(&config));

		let payload = sub.next().now_or_never().flatten().unwrap();
		let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
		assert_eq!(value["level"], "INFO");
		let message = value["message"].as_str().unwrap();
		assert!(message.starts_with("Vigil configuration loaded"));
		assert!(message.contains(" port=9200"));
		assert!(message.contains(" stream_scope=my_app"));
	}
}
