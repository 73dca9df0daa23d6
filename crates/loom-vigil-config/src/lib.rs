// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered configuration for Loom Vigil.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`LOOM_VIGIL_*`)
//!
//! # Usage
//!
//! ```ignore
//! use loom_vigil_config::load_config;
//!
//! let config = load_config()?;
//! println!("Vigil listening on {}", config.socket_addr());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::VigilConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::debug;

/// Fully resolved configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VigilConfig {
	pub http: HttpConfig,
	pub logging: LoggingConfig,
	pub stream: StreamConfig,
}

impl VigilConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`LOOM_VIGIL_*`)
/// 2. Config file (`/etc/loom/vigil.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<VigilConfig, ConfigError> {
	load_config_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource::new()),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<VigilConfig, ConfigError> {
	load_config_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource::new()),
	])
}

/// Merge the given sources in precedence order and resolve the result.
pub fn load_config_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<VigilConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = VigilConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: VigilConfigLayer) -> Result<VigilConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();
	let stream = layer.stream.unwrap_or_default().finalize();

	validate_stream(&stream)?;

	Ok(VigilConfig {
		http,
		logging,
		stream,
	})
}

/// Validate cross-field configuration rules.
fn validate_stream(stream: &StreamConfig) -> Result<(), ConfigError> {
	if stream.channel_capacity == 0 {
		return Err(ConfigError::Validation(
			"stream.channel_capacity must be at least 1".to_string(),
		));
	}
	if stream.keep_alive_secs == 0 {
		return Err(ConfigError::Validation(
			"stream.keep_alive_secs must be at least 1".to_string(),
		));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_socket_addr() {
		let config = VigilConfig {
			http: HttpConfig {
				host: "127.0.0.1".to_string(),
				port: 9000,
				cors_allow_any: true,
			},
			..Default::default()
		};
		assert_eq!(config.socket_addr(), "127.0.0.1:9000");
	}

	#[test]
	fn test_zero_capacity_rejected() {
		let stream = StreamConfig {
			channel_capacity: 0,
			..Default::default()
		};
		let err = validate_stream(&stream).unwrap_err();
		assert!(err.to_string().contains("channel_capacity"));
	}

	#[test]
	fn test_env_overrides_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("vigil.toml");
		std::fs::write(
			&path,
			"[http]\nport = 9100\nhost = \"127.0.0.1\"\n[stream]\nscope = \"from_file\"\n",
		)
		.unwrap();

		let config = load_config_from_sources(vec![
			Box::new(EnvSource::from_vars([("LOOM_VIGIL_PORT", "9300")])),
			Box::new(TomlSource::new(&path)),
			Box::new(DefaultsSource),
		])
		.unwrap();

		assert_eq!(config.http.port, 9300);
		assert_eq!(config.http.host, "127.0.0.1");
		assert_eq!(config.stream.scope.as_deref(), Some("from_file"));
		assert_eq!(config.logging.level, "info");
	}

	#[test]
	fn test_defaults_only() {
		let config = load_config_from_sources(vec![Box::new(DefaultsSource)]).unwrap();
		assert_eq!(config, VigilConfig::default());
	}
}
