// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::VigilConfigLayer;
use crate::sections::{HttpConfigLayer, LogFormat, LoggingConfigLayer, StreamConfigLayer};

/// Default location of the config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/loom/vigil.toml";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<VigilConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<VigilConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(VigilConfigLayer::default())
	}
}

/// TOML file configuration source. A missing file yields an empty layer.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new(SYSTEM_CONFIG_PATH)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<VigilConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(VigilConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: VigilConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: LOOM_VIGIL_<SECTION>_<FIELD>
#[derive(Default)]
pub struct EnvSource {
	vars: Option<HashMap<String, String>>,
}

impl EnvSource {
	/// Read from the process environment.
	pub fn new() -> Self {
		Self::default()
	}

	/// Read from a fixed set of variables instead of the process environment.
	pub fn from_vars<I, K, V>(vars: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<String>,
		V: Into<String>,
	{
		Self {
			vars: Some(
				vars.into_iter()
					.map(|(k, v)| (k.into(), v.into()))
					.collect(),
			),
		}
	}

	fn var(&self, name: &str) -> Option<String> {
		let value = match &self.vars {
			Some(vars) => vars.get(name).cloned(),
			None => std::env::var(name).ok(),
		};
		value.filter(|s| !s.is_empty())
	}

	fn bool(&self, name: &str) -> Option<bool> {
		self.var(name)
			.map(|v| v.eq_ignore_ascii_case("true") || v == "1")
	}

	fn parsed<T: FromStr>(&self, name: &str, kind: &str) -> Result<Option<T>, ConfigError> {
		match self.var(name) {
			Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
				key: name.to_string(),
				message: format!("invalid {kind} value '{v}'"),
			}),
			None => Ok(None),
		}
	}

	fn load_http(&self) -> Result<HttpConfigLayer, ConfigError> {
		Ok(HttpConfigLayer {
			host: self.var("LOOM_VIGIL_HOST"),
			port: self.parsed("LOOM_VIGIL_PORT", "u16")?,
			cors_allow_any: self.bool("LOOM_VIGIL_CORS_ALLOW_ANY"),
		})
	}

	fn load_logging(&self) -> Result<LoggingConfigLayer, ConfigError> {
		let format = match self.var("LOOM_VIGIL_LOG_FORMAT") {
			Some(v) => Some(v.parse::<LogFormat>().map_err(|message| {
				ConfigError::InvalidValue {
					key: "LOOM_VIGIL_LOG_FORMAT".to_string(),
					message,
				}
			})?),
			None => None,
		};

		Ok(LoggingConfigLayer {
			level: self.var("LOOM_VIGIL_LOG_LEVEL"),
			format,
		})
	}

	fn load_stream(&self) -> Result<StreamConfigLayer, ConfigError> {
		Ok(StreamConfigLayer {
			enabled: self.bool("LOOM_VIGIL_STREAM_ENABLED"),
			scope: self.var("LOOM_VIGIL_STREAM_SCOPE"),
			channel_capacity: self.parsed("LOOM_VIGIL_STREAM_CAPACITY", "usize")?,
			keep_alive_secs: self.parsed("LOOM_VIGIL_STREAM_KEEP_ALIVE_SECS", "u64")?,
		})
	}
}

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<VigilConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(VigilConfigLayer {
			http: Some(self.load_http()?),
			logging: Some(self.load_logging()?),
			stream: Some(self.load_stream()?),
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Environment > Precedence::ConfigFile);
		assert!(Precedence::ConfigFile > Precedence::Defaults);
	}

	#[test]
	fn test_defaults_source_returns_empty_layer() {
		let layer = DefaultsSource.load().unwrap();
		assert!(layer.http.is_none());
		assert!(layer.stream.is_none());
	}

	#[test]
	fn test_toml_source_missing_file_returns_empty() {
		let source = TomlSource::new("/nonexistent/vigil.toml");
		let layer = source.load().unwrap();
		assert!(layer.http.is_none());
	}

	#[test]
	fn test_toml_source_reads_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("vigil.toml");
		std::fs::write(&path, "[stream]\nscope = \"my_app\"\n").unwrap();

		let layer = TomlSource::new(&path).load().unwrap();
		assert_eq!(layer.stream.unwrap().scope.as_deref(), Some("my_app"));
	}

	#[test]
	fn test_toml_source_reports_parse_errors() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("vigil.toml");
		std::fs::write(&path, "[http\nport = ").unwrap();

		let err = TomlSource::new(&path).load().unwrap_err();
		assert!(matches!(err, ConfigError::TomlParse { .. }));
	}

	#[test]
	fn test_env_source_reads_vars() {
		let source = EnvSource::from_vars([
			("LOOM_VIGIL_PORT", "9200"),
			("LOOM_VIGIL_LOG_FORMAT", "json"),
			("LOOM_VIGIL_STREAM_ENABLED", "0"),
			("LOOM_VIGIL_STREAM_SCOPE", "my_app"),
			("LOOM_VIGIL_STREAM_CAPACITY", "32"),
		]);
		let layer = source.load().unwrap();

		assert_eq!(layer.http.unwrap().port, Some(9200));
		assert_eq!(layer.logging.unwrap().format, Some(LogFormat::Json));
		let stream = layer.stream.unwrap();
		assert_eq!(stream.enabled, Some(false));
		assert_eq!(stream.scope.as_deref(), Some("my_app"));
		assert_eq!(stream.channel_capacity, Some(32));
		assert_eq!(stream.keep_alive_secs, None);
	}

	#[test]
	fn test_env_source_rejects_bad_numbers() {
		let source = EnvSource::from_vars([("LOOM_VIGIL_PORT", "not-a-port")]);
		let err = source.load().unwrap_err();
		assert!(err.to_string().contains("LOOM_VIGIL_PORT"));
	}

	#[test]
	fn test_env_source_ignores_empty_values() {
		let source = EnvSource::from_vars([("LOOM_VIGIL_HOST", "")]);
		let layer = source.load().unwrap();
		assert!(layer.http.unwrap().host.is_none());
	}
}
