// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Live log stream configuration section.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StreamConfigLayer {
	pub enabled: Option<bool>,
	pub scope: Option<String>,
	pub channel_capacity: Option<usize>,
	pub keep_alive_secs: Option<u64>,
}

impl StreamConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.enabled.is_some() {
			self.enabled = other.enabled;
		}
		if other.scope.is_some() {
			self.scope = other.scope;
		}
		if other.channel_capacity.is_some() {
			self.channel_capacity = other.channel_capacity;
		}
		if other.keep_alive_secs.is_some() {
			self.keep_alive_secs = other.keep_alive_secs;
		}
	}

	pub fn finalize(self) -> StreamConfig {
		let defaults = StreamConfig::default();
		StreamConfig {
			enabled: self.enabled.unwrap_or(defaults.enabled),
			scope: self.scope.filter(|s| !s.trim().is_empty()),
			channel_capacity: self.channel_capacity.unwrap_or(defaults.channel_capacity),
			keep_alive_secs: self.keep_alive_secs.unwrap_or(defaults.keep_alive_secs),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StreamConfig {
	/// Install the capture layer at startup.
	pub enabled: bool,
	/// Module path used to select stack frames for errors.
	pub scope: Option<String>,
	pub channel_capacity: usize,
	pub keep_alive_secs: u64,
}

impl Default for StreamConfig {
	fn default() -> Self {
		Self {
			enabled: true,
			scope: None,
			channel_capacity: 1024,
			keep_alive_secs: 15,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_layer_finalize_defaults() {
		let config = StreamConfigLayer::default().finalize();
		assert!(config.enabled);
		assert!(config.scope.is_none());
		assert_eq!(config.channel_capacity, 1024);
		assert_eq!(config.keep_alive_secs, 15);
	}

	#[test]
	fn test_blank_scope_is_none() {
		let config = StreamConfigLayer {
			scope: Some("  ".to_string()),
			..Default::default()
		}
		.finalize();
		assert!(config.scope.is_none());
	}

	#[test]
	fn test_merge_overwrites() {
		let mut base = StreamConfigLayer {
			enabled: Some(true),
			scope: Some("old".to_string()),
			..Default::default()
		};
		base.merge(StreamConfigLayer {
			enabled: Some(false),
			keep_alive_secs: Some(30),
			..Default::default()
		});
		assert_eq!(base.enabled, Some(false));
		assert_eq!(base.scope.as_deref(), Some("old"));
		assert_eq!(base.keep_alive_secs, Some(30));
	}
}
