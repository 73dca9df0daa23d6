// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Snapshot types returned by the metrics endpoint.

use serde::{Deserialize, Serialize};

/// One point-in-time reading of process and host counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeSnapshot {
	/// Epoch milliseconds at collection time.
	pub timestamp: i64,
	pub memory: MemoryInfo,
	pub threads: ThreadInfo,
	pub runtime: RuntimeInfo,
	pub os: OsInfo,
}

/// Memory in bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryInfo {
	pub process_resident: u64,
	pub process_virtual: u64,
	pub system_total: u64,
	pub system_used: u64,
	pub system_free: u64,
	pub system_available: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadInfo {
	/// Threads of this process; absent where the OS does not report them.
	pub live: Option<usize>,
	pub available_parallelism: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeInfo {
	pub pid: u32,
	pub name: String,
	/// Epoch milliseconds.
	pub start_time: i64,
	pub uptime_millis: u64,
	pub executable: Option<String>,
	pub arguments: Vec<String>,
	pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OsInfo {
	pub name: Option<String>,
	pub version: Option<String>,
	pub kernel_version: Option<String>,
	pub arch: String,
	pub available_processors: usize,
	/// One-minute load average, -1 when unavailable.
	pub system_load_average: f64,
	/// Percent of one core, may exceed 100 on multi-core hosts.
	pub process_cpu_usage: f32,
	/// Percent across all cores.
	pub system_cpu_usage: f32,
	pub total_physical_memory: u64,
	pub free_physical_memory: u64,
	pub total_swap_space: u64,
	pub free_swap_space: u64,
}
