// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Collection of [`RuntimeSnapshot`]s via `sysinfo`.

use chrono::Utc;
use parking_lot::Mutex;
use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};
use tracing::trace;

use crate::error::{MetricsError, Result};
use crate::snapshot::{MemoryInfo, OsInfo, RuntimeInfo, RuntimeSnapshot, ThreadInfo};

/// Reads process and host counters for the current process.
///
/// Keeps its own `System` between calls so CPU usage is measured over the
/// interval since the previous snapshot. The first snapshot reports zero CPU.
pub struct RuntimeCollector {
	system: Mutex<System>,
	pid: Pid,
	version: String,
}

impl RuntimeCollector {
	/// `version` is reported as-is in [`RuntimeInfo::version`].
	pub fn new(version: impl Into<String>) -> Result<Self> {
		let pid = sysinfo::get_current_pid().map_err(|e| MetricsError::CurrentPid(e.to_string()))?;
		Ok(Self {
			system: Mutex::new(System::new()),
			pid,
			version: version.into(),
		})
	}

	pub fn pid(&self) -> u32 {
		self.pid.as_u32()
	}

	/// Refresh and read all counters. Blocking; call off the async runtime.
	pub fn snapshot(&self) -> Result<RuntimeSnapshot> {
		let mut system = self.system.lock();
		system.refresh_memory();
		system.refresh_cpu_usage();
		system.refresh_processes_specifics(
			ProcessesToUpdate::Some(&[self.pid]),
			true,
			ProcessRefreshKind::everything(),
		);

		let process = system
			.process(self.pid)
			.ok_or(MetricsError::ProcessNotFound(self.pid.as_u32()))?;

		let now = Utc::now();
		let start_time = i64::try_from(process.start_time())
			.unwrap_or(i64::MAX / 1000)
			.saturating_mul(1000);

		let memory = MemoryInfo {
			process_resident: process.memory(),
			process_virtual: process.virtual_memory(),
			system_total: system.total_memory(),
			system_used: system.used_memory(),
			system_free: system.free_memory(),
			system_available: system.available_memory(),
		};

		let threads = ThreadInfo {
			live: process.tasks().map(|tasks| tasks.len()),
			available_parallelism: std::thread::available_parallelism()
				.map(|n| n.get())
				.unwrap_or(1),
		};

		let runtime = RuntimeInfo {
			pid: self.pid.as_u32(),
			name: process.name().to_string_lossy().into_owned(),
			start_time,
			uptime_millis: process.run_time().saturating_mul(1000),
			executable: process.exe().map(|p| p.display().to_string()),
			arguments: process
				.cmd()
				.iter()
				.map(|arg| arg.to_string_lossy().into_owned())
				.collect(),
			version: self.version.clone(),
		};

		let os = OsInfo {
			name: System::name(),
			version: System::os_version(),
			kernel_version: System::kernel_version(),
			arch: std::env::consts::ARCH.to_string(),
			available_processors: system.cpus().len(),
			system_load_average: load_average_one(),
			process_cpu_usage: process.cpu_usage(),
			system_cpu_usage: system.global_cpu_usage(),
			total_physical_memory: system.total_memory(),
			free_physical_memory: system.free_memory(),
			total_swap_space: system.total_swap(),
			free_swap_space: system.free_swap(),
		};

		trace!(pid = runtime.pid, "collected runtime snapshot");

		Ok(RuntimeSnapshot {
			timestamp: now.timestamp_millis(),
			memory,
			threads,
			runtime,
			os,
		})
	}
}

#[cfg(not(windows))]
fn load_average_one() -> f64 {
	System::load_average().one
}

#[cfg(windows)]
fn load_average_one() -> f64 {
	-1.0
}
