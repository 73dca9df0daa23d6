// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Loom Vigil server binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use loom_vigil_logs::{attach_hub, LogHub};
use loom_vigil_server::{create_app_state, create_router, telemetry, version};

/// Loom Vigil - live log streaming and runtime metrics over HTTP.
#[derive(Parser, Debug)]
#[command(name = "loom-vigil", about = "Live log streaming and runtime metrics", version)]
struct Args {
	/// Configuration file (defaults to /etc/loom/vigil.toml)
	#[arg(long, env = "LOOM_VIGIL_CONFIG")]
	config: Option<PathBuf>,

	#[command(subcommand)]
	command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Show version and build information
	Version,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	if let Some(Command::Version) = args.command {
		println!("{}", version::format_version_info());
		return Ok(());
	}

	dotenvy::dotenv().ok();

	let config = match args.config.as_deref() {
		Some(path) => loom_vigil_config::load_config_with_file(path)?,
		None => loom_vigil_config::load_config()?,
	};

	// Bridge is registered with tracing before the hub exists.
	let bridge = telemetry::init_tracing(&config.logging, &config.stream);
	telemetry::log_config(&config);

	let hub = LogHub::new(config.stream.channel_capacity);
	if attach_hub(bridge.as_ref(), &hub) {
		tracing::debug!("log capture attached to hub");
	} else {
		tracing::info!("log streaming disabled, stream endpoint will stay idle");
	}

	let state = create_app_state(&config, hub)?;
	let app = create_router(state);

	let addr = config.socket_addr();
	tracing::info!(%addr, "starting loom-vigil");

	let listener = tokio::net::TcpListener::bind(&addr).await?;

	tokio::select! {
		result = axum::serve(listener, app) => {
			if let Err(e) = result {
				tracing::error!(error = %e, "Server error");
			}
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Received shutdown signal");
		}
	}

	if let Some(bridge) = bridge {
		bridge.stop();
	}

	tracing::info!("Server shutdown complete");
	Ok(())
}
