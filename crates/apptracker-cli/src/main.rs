// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! `apptracker` - lint tracker input and replay web-view traffic.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use anyhow::Context;
use apptracker::{
	remove_tracker, validate, validate_init, ErrorHandler, EventKind, Tracker, TrackerError,
	WebViewHandler, DEFAULT_NAMESPACE,
};
use async_trait::async_trait;
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod bridge;

use bridge::LoggingBridge;

#[derive(Parser, Debug)]
#[command(name = "apptracker", about = "App tracker bridge tooling", version)]
struct Args {
	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Check a tracker init configuration (JSON)
	ValidateConfig {
		file: PathBuf,
	},
	/// Check an event payload (JSON) against its schema
	ValidateEvent {
		#[arg(long, value_enum)]
		kind: KindArg,
		file: PathBuf,
	},
	/// Replay web-view messages (one JSON object per line) against a logging bridge
	Replay {
		file: PathBuf,

		/// Create a tracker from this init configuration first
		#[arg(long)]
		config: Option<PathBuf>,

		/// Namespace of the created tracker
		#[arg(long, env = "APPTRACKER_NAMESPACE", default_value = DEFAULT_NAMESPACE)]
		namespace: String,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
	SelfDescribing,
	ScreenView,
	Structured,
	PageView,
	Timing,
	ConsentGranted,
	ConsentWithdrawn,
	EcommerceTransaction,
	DeepLinkReceived,
	MessageNotification,
}

impl From<KindArg> for EventKind {
	fn from(kind: KindArg) -> Self {
		match kind {
			KindArg::SelfDescribing => EventKind::SelfDescribing,
			KindArg::ScreenView => EventKind::ScreenView,
			KindArg::Structured => EventKind::Structured,
			KindArg::PageView => EventKind::PageView,
			KindArg::Timing => EventKind::Timing,
			KindArg::ConsentGranted => EventKind::ConsentGranted,
			KindArg::ConsentWithdrawn => EventKind::ConsentWithdrawn,
			KindArg::EcommerceTransaction => EventKind::EcommerceTransaction,
			KindArg::DeepLinkReceived => EventKind::DeepLinkReceived,
			KindArg::MessageNotification => EventKind::MessageNotification,
		}
	}
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let args = Args::parse();

	tracing_subscriber::registry()
		.with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
		.init();

	match args.command {
		Command::ValidateConfig { file } => {
			validate_config_file(&file)?;
			println!("{}: ok", file.display());
		}
		Command::ValidateEvent { kind, file } => {
			validate_event_file(kind.into(), &file)?;
			println!("{}: ok", file.display());
		}
		Command::Replay {
			file,
			config,
			namespace,
		} => {
			let summary = replay(&file, config.as_deref(), &namespace).await?;
			println!(
				"replayed {} messages, {} rejected",
				summary.messages, summary.rejected
			);
			anyhow::ensure!(summary.rejected == 0, "{} messages were rejected", summary.rejected);
		}
	}
	Ok(())
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
	let text = std::fs::read_to_string(path)
		.with_context(|| format!("failed to read {}", path.display()))?;
	serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

fn validate_config_file(path: &Path) -> anyhow::Result<()> {
	let config = read_json(path)?;
	validate_init(&config)
		.with_context(|| format!("{} is not a valid tracker configuration", path.display()))
}

fn validate_event_file(kind: EventKind, path: &Path) -> anyhow::Result<()> {
	let event = read_json(path)?;
	validate(kind.schema(), &event).with_context(|| format!("{} was rejected", path.display()))
}

#[derive(Debug, Default, PartialEq, Eq)]
struct ReplaySummary {
	messages: usize,
	rejected: usize,
}

#[derive(Default)]
struct CountingHandler {
	rejected: AtomicUsize,
}

#[async_trait]
impl ErrorHandler for CountingHandler {
	async fn on_error(&self, error: &TrackerError) {
		warn!(error = %error, "Message rejected");
		self.rejected.fetch_add(1, Ordering::SeqCst);
	}
}

async fn replay(path: &Path, config: Option<&Path>, namespace: &str) -> anyhow::Result<ReplaySummary> {
	let bridge = Arc::new(LoggingBridge::default());

	let tracker = match config {
		Some(config) => {
			let tracker = Tracker::builder(bridge.clone())
				.raw_config(read_json(config)?)
				.namespace(namespace)
				.build()?;
			tracker.ready().await?;
			Some(tracker)
		}
		None => None,
	};

	let handler = Arc::new(CountingHandler::default());
	let webview = WebViewHandler::new(bridge.clone(), handler.clone());
	let text = std::fs::read_to_string(path)
		.with_context(|| format!("failed to read {}", path.display()))?;

	let mut messages = 0;
	for line in text.lines().map(str::trim).filter(|line| !line.is_empty()) {
		webview.handle(line).await;
		messages += 1;
	}

	if let Some(tracker) = tracker {
		remove_tracker(bridge.as_ref(), tracker.namespace()).await?;
	}

	let summary = ReplaySummary {
		messages,
		rejected: handler.rejected.load(Ordering::SeqCst),
	};
	info!(messages = summary.messages, rejected = summary.rejected, "Replay finished");
	Ok(summary)
}
