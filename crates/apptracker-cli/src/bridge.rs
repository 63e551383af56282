// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::HashSet;
use std::sync::Mutex;

use apptracker::{BridgeError, BridgeMethod, NativeBridge};
use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

/// A native bridge that logs every call instead of tracking it.
#[derive(Debug, Default)]
pub struct LoggingBridge {
	trackers: Mutex<HashSet<String>>,
}

impl LoggingBridge {
	fn trackers(&self) -> Result<std::sync::MutexGuard<'_, HashSet<String>>, BridgeError> {
		self.trackers
			.lock()
			.map_err(|_| BridgeError::new("tracker registry poisoned"))
	}
}

#[async_trait]
impl NativeBridge for LoggingBridge {
	async fn create_tracker(&self, config: Value) -> Result<(), BridgeError> {
		let namespace = config["namespace"].as_str().unwrap_or_default().to_string();
		info!(namespace = %namespace, config = %config, "createTracker");
		self.trackers()?.insert(namespace);
		Ok(())
	}

	async fn remove_tracker(&self, namespace: &str) -> Result<bool, BridgeError> {
		let removed = self.trackers()?.remove(namespace);
		info!(namespace = %namespace, removed, "removeTracker");
		Ok(removed)
	}

	async fn remove_all_trackers(&self) -> Result<bool, BridgeError> {
		self.trackers()?.clear();
		info!("removeAllTrackers");
		Ok(true)
	}

	async fn call(&self, method: BridgeMethod, args: Value) -> Result<Value, BridgeError> {
		info!(method = %method, args = %args, "native call");
		Ok(Value::Null)
	}
}
