// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Removing native trackers.
//!
//! These calls are not deferred: they act on whatever the native module holds
//! at the time of the call.

use tracing::info;

use crate::bridge::NativeBridge;
use crate::error::{Result, TrackerError};

/// Removes the tracker registered under `namespace`.
///
/// Returns whether the native module had such a tracker.
pub async fn remove_tracker(bridge: &dyn NativeBridge, namespace: &str) -> Result<bool> {
	const OPERATION: &str = "removeTracker";
	if namespace.is_empty() {
		return Err(TrackerError::InvalidArgument {
			operation: OPERATION,
			message: "namespace can only be a non-empty string".to_string(),
		});
	}

	let removed = bridge
		.remove_tracker(namespace)
		.await
		.map_err(|source| TrackerError::Bridge {
			operation: OPERATION,
			source,
		})?;
	info!(namespace = %namespace, removed, "Removed tracker");
	Ok(removed)
}

/// Removes every native tracker.
pub async fn remove_all_trackers(bridge: &dyn NativeBridge) -> Result<bool> {
	let removed = bridge
		.remove_all_trackers()
		.await
		.map_err(|source| TrackerError::Bridge {
			operation: "removeAllTrackers",
			source,
		})?;
	info!(removed, "Removed all trackers");
	Ok(removed)
}
