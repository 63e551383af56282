// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the tracker SDK.

use apptracker_core::{ConfigError, ValidationError};
use thiserror::Error;

/// A failure reported by the native bridge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BridgeError {
	pub message: String,
}

impl BridgeError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}
}

/// Tracker SDK errors.
///
/// Every variant raised by a public operation displays with that operation's
/// name as a prefix, e.g. `trackScreenViewEvent: invalid screenView event: ...`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackerError {
	/// The init configuration was rejected before the tracker was created.
	#[error("createTracker: {0}")]
	Config(#[from] ConfigError),

	/// A payload or contexts array failed its schema check.
	#[error("{operation}: {source}")]
	Validation {
		operation: &'static str,
		source: ValidationError,
	},

	/// The native bridge rejected the call.
	#[error("{operation}: {source}")]
	Bridge {
		operation: &'static str,
		source: BridgeError,
	},

	/// An argument outside any schema table was rejected.
	#[error("{operation}: {message}")]
	InvalidArgument {
		operation: &'static str,
		message: String,
	},

	/// Tracker creation failed, so the operation never ran.
	#[error("tracker initialization failed: {0}")]
	InitFailed(String),

	/// One or more individual subject setters failed.
	#[error("setSubjectData:{}", .0.join(":"))]
	SubjectData(Vec<String>),

	#[error("serialization error: {0}")]
	Serialization(String),

	/// An inbound web-view message could not be parsed.
	#[error("invalid web-view message: {0}")]
	WebViewMessage(String),

	/// `build()` was called outside a tokio runtime.
	#[error("no tokio runtime is available to create the tracker")]
	NoRuntime,
}

impl TrackerError {
	/// Returns the operation the error is attributed to, if any.
	pub fn operation(&self) -> Option<&'static str> {
		match self {
			TrackerError::Config(_) => Some("createTracker"),
			TrackerError::Validation { operation, .. }
			| TrackerError::Bridge { operation, .. }
			| TrackerError::InvalidArgument { operation, .. } => Some(*operation),
			TrackerError::SubjectData(_) => Some("setSubjectData"),
			_ => None,
		}
	}
}

impl From<serde_json::Error> for TrackerError {
	fn from(err: serde_json::Error) -> Self {
		TrackerError::Serialization(err.to_string())
	}
}

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, TrackerError>;

#[cfg(test)]
mod tests {
	use super::*;
	use apptracker_core::SchemaKind;

	#[test]
	fn validation_errors_carry_the_operation_prefix() {
		let err = TrackerError::Validation {
			operation: "trackScreenViewEvent",
			source: ValidationError::new(SchemaKind::ScreenView, "missing required field `name`"),
		};
		assert_eq!(
			err.to_string(),
			"trackScreenViewEvent: invalid screenView event: missing required field `name`"
		);
		assert_eq!(err.operation(), Some("trackScreenViewEvent"));
	}

	#[test]
	fn config_errors_are_attributed_to_create_tracker() {
		let err = TrackerError::from(ConfigError::MissingAppName);
		assert_eq!(err.to_string(), "createTracker: appName parameter is required to be set");
	}

	#[test]
	fn subject_data_joins_every_reason() {
		let err = TrackerError::SubjectData(vec![
			"setUserId: boom".to_string(),
			"setTimezone: bang".to_string(),
		]);
		assert_eq!(err.to_string(), "setSubjectData:setUserId: boom:setTimezone: bang");
	}

	#[test]
	fn bridge_errors_display_the_native_message() {
		let err = TrackerError::Bridge {
			operation: "getSessionId",
			source: BridgeError::new("no session"),
		};
		assert_eq!(err.to_string(), "getSessionId: no session");
		assert_eq!(TrackerError::NoRuntime.operation(), None);
	}
}
