// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for payload and configuration validation.

use thiserror::Error;

use crate::config::ConfigSection;
use crate::schema::SchemaKind;

/// A payload failed its schema check.
///
/// Carries only the first violation found; validation stops there.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {kind}: {reason}")]
pub struct ValidationError {
	/// The schema the value was checked against.
	pub kind: SchemaKind,
	/// Human-readable description of the violation.
	pub reason: String,
}

impl ValidationError {
	pub fn new(kind: SchemaKind, reason: impl Into<String>) -> Self {
		Self {
			kind,
			reason: reason.into(),
		}
	}
}

/// The tracker init configuration was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
	/// The configuration is not a JSON object.
	#[error("tracker configuration must be an object")]
	NotAnObject,

	#[error("customerKey parameter is required to be set")]
	MissingCustomerKey,

	#[error("appName parameter is required to be set")]
	MissingAppName,

	/// A sub-configuration failed its shape check.
	#[error("{section} is invalid: {reason}")]
	InvalidSection {
		section: ConfigSection,
		reason: String,
	},
}

/// Result type alias for configuration checks.
pub type Result<T> = std::result::Result<T, ConfigError>;
