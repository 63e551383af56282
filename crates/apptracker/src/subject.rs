// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Subject attribute setters.

use apptracker_core::{conforms, SchemaKind, SubjectAttribute};
use futures::future::join_all;
use serde_json::{Map, Value};

use crate::bridge::BridgeMethod;
use crate::error::{Result, TrackerError};
use crate::router::{check, EventRouter};

impl EventRouter {
	/// Sets one subject attribute. `null` clears it.
	pub async fn set_subject_attribute(
		&self,
		namespace: Option<&str>,
		attribute: SubjectAttribute,
		value: &Value,
	) -> Result<()> {
		let method = BridgeMethod::setter(attribute);
		let operation = method.as_str();
		if !conforms(attribute.kind(), value) {
			return Err(TrackerError::InvalidArgument {
				operation,
				message: format!("{attribute} can only be {}", attribute.expectation()),
			});
		}

		let mut args = Map::new();
		args.insert("tracker".to_string(), namespace.into());
		args.insert(attribute.key().to_string(), value.clone());
		self.invoke(operation, method, Value::Object(args))
			.await
			.map(drop)
	}

	/// Applies a whole subject configuration.
	///
	/// The configuration is checked as a unit first. The individual setters
	/// then run concurrently; every failure is collected into one
	/// [`TrackerError::SubjectData`].
	pub async fn set_subject_data(&self, namespace: Option<&str>, config: &Value) -> Result<()> {
		check("setSubjectData", SchemaKind::SubjectConfig, config)?;

		let setters = config
			.as_object()
			.into_iter()
			.flatten()
			.filter_map(|(key, value)| {
				SubjectAttribute::from_key(key)
					.map(|attribute| self.set_subject_attribute(namespace, attribute, value))
			});

		let reasons: Vec<String> = join_all(setters)
			.await
			.into_iter()
			.filter_map(Result::err)
			.map(|err| err.to_string())
			.collect();

		if reasons.is_empty() {
			Ok(())
		} else {
			Err(TrackerError::SubjectData(reasons))
		}
	}
}
