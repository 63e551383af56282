// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the app tracker bridge.
//!
//! This crate holds everything that does not need a runtime: the static event
//! and configuration schemas, the validator that checks untrusted JSON against
//! them, and typed payloads that serialize into the validated shapes. The SDK
//! crate (`apptracker`) builds deferred dispatch on top of it.
//!
//! # Example
//!
//! ```
//! use apptracker_core::{validate, validate_init, ConfigError, SchemaKind};
//! use serde_json::json;
//!
//! assert!(validate(SchemaKind::ScreenView, &json!({"name": "Home"})).is_ok());
//!
//! let err = validate(SchemaKind::ScreenView, &json!({})).unwrap_err();
//! assert_eq!(err.to_string(), "invalid screenView event: missing required field `name`");
//!
//! let config = json!({"customerKey": "ck", "appName": "shop"});
//! assert_eq!(validate_init(&config), Ok(()));
//! assert_eq!(
//!     validate_init(&json!({"appName": "shop"})),
//!     Err(ConfigError::MissingCustomerKey)
//! );
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod schema;
pub mod validate;

pub use config::{
	validate_init, Basis, BufferOption, ConfigSection, DevicePlatform, EmitterConfig, GdprConfig,
	HttpMethod, InitConfig, LogLevel, NetworkConfig, RemoteConfig, SessionConfig, SubjectConfig,
	TrackerConfig,
};
pub use error::{ConfigError, Result, ValidationError};
pub use event::{
	ConsentGranted, ConsentWithdrawn, DeepLinkReceived, EcommerceItem, EcommerceTransaction, Event,
	GlobalContext, MessageAttachment, MessageNotification, PageView, ScreenSize, ScreenView,
	SelfDescribing, Structured, Timing, Trigger,
};
pub use schema::{Field, FieldKind, SchemaKind, Shape, SubjectAttribute, UnknownKeys};
pub use validate::{conforms, describe, validate};
