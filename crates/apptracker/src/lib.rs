// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! App tracker SDK.
//!
//! This crate validates tracking calls and forwards them to a native tracker
//! module through the [`NativeBridge`] trait. Tracker creation is
//! asynchronous; every operation can be called immediately and runs once the
//! tracker is ready.
//!
//! # Features
//!
//! - **Validated dispatch**: Every payload is checked against a static schema
//!   before it reaches the bridge
//! - **Deferred execution**: Calls made during creation wait on a per-tracker
//!   readiness signal
//! - **Explicit error routing**: Failures are swallowed into an
//!   [`ErrorHandler`] or returned, per [`ErrorPolicy`]
//! - **Web-view forwarding**: Messages from embedded web content are
//!   dispatched through the same router
//!
//! # Example
//!
//! ```ignore
//! use apptracker::{InitConfig, ScreenView, Tracker};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tracker = Tracker::builder(bridge)
//!         .config(InitConfig::new("ck-prod", "shop"))
//!         .namespace("shop")
//!         .build()?;
//!
//!     // Runs once the native tracker exists.
//!     tracker.track(&ScreenView::new("Home"), &[]).await?;
//!
//!     let session = tracker.get_session_id().await?;
//!     Ok(())
//! }
//! ```

mod bridge;
mod deferred;
mod error;
mod lifecycle;
mod readiness;
mod router;
mod session;
mod subject;
mod tracker;
mod webview;

pub use bridge::{BridgeMethod, NativeBridge, SharedBridge};
pub use deferred::{
	Deferred, ErrorHandler, ErrorPolicy, LogErrorHandler, NoOpErrorHandler, SharedErrorHandler,
};
pub use error::{BridgeError, Result, TrackerError};
pub use lifecycle::{remove_all_trackers, remove_tracker};
pub use readiness::{channel as readiness_channel, Readiness, ReadinessResolver, ReadinessSignal};
pub use router::{EventKind, EventRouter};
pub use session::SessionGetter;
pub use tracker::{DispatchOptions, Tracker, TrackerBuilder, DEFAULT_NAMESPACE};
pub use webview::{WebViewCommand, WebViewHandler, WebViewMessage};

// Re-export core types for convenience
pub use apptracker_core::{
	validate, validate_init, ConfigError, ConsentGranted, ConsentWithdrawn, DeepLinkReceived,
	EcommerceItem, EcommerceTransaction, Event, GlobalContext, InitConfig, MessageAttachment,
	MessageNotification, PageView, SchemaKind, ScreenSize, ScreenView, SelfDescribing, Structured,
	SubjectAttribute, Timing, Trigger, ValidationError,
};
