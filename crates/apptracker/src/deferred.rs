// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Deferred dispatch gated on tracker readiness.
//!
//! Operations issued before the tracker exists are suspended, not queued:
//! each call waits on the shared [`ReadinessSignal`] and runs once it settles.
//! If creation failed the operation is never run. Failures of either kind are
//! routed according to an [`ErrorPolicy`]: swallowed into an [`ErrorHandler`]
//! or returned to the caller.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt};
use tracing::warn;

use crate::error::{Result, TrackerError};
use crate::readiness::ReadinessSignal;

/// What a deferred operation does with its failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
	/// Hand the error to the [`ErrorHandler`] and resolve successfully.
	#[default]
	Swallow,
	/// Return the error to the caller. The handler is not notified.
	Propagate,
}

/// Receives errors swallowed by deferred operations.
#[async_trait]
pub trait ErrorHandler: Send + Sync + 'static {
	async fn on_error(&self, error: &TrackerError);
}

/// Type alias for a shared error handler.
pub type SharedErrorHandler = Arc<dyn ErrorHandler>;

/// Logs every error at `warn` level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogErrorHandler;

#[async_trait]
impl ErrorHandler for LogErrorHandler {
	async fn on_error(&self, error: &TrackerError) {
		warn!(
			error = %error,
			operation = error.operation().unwrap_or("unknown"),
			"Tracker operation failed"
		);
	}
}

/// Discards every error.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpErrorHandler;

#[async_trait]
impl ErrorHandler for NoOpErrorHandler {
	async fn on_error(&self, _error: &TrackerError) {}
}

/// Runs operations once readiness settles and routes their failures.
#[derive(Clone)]
pub struct Deferred {
	readiness: ReadinessSignal,
	handler: SharedErrorHandler,
	policy: ErrorPolicy,
}

impl Deferred {
	pub fn new(readiness: ReadinessSignal, handler: SharedErrorHandler, policy: ErrorPolicy) -> Self {
		Self {
			readiness,
			handler,
			policy,
		}
	}

	pub fn policy(&self) -> ErrorPolicy {
		self.policy
	}

	/// Waits for readiness, then runs `f`.
	///
	/// `f` is not invoked before the signal settles, and never invoked if
	/// tracker creation failed.
	///
	/// # Errors
	/// Only under [`ErrorPolicy::Propagate`]: the readiness failure or the
	/// error returned by `f`.
	pub async fn call<F, Fut>(&self, f: F) -> Result<()>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<()>>,
	{
		match self.run(f).await {
			Ok(()) => Ok(()),
			Err(err) => self.route(err).await,
		}
	}

	/// Like [`call`](Self::call), but hands the success value back.
	///
	/// Resolves to `Some(value)` on success and to `None` when the error was
	/// swallowed.
	pub async fn call_with_result<T, F, Fut>(&self, f: F) -> Result<Option<T>>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<T>>,
	{
		match self.run(f).await {
			Ok(value) => Ok(Some(value)),
			Err(err) => self.route(err).await.map(|()| None),
		}
	}

	/// Lifts a one-argument operation into its deferred form.
	///
	/// The returned function can be called any number of times; every call
	/// waits on the same readiness signal.
	pub fn wrap<A, F, Fut>(&self, f: F) -> impl Fn(A) -> BoxFuture<'static, Result<()>> + Send + Sync
	where
		A: Send + 'static,
		F: Fn(A) -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<()>> + Send + 'static,
	{
		let deferred = self.clone();
		let f = Arc::new(f);
		move |arg| {
			let deferred = deferred.clone();
			let f = Arc::clone(&f);
			async move { deferred.call(move || f(arg)).await }.boxed()
		}
	}

	async fn run<T, F, Fut>(&self, f: F) -> Result<T>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<T>>,
	{
		self.readiness.wait().await?;
		f().await
	}

	async fn route(&self, err: TrackerError) -> Result<()> {
		match self.policy {
			ErrorPolicy::Swallow => {
				self.handler.on_error(&err).await;
				Ok(())
			}
			ErrorPolicy::Propagate => Err(err),
		}
	}
}
