// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! One-shot readiness signal for a tracker.
//!
//! The [`ReadinessResolver`] is consumed when it settles, so the state moves
//! from `Initializing` to `Ready` or `Failed` exactly once and never back.
//! Any number of [`ReadinessSignal`] clones can wait on it concurrently.

use tokio::sync::watch;

use crate::error::{Result, TrackerError};

const RESOLVER_DROPPED: &str = "tracker initialization was abandoned";

/// Observable state of tracker creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
	Initializing,
	Ready,
	/// Creation failed; carries the reason.
	Failed(String),
}

impl Readiness {
	pub fn is_settled(&self) -> bool {
		!matches!(self, Readiness::Initializing)
	}
}

/// Creates an unsettled readiness pair.
pub fn channel() -> (ReadinessResolver, ReadinessSignal) {
	let (tx, rx) = watch::channel(Readiness::Initializing);
	(ReadinessResolver { tx }, ReadinessSignal { rx })
}

/// Write side. Settles the signal once.
#[derive(Debug)]
pub struct ReadinessResolver {
	tx: watch::Sender<Readiness>,
}

impl ReadinessResolver {
	pub fn resolve(self) {
		self.tx.send_replace(Readiness::Ready);
	}

	pub fn reject(self, reason: impl Into<String>) {
		self.tx.send_replace(Readiness::Failed(reason.into()));
	}
}

/// Read side.
#[derive(Debug, Clone)]
pub struct ReadinessSignal {
	rx: watch::Receiver<Readiness>,
}

impl ReadinessSignal {
	/// Returns a signal that is already settled.
	pub fn settled(state: Readiness) -> Self {
		let (_tx, rx) = watch::channel(state);
		Self { rx }
	}

	/// Returns the current state without waiting.
	pub fn current(&self) -> Readiness {
		self.rx.borrow().clone()
	}

	/// Waits until the signal settles.
	///
	/// # Errors
	/// Returns [`TrackerError::InitFailed`] if creation failed, or if the
	/// resolver was dropped without settling.
	pub async fn wait(&self) -> Result<()> {
		let mut rx = self.rx.clone();
		let settled = match rx.wait_for(Readiness::is_settled).await {
			Ok(state) => state.clone(),
			Err(_) => Readiness::Failed(RESOLVER_DROPPED.to_string()),
		};
		match settled {
			Readiness::Ready => Ok(()),
			Readiness::Failed(reason) => Err(TrackerError::InitFailed(reason)),
			Readiness::Initializing => Err(TrackerError::InitFailed(RESOLVER_DROPPED.to_string())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::Duration;

	#[tokio::test]
	async fn waiters_resume_on_resolve() {
		let (resolver, signal) = channel();
		assert_eq!(signal.current(), Readiness::Initializing);

		let waiters: Vec<_> = (0..4)
			.map(|_| {
				let signal = signal.clone();
				tokio::spawn(async move { signal.wait().await })
			})
			.collect();

		tokio::time::sleep(Duration::from_millis(10)).await;
		resolver.resolve();

		for waiter in waiters {
			assert_eq!(waiter.await.unwrap(), Ok(()));
		}
		assert_eq!(signal.current(), Readiness::Ready);
	}

	#[tokio::test]
	async fn rejection_is_observed_after_the_fact() {
		let (resolver, signal) = channel();
		resolver.reject("createTracker: boom");

		assert_eq!(
			signal.wait().await,
			Err(TrackerError::InitFailed("createTracker: boom".to_string()))
		);
		// Still failed on a second read.
		assert!(signal.wait().await.is_err());
	}

	#[tokio::test]
	async fn dropped_resolver_fails_waiters() {
		let (resolver, signal) = channel();
		drop(resolver);
		assert_eq!(
			signal.wait().await,
			Err(TrackerError::InitFailed(RESOLVER_DROPPED.to_string()))
		);
	}

	#[test]
	fn wait_stays_pending_until_settled() {
		let (resolver, signal) = channel();
		let mut wait = tokio_test::task::spawn(signal.wait());
		tokio_test::assert_pending!(wait.poll());

		resolver.resolve();
		assert!(wait.is_woken());
		tokio_test::assert_ready_eq!(wait.poll(), Ok(()));
	}

	#[tokio::test]
	async fn settled_signal_never_waits() {
		let signal = ReadinessSignal::settled(Readiness::Ready);
		assert_eq!(signal.wait().await, Ok(()));
	}
}
