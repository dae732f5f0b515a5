// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Reference-counted activation switch for the tap.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// A shared watcher count. The tap is active while the count is positive.
///
/// Clones share the same counter. The gate knows nothing about who is
/// watching; any caller may watch or unwatch any number of times.
///
/// `unwatch` never takes the count below zero, so an unbalanced unwatch
/// cannot leave the gate needing extra watches before it reopens.
#[derive(Debug, Clone, Default)]
pub struct ActivationGate {
	count: Arc<AtomicI64>,
}

impl ActivationGate {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn watch(&self) {
		self.count.fetch_add(1, Ordering::AcqRel);
	}

	pub fn unwatch(&self) {
		let _ = self
			.count
			.fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
				(n > 0).then_some(n - 1)
			});
	}

	/// Watch until the returned guard is dropped.
	pub fn watch_guard(&self) -> WatchGuard {
		self.watch();
		WatchGuard { gate: self.clone() }
	}

	#[inline]
	pub fn is_active(&self) -> bool {
		self.count.load(Ordering::Acquire) > 0
	}

	pub fn count(&self) -> i64 {
		self.count.load(Ordering::Acquire)
	}

	/// Whether both gates share one counter.
	pub fn same_gate(&self, other: &ActivationGate) -> bool {
		Arc::ptr_eq(&self.count, &other.count)
	}
}

/// Keeps the gate open for its lifetime.
#[must_use = "the gate closes again as soon as the guard is dropped"]
#[derive(Debug)]
pub struct WatchGuard {
	gate: ActivationGate,
}

impl Drop for WatchGuard {
	fn drop(&mut self) {
		self.gate.unwatch();
	}
}
