// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Composite handler that feeds a primary handler and a tap side by side.

use std::future::Future;

use tokio::task::JoinHandle;

use crate::config::TapConfig;
use crate::error::{HandlerError, Result};
use crate::gate::WatchGuard;
use crate::handler::Handler;
use crate::level::Level;
use crate::record::{Attr, Record};
use crate::tap::TapHandler;

/// Dispatches every record to a primary handler and to a [`TapHandler`].
///
/// Each side is checked on its own, so a debug record reaches the tap while
/// it is being watched even if the primary handler only logs warnings.
/// Only the primary handler's errors reach the caller.
#[derive(Clone)]
pub struct Tee<P> {
	primary: P,
	tap: TapHandler,
}

impl<P: Handler> Tee<P> {
	pub fn new(primary: P, config: TapConfig) -> Result<Self> {
		Ok(Self::from_parts(primary, TapHandler::new(config)?))
	}

	pub fn from_parts(primary: P, tap: TapHandler) -> Self {
		Self { primary, tap }
	}

	/// The wrapped primary handler.
	pub fn primary(&self) -> &P {
		&self.primary
	}

	pub fn tap(&self) -> &TapHandler {
		&self.tap
	}

	pub fn watch(&self) {
		self.tap.watch();
	}

	pub fn unwatch(&self) {
		self.tap.unwatch();
	}

	pub fn watch_guard(&self) -> WatchGuard {
		self.tap.watch_guard()
	}

	/// See [`TapHandler::run`].
	pub fn run<O>(&self, output: O) -> impl Future<Output = Result<()>>
	where
		O: FnMut(&[u8]) + Send,
	{
		self.tap.run(output)
	}

	pub fn spawn<O>(&self, output: O) -> JoinHandle<Result<()>>
	where
		O: FnMut(&[u8]) + Send + 'static,
	{
		self.tap.spawn(output)
	}

	pub async fn flush(&self) -> Result<()> {
		self.tap.flush().await
	}

	pub async fn shutdown(&self) -> Result<()> {
		self.tap.shutdown().await
	}
}

impl<P: Handler> Handler for Tee<P> {
	fn enabled(&self, level: Level) -> bool {
		self.tap.enabled(level) || self.primary.enabled(level)
	}

	fn handle(&self, record: &Record) -> std::result::Result<(), HandlerError> {
		if self.tap.enabled(record.level) {
			let _ = self.tap.handle(record);
		}

		if self.primary.enabled(record.level) {
			self.primary.handle(record)?;
		}
		Ok(())
	}

	fn with_attrs(&self, attrs: &[Attr]) -> Self {
		Self {
			primary: self.primary.with_attrs(attrs),
			tap: self.tap.with_attrs(attrs),
		}
	}

	fn with_group(&self, name: &str) -> Self {
		Self {
			primary: self.primary.with_group(name),
			tap: self.tap.with_group(name),
		}
	}
}
