// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! The diversion handler.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::command::Command;
use crate::config::TapConfig;
use crate::error::{HandlerError, Result, TapError};
use crate::format::Formatter;
use crate::gate::{ActivationGate, WatchGuard};
use crate::handler::Handler;
use crate::level::Level;
use crate::record::{Attr, Record};
use crate::worker::Worker;

/// A handler that copies records to a background worker while anyone is
/// watching.
///
/// Every handler derived through [`Handler::with_attrs`] or
/// [`Handler::with_group`] shares the queue, the watcher count and the
/// worker (and so its buffer) with its parent; only the formatter differs.
///
/// [`Handler::handle`] never blocks. If the queue is full the record is
/// dropped without telling anyone.
#[derive(Clone)]
pub struct TapHandler {
	shared: Arc<Shared>,
	formatter: Arc<dyn Formatter>,
}

struct Shared {
	gate: ActivationGate,
	tx: mpsc::Sender<Command>,
	/// Taken by the first `run`.
	rx: Mutex<Option<mpsc::Receiver<Command>>>,
	max_buffer_size: usize,
	flush_interval: Duration,
}

impl TapHandler {
	pub fn new(config: TapConfig) -> Result<Self> {
		config.validate()?;
		Ok(Self::from_valid_config(config))
	}

	fn from_valid_config(config: TapConfig) -> Self {
		let (tx, rx) = mpsc::channel(config.queue_capacity);
		Self {
			shared: Arc::new(Shared {
				gate: ActivationGate::new(),
				tx,
				rx: Mutex::new(Some(rx)),
				max_buffer_size: config.max_buffer_size,
				flush_interval: config.flush_interval,
			}),
			formatter: config.formatter,
		}
	}

	pub fn gate(&self) -> &ActivationGate {
		&self.shared.gate
	}

	pub fn watch(&self) {
		self.shared.gate.watch();
	}

	pub fn unwatch(&self) {
		self.shared.gate.unwatch();
	}

	pub fn watch_guard(&self) -> WatchGuard {
		self.shared.gate.watch_guard()
	}

	pub fn is_active(&self) -> bool {
		self.shared.gate.is_active()
	}

	/// Whether both handlers feed the same worker.
	pub fn same_tap(&self, other: &TapHandler) -> bool {
		Arc::ptr_eq(&self.shared, &other.shared)
	}

	/// Run the worker loop on the current task until shutdown.
	///
	/// `output` receives each flushed batch of formatted bytes. It runs on the
	/// worker, so a slow output delays everything queued behind it.
	///
	/// The receiver is claimed when `run` is called, not when the future is
	/// first polled. The returned future keeps no handle to the tap, so the
	/// loop also ends once every handler clone has been dropped.
	///
	/// Only one worker can exist per tap; later calls return
	/// [`TapError::WorkerAlreadyStarted`].
	pub fn run<O>(&self, output: O) -> impl Future<Output = Result<()>>
	where
		O: FnMut(&[u8]) + Send,
	{
		let worker = self.claim_worker(output);
		async move {
			worker?.run().await;
			Ok(())
		}
	}

	/// Spawn [`TapHandler::run`] onto the current tokio runtime.
	pub fn spawn<O>(&self, output: O) -> JoinHandle<Result<()>>
	where
		O: FnMut(&[u8]) + Send + 'static,
	{
		tokio::spawn(self.run(output))
	}

	fn claim_worker<O>(&self, output: O) -> Result<Worker<O>>
	where
		O: FnMut(&[u8]) + Send,
	{
		let rx = self
			.shared
			.rx
			.lock()
			.take()
			.ok_or(TapError::WorkerAlreadyStarted)?;

		// The worker holds only a weak sender, so dropping every handler
		// closes the queue.
		Ok(Worker::new(
			rx,
			self.shared.tx.downgrade(),
			self.shared.max_buffer_size,
			self.shared.flush_interval,
			output,
		))
	}

	/// Ask the worker to flush whatever it has buffered.
	pub async fn flush(&self) -> Result<()> {
		self
			.shared
			.tx
			.send(Command::Flush)
			.await
			.map_err(|_| TapError::Closed)
	}

	/// Stop the worker.
	///
	/// Waits for queue space rather than dropping the request. Anything still
	/// buffered or queued behind the stop is discarded.
	pub async fn shutdown(&self) -> Result<()> {
		self
			.shared
			.tx
			.send(Command::Stop)
			.await
			.map_err(|_| TapError::Closed)
	}

	fn scoped(&self, formatter: Arc<dyn Formatter>) -> Self {
		Self {
			shared: Arc::clone(&self.shared),
			formatter,
		}
	}
}

impl Default for TapHandler {
	fn default() -> Self {
		Self::from_valid_config(TapConfig::default())
	}
}

impl Handler for TapHandler {
	/// True while at least one watcher is registered, at every level.
	#[inline]
	fn enabled(&self, _level: Level) -> bool {
		self.shared.gate.is_active()
	}

	fn handle(&self, record: &Record) -> std::result::Result<(), HandlerError> {
		if !self.shared.gate.is_active() {
			return Ok(());
		}

		let _ = self.shared.tx.try_send(Command::Record {
			record: record.clone(),
			formatter: Arc::clone(&self.formatter),
		});
		Ok(())
	}

	fn with_attrs(&self, attrs: &[Attr]) -> Self {
		if attrs.is_empty() {
			return self.clone();
		}
		self.scoped(self.formatter.with_attrs(attrs))
	}

	fn with_group(&self, name: &str) -> Self {
		if name.is_empty() {
			return self.clone();
		}
		self.scoped(self.formatter.with_group(name))
	}
}
