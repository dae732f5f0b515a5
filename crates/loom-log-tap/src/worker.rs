// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! The single consumer that owns the tap buffer.

use std::ops::ControlFlow;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

use crate::command::Command;

/// One-shot flush alarm, rearmed on every accepted record.
///
/// Firing enqueues [`Command::Flush`] rather than touching the buffer, so
/// timer flushes are serialized with everything else on the queue. Holds a
/// weak sender so a pending alarm never keeps the queue open.
struct FlushTimer {
	tx: mpsc::WeakSender<Command>,
	interval: Duration,
	pending: Option<JoinHandle<()>>,
}

impl FlushTimer {
	fn new(tx: mpsc::WeakSender<Command>, interval: Duration) -> Self {
		Self {
			tx,
			interval,
			pending: None,
		}
	}

	fn rearm(&mut self) {
		self.cancel();
		let tx = self.tx.clone();
		let interval = self.interval;
		self.pending = Some(tokio::spawn(async move {
			tokio::time::sleep(interval).await;
			if let Some(tx) = tx.upgrade() {
				let _ = tx.send(Command::Flush).await;
			}
		}));
	}

	fn cancel(&mut self) {
		if let Some(pending) = self.pending.take() {
			pending.abort();
		}
	}
}

impl Drop for FlushTimer {
	fn drop(&mut self) {
		self.cancel();
	}
}

pub(crate) struct Worker<O> {
	rx: mpsc::Receiver<Command>,
	buf: Vec<u8>,
	max_buffer_size: usize,
	timer: FlushTimer,
	output: O,
}

impl<O> Worker<O>
where
	O: FnMut(&[u8]) + Send,
{
	pub(crate) fn new(
		rx: mpsc::Receiver<Command>,
		timer_tx: mpsc::WeakSender<Command>,
		max_buffer_size: usize,
		flush_interval: Duration,
		output: O,
	) -> Self {
		Self {
			rx,
			buf: Vec::new(),
			max_buffer_size,
			timer: FlushTimer::new(timer_tx, flush_interval),
			output,
		}
	}

	/// Drain the queue until `Stop` arrives or every sender is gone.
	pub(crate) async fn run(mut self) {
		info!(
			max_buffer_size = self.max_buffer_size,
			flush_interval_ms = self.timer.interval.as_millis() as u64,
			"log tap worker started"
		);

		while let Some(command) = self.rx.recv().await {
			if self.process(command).is_break() {
				break;
			}
		}

		self.timer.cancel();
		info!(discarded_bytes = self.buf.len(), "log tap worker stopped");
	}

	fn process(&mut self, command: Command) -> ControlFlow<()> {
		match command {
			Command::Record { record, formatter } => {
				// Partial output from a failed format stays in the buffer.
				if let Err(e) = formatter.format(&record, &mut self.buf) {
					debug!(error = %e, "failed to format diverted log record");
				}

				if self.buf.len() > self.max_buffer_size {
					trace!(len = self.buf.len(), "log tap buffer full, flushing");
					self.flush();
				} else {
					self.timer.rearm();
				}
			}
			Command::Flush => self.flush(),
			Command::Stop => {
				self.timer.cancel();
				return ControlFlow::Break(());
			}
		}
		ControlFlow::Continue(())
	}

	fn flush(&mut self) {
		if self.buf.is_empty() {
			return;
		}
		(self.output)(&self.buf);
		self.buf.clear();
	}
}
