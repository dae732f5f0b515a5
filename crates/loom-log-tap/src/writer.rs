// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::io::Write;
use std::sync::Arc;

use tracing_subscriber::fmt::MakeWriter;

use crate::error::HandlerError;
use crate::format::{Formatter, TextFormatter};
use crate::handler::Handler;
use crate::level::Level;
use crate::record::{Attr, Record};

/// A primary handler that writes formatted lines to a [`MakeWriter`].
///
/// Records below `min_level` are not enabled. Each record is formatted into
/// a scratch buffer first and written with a single `write_all`, so lines
/// from concurrent callers do not interleave on writers that are atomic per
/// write.
pub struct WriterHandler<M> {
	make_writer: Arc<M>,
	formatter: Arc<dyn Formatter>,
	min_level: Level,
}

impl<M> WriterHandler<M>
where
	M: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
	/// Text output at `Info` and above.
	pub fn new(make_writer: M) -> Self {
		Self {
			make_writer: Arc::new(make_writer),
			formatter: Arc::new(TextFormatter::new()),
			min_level: Level::Info,
		}
	}

	pub fn with_min_level(mut self, level: Level) -> Self {
		self.min_level = level;
		self
	}

	pub fn with_formatter(mut self, formatter: impl Formatter + 'static) -> Self {
		self.formatter = Arc::new(formatter);
		self
	}

	pub fn min_level(&self) -> Level {
		self.min_level
	}
}

impl<M> Clone for WriterHandler<M> {
	fn clone(&self) -> Self {
		Self {
			make_writer: Arc::clone(&self.make_writer),
			formatter: Arc::clone(&self.formatter),
			min_level: self.min_level,
		}
	}
}

impl<M> Handler for WriterHandler<M>
where
	M: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
	fn enabled(&self, level: Level) -> bool {
		level >= self.min_level
	}

	fn handle(&self, record: &Record) -> Result<(), HandlerError> {
		let mut buf = Vec::with_capacity(256);
		self.formatter.format(record, &mut buf)?;

		let mut writer = self.make_writer.make_writer();
		writer.write_all(&buf)?;
		Ok(())
	}

	fn with_attrs(&self, attrs: &[Attr]) -> Self {
		Self {
			formatter: self.formatter.with_attrs(attrs),
			..self.clone()
		}
	}

	fn with_group(&self, name: &str) -> Self {
		Self {
			formatter: self.formatter.with_group(name),
			..self.clone()
		}
	}
}
