// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::fmt;
use std::sync::Arc;

use crate::format::Formatter;
use crate::record::Record;

/// Command sent to the tap worker.
pub enum Command {
	/// Format a record into the buffer.
	///
	/// Carries the formatter that was in scope when the record was captured,
	/// so attributes and groups bound by `with_attrs`/`with_group` survive
	/// the trip through the queue.
	Record {
		record: Record,
		formatter: Arc<dyn Formatter>,
	},
	/// Hand the buffered bytes to the output, if there are any.
	Flush,
	/// Stop the worker. Commands queued behind it are never read.
	Stop,
}

impl fmt::Debug for Command {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Command::Record { record, .. } => f
				.debug_struct("Record")
				.field("record", record)
				.finish_non_exhaustive(),
			Command::Flush => f.write_str("Flush"),
			Command::Stop => f.write_str("Stop"),
		}
	}
}
