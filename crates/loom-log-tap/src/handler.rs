// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use crate::error::HandlerError;
use crate::level::Level;
use crate::record::{Attr, Record};

/// The capability set every log handler in this crate exposes.
///
/// A front end asks [`Handler::enabled`] before building a record, then
/// passes the record to [`Handler::handle`]. Scoping returns a new handler
/// and leaves `self` as it was.
pub trait Handler: Send + Sync {
	fn enabled(&self, level: Level) -> bool;

	fn handle(&self, record: &Record) -> Result<(), HandlerError>;

	fn with_attrs(&self, attrs: &[Attr]) -> Self
	where
		Self: Sized;

	fn with_group(&self, name: &str) -> Self
	where
		Self: Sized;
}
