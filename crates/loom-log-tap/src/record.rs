// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Owned snapshots of structured log events.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::level::Level;

/// A typed attribute value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
	Str(String),
	I64(i64),
	U64(u64),
	F64(f64),
	Bool(bool),
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Str(s) => f.write_str(s),
			Value::I64(v) => write!(f, "{v}"),
			Value::U64(v) => write!(f, "{v}"),
			Value::F64(v) => write!(f, "{v}"),
			Value::Bool(v) => write!(f, "{v}"),
		}
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Value::Str(value.to_string())
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Value::Str(value)
	}
}

impl From<i64> for Value {
	fn from(value: i64) -> Self {
		Value::I64(value)
	}
}

impl From<i32> for Value {
	fn from(value: i32) -> Self {
		Value::I64(value.into())
	}
}

impl From<u64> for Value {
	fn from(value: u64) -> Self {
		Value::U64(value)
	}
}

impl From<u32> for Value {
	fn from(value: u32) -> Self {
		Value::U64(value.into())
	}
}

impl From<f64> for Value {
	fn from(value: f64) -> Self {
		Value::F64(value)
	}
}

impl From<bool> for Value {
	fn from(value: bool) -> Self {
		Value::Bool(value)
	}
}

/// A single key/value attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
	pub key: String,
	pub value: Value,
}

impl Attr {
	pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
		Self {
			key: key.into(),
			value: value.into(),
		}
	}
}

/// An immutable snapshot of one log event.
///
/// Handlers receive records by reference; anything that outlives the call
/// (such as the tap queue) must take its own clone.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
	/// When the event was emitted.
	pub timestamp: DateTime<Utc>,
	pub level: Level,
	/// The module/target that emitted the event. May be empty.
	pub target: String,
	pub message: String,
	attrs: Vec<Attr>,
}

impl Record {
	/// Create a record stamped with the current time.
	pub fn new(level: Level, message: impl Into<String>) -> Self {
		Self {
			timestamp: Utc::now(),
			level,
			target: String::new(),
			message: message.into(),
			attrs: Vec::new(),
		}
	}

	pub fn with_target(mut self, target: impl Into<String>) -> Self {
		self.target = target.into();
		self
	}

	pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
		self.timestamp = timestamp;
		self
	}

	pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.attrs.push(Attr::new(key, value));
		self
	}

	pub fn add_attr(&mut self, attr: Attr) {
		self.attrs.push(attr);
	}

	/// Iterate over the record's own attributes in insertion order.
	pub fn attrs(&self) -> impl ExactSizeIterator<Item = &Attr> {
		self.attrs.iter()
	}

	pub fn num_attrs(&self) -> usize {
		self.attrs.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_record_builder_keeps_attr_order() {
		let record = Record::new(Level::Info, "hello")
			.with_target("app::http")
			.with_attr("status", 200u32)
			.with_attr("path", "/health");

		assert_eq!(record.target, "app::http");
		let keys: Vec<_> = record.attrs().map(|a| a.key.as_str()).collect();
		assert_eq!(keys, ["status", "path"]);
		assert_eq!(record.num_attrs(), 2);
	}

	#[test]
	fn test_value_display() {
		assert_eq!(Value::from("x").to_string(), "x");
		assert_eq!(Value::from(-3i64).to_string(), "-3");
		assert_eq!(Value::from(true).to_string(), "true");
		assert_eq!(Value::from(1.5).to_string(), "1.5");
	}

	#[test]
	fn test_value_serializes_untagged() {
		let json = serde_json::to_string(&vec![
			Value::from("a"),
			Value::from(1u64),
			Value::from(false),
		])
		.unwrap();
		assert_eq!(json, r#"["a",1,false]"#);
	}
}
