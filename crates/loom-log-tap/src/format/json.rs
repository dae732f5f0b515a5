// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::sync::Arc;

use chrono::SecondsFormat;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use super::{Formatter, Node, Scope};
use crate::error::FormatError;
use crate::record::{Attr, Record};

/// Newline-delimited JSON, one object per record.
///
/// ```text
/// {"time":"2025-01-01T00:00:00.000Z","level":"INFO","msg":"hi","target":"app","req":{"id":7}}
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
	scope: Scope,
}

impl JsonFormatter {
	pub fn new() -> Self {
		Self::default()
	}
}

impl Formatter for JsonFormatter {
	fn format(&self, record: &Record, buf: &mut Vec<u8>) -> Result<(), FormatError> {
		let line = JsonLine {
			record,
			nodes: self.scope.tree(record),
		};
		serde_json::to_writer(&mut *buf, &line)?;
		buf.push(b'\n');
		Ok(())
	}

	fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Formatter> {
		Arc::new(Self {
			scope: self.scope.with_attrs(attrs),
		})
	}

	fn with_group(&self, name: &str) -> Arc<dyn Formatter> {
		Arc::new(Self {
			scope: self.scope.with_group(name),
		})
	}
}

struct JsonLine<'a> {
	record: &'a Record,
	nodes: Vec<Node<'a>>,
}

impl Serialize for JsonLine<'_> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let record = self.record;
		let mut map = serializer.serialize_map(None)?;
		map.serialize_entry(
			"time",
			&record
				.timestamp
				.to_rfc3339_opts(SecondsFormat::Millis, true),
		)?;
		map.serialize_entry("level", record.level.as_str())?;
		map.serialize_entry("msg", &record.message)?;
		if !record.target.is_empty() {
			map.serialize_entry("target", &record.target)?;
		}
		serialize_nodes(&mut map, &self.nodes)?;
		map.end()
	}
}

struct Group<'a>(&'a [Node<'a>]);

impl Serialize for Group<'_> {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		let mut map = serializer.serialize_map(Some(self.0.len()))?;
		serialize_nodes(&mut map, self.0)?;
		map.end()
	}
}

fn serialize_nodes<M: SerializeMap>(map: &mut M, nodes: &[Node<'_>]) -> Result<(), M::Error> {
	for node in nodes {
		match node {
			Node::Attr(attr) => map.serialize_entry(&attr.key, &attr.value)?,
			Node::Group(name, children) => map.serialize_entry(name, &Group(children))?,
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::level::Level;
	use chrono::TimeZone;

	fn format(formatter: &dyn Formatter, record: &Record) -> serde_json::Value {
		let mut buf = Vec::new();
		formatter.format(record, &mut buf).unwrap();
		assert_eq!(buf.last(), Some(&b'\n'));
		serde_json::from_slice(&buf).unwrap()
	}

	#[test]
	fn test_json_basic_fields() {
		let ts = chrono::Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
		let record = Record::new(Level::Warn, "disk almost full")
			.with_timestamp(ts)
			.with_target("app::disk")
			.with_attr("free_pct", 3u64);

		let value = format(&JsonFormatter::new(), &record);
		assert_eq!(value["time"], "2025-03-01T12:00:00.000Z");
		assert_eq!(value["level"], "WARN");
		assert_eq!(value["msg"], "disk almost full");
		assert_eq!(value["target"], "app::disk");
		assert_eq!(value["free_pct"], 3);
	}

	#[test]
	fn test_json_omits_empty_target() {
		let record = Record::new(Level::Info, "x");
		let value = format(&JsonFormatter::new(), &record);
		assert!(value.get("target").is_none());
	}

	#[test]
	fn test_json_groups_nest() {
		let formatter = JsonFormatter::new()
			.with_attrs(&[Attr::new("service", "api")])
			.with_group("req")
			.with_attrs(&[Attr::new("id", 42u64)]);
		let record = Record::new(Level::Debug, "handled").with_attr("status", 200u64);

		let value = format(formatter.as_ref(), &record);
		assert_eq!(value["service"], "api");
		assert_eq!(value["req"]["id"], 42);
		assert_eq!(value["req"]["status"], 200);
	}

	#[test]
	fn test_json_scoping_leaves_parent_untouched() {
		let parent = JsonFormatter::new();
		let _child = parent.with_attrs(&[Attr::new("child_only", true)]);
		let value = format(&parent, &Record::new(Level::Info, "x"));
		assert!(value.get("child_only").is_none());
	}

	#[test]
	fn test_json_escapes_message() {
		let record = Record::new(Level::Info, "quote \" and\nnewline");
		let mut buf = Vec::new();
		JsonFormatter::new().format(&record, &mut buf).unwrap();
		let text = String::from_utf8(buf).unwrap();
		assert_eq!(text.matches('\n').count(), 1);
		assert!(text.contains(r#"quote \" and\nnewline"#));
	}
}
