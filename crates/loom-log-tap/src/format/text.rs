// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::io::Write;
use std::sync::Arc;

use chrono::SecondsFormat;

use super::{Formatter, Scope};
use crate::error::FormatError;
use crate::record::{Attr, Record, Value};

/// logfmt-style `key=value` lines. Grouped keys are dot-joined.
#[derive(Debug, Clone, Default)]
pub struct TextFormatter {
	scope: Scope,
}

impl TextFormatter {
	pub fn new() -> Self {
		Self::default()
	}
}

impl Formatter for TextFormatter {
	fn format(&self, record: &Record, buf: &mut Vec<u8>) -> Result<(), FormatError> {
		write!(
			buf,
			"time={} level={} msg=",
			record
				.timestamp
				.to_rfc3339_opts(SecondsFormat::Millis, true),
			record.level
		)?;
		write_str_value(buf, &record.message)?;
		if !record.target.is_empty() {
			buf.extend_from_slice(b" target=");
			write_str_value(buf, &record.target)?;
		}

		for (path, attr) in self.scope.resolved(record) {
			buf.push(b' ');
			for group in path {
				write!(buf, "{group}.")?;
			}
			write!(buf, "{}=", attr.key)?;
			match &attr.value {
				Value::Str(s) => write_str_value(buf, s)?,
				other => write!(buf, "{other}")?,
			}
		}

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

fn needs_quoting(s: &str) -> bool {
	s.is_empty()
		|| s
			.chars()
			.any(|c| c.is_whitespace() || c == '"' || c == '=' || c.is_control())
}

fn write_str_value(buf: &mut Vec<u8>, s: &str) -> std::io::Result<()> {
	if needs_quoting(s) {
		write!(buf, "{s:?}")
	} else {
		buf.extend_from_slice(s.as_bytes());
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::level::Level;
	use chrono::TimeZone;

	fn format(formatter: &dyn Formatter, record: &Record) -> String {
		let mut buf = Vec::new();
		formatter.format(record, &mut buf).unwrap();
		String::from_utf8(buf).unwrap()
	}

	#[test]
	fn test_text_line_layout() {
		let ts = chrono::Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
		let record = Record::new(Level::Info, "started")
			.with_timestamp(ts)
			.with_attr("port", 8080u64);

		assert_eq!(
			format(&TextFormatter::new(), &record),
			"time=2025-03-01T12:00:00.000Z level=INFO msg=started port=8080\n"
		);
	}

	#[test]
	fn test_text_quotes_when_needed() {
		let record = Record::new(Level::Info, "two words")
			.with_attr("empty", "")
			.with_attr("plain", "ok");

		let line = format(&TextFormatter::new(), &record);
		assert!(line.contains(r#"msg="two words""#), "{line}");
		assert!(line.contains(r#"empty="""#), "{line}");
		assert!(line.contains(" plain=ok"), "{line}");
	}

	#[test]
	fn test_text_groups_are_dotted() {
		let formatter = TextFormatter::new()
			.with_group("req")
			.with_attrs(&[Attr::new("id", 9u64)])
			.with_group("db");
		let record = Record::new(Level::Debug, "q")
			.with_target("app")
			.with_attr("rows", 2u64);

		let line = format(formatter.as_ref(), &record);
		assert!(line.contains(" target=app req.id=9 req.db.rows=2\n"), "{line}");
	}
}
