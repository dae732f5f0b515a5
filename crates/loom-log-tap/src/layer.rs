// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Tracing layer that turns events into records for a [`Handler`].

use std::fmt;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use crate::handler::Handler;
use crate::level::Level;
use crate::record::{Attr, Record, Value};

const CRATE_TARGET: &str = env!("CARGO_CRATE_NAME");

/// A tracing Layer that feeds events to a [`Handler`].
///
/// The handler is asked whether the level is enabled before any field is
/// visited, so an idle tap costs one atomic load per event. Events emitted
/// by this crate itself are skipped so the tap worker cannot feed itself.
#[derive(Clone)]
pub struct HandlerLayer<H> {
	handler: H,
}

impl<H: Handler> HandlerLayer<H> {
	pub fn new(handler: H) -> Self {
		Self { handler }
	}

	pub fn handler(&self) -> &H {
		&self.handler
	}
}

impl<S, H> Layer<S> for HandlerLayer<H>
where
	S: Subscriber + for<'a> LookupSpan<'a>,
	H: Handler + 'static,
{
	fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
		let metadata = event.metadata();
		if is_internal(metadata.target()) {
			return;
		}

		let level = Level::from_tracing(metadata.level());
		if !self.handler.enabled(level) {
			return;
		}

		let mut visitor = RecordVisitor::new(Record::new(level, "").with_target(metadata.target()));
		event.record(&mut visitor);

		if let Err(e) = self.handler.handle(&visitor.record) {
			// Use eprintln instead of tracing to avoid recursion
			eprintln!("loom-log-tap: failed to handle log record: {e}");
		}
	}
}

fn is_internal(target: &str) -> bool {
	target
		.strip_prefix(CRATE_TARGET)
		.is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

/// Visitor that fills a record from a tracing event.
struct RecordVisitor {
	record: Record,
}

impl RecordVisitor {
	fn new(record: Record) -> Self {
		Self { record }
	}

	fn push(&mut self, field: &Field, value: Value) {
		self.record.add_attr(Attr::new(field.name(), value));
	}
}

impl Visit for RecordVisitor {
	fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
		let value_str = format!("{:?}", value);

		if field.name() == "message" {
			self.record.message = value_str;
		} else {
			self.push(field, Value::Str(value_str));
		}
	}

	fn record_str(&mut self, field: &Field, value: &str) {
		if field.name() == "message" {
			self.record.message = value.to_string();
		} else {
			self.push(field, Value::from(value));
		}
	}

	fn record_i64(&mut self, field: &Field, value: i64) {
		self.push(field, Value::I64(value));
	}

	fn record_u64(&mut self, field: &Field, value: u64) {
		self.push(field, Value::U64(value));
	}

	fn record_bool(&mut self, field: &Field, value: bool) {
		self.push(field, Value::Bool(value));
	}

	fn record_f64(&mut self, field: &Field, value: f64) {
		self.push(field, Value::F64(value));
	}

	fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
		self.push(field, Value::Str(value.to_string()));
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::Arc;

	use parking_lot::Mutex;
	use tracing_subscriber::layer::SubscriberExt;

	use crate::error::HandlerError;

	#[derive(Clone, Default)]
	struct Capture {
		active: bool,
		records: Arc<Mutex<Vec<Record>>>,
	}

	impl Handler for Capture {
		fn enabled(&self, _level: Level) -> bool {
			self.active
		}

		fn handle(&self, record: &Record) -> Result<(), HandlerError> {
			self.records.lock().push(record.clone());
			Ok(())
		}

		fn with_attrs(&self, _attrs: &[Attr]) -> Self {
			self.clone()
		}

		fn with_group(&self, _name: &str) -> Self {
			self.clone()
		}
	}

	#[test]
	fn test_internal_targets() {
		assert!(is_internal("loom_log_tap"));
		assert!(is_internal("loom_log_tap::worker"));
		assert!(!is_internal("loom_log_tapestry"));
		assert!(!is_internal("app::loom_log_tap"));
	}

	#[test]
	fn test_layer_captures_typed_fields() {
		let capture = Capture {
			active: true,
			..Default::default()
		};
		let subscriber = tracing_subscriber::registry().with(HandlerLayer::new(capture.clone()));

		tracing::subscriber::with_default(subscriber, || {
			tracing::warn!(
				target: "app::jobs",
				attempt = 3u64,
				delta = -2i64,
				ok = false,
				ratio = 0.5,
				name = "sync",
				"Job retried"
			);
		});

		let records = capture.records.lock();
		assert_eq!(records.len(), 1);
		let record = &records[0];
		assert_eq!(record.level, Level::Warn);
		assert_eq!(record.target, "app::jobs");
		assert_eq!(record.message, "Job retried");

		let attrs: Vec<_> = record.attrs().map(|a| (a.key.as_str(), a.value.clone())).collect();
		assert_eq!(
			attrs,
			[
				("attempt", Value::U64(3)),
				("delta", Value::I64(-2)),
				("ok", Value::Bool(false)),
				("ratio", Value::F64(0.5)),
				("name", Value::Str("sync".to_string())),
			]
		);
	}

	#[test]
	fn test_layer_skips_disabled_handler() {
		let capture = Capture::default();
		let subscriber = tracing_subscriber::registry().with(HandlerLayer::new(capture.clone()));

		tracing::subscriber::with_default(subscriber, || {
			tracing::error!(target: "app", "not captured");
		});

		assert!(capture.records.lock().is_empty());
	}

	#[test]
	fn test_layer_skips_own_events() {
		let capture = Capture {
			active: true,
			..Default::default()
		};
		let subscriber = tracing_subscriber::registry().with(HandlerLayer::new(capture.clone()));

		tracing::subscriber::with_default(subscriber, || {
			tracing::info!(target: "loom_log_tap::worker", "internal");
			tracing::info!(target: "app", "external");
		});

		let records = capture.records.lock();
		assert_eq!(records.len(), 1);
		assert_eq!(records[0].message, "external");
	}
}
