// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Tap configuration.
//!
//! [`TapConfig`] is applied once at construction and never changes
//! afterwards. [`TapConfigLayer`] is the partial form read from TOML or the
//! environment; layers merge with later values winning and are finalized
//! into a [`TapConfig`].

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::format::{Formatter, JsonFormatter, TextFormatter};

/// Buffer size above which the worker flushes without waiting for the timer.
pub const DEFAULT_MAX_BUFFER_SIZE: usize = 256 * 1024;
/// Idle time after the last accepted record before the buffer is flushed.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(250);
/// Number of queued commands before new records are dropped.
pub const DEFAULT_QUEUE_CAPACITY: usize = 2048;

const ENV_MAX_BUFFER_SIZE: &str = "LOOM_LOG_TAP_MAX_BUFFER_SIZE";
const ENV_FLUSH_INTERVAL_MS: &str = "LOOM_LOG_TAP_FLUSH_INTERVAL_MS";
const ENV_QUEUE_CAPACITY: &str = "LOOM_LOG_TAP_QUEUE_CAPACITY";
const ENV_FORMAT: &str = "LOOM_LOG_TAP_FORMAT";

#[derive(Clone)]
pub struct TapConfig {
	pub max_buffer_size: usize,
	pub flush_interval: Duration,
	pub queue_capacity: usize,
	/// Root formatter; scoped handlers derive from it.
	pub formatter: Arc<dyn Formatter>,
}

impl TapConfig {
	pub fn with_max_buffer_size(mut self, size: usize) -> Self {
		self.max_buffer_size = size;
		self
	}

	pub fn with_flush_interval(mut self, interval: Duration) -> Self {
		self.flush_interval = interval;
		self
	}

	pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
		self.queue_capacity = capacity;
		self
	}

	pub fn with_formatter(mut self, formatter: impl Formatter + 'static) -> Self {
		self.formatter = Arc::new(formatter);
		self
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.queue_capacity == 0 {
			return Err(ConfigError::InvalidQueueCapacity);
		}
		Ok(())
	}
}

impl Default for TapConfig {
	fn default() -> Self {
		Self {
			max_buffer_size: DEFAULT_MAX_BUFFER_SIZE,
			flush_interval: DEFAULT_FLUSH_INTERVAL,
			queue_capacity: DEFAULT_QUEUE_CAPACITY,
			formatter: Arc::new(JsonFormatter::new()),
		}
	}
}

impl fmt::Debug for TapConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("TapConfig")
			.field("max_buffer_size", &self.max_buffer_size)
			.field("flush_interval", &self.flush_interval)
			.field("queue_capacity", &self.queue_capacity)
			.finish_non_exhaustive()
	}
}

/// Built-in output formats selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
	#[default]
	Json,
	Text,
}

impl OutputFormat {
	pub fn formatter(self) -> Arc<dyn Formatter> {
		match self {
			OutputFormat::Json => Arc::new(JsonFormatter::new()),
			OutputFormat::Text => Arc::new(TextFormatter::new()),
		}
	}
}

impl FromStr for OutputFormat {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"json" => Ok(OutputFormat::Json),
			"text" | "logfmt" => Ok(OutputFormat::Text),
			_ => Err(()),
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TapConfigLayer {
	pub max_buffer_size: Option<usize>,
	pub flush_interval_ms: Option<u64>,
	pub queue_capacity: Option<usize>,
	pub format: Option<OutputFormat>,
}

impl TapConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.max_buffer_size.is_some() {
			self.max_buffer_size = other.max_buffer_size;
		}
		if other.flush_interval_ms.is_some() {
			self.flush_interval_ms = other.flush_interval_ms;
		}
		if other.queue_capacity.is_some() {
			self.queue_capacity = other.queue_capacity;
		}
		if other.format.is_some() {
			self.format = other.format;
		}
	}

	pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(contents)?)
	}

	/// Read `LOOM_LOG_TAP_*` variables from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|var| std::env::var(var).ok())
	}

	/// Read `LOOM_LOG_TAP_*` variables through `lookup`.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&'static str) -> Option<String>,
	{
		let layer = Self {
			max_buffer_size: parse_var(&lookup, ENV_MAX_BUFFER_SIZE)?,
			flush_interval_ms: parse_var(&lookup, ENV_FLUSH_INTERVAL_MS)?,
			queue_capacity: parse_var(&lookup, ENV_QUEUE_CAPACITY)?,
			format: parse_var(&lookup, ENV_FORMAT)?,
		};
		debug!(?layer, "loaded log tap config from environment");
		Ok(layer)
	}

	pub fn finalize(self) -> Result<TapConfig, ConfigError> {
		let config = TapConfig {
			max_buffer_size: self.max_buffer_size.unwrap_or(DEFAULT_MAX_BUFFER_SIZE),
			flush_interval: self
				.flush_interval_ms
				.map(Duration::from_millis)
				.unwrap_or(DEFAULT_FLUSH_INTERVAL),
			queue_capacity: self.queue_capacity.unwrap_or(DEFAULT_QUEUE_CAPACITY),
			formatter: self.format.unwrap_or_default().formatter(),
		};
		config.validate()?;
		Ok(config)
	}
}

fn parse_var<F, T>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
	F: Fn(&'static str) -> Option<String>,
	T: FromStr,
{
	match lookup(var) {
		None => Ok(None),
		Some(value) => value
			.trim()
			.parse()
			.map(Some)
			.map_err(|_| ConfigError::InvalidEnv { var, value }),
	}
}
