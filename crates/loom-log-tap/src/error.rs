// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Error types for the log tap.

use thiserror::Error;

/// A formatter could not serialize a record.
#[derive(Debug, Error)]
pub enum FormatError {
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("serialization error: {0}")]
	Json(#[from] serde_json::Error),
}

/// A handler failed to process a record.
#[derive(Debug, Error)]
pub enum HandlerError {
	#[error("failed to write log record: {0}")]
	Io(#[from] std::io::Error),

	#[error("failed to format log record: {0}")]
	Format(#[from] FormatError),
}

/// Invalid tap configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("invalid value for {var}: {value}")]
	InvalidEnv { var: &'static str, value: String },

	#[error("invalid TOML: {0}")]
	Toml(#[from] toml::de::Error),

	#[error("queue capacity must be greater than zero")]
	InvalidQueueCapacity,
}

/// Errors surfaced by the tap's control surface.
///
/// The logging path itself never fails because of the tap; these only come
/// back from construction, `run`, `flush` and `shutdown`.
#[derive(Debug, Error)]
pub enum TapError {
	#[error("configuration error: {0}")]
	Config(#[from] ConfigError),

	#[error("tap worker has already been started")]
	WorkerAlreadyStarted,

	#[error("tap worker has stopped")]
	Closed,
}

/// Result type alias for tap operations.
pub type Result<T> = std::result::Result<T, TapError>;
