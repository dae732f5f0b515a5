// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Record severity.

use std::fmt;
use std::str::FromStr;

/// Log level matching tracing levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
	Trace,
	Debug,
	Info,
	Warn,
	Error,
}

impl Level {
	/// Convert from a tracing level.
	pub fn from_tracing(level: &tracing::Level) -> Self {
		match *level {
			tracing::Level::TRACE => Level::Trace,
			tracing::Level::DEBUG => Level::Debug,
			tracing::Level::INFO => Level::Info,
			tracing::Level::WARN => Level::Warn,
			tracing::Level::ERROR => Level::Error,
		}
	}

	/// Upper-case name as written into formatted output.
	pub fn as_str(&self) -> &'static str {
		match self {
			Level::Trace => "TRACE",
			Level::Debug => "DEBUG",
			Level::Info => "INFO",
			Level::Warn => "WARN",
			Level::Error => "ERROR",
		}
	}
}

impl fmt::Display for Level {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Returned when a string does not name a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseLevelError(String);

impl fmt::Display for ParseLevelError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "unknown log level '{}'", self.0)
	}
}

impl std::error::Error for ParseLevelError {}

impl FromStr for Level {
	type Err = ParseLevelError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"trace" => Ok(Level::Trace),
			"debug" => Ok(Level::Debug),
			"info" => Ok(Level::Info),
			"warn" | "warning" => Ok(Level::Warn),
			"error" => Ok(Level::Error),
			_ => Err(ParseLevelError(s.to_string())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_level_ordering() {
		assert!(Level::Trace < Level::Debug);
		assert!(Level::Debug < Level::Info);
		assert!(Level::Info < Level::Warn);
		assert!(Level::Warn < Level::Error);
	}

	#[test]
	fn test_level_display() {
		assert_eq!(Level::Info.to_string(), "INFO");
		assert_eq!(Level::Error.to_string(), "ERROR");
	}

	#[test]
	fn test_level_from_tracing() {
		assert_eq!(Level::from_tracing(&tracing::Level::DEBUG), Level::Debug);
		assert_eq!(Level::from_tracing(&tracing::Level::WARN), Level::Warn);
	}

	#[test]
	fn test_level_parse() {
		assert_eq!("Info".parse::<Level>(), Ok(Level::Info));
		assert_eq!(" warning ".parse::<Level>(), Ok(Level::Warn));
		assert!("loud".parse::<Level>().is_err());
	}
}
