// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! On-demand log diversion.
//!
//! A [`TapHandler`] sits next to the regular log output and, while at least
//! one watcher is registered, copies every record into a buffer owned by a
//! background worker. The worker formats records as they arrive and hands
//! the accumulated bytes to an output callback when the buffer grows past
//! `max_buffer_size`, when `flush_interval` passes without a new record, or
//! when asked to flush. While nobody is watching the tap costs one atomic
//! load per record.
//!
//! This crate provides:
//! - [`Handler`] - The handler capability set (`enabled`, `handle`,
//!   `with_attrs`, `with_group`)
//! - [`TapHandler`] - The diversion handler and its worker
//! - [`ActivationGate`] - The shared watcher count
//! - [`Tee`] - Feeds a primary handler and a tap side by side
//! - [`WriterHandler`] - A primary handler writing to any `MakeWriter`
//! - [`HandlerLayer`] - A tracing Layer driving any [`Handler`]
//! - [`JsonFormatter`] / [`TextFormatter`] - Record formatters
//!
//! # Usage
//!
//! ```ignore
//! use loom_log_tap::{HandlerLayer, Level, TapConfig, Tee, WriterHandler};
//! use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
//!
//! let tee = Tee::new(
//!     WriterHandler::new(std::io::stderr).with_min_level(Level::Info),
//!     TapConfig::default(),
//! )?;
//! tee.spawn(|bytes| ship_somewhere(bytes));
//!
//! tracing_subscriber::registry()
//!     .with(HandlerLayer::new(tee.clone()))
//!     .init();
//!
//! // Debug logs flow to the tap while the guard lives.
//! let _guard = tee.watch_guard();
//! ```

mod command;
pub mod config;
mod error;
pub mod format;
mod gate;
mod handler;
mod layer;
mod level;
mod record;
mod tap;
mod tee;
mod worker;
mod writer;

pub use command::Command;
pub use config::{OutputFormat, TapConfig, TapConfigLayer};
pub use error::{ConfigError, FormatError, HandlerError, Result, TapError};
pub use format::{Formatter, JsonFormatter, TextFormatter};
pub use gate::{ActivationGate, WatchGuard};
pub use handler::Handler;
pub use layer::HandlerLayer;
pub use level::{Level, ParseLevelError};
pub use record::{Attr, Record, Value};
pub use tap::TapHandler;
pub use tee::Tee;
pub use writer::WriterHandler;
