// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Record formatters.
//!
//! A [`Formatter`] serializes a [`Record`] into bytes appended to a buffer.
//! Formatters are scoped: [`Formatter::with_attrs`] and
//! [`Formatter::with_group`] return a new formatter carrying the extra scope
//! and leave the receiver untouched, so many scoped handlers can share one
//! tap worker while each keeps its own context.

mod json;
mod text;

use std::sync::Arc;

use crate::error::FormatError;
use crate::record::{Attr, Record};

pub use json::JsonFormatter;
pub use text::TextFormatter;

/// Serializes records into bytes.
pub trait Formatter: Send + Sync {
	/// Append the serialized record to `buf`.
	///
	/// On error `buf` may hold a partial line.
	fn format(&self, record: &Record, buf: &mut Vec<u8>) -> Result<(), FormatError>;

	/// A formatter that also emits `attrs` on every record.
	fn with_attrs(&self, attrs: &[Attr]) -> Arc<dyn Formatter>;

	/// A formatter that nests subsequent attributes under `name`.
	fn with_group(&self, name: &str) -> Arc<dyn Formatter>;
}

/// Attributes and groups bound to a formatter.
///
/// Each bound attribute remembers how many groups were open when it was
/// bound; record attributes always land under every open group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scope {
	groups: Vec<String>,
	bound: Vec<(usize, Attr)>,
}

impl Scope {
	pub fn with_attrs(&self, attrs: &[Attr]) -> Self {
		let mut scope = self.clone();
		let depth = scope.groups.len();
		scope
			.bound
			.extend(attrs.iter().cloned().map(|attr| (depth, attr)));
		scope
	}

	/// Empty names are ignored.
	pub fn with_group(&self, name: &str) -> Self {
		let mut scope = self.clone();
		if !name.is_empty() {
			scope.groups.push(name.to_string());
		}
		scope
	}

	pub fn groups(&self) -> &[String] {
		&self.groups
	}

	/// Every attribute to emit for `record`, paired with its group path.
	pub fn resolved<'a>(
		&'a self,
		record: &'a Record,
	) -> impl Iterator<Item = (&'a [String], &'a Attr)> + 'a {
		let groups = self.groups.as_slice();
		let bound = self
			.bound
			.iter()
			.map(move |(depth, attr)| (&groups[..*depth], attr));
		let own = record.attrs().map(move |attr| (groups, attr));
		bound.chain(own)
	}

	/// Attributes arranged as a tree of nested groups.
	///
	/// Groups only appear when they contain at least one attribute.
	pub(crate) fn tree<'a>(&'a self, record: &'a Record) -> Vec<Node<'a>> {
		let mut nodes = Vec::new();
		for (path, attr) in self.resolved(record) {
			insert(&mut nodes, path, attr);
		}
		nodes
	}
}

#[derive(Debug)]
pub(crate) enum Node<'a> {
	Attr(&'a Attr),
	Group(&'a str, Vec<Node<'a>>),
}

fn insert<'a>(nodes: &mut Vec<Node<'a>>, path: &'a [String], attr: &'a Attr) {
	let Some((head, rest)) = path.split_first() else {
		nodes.push(Node::Attr(attr));
		return;
	};

	let reuse = matches!(nodes.last(), Some(Node::Group(name, _)) if *name == head.as_str());
	if !reuse {
		nodes.push(Node::Group(head.as_str(), Vec::new()));
	}
	if let Some(Node::Group(_, children)) = nodes.last_mut() {
		insert(children, rest, attr);
	}
}
