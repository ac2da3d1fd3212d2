//! Result tree produced by dissectors.
//!
//! Dissectors append `FieldEvent`s as they consume decoded values. The tree is
//! write only from the decoder's point of view: nothing in the decoding path
//! ever reads it back.

use std::ops::Range;

use serde::Serialize;

use crate::error::Error;
use crate::utils::serde::as_hex;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum FieldValue {
    /// Grouping item without a value of its own
    None,
    Uint(u64),
    Int(i64),
    Bool(bool),
    /// Dotted decimal object identifier
    Oid(String),
    OctetString(#[serde(serialize_with = "as_hex")] Vec<u8>),
    Text(String),
    /// Malformed data, with a human readable reason
    Error(String),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldEvent {
    pub name: String,
    pub offset: usize,
    pub length: usize,
    pub value: FieldValue,
    /// Human readable rendering, when it says more than `value`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FieldEvent>,
}

impl FieldEvent {
    pub fn new<S: Into<String>>(name: S, offset: usize, length: usize, value: FieldValue) -> Self {
        Self {
            name: name.into(),
            offset,
            length,
            value,
            display: None,
            children: vec![],
        }
    }

    /// Synthetic item covering the bytes that could not be decoded
    pub fn error(err: &Error, end: usize) -> Self {
        let length = end.saturating_sub(err.offset);
        Self::new("malformed", err.offset, length, FieldValue::Error(err.to_string()))
    }

    pub fn with_display<S: Into<String>>(mut self, display: S) -> Self {
        self.display = Some(display.into());
        self
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset.saturating_add(self.length)
    }

    /// Append a child and hand it back for further nesting
    pub fn push(&mut self, child: FieldEvent) -> &mut FieldEvent {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    /// Depth first search by field name
    pub fn find(&self, name: &str) -> Option<&FieldEvent> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut FieldEvent> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(name))
    }

    pub fn is_error(&self) -> bool {
        matches!(self.value, FieldValue::Error(_))
    }
}

/// Top level items of one dissected packet
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ProtoTree {
    pub items: Vec<FieldEvent>,
}

impl ProtoTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: FieldEvent) -> &mut FieldEvent {
        self.items.push(item);
        let last = self.items.len() - 1;
        &mut self.items[last]
    }

    pub fn find(&self, name: &str) -> Option<&FieldEvent> {
        self.items.iter().find_map(|i| i.find(name))
    }

    /// Every item of the tree, depth first
    pub fn walk(&self) -> Vec<&FieldEvent> {
        fn visit<'t>(item: &'t FieldEvent, out: &mut Vec<&'t FieldEvent>) {
            out.push(item);
            for c in &item.children {
                visit(c, out);
            }
        }
        let mut out = vec![];
        for i in &self.items {
            visit(i, &mut out);
        }
        out
    }

    pub fn has_errors(&self) -> bool {
        self.walk().iter().any(|i| i.is_error())
    }

    /// Siblings never overlap and come in offset order, at every level
    pub fn is_well_ordered(&self) -> bool {
        fn siblings_ok(items: &[FieldEvent]) -> bool {
            let ordered = items
                .windows(2)
                .all(|w| w[0].offset <= w[1].offset && w[0].range().end <= w[1].offset);
            ordered && items.iter().all(|i| siblings_ok(&i.children))
        }
        siblings_ok(&self.items)
    }
}
