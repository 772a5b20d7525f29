// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Documentation extract document model
//!
//! A document is a JSON object with three record collections
//! (`functionResults`, `routeResults`, `modelResults`). Records keep every
//! field they were read with, in order; only `name` and `textSummary` are
//! typed. Top-level keys other than the collections pass through untouched.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while decoding a document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Not valid JSON
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Valid JSON with the wrong shape
    #[error("{location}: {message}")]
    Schema { location: String, message: String },
}

impl DocumentError {
    fn schema(location: impl Into<String>, message: impl Into<String>) -> Self {
        DocumentError::Schema {
            location: location.into(),
            message: message.into(),
        }
    }
}

/// The record collections of a document, in processing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    FunctionResults,
    RouteResults,
    ModelResults,
}

impl Collection {
    /// Fixed processing order
    pub const ALL: [Collection; 3] = [
        Collection::FunctionResults,
        Collection::RouteResults,
        Collection::ModelResults,
    ];

    /// JSON key of the collection
    pub fn key(self) -> &'static str {
        match self {
            Collection::FunctionResults => "functionResults",
            Collection::RouteResults => "routeResults",
            Collection::ModelResults => "modelResults",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One function, route or model entry
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    pub const NAME: &'static str = "name";
    pub const TEXT_SUMMARY: &'static str = "textSummary";
    pub const EMBEDDING: &'static str = "embedding";

    /// Decodes a record, checking the typed fields
    ///
    /// `location` names the record in error messages, e.g. `functionResults[2]`.
    pub fn from_value(value: Value, location: &str) -> Result<Self, DocumentError> {
        let fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(DocumentError::schema(
                    location,
                    format!("expected an object, found {}", kind(&other)),
                ))
            }
        };

        for key in [Self::NAME, Self::TEXT_SUMMARY] {
            match fields.get(key) {
                None | Some(Value::Null) | Some(Value::String(_)) => {}
                Some(other) => {
                    return Err(DocumentError::schema(
                        format!("{}.{}", location, key),
                        format!("expected a string, found {}", kind(other)),
                    ))
                }
            }
        }

        Ok(Self { fields })
    }

    pub fn name(&self) -> Option<&str> {
        self.fields.get(Self::NAME).and_then(Value::as_str)
    }

    /// The summary to embed; `None` when absent, null or empty
    pub fn text_summary(&self) -> Option<&str> {
        self.fields
            .get(Self::TEXT_SUMMARY)
            .and_then(Value::as_str)
            .filter(|summary| !summary.is_empty())
    }

    pub fn has_embedding(&self) -> bool {
        self.fields.contains_key(Self::EMBEDDING)
    }

    /// Sets `embedding`, keeping its position if already present
    pub fn set_embedding(&mut self, embedding: Vec<f32>) {
        self.fields
            .insert(Self::EMBEDDING.to_string(), Value::from(embedding));
    }

}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Entry {
    Records(Vec<Record>),
    Other(Value),
}

impl Serialize for Entry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Entry::Records(records) => {
                let mut seq = serializer.serialize_seq(Some(records.len()))?;
                for record in records {
                    seq.serialize_element(record)?;
                }
                seq.end()
            }
            Entry::Other(value) => value.serialize(serializer),
        }
    }
}

/// A whole documentation extract, top-level key order preserved
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    entries: Vec<(String, Entry)>,
}

impl Document {
    /// Builds a document from an already parsed JSON value
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        let root = match value {
            Value::Object(root) => root,
            other => {
                return Err(DocumentError::schema(
                    "$",
                    format!("expected an object, found {}", kind(&other)),
                ))
            }
        };

        let mut entries = Vec::with_capacity(root.len());
        for (key, value) in root {
            let entry = match (Collection::from_key(&key), value) {
                (Some(_), Value::Array(items)) => Entry::Records(
                    items
                        .into_iter()
                        .enumerate()
                        .map(|(index, item)| Record::from_value(item, &format!("{}[{}]", key, index)))
                        .collect::<Result<_, _>>()?,
                ),
                // Null collections read as empty and are written back as null
                (Some(_), Value::Null) => Entry::Other(Value::Null),
                (Some(_), other) => {
                    return Err(DocumentError::schema(
                        key,
                        format!("expected an array, found {}", kind(&other)),
                    ))
                }
                (None, other) => Entry::Other(other),
            };
            entries.push((key, entry));
        }

        Ok(Self { entries })
    }

    /// Records of a collection; empty when the collection is missing
    pub fn records(&self, collection: Collection) -> &[Record] {
        self.entries
            .iter()
            .find_map(|(key, entry)| match entry {
                Entry::Records(records) if key == collection.key() => Some(records.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    /// Mutable records of a collection; empty when the collection is missing
    pub fn records_mut(&mut self, collection: Collection) -> &mut [Record] {
        self.entries
            .iter_mut()
            .find_map(|(key, entry)| match entry {
                Entry::Records(records) if key == collection.key() => {
                    Some(records.as_mut_slice())
                }
                _ => None,
            })
            .unwrap_or(&mut [])
    }

    /// Pretty JSON with 2-space indentation
    pub fn to_pretty_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl FromStr for Document {
    type Err = DocumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_value(serde_json::from_str(s)?)
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, entry) in &self.entries {
            map.serialize_entry(key, entry)?;
        }
        map.end()
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
