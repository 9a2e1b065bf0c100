pub mod csaf;
pub mod cyclonedx;
pub mod openvex;
pub mod parser;

pub use parser::VexParser;

use camino::Utf8Path;
use serde_json::Value;
use std::fmt;

/// An ordered field-name to value mapping extracted from a VEX document.
///
/// Key order is insertion order; different records of the same document may
/// carry different key sets.
pub type Record = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VexType {
    CycloneDx,
    Csaf,
    OpenVex,
}

impl VexType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VexType::CycloneDx => "cyclonedx",
            VexType::Csaf => "csaf",
            VexType::OpenVex => "openvex",
        }
    }
}

impl fmt::Display for VexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Product information as reported by a VEX dialect.
///
/// CycloneDX documents may describe several components; only the first one
/// is summarised.
#[derive(Debug, Clone, PartialEq)]
pub enum Product {
    Single(Record),
    Multiple(Vec<Record>),
}

impl Default for Product {
    fn default() -> Self {
        Product::Single(Record::new())
    }
}

impl Product {
    /// The record that gets summarised: the product itself, or the first of
    /// several. An empty list yields an empty record.
    pub fn into_primary(self) -> Record {
        match self {
            Product::Single(record) => record,
            Product::Multiple(records) => records.into_iter().next().unwrap_or_default(),
        }
    }
}

/// Source of VEX data consumed by the report assembler.
pub trait VexSource {
    /// Load and decode the document at `path`.
    ///
    /// A missing file is reported as [`crate::Vex2DocError::FileNotFound`].
    fn parse(&mut self, path: &Utf8Path) -> crate::Result<()>;

    /// Dialect identifier, e.g. `cyclonedx`. Empty before a successful parse.
    fn vex_type(&self) -> String;

    fn metadata(&self) -> Record;

    fn product(&self) -> Product;

    fn vulnerabilities(&self) -> Vec<Record>;
}

/// Render a record value as display text.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

pub(crate) fn insert_opt(record: &mut Record, key: &str, value: Option<impl Into<String>>) {
    if let Some(value) = value {
        let value = value.into();
        if !value.is_empty() {
            record.insert(key.to_string(), Value::String(value));
        }
    }
}
