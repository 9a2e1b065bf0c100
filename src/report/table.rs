use crate::vex::{display_value, Record};
use clap::ValueEnum;
use serde::Deserialize;
use std::collections::HashMap;

/// How rows are aligned against the heading union.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnPolicy {
    /// Single pass: a row only carries the columns known once its record has
    /// been read. Rows built before a column first appears stay short.
    #[default]
    Accumulate,
    /// Two passes: collect every key first, then give every row the full width.
    Union,
}

impl ColumnPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnPolicy::Accumulate => "accumulate",
            ColumnPolicy::Union => "union",
        }
    }
}

/// Insertion-ordered set of column headings.
#[derive(Debug, Clone, Default)]
pub struct HeadingSet {
    order: Vec<String>,
    index: HashMap<String, usize>,
}

impl HeadingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the column position of `key`, appending it if unseen.
    pub fn insert(&mut self, key: &str) -> usize {
        if let Some(&position) = self.index.get(key) {
            return position;
        }
        let position = self.order.len();
        self.order.push(key.to_string());
        self.index.insert(key.to_string(), position);
        position
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.order
    }
}

/// A single table flattened from records with differing key sets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VulnerabilityTable {
    headings: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl VulnerabilityTable {
    pub fn build(records: &[Record], policy: ColumnPolicy) -> Self {
        match policy {
            ColumnPolicy::Accumulate => Self::accumulate(records),
            ColumnPolicy::Union => Self::union(records),
        }
    }

    fn accumulate(records: &[Record]) -> Self {
        let mut headings = HeadingSet::new();
        let mut rows = Vec::with_capacity(records.len());

        for record in records {
            let positions: Vec<(usize, String)> = record
                .iter()
                .map(|(key, value)| (headings.insert(key), display_value(value)))
                .collect();

            let mut row = vec![String::new(); headings.len()];
            for (position, value) in positions {
                row[position] = value;
            }
            rows.push(row);
        }

        Self {
            headings: headings.order,
            rows,
        }
    }

    fn union(records: &[Record]) -> Self {
        let mut headings = HeadingSet::new();
        for key in records.iter().flat_map(|record| record.keys()) {
            headings.insert(key);
        }

        let rows = records
            .iter()
            .map(|record| {
                let mut row = vec![String::new(); headings.len()];
                for (key, value) in record {
                    if let Some(position) = headings.position(key) {
                        row[position] = display_value(value);
                    }
                }
                row
            })
            .collect();

        Self {
            headings: headings.order,
            rows,
        }
    }

    /// Raw record keys, in first-seen order.
    pub fn headings(&self) -> &[String] {
        &self.headings
    }

    pub fn display_headings(&self) -> Vec<String> {
        self.headings.iter().map(|h| capitalize(h)).collect()
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Vec<String>> {
        self.rows
    }
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
