use crate::docbuilder::{write_text, Block, Document, Renderer, Table};
use camino::Utf8Path;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

#[derive(Debug, Serialize)]
pub struct JsonDocument {
    pub generated: DateTime<Utc>,
    pub sections: Vec<JsonSection>,
}

#[derive(Debug, Default, Serialize)]
pub struct JsonSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    pub level: u8,
    pub tables: Vec<JsonTable>,
}

#[derive(Debug, Serialize)]
pub struct JsonTable {
    pub columns: Vec<String>,
    pub rows: Vec<Map<String, Value>>,
}

impl Renderer for JsonRenderer {
    fn render(&self, document: &Document, destination: Option<&Utf8Path>) -> crate::Result<()> {
        let json = serde_json::to_string_pretty(&Self::build(document))?;
        write_text(&format!("{}\n", json), destination)
    }
}

impl JsonRenderer {
    /// Group tables under the heading that precedes them. Tables before any
    /// heading go into an untitled section.
    pub fn build(document: &Document) -> JsonDocument {
        let mut sections: Vec<JsonSection> = Vec::new();

        for block in document.blocks() {
            match block {
                Block::Heading { level, text } => sections.push(JsonSection {
                    heading: Some(text.clone()),
                    level: *level,
                    tables: Vec::new(),
                }),
                Block::Table(table) => {
                    if sections.is_empty() {
                        sections.push(JsonSection::default());
                    }
                    if let Some(section) = sections.last_mut() {
                        section.tables.push(Self::table(table));
                    }
                }
            }
        }

        JsonDocument {
            generated: Utc::now(),
            sections,
        }
    }

    /// Rows become objects keyed by column; cells past a short row's end are
    /// omitted rather than emitted as empty strings.
    fn table(table: &Table) -> JsonTable {
        let rows = table
            .rows
            .iter()
            .map(|row| {
                table
                    .columns
                    .iter()
                    .zip(row)
                    .map(|(column, value)| (column.clone(), Value::String(value.clone())))
                    .collect()
            })
            .collect();

        JsonTable {
            columns: table.columns.clone(),
            rows,
        }
    }
}
