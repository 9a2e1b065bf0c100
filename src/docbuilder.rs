//! Document builders: one renderer per output format behind a common
//! heading/table/publish protocol.
//!
//! Builders accumulate headings and tables into a [`Document`] and only touch
//! the destination on [`DocumentBuilder::publish`].

pub mod console;
pub mod html;
pub mod json;
pub mod markdown;
pub mod pdf;
pub mod spreadsheet;

pub use console::ConsoleRenderer;
pub use html::HtmlRenderer;
pub use json::JsonRenderer;
pub use markdown::MarkdownRenderer;
pub use pdf::PdfRenderer;
pub use spreadsheet::SpreadsheetRenderer;

use camino::Utf8Path;
use clap::ValueEnum;
use serde::Deserialize;
use std::fs;
use std::io::Write;
use tracing::{debug, warn};

/// Capability set shared by every output format.
pub trait DocumentBuilder {
    fn heading(&mut self, level: u8, text: &str);

    /// Start a new table. `widths` are column widths in characters.
    fn create_table(&mut self, columns: Vec<String>, widths: Option<&[u16]>);

    fn add_row(&mut self, values: Vec<String>);

    /// Close the current table. `widths` are relative column weights used by
    /// paginated formats.
    fn show_table(&mut self, widths: Option<&[u16]>);

    /// Render everything to `destination`, or stdout for text formats when
    /// no destination is given.
    fn publish(&mut self, destination: Option<&Utf8Path>) -> crate::Result<()>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Console,
    Excel,
    Html,
    Json,
    Markdown,
    Pdf,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Console => "console",
            OutputFormat::Excel => "excel",
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "markdown",
            OutputFormat::Pdf => "pdf",
        }
    }

    pub fn builder(&self) -> Box<dyn DocumentBuilder> {
        match self {
            OutputFormat::Console => Box::new(BufferedBuilder::new(ConsoleRenderer)),
            OutputFormat::Excel => Box::new(BufferedBuilder::new(SpreadsheetRenderer)),
            OutputFormat::Html => Box::new(BufferedBuilder::new(HtmlRenderer)),
            OutputFormat::Json => Box::new(BufferedBuilder::new(JsonRenderer)),
            OutputFormat::Markdown => Box::new(BufferedBuilder::new(MarkdownRenderer)),
            OutputFormat::Pdf => Box::new(BufferedBuilder::new(PdfRenderer)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub widths: Vec<u16>,
    pub display_widths: Vec<u16>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Row cells padded with empty strings up to the column count.
    pub fn padded_row<'a>(&'a self, row: &'a [String]) -> Vec<&'a str> {
        let width = self.columns.len().max(row.len());
        (0..width)
            .map(|i| row.get(i).map(String::as_str).unwrap_or(""))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Heading { level: u8, text: String },
    Table(Table),
}

/// Format-neutral content collected from builder calls.
#[derive(Debug, Clone, Default)]
pub struct Document {
    blocks: Vec<Block>,
    pending: Option<Table>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn heading(&mut self, level: u8, text: &str) {
        self.flush_pending();
        self.blocks.push(Block::Heading {
            level,
            text: text.to_string(),
        });
    }

    pub fn create_table(&mut self, columns: Vec<String>, widths: Option<&[u16]>) {
        self.flush_pending();
        self.pending = Some(Table {
            columns,
            widths: widths.map(<[u16]>::to_vec).unwrap_or_default(),
            ..Table::default()
        });
    }

    pub fn add_row(&mut self, values: Vec<String>) {
        match self.pending.as_mut() {
            Some(table) => table.rows.push(values),
            None => warn!("Row added without a table, ignoring"),
        }
    }

    pub fn show_table(&mut self, widths: Option<&[u16]>) {
        match self.pending.take() {
            Some(mut table) => {
                if let Some(widths) = widths {
                    table.display_widths = widths.to_vec();
                }
                debug!(
                    "Table with {} columns and {} rows",
                    table.columns.len(),
                    table.rows.len()
                );
                self.blocks.push(Block::Table(table));
            }
            None => warn!("show_table called without a table, ignoring"),
        }
    }

    fn flush_pending(&mut self) {
        if let Some(table) = self.pending.take() {
            self.blocks.push(Block::Table(table));
        }
    }

    /// Blocks including a table that was created but never shown.
    pub fn finish(&mut self) -> &[Block] {
        self.flush_pending();
        &self.blocks
    }
}

/// Turns a finished [`Document`] into a concrete output format.
pub trait Renderer {
    fn render(&self, document: &Document, destination: Option<&Utf8Path>) -> crate::Result<()>;
}

/// [`DocumentBuilder`] that buffers into a [`Document`] and hands it to a
/// [`Renderer`] on publish.
#[derive(Debug, Default)]
pub struct BufferedBuilder<R> {
    document: Document,
    renderer: R,
}

impl<R: Renderer> BufferedBuilder<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            document: Document::new(),
            renderer,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

impl<R: Renderer> DocumentBuilder for BufferedBuilder<R> {
    fn heading(&mut self, level: u8, text: &str) {
        self.document.heading(level, text);
    }

    fn create_table(&mut self, columns: Vec<String>, widths: Option<&[u16]>) {
        self.document.create_table(columns, widths);
    }

    fn add_row(&mut self, values: Vec<String>) {
        self.document.add_row(values);
    }

    fn show_table(&mut self, widths: Option<&[u16]>) {
        self.document.show_table(widths);
    }

    fn publish(&mut self, destination: Option<&Utf8Path>) -> crate::Result<()> {
        self.document.finish();
        self.renderer.render(&self.document, destination)
    }
}

/// Write rendered text to `destination`, or stdout when there is none.
pub(crate) fn write_text(text: &str, destination: Option<&Utf8Path>) -> crate::Result<()> {
    match destination {
        Some(path) => write_bytes(text.as_bytes(), path),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            Ok(())
        }
    }
}

pub(crate) fn write_bytes(bytes: &[u8], path: &Utf8Path) -> crate::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, bytes)?;
    debug!("Wrote {} bytes to {}", bytes.len(), path);
    Ok(())
}

pub(crate) fn require_destination<'a>(
    destination: Option<&'a Utf8Path>,
    format: OutputFormat,
) -> crate::Result<&'a Utf8Path> {
    destination.ok_or_else(|| {
        crate::Vex2DocError::Render(format!(
            "{} output needs an output file",
            format.as_str()
        ))
    })
}
