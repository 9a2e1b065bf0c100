use crate::docbuilder::{write_text, Block, Document, Renderer, Table};
use camino::Utf8Path;
use colored::*;

/// Bordered text tables. ANSI styling is only applied when printing to the
/// terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleRenderer;

impl Renderer for ConsoleRenderer {
    fn render(&self, document: &Document, destination: Option<&Utf8Path>) -> crate::Result<()> {
        let text = Self::render_text(document, destination.is_none());
        write_text(&text, destination)
    }
}

impl ConsoleRenderer {
    pub fn render_text(document: &Document, styled: bool) -> String {
        let mut output = String::new();

        for block in document.blocks() {
            match block {
                Block::Heading { level, text } => {
                    output.push('\n');
                    output.push_str(&Self::format_heading(*level, text, styled));
                    output.push('\n');
                }
                Block::Table(table) => {
                    output.push_str(&Self::format_table(table, styled));
                }
            }
        }

        output
    }

    fn format_heading(level: u8, text: &str, styled: bool) -> String {
        if styled {
            let heading = match level {
                1 => text.bold().green().underline(),
                2 => text.bold().green(),
                _ => text.bold(),
            };
            format!("{}\n", heading)
        } else {
            let underline = if level <= 1 { '=' } else { '-' };
            format!(
                "{}\n{}\n",
                text,
                underline.to_string().repeat(text.chars().count())
            )
        }
    }

    fn format_table(table: &Table, styled: bool) -> String {
        let column_count = table
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(table.columns.len()))
            .max()
            .unwrap_or(0);
        if column_count == 0 {
            return String::new();
        }

        let mut col_widths = vec![0usize; column_count];
        for (i, column) in table.columns.iter().enumerate() {
            col_widths[i] = column.chars().count();
        }
        for row in &table.rows {
            for (i, value) in row.iter().enumerate() {
                col_widths[i] = col_widths[i].max(value.chars().count());
            }
        }

        let mut output = String::new();
        let separator = Self::format_separator(&col_widths);

        output.push_str(&separator);
        let header: Vec<&str> = (0..column_count)
            .map(|i| table.columns.get(i).map(String::as_str).unwrap_or(""))
            .collect();
        output.push_str(&Self::format_row(&header, &col_widths, styled, true));
        output.push_str(&separator);

        for row in &table.rows {
            let cells: Vec<&str> = (0..column_count)
                .map(|i| row.get(i).map(String::as_str).unwrap_or(""))
                .collect();
            output.push_str(&Self::format_row(&cells, &col_widths, styled, false));
        }
        output.push_str(&separator);

        output
    }

    fn format_row(cells: &[&str], col_widths: &[usize], styled: bool, header: bool) -> String {
        let mut line = String::from("|");
        for (cell, &width) in cells.iter().zip(col_widths) {
            let padded = format!("{:<width$}", cell, width = width);
            if styled && header {
                line.push_str(&format!(" {} |", padded.bold().cyan()));
            } else {
                line.push_str(&format!(" {} |", padded));
            }
        }
        line.push('\n');
        line
    }

    fn format_separator(col_widths: &[usize]) -> String {
        let mut separator = String::from("+");
        for &width in col_widths {
            separator.push_str(&"-".repeat(width + 2));
            separator.push('+');
        }
        separator.push('\n');
        separator
    }
}
