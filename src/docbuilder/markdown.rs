use crate::docbuilder::{write_text, Block, Document, Renderer, Table};
use camino::Utf8Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer;

impl Renderer for MarkdownRenderer {
    fn render(&self, document: &Document, destination: Option<&Utf8Path>) -> crate::Result<()> {
        write_text(&Self::render_text(document), destination)
    }
}

impl MarkdownRenderer {
    pub fn render_text(document: &Document) -> String {
        let mut sections = Vec::new();

        for block in document.blocks() {
            match block {
                Block::Heading { level, text } => {
                    let marker = "#".repeat(usize::from((*level).clamp(1, 6)));
                    sections.push(format!("{} {}", marker, text));
                }
                Block::Table(table) => sections.push(Self::format_table(table)),
            }
        }

        let mut output = sections.join("\n\n");
        output.push('\n');
        output
    }

    fn format_table(table: &Table) -> String {
        let mut lines = Vec::with_capacity(table.rows.len() + 2);
        lines.push(Self::format_row(table.columns.iter().map(String::as_str)));
        lines.push(Self::format_row(table.columns.iter().map(|_| "---")));
        for row in &table.rows {
            lines.push(Self::format_row(table.padded_row(row).into_iter()));
        }
        lines.join("\n")
    }

    fn format_row<'a>(cells: impl Iterator<Item = &'a str>) -> String {
        let cells: Vec<String> = cells.map(escape_cell).collect();
        format!("| {} |", cells.join(" | "))
    }
}

fn escape_cell(cell: &str) -> String {
    cell.replace('|', "\\|").replace('\n', " ")
}
