use crate::docbuilder::{write_text, Block, Document, Renderer, Table};
use camino::Utf8Path;
use chrono::Utc;

const STYLE: &str = "body { font-family: sans-serif; margin: 2em; }
table { border-collapse: collapse; margin-bottom: 1.5em; }
th, td { border: 1px solid #999; padding: 4px 8px; text-align: left; vertical-align: top; }
th { background: #e8eef4; }
footer { color: #666; font-size: 0.8em; }";

/// Self-contained HTML5 page.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl Renderer for HtmlRenderer {
    fn render(&self, document: &Document, destination: Option<&Utf8Path>) -> crate::Result<()> {
        write_text(&Self::render_text(document), destination)
    }
}

impl HtmlRenderer {
    pub fn render_text(document: &Document) -> String {
        let title = document
            .blocks()
            .iter()
            .find_map(|block| match block {
                Block::Heading { text, .. } => Some(text.as_str()),
                Block::Table(_) => None,
            })
            .unwrap_or("VEX Summary");

        let mut body = String::new();
        for block in document.blocks() {
            match block {
                Block::Heading { level, text } => {
                    let level = (*level).clamp(1, 6);
                    body.push_str(&format!("<h{0}>{1}</h{0}>\n", level, escape(text)));
                }
                Block::Table(table) => body.push_str(&Self::format_table(table)),
            }
        }

        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{}</title>\n<style>\n{}\n</style>\n</head>\n<body>\n{}\
             <footer>Generated by vex2doc on {}</footer>\n</body>\n</html>\n",
            escape(title),
            STYLE,
            body,
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
        )
    }

    fn format_table(table: &Table) -> String {
        let mut html = String::from("<table>\n<thead>\n<tr>");
        for column in &table.columns {
            html.push_str(&format!("<th>{}</th>", escape(column)));
        }
        html.push_str("</tr>\n</thead>\n<tbody>\n");
        for row in &table.rows {
            html.push_str("<tr>");
            for cell in table.padded_row(row) {
                html.push_str(&format!("<td>{}</td>", escape(cell)));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody>\n</table>\n");
        html
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
