use crate::docbuilder::{require_destination, write_bytes, Block, Document, OutputFormat, Renderer, Table};
use camino::Utf8Path;
use tracing::debug;

const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;
const BODY_SIZE: f32 = 9.0;
const LINE_HEIGHT: f32 = 11.0;
const CELL_PADDING: f32 = 3.0;
// Average Helvetica glyph width as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.5;

#[derive(Debug, Clone, Copy)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

/// Minimal PDF 1.4 writer using the built-in Helvetica fonts.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfRenderer;

impl Renderer for PdfRenderer {
    fn render(&self, document: &Document, destination: Option<&Utf8Path>) -> crate::Result<()> {
        let path = require_destination(destination, OutputFormat::Pdf)?;
        write_bytes(&Self::render_bytes(document), path)
    }
}

impl PdfRenderer {
    pub fn render_bytes(document: &Document) -> Vec<u8> {
        let mut layout = PageLayout::new();

        for block in document.blocks() {
            match block {
                Block::Heading { level, text } => layout.heading(*level, text),
                Block::Table(table) => layout.table(table),
            }
        }

        let pages = layout.finish();
        debug!("Laid out {} PDF pages", pages.len());
        assemble(&pages)
    }
}

struct PageLayout {
    pages: Vec<String>,
    current: String,
    y: f32,
}

impl PageLayout {
    fn new() -> Self {
        Self {
            pages: Vec::new(),
            current: String::new(),
            y: PAGE_HEIGHT - MARGIN,
        }
    }

    fn new_page(&mut self) {
        let page = std::mem::take(&mut self.current);
        self.pages.push(page);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn ensure_space(&mut self, height: f32) {
        if self.y - height < MARGIN && !self.current.is_empty() {
            self.new_page();
        }
    }

    fn heading(&mut self, level: u8, text: &str) {
        let size = match level {
            1 => 16.0,
            2 => 13.0,
            _ => 11.0,
        };
        self.ensure_space(size * 2.5);
        self.y -= size * 1.5;
        self.text(MARGIN, Font::Bold, size, text);
        self.y -= size * 0.5;
    }

    fn table(&mut self, table: &Table) {
        let column_count = table
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(table.columns.len()))
            .max()
            .unwrap_or(0);
        if column_count == 0 {
            return;
        }

        let widths = column_widths(table, column_count);
        let header: Vec<&str> = (0..column_count)
            .map(|i| table.columns.get(i).map(String::as_str).unwrap_or(""))
            .collect();

        self.row(&header, &widths, Font::Bold);
        self.rule();
        for row in &table.rows {
            let cells: Vec<&str> = (0..column_count)
                .map(|i| row.get(i).map(String::as_str).unwrap_or(""))
                .collect();
            self.row(&cells, &widths, Font::Regular);
        }
        self.y -= LINE_HEIGHT;
    }

    fn row(&mut self, cells: &[&str], widths: &[f32], font: Font) {
        let wrapped: Vec<Vec<String>> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| wrap(cell, chars_for_width(*width)))
            .collect();
        let line_count = wrapped.iter().map(Vec::len).max().unwrap_or(1).max(1);

        // Keep a row on one page when it fits, otherwise break it line by line.
        let height = line_count as f32 * LINE_HEIGHT;
        if height <= PAGE_HEIGHT - 2.0 * MARGIN {
            self.ensure_space(height);
        }
        for index in 0..line_count {
            self.ensure_space(LINE_HEIGHT);
            self.y -= LINE_HEIGHT;
            let mut x = MARGIN;
            for (lines, width) in wrapped.iter().zip(widths) {
                if let Some(line) = lines.get(index) {
                    self.text(x + CELL_PADDING, font, BODY_SIZE, line);
                }
                x += width;
            }
        }
    }

    fn rule(&mut self) {
        self.y -= 2.0;
        self.current.push_str(&format!(
            "0.5 w {:.2} {:.2} m {:.2} {:.2} l S\n",
            MARGIN,
            self.y,
            PAGE_WIDTH - MARGIN,
            self.y
        ));
    }

    fn text(&mut self, x: f32, font: Font, size: f32, text: &str) {
        self.current.push_str(&format!(
            "BT /{} {} Tf {:.2} {:.2} Td ({}) Tj ET\n",
            font.resource(),
            size,
            x,
            self.y,
            escape(text)
        ));
    }

    fn finish(mut self) -> Vec<String> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.new_page();
        }
        self.pages
    }
}

/// Split the printable width according to the table's display weights.
fn column_widths(table: &Table, column_count: usize) -> Vec<f32> {
    let weights = if table.display_widths.is_empty() {
        &table.widths
    } else {
        &table.display_widths
    };
    let fallback = weights.last().copied().unwrap_or(1).max(1);
    let weights: Vec<f32> = (0..column_count)
        .map(|i| f32::from(weights.get(i).copied().unwrap_or(fallback).max(1)))
        .collect();
    let total: f32 = weights.iter().sum();
    let available = PAGE_WIDTH - 2.0 * MARGIN;
    weights.iter().map(|w| available * w / total).collect()
}

fn chars_for_width(width: f32) -> usize {
    (((width - 2.0 * CELL_PADDING) / (BODY_SIZE * GLYPH_WIDTH)) as usize).max(1)
}

/// Greedy word wrap by character count; overlong words are split.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();

    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > max_chars {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            let rest = word.split_off(max_chars);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let word: String = word.into_iter().collect();
        if line.is_empty() {
            line = word;
        } else if line.chars().count() + 1 + word.chars().count() <= max_chars {
            line.push(' ');
            line.push_str(&word);
        } else {
            lines.push(std::mem::replace(&mut line, word));
        }
    }

    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

/// Literal-string escaping for WinAnsi-encoded fonts. Non-ASCII characters
/// are written as octal escapes; anything WinAnsi lacks becomes `?`.
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            ' '..='~' => escaped.push(c),
            _ => match win_ansi_byte(c) {
                Some(byte) => escaped.push_str(&format!("\\{:03o}", byte)),
                None => escaped.push('?'),
            },
        }
    }
    escaped
}

fn win_ansi_byte(c: char) -> Option<u8> {
    let byte = match c {
        '\u{a0}'..='\u{ff}' => c as u32 as u8,
        '\u{20ac}' => 0x80,
        '\u{201a}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201e}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02c6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8a,
        '\u{2039}' => 0x8b,
        '\u{0152}' => 0x8c,
        '\u{017d}' => 0x8e,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201c}' => 0x93,
        '\u{201d}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02dc}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9a,
        '\u{203a}' => 0x9b,
        '\u{0153}' => 0x9c,
        '\u{017e}' => 0x9e,
        '\u{0178}' => 0x9f,
        _ => return None,
    };
    Some(byte)
}

fn assemble(pages: &[String]) -> Vec<u8> {
    let mut objects: Vec<String> = Vec::new();

    let kids: Vec<String> = (0..pages.len())
        .map(|i| format!("{} 0 R", 5 + 2 * i))
        .collect();
    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        pages.len()
    ));
    objects.push(
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    );
    objects.push(
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica-Bold /Encoding /WinAnsiEncoding >>"
            .to_string(),
    );

    for (i, content) in pages.iter().enumerate() {
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {} {}] \
             /Resources << /Font << /F1 3 0 R /F2 4 0 R >> >> /Contents {} 0 R >>",
            PAGE_WIDTH,
            PAGE_HEIGHT,
            6 + 2 * i
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}endstream",
            content.len(),
            content
        ));
    }

    let mut out = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, object) in objects.iter().enumerate() {
        offsets.push(out.len());
        out.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, object));
    }

    let xref_offset = out.len();
    out.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        out.push_str(&format!("{:010} 00000 n \n", offset));
    }
    out.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));

    out.into_bytes()
}
