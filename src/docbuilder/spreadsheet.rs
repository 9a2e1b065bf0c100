use crate::docbuilder::{require_destination, Block, Document, OutputFormat, Renderer, Table};
use crate::error::Vex2DocError;
use camino::Utf8Path;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::collections::HashSet;
use tracing::debug;

const MAX_SHEET_NAME: usize = 31;

/// xlsx workbook with one worksheet per level-1 heading.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpreadsheetRenderer;

impl Renderer for SpreadsheetRenderer {
    fn render(&self, document: &Document, destination: Option<&Utf8Path>) -> crate::Result<()> {
        let path = require_destination(destination, OutputFormat::Excel)?;
        if let Some(parent) = path.parent() {
            if !parent.as_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut workbook = Self::build(document)?;
        workbook.save(path.as_std_path())?;
        debug!("Wrote workbook {}", path);
        Ok(())
    }
}

struct Sheet {
    worksheet: Worksheet,
    next_row: u32,
}

impl SpreadsheetRenderer {
    pub fn build(document: &Document) -> crate::Result<Workbook> {
        let bold = Format::new().set_bold();
        let title = Format::new().set_bold().set_font_size(14);

        let mut sheets: Vec<Sheet> = Vec::new();
        let mut names = HashSet::new();

        for block in document.blocks() {
            match block {
                Block::Heading { level: 1, text } => {
                    let mut worksheet = Worksheet::new();
                    worksheet.set_name(unique_sheet_name(text, &mut names))?;
                    worksheet.write_string_with_format(0, 0, text.as_str(), &title)?;
                    sheets.push(Sheet {
                        worksheet,
                        next_row: 2,
                    });
                }
                Block::Heading { text, .. } => {
                    let sheet = current_sheet(&mut sheets, &mut names)?;
                    sheet
                        .worksheet
                        .write_string_with_format(sheet.next_row, 0, text.as_str(), &bold)?;
                    sheet.next_row += 1;
                }
                Block::Table(table) => {
                    let sheet = current_sheet(&mut sheets, &mut names)?;
                    write_table(sheet, table, &bold)?;
                }
            }
        }

        let mut workbook = Workbook::new();
        for sheet in sheets {
            workbook.push_worksheet(sheet.worksheet);
        }
        Ok(workbook)
    }
}

fn current_sheet<'a>(
    sheets: &'a mut Vec<Sheet>,
    names: &mut HashSet<String>,
) -> crate::Result<&'a mut Sheet> {
    if sheets.is_empty() {
        let mut worksheet = Worksheet::new();
        worksheet.set_name(unique_sheet_name("Sheet1", names))?;
        sheets.push(Sheet {
            worksheet,
            next_row: 0,
        });
    }
    sheets
        .last_mut()
        .ok_or_else(|| Vex2DocError::Render("no worksheet available".to_string()))
}

fn write_table(sheet: &mut Sheet, table: &Table, header_format: &Format) -> crate::Result<()> {
    for (i, column) in table.columns.iter().enumerate() {
        let col = column_index(i)?;
        sheet
            .worksheet
            .write_string_with_format(sheet.next_row, col, column.as_str(), header_format)?;
    }
    for (i, width) in table.widths.iter().enumerate() {
        sheet.worksheet.set_column_width(column_index(i)?, *width)?;
    }
    sheet.next_row += 1;

    for row in &table.rows {
        for (i, value) in row.iter().enumerate() {
            sheet
                .worksheet
                .write_string(sheet.next_row, column_index(i)?, value.as_str())?;
        }
        sheet.next_row += 1;
    }

    // Blank line between consecutive tables.
    sheet.next_row += 1;
    Ok(())
}

fn column_index(i: usize) -> crate::Result<u16> {
    u16::try_from(i).map_err(|_| Vex2DocError::Render(format!("too many columns: {}", i + 1)))
}

/// Worksheet names are at most 31 characters, unique and free of `[]:*?/\`.
fn unique_sheet_name(text: &str, used: &mut HashSet<String>) -> String {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | ':' | '*' | '?' | '/' | '\\'))
        .take(MAX_SHEET_NAME)
        .collect();
    let base = if cleaned.trim().is_empty() {
        "Sheet".to_string()
    } else {
        cleaned.trim().to_string()
    };

    let mut name = base.clone();
    let mut suffix = 2;
    while used.contains(&name.to_lowercase()) {
        let tag = format!(" ({})", suffix);
        let keep = MAX_SHEET_NAME.saturating_sub(tag.chars().count());
        name = format!("{}{}", base.chars().take(keep).collect::<String>(), tag);
        suffix += 1;
    }
    used.insert(name.to_lowercase());
    name
}
