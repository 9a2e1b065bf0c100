use crate::docbuilder::DocumentBuilder;
use crate::report::table::{capitalize, ColumnPolicy, VulnerabilityTable};
use crate::vex::{display_value, Record, VexSource};
use camino::Utf8Path;
use tracing::{debug, info};

const SUMMARY_COLUMNS: [&str; 2] = ["Item", "Details"];
const SUMMARY_WIDTHS: [u16; 2] = [20, 35];
const SUMMARY_DISPLAY_WIDTHS: [u16; 2] = [5, 9];
const VULNERABILITY_DISPLAY_WIDTHS: [u16; 4] = [15, 15, 15, 30];

/// Drive `document` through the VEX, product and vulnerability summaries and
/// publish it to `outfile`.
///
/// The vulnerabilities section is only emitted when the document lists at
/// least one vulnerability.
pub fn generate_document<S>(
    source: &S,
    document: &mut dyn DocumentBuilder,
    filename: &str,
    outfile: Option<&Utf8Path>,
    policy: ColumnPolicy,
) -> crate::Result<()>
where
    S: VexSource + ?Sized,
{
    let vex_type = source.vex_type();
    let metadata = source.metadata();
    let product = source.product().into_primary();
    let vulnerabilities = source.vulnerabilities();

    info!(
        "Generating {} summary with {} vulnerabilities",
        vex_type,
        vulnerabilities.len()
    );

    document.heading(1, "VEX Summary");
    document.create_table(cells(&SUMMARY_COLUMNS), Some(&SUMMARY_WIDTHS[..]));
    document.add_row(cells(&["VEX File", filename]));
    document.add_row(cells(&["VEX Type", vex_type.as_str()]));
    add_record_rows(document, &metadata);
    document.show_table(Some(&SUMMARY_DISPLAY_WIDTHS[..]));

    document.heading(1, "Product Summary");
    document.create_table(cells(&SUMMARY_COLUMNS), Some(&SUMMARY_WIDTHS[..]));
    add_record_rows(document, &product);
    document.show_table(Some(&SUMMARY_DISPLAY_WIDTHS[..]));

    if !vulnerabilities.is_empty() {
        document.heading(1, "Vulnerabilities Summary");
        let table = VulnerabilityTable::build(&vulnerabilities, policy);
        debug!(
            "Vulnerability table has {} columns ({} policy)",
            table.headings().len(),
            policy.as_str()
        );

        document.create_table(table.display_headings(), None);
        for row in table.into_rows() {
            document.add_row(row);
        }
        document.show_table(Some(&VULNERABILITY_DISPLAY_WIDTHS[..]));
    }

    document.publish(outfile)
}

fn add_record_rows(document: &mut dyn DocumentBuilder, record: &Record) {
    for (key, value) in record {
        document.add_row(vec![capitalize(key), display_value(value)]);
    }
}

fn cells(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
