use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};

use crate::cli::OutputFormat;
use crate::command::ListingRow;
use crate::selector::ApiSelectors;

/// Format rendered selectors for printing.
///
/// `raw` emits the bare selector strings (one per line, label selector
/// first) so output can be passed straight to `-l`/`--field-selector`
/// arguments; `json`/`yaml` wrap them in a small document.
pub fn format_selectors(selectors: &ApiSelectors, format: &OutputFormat) -> String {
    match format {
        OutputFormat::Raw => {
            let mut lines = Vec::new();
            if let Some(ref ls) = selectors.label_selector {
                lines.push(ls.clone());
            }
            if let Some(ref fs) = selectors.field_selector {
                lines.push(fs.clone());
            }
            lines.join("\n")
        }
        OutputFormat::Json => {
            serde_json::to_string_pretty(selectors).unwrap_or_else(|_| "{}".to_string())
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(selectors).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

/// Render the `show` listing as a table.
pub fn format_listing(rows: &[ListingRow]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let header_cells: Vec<Cell> = ["KIND", "KEY", "VALUES"]
        .iter()
        .map(|col| Cell::new(col).fg(Color::Yellow))
        .collect();
    table.set_header(header_cells);

    for row in rows {
        table.add_row(vec![
            Cell::new(&row.kind),
            Cell::new(&row.key),
            Cell::new(&row.values),
        ]);
    }

    table.to_string()
}
