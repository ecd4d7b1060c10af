use std::fmt::Display;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use catalog_ingest::{ImportSummary, RowOutcome};
use catalog_model::{Messages, SchemaIssue};
use catalog_template::TemplateRegistry;

use crate::commands::ValidationReport;

pub fn print_import_summary(summary: &ImportSummary, error_limit: usize, messages: Messages) {
    println!("Import: {}", summary.entity);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Created"),
        header_cell("Updated"),
        header_cell("Skipped"),
        header_cell("Errors"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 0..4 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        count_cell(summary.created, Color::Green),
        count_cell(summary.updated, Color::Blue),
        count_cell(summary.skipped, Color::Yellow),
        count_cell(summary.failed(), Color::Red),
    ]);
    println!("{table}");

    if !summary.notes.is_empty() {
        println!("Notes:");
        for note in &summary.notes {
            println!("- {note}");
        }
    }
    if summary.failed() > 0 {
        eprintln!("Errors:");
        for error in summary.display_errors(error_limit, messages) {
            eprintln!("- {error}");
        }
    }
}

/// One line per row, for `-v` runs.
pub fn print_import_rows(summary: &ImportSummary) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Key"),
        header_cell("Outcome"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for row in &summary.rows {
        table.add_row(vec![
            Cell::new(row.row),
            Cell::new(&row.key),
            outcome_cell(row.outcome),
            row.message.as_deref().map_or_else(|| dim_cell("-"), Cell::new),
        ]);
    }
    println!("{table}");
}

pub fn print_validation(report: &ValidationReport) {
    println!(
        "Checked {} product(s), {} with errors",
        report.checked,
        report.failures.len()
    );
    if report.is_clean() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("SKU"),
        header_cell("Series"),
        header_cell("Field"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    for failure in &report.failures {
        for (field, message) in &failure.errors {
            table.add_row(vec![
                Cell::new(&failure.sku)
                    .fg(Color::Blue)
                    .add_attribute(Attribute::Bold),
                Cell::new(&failure.series),
                Cell::new(field),
                Cell::new(message).fg(Color::Red),
            ]);
        }
    }
    println!("{table}");
}

pub fn print_schema_issues(issues: &[(String, Vec<SchemaIssue>)]) {
    if issues.is_empty() {
        println!("All schemas are consistent");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Series"),
        header_cell("Key"),
        header_cell("Issue"),
    ]);
    apply_table_style(&mut table);
    for (code, series_issues) in issues {
        for issue in series_issues {
            table.add_row(vec![
                Cell::new(code).fg(Color::Blue),
                Cell::new(issue.key()),
                Cell::new(issue).fg(Color::Red),
            ]);
        }
    }
    println!("{table}");
}

pub fn print_templates(registry: &TemplateRegistry) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Template"),
        header_cell("Name"),
        header_cell("Applies To"),
        header_cell("Pages"),
        header_cell("Orientation"),
        header_cell("Version"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    for metadata in registry.list() {
        let id_cell = if registry.fallback() == Some(metadata.id.as_str()) {
            Cell::new(format!("{} (fallback)", metadata.id))
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold)
        } else {
            Cell::new(&metadata.id)
        };
        table.add_row(vec![
            id_cell,
            Cell::new(&metadata.name),
            Cell::new(metadata.applicable_to.join(", ")),
            Cell::new(if metadata.supports_multi_page { "multi" } else { "single" }),
            Cell::new(metadata.default_orientation.as_str()),
            Cell::new(&metadata.version),
        ]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn outcome_cell(outcome: RowOutcome) -> Cell {
    let color = match outcome {
        RowOutcome::Created => Color::Green,
        RowOutcome::Updated => Color::Blue,
        RowOutcome::Skipped => Color::DarkGrey,
        RowOutcome::Error => Color::Red,
    };
    Cell::new(outcome.as_str()).fg(color)
}

fn dim_cell<T: Display>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
