use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use heurist_model::{ColumnRole, RecordTypeSchema};

use crate::types::FlattenResult;

/// Print the run summary. Goes to stderr when rows were written to stdout.
pub fn print_summary(result: &FlattenResult) {
    let mut out = summary_table(result).to_string();
    if let Some(failures) = failure_table(result) {
        out.push_str("\n\nFailures:\n");
        out.push_str(&failures.to_string());
    }
    if result.unmatched_records > 0 {
        out.push_str(&format!(
            "\n{} record(s) skipped: record type not in the structure export",
            result.unmatched_records
        ));
    }
    if result.rejected_records > 0 {
        out.push_str(&format!(
            "\n{} record(s) rejected: could not be parsed",
            result.rejected_records
        ));
    }
    match &result.output {
        Some(path) => {
            println!("Output: {}", path.display());
            println!("{out}");
        }
        None => eprintln!("{out}"),
    }
}

pub fn summary_table(result: &FlattenResult) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Type"),
        header_cell("Table"),
        header_cell("Records"),
        header_cell("Rows"),
        header_cell("Failures"),
        header_cell("Warnings"),
    ]);
    apply_summary_table_style(&mut table);
    for index in 2..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }

    let mut total_records = 0usize;
    let mut total_rows = 0usize;
    let mut total_failures = 0usize;
    let mut total_warnings = 0usize;
    for summary in &result.summaries {
        total_records += summary.records;
        total_rows += summary.rows;
        total_failures += summary.failure_count();
        total_warnings += summary.warnings;
        table.add_row(vec![
            Cell::new(summary.record_type_id),
            Cell::new(&summary.table_name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(summary.records),
            Cell::new(summary.rows),
            count_cell(summary.failure_count(), Color::Red),
            count_cell(summary.warnings, Color::Yellow),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_records).add_attribute(Attribute::Bold),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        count_cell(total_failures, Color::Red).add_attribute(Attribute::Bold),
        count_cell(total_warnings, Color::Yellow).add_attribute(Attribute::Bold),
    ]);
    table
}

/// One line per excluded record, or `None` when every record made it.
pub fn failure_table(result: &FlattenResult) -> Option<Table> {
    if !result.has_record_failures() {
        return None;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Record"),
        header_cell("Kind"),
        header_cell("Fields"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for summary in &result.summaries {
        for failure in &summary.failures {
            let fields = if failure.fields.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(failure.fields.join(", "))
            };
            table.add_row(vec![
                Cell::new(&summary.table_name),
                Cell::new(failure.record_id),
                Cell::new(failure.kind.as_str()).fg(Color::Red),
                fields,
                Cell::new(&failure.message),
            ]);
        }
    }
    Some(table)
}

/// Column listing of one record type's table.
pub fn schema_table(schema: &RecordTypeSchema) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Field"),
        header_cell("Type"),
        header_cell("SQL"),
        header_cell("Repeatable"),
    ]);
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Center);
    for column in schema.columns() {
        let type_label = match column.role {
            ColumnRole::Value => column.field.canonical_type.as_str(),
            ColumnRole::Temporal => "temporal",
            ColumnRole::Term => "term id",
        };
        let key_cell = match column.role {
            ColumnRole::Value => Cell::new(&column.key),
            ColumnRole::Temporal | ColumnRole::Term => dim_cell(format!("  {}", column.key)),
        };
        let repeatable = if column.repeatable() {
            Cell::new("✓").fg(Color::Green)
        } else {
            dim_cell("-")
        };
        table.add_row(vec![
            key_cell,
            Cell::new(column.field.field_id),
            Cell::new(type_label),
            Cell::new(column.sql_type()),
            repeatable,
        ]);
    }
    table
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
