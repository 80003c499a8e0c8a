use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::types::{AnalyzeResult, CompareResult};

/// p-values below this are highlighted.
const SIGNIFICANCE: f64 = 0.05;

pub fn print_analyze_summary(result: &AnalyzeResult) {
    match &result.output {
        Some(path) => println!("Output: {}", path.display()),
        None => println!("Output: (dry run, nothing written)"),
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Patients"),
        header_cell("Skipped rows"),
        header_cell("Missing variables"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);

    let mut total_skipped = 0usize;
    for report in &result.files {
        total_skipped += report.skipped_rows;
        let name = report
            .path
            .file_name()
            .map_or_else(|| report.path.display().to_string(), |n| n.to_string_lossy().into_owned());
        let missing = if report.missing_variables.is_empty() {
            dim_cell("-")
        } else {
            Cell::new(report.missing_variables.join(", ")).fg(Color::Yellow)
        };
        table.add_row(vec![
            Cell::new(name),
            Cell::new(report.patient_count),
            count_cell(report.skipped_rows, Color::Yellow),
            missing,
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(result.patient_count).add_attribute(Attribute::Bold),
        count_cell(total_skipped, Color::Yellow).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
    println!(
        "{} statistic columns, {} unresolved cells",
        result.column_count, result.unresolved_cells
    );
}

pub fn print_compare_summary(result: &CompareResult) {
    println!("Test: {} ({})", result.test, result.request.alternative);
    println!("Column: {}", result.request.column);
    if let Some(group_by) = &result.request.group_by {
        println!("Grouped by: {group_by}");
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Field"), header_cell("Value")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    let significant = result.outcome.p_value() < SIGNIFICANCE;
    for (name, value) in result.outcome.fields() {
        let value_cell = if significant && (name == "p_value" || name == "significance_level") {
            Cell::new(value).fg(Color::Green).add_attribute(Attribute::Bold)
        } else {
            Cell::new(value)
        };
        table.add_row(vec![Cell::new(name), value_cell]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label).add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value.to_string()).add_attribute(Attribute::Dim)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}
