use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use labreport_map::UnmatchedLabel;
use labreport_model::{CanonicalParameterSet, LABEL_HEADER, ResultTable, VALUE_HEADER};

use labreport_cli::session::DocumentReport;

pub fn print_report(report: &DocumentReport, show_discarded: bool) {
    println!("Document: {}", report.path.display());
    if let Some(failure) = &report.failure {
        eprintln!("warning: {} could not be read: {failure}", report.path.display());
        return;
    }
    println!("{}", result_table(report.table()));
    let stats = &report.outcome.stats;
    println!(
        "Rows: {} scanned, {} matched, {} unmatched, {} empty values, {} duplicates, {} short",
        stats.rows_scanned,
        stats.matched,
        stats.unmatched,
        stats.empty_values,
        stats.duplicates,
        stats.short_rows
    );
    if report.is_empty() {
        eprintln!(
            "warning: no parameter matched in {}",
            report.path.display()
        );
    }
    if show_discarded && !report.outcome.unmatched.is_empty() {
        println!("{}", discarded_table(&report.outcome.unmatched));
    }
}

pub fn result_table(result: &ResultTable) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell(LABEL_HEADER),
        header_cell(VALUE_HEADER),
    ]);
    apply_result_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for (index, record) in result.indexed() {
        table.add_row(vec![
            dim_cell(index),
            Cell::new(&record.label),
            Cell::new(&record.value).add_attribute(Attribute::Bold),
        ]);
    }
    table
}

fn discarded_table(unmatched: &[UnmatchedLabel]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Row"),
        header_cell("Label"),
        header_cell("Closest"),
        header_cell("Score"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);
    for entry in unmatched {
        let (closest, score) = match &entry.closest {
            Some(candidate) if entry.tied => (
                Cell::new(format!("{} (tie)", candidate.name)).fg(Color::Yellow),
                Cell::new(format!("{:.3}", candidate.score)),
            ),
            Some(candidate) => (
                Cell::new(&candidate.name),
                Cell::new(format!("{:.3}", candidate.score)),
            ),
            None => (dim_cell("-"), dim_cell("-")),
        };
        table.add_row(vec![
            Cell::new(entry.position.table + 1),
            Cell::new(entry.position.row + 1),
            Cell::new(&entry.label),
            closest,
            score,
        ]);
    }
    table
}

pub fn parameters_table(parameters: &CanonicalParameterSet) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Parameter"),
        header_cell("Category"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    for (index, parameter) in parameters.iter().enumerate() {
        table.add_row(vec![
            dim_cell(index + 1),
            Cell::new(&parameter.name),
            match &parameter.category {
                Some(category) => Cell::new(category),
                None => dim_cell("-"),
            },
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_result_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
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

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
