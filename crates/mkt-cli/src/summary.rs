//! Console tables for validation issues, the resource directory, and run
//! summaries.

use std::collections::BTreeMap;
use std::path::Path;

use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use mkt_directory::Directory;
use mkt_model::{IssueKind, ResourceName, SerializedMarketplace, ValidationReport};
use mkt_seed::SeedSummary;

/// Records downloaded per resource type.
pub fn document_counts(document: &SerializedMarketplace) -> BTreeMap<ResourceName, usize> {
    document
        .resource_names()
        .map(|name| (name, document.records(name).len()))
        .filter(|(_, count)| *count > 0)
        .collect()
}

pub fn issue_table(report: &ValidationReport) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Resource"),
        header_cell("Record"),
        header_cell("Field"),
        header_cell("Kind"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table, 160);
    align_column(&mut table, 1, CellAlignment::Right);

    for issue in &report.issues {
        table.add_row(vec![
            resource_cell(issue.resource),
            issue
                .record_index
                .map_or_else(|| dim_cell("-"), Cell::new),
            issue
                .field
                .as_deref()
                .map_or_else(|| dim_cell("-"), Cell::new),
            Cell::new(kind_label(issue.kind)).fg(Color::Red),
            Cell::new(&issue.message),
        ]);
    }
    table
}

pub fn print_validation(source: &str, report: &ValidationReport, report_path: Option<&Path>) {
    if report.is_valid() {
        println!("{source}: no validation issues");
    } else {
        println!("{source}: {} validation issue(s)", report.error_count());
        println!("{}", issue_table(report));
    }
    if let Some(path) = report_path {
        println!("Validation report: {}", path.display());
    }
}

pub fn resource_table(directory: &Directory) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Resource"),
        header_cell("Route"),
        header_cell("Priority"),
        header_cell("Parent"),
    ]);
    apply_table_style(&mut table, 120);
    align_column(&mut table, 2, CellAlignment::Right);

    for resource in directory.creation_order() {
        table.add_row(vec![
            resource_cell(resource.name),
            Cell::new(resource.route),
            Cell::new(resource.create_priority),
            resource
                .parent
                .map_or_else(|| dim_cell("-"), |parent| Cell::new(parent.as_str())),
        ]);
    }
    table
}

/// Per-resource counts with a bold total row.
pub fn count_table(label: &str, counts: &BTreeMap<ResourceName, usize>) -> Table {
    let mut table = Table::new();
    table.set_header(vec![header_cell("Resource"), header_cell(label)]);
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    align_column(&mut table, 1, CellAlignment::Right);

    for (name, count) in counts {
        table.add_row(vec![resource_cell(*name), Cell::new(count)]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(counts.values().sum::<usize>()).add_attribute(Attribute::Bold),
    ]);
    table
}

pub fn print_seed_summary(summary: &SeedSummary) {
    println!("Marketplace: {}", summary.marketplace_id);
    println!("{}", count_table("Created", &summary.created));
    if summary.secrets_generated > 0 {
        println!("Generated {} secret(s) for redacted fields", summary.secrets_generated);
    }
    if summary.api_clients_remapped > 0 {
        println!(
            "Remapped {} API client ID(s) to platform-assigned IDs",
            summary.api_clients_remapped
        );
    }
}

pub fn print_download_summary(
    marketplace_id: &str,
    output: &Path,
    counts: &BTreeMap<ResourceName, usize>,
) {
    println!("Marketplace: {marketplace_id}");
    println!("Output: {}", output.display());
    println!("{}", count_table("Records", counts));
}

pub fn kind_label(kind: IssueKind) -> &'static str {
    match kind {
        IssueKind::DuplicateId => "duplicate id",
        IssueKind::DuplicateUsername => "duplicate username",
        IssueKind::RequiredField => "required field",
        IssueKind::IncorrectType => "incorrect type",
        IssueKind::InvalidValue => "invalid value",
        IssueKind::InvalidReference => "invalid reference",
        IssueKind::InvalidId => "invalid id",
        IssueKind::MisplacedResource => "misplaced resource",
        IssueKind::Rule => "rule",
    }
}

fn apply_table_style(table: &mut Table, width: u16) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(width);
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

fn resource_cell(name: ResourceName) -> Cell {
    Cell::new(name.as_str())
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
