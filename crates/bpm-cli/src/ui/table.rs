//! Package tables.

use bpm_schema::{InstalledEntry, PackageRecord};
use comfy_table::presets::UTF8_HORIZONTAL_ONLY;
use comfy_table::Table;

fn base_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_HORIZONTAL_ONLY)
        .set_header(header);
    table
}

/// Catalog records: name, version, dependencies.
pub fn catalog_table(records: &[&PackageRecord]) -> Table {
    let mut table = base_table(vec!["PACKAGE", "VERSION", "DEPENDS"]);
    for record in records {
        let deps: Vec<&str> = record.dependencies.iter().map(|d| d.as_str()).collect();
        table.add_row(vec![
            record.name.to_string(),
            record.version.to_string(),
            deps.join(", "),
        ]);
    }
    table
}

/// Registry entries: name, installed version.
pub fn installed_table(entries: &[InstalledEntry]) -> Table {
    let mut table = base_table(vec!["PACKAGE", "VERSION"]);
    for entry in entries {
        table.add_row(vec![entry.name.to_string(), entry.version.to_string()]);
    }
    table
}
