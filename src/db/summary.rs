use super::SummaryLimits;
use std::fmt::Write;

/// Column metadata as read from `information_schema`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRow {
    pub table: String,
    pub column: String,
    pub data_type: String,
}

#[derive(Debug, Default)]
struct TableColumns {
    name: String,
    columns: Vec<(String, String)>,
}

/// Groups rows by table in the order they arrive and renders the bounded digest
/// embedded in prompts.
pub fn summarize(database: &str, rows: &[ColumnRow], limits: SummaryLimits) -> String {
    let mut tables: Vec<TableColumns> = Vec::new();
    for row in rows {
        match tables.last_mut() {
            Some(current) if current.name == row.table => {
                current.columns.push((row.column.clone(), row.data_type.clone()));
            }
            _ => tables.push(TableColumns {
                name: row.table.clone(),
                columns: vec![(row.column.clone(), row.data_type.clone())],
            }),
        }
    }

    if tables.is_empty() {
        return format!("No tables found in database '{}'.", database);
    }

    let mut out = String::new();
    for table in tables.iter().take(limits.max_tables) {
        let _ = writeln!(out, "Table: {}", table.name);
        for (column, data_type) in table.columns.iter().take(limits.max_columns) {
            let _ = writeln!(out, "  - {} ({})", column, data_type);
        }
        if table.columns.len() > limits.max_columns {
            let _ = writeln!(
                out,
                "  - ... ({} more columns)",
                table.columns.len() - limits.max_columns
            );
        }
    }
    if tables.len() > limits.max_tables {
        let _ = writeln!(out, "... ({} more tables)", tables.len() - limits.max_tables);
    }

    out.trim_end().to_string()
}
