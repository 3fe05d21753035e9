use serde::Serialize;

use crate::error::Result;
use crate::report::{RowKind, Table};
use crate::survey::Survey;
use crate::validate::Inventory;

/// Aligned plain-text rendering, numeric columns right-aligned.
pub fn text(tables: &[Table]) -> String {
    let mut out = String::new();
    for table in tables {
        out.push_str(&text_table(table));
        out.push('\n');
    }
    out
}

pub fn text_table(table: &Table) -> String {
    let mut grid: Vec<Vec<String>> = Vec::with_capacity(table.rows.len() + 1);
    let mut header = vec!["ID".to_string()];
    header.extend(table.headers.iter().cloned());
    grid.push(header);
    for row in &table.rows {
        let mut line = vec![row.id.map(|id| id.to_string()).unwrap_or_default()];
        line.extend(row.cells.iter().map(|c| c.render()));
        grid.push(line);
    }

    let columns = grid.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|i| {
            grid.iter()
                .filter_map(|line| line.get(i))
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();
    let numeric: Vec<bool> = (0..columns)
        .map(|i| {
            grid.iter()
                .skip(1)
                .filter_map(|line| line.get(i))
                .filter(|s| !s.is_empty())
                .all(|s| looks_numeric(s))
        })
        .collect();

    let mut out = format!("## {}\n", table.title);
    let mut previous = None;
    for (n, line) in grid.iter().enumerate() {
        let kind = n.checked_sub(1).map(|i| table.rows[i].kind);
        if previous == Some(RowKind::Data) && kind != Some(RowKind::Data) {
            out.push_str(&rule(&widths));
        }
        let cells: Vec<String> = line
            .iter()
            .enumerate()
            .map(|(i, cell)| pad(cell, widths[i], numeric[i] && n > 0))
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
        if n == 0 {
            out.push_str(&rule(&widths));
        }
        previous = kind;
    }
    out
}

fn rule(widths: &[usize]) -> String {
    let total = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
    format!("{}\n", "-".repeat(total))
}

fn pad(cell: &str, width: usize, right: bool) -> String {
    let fill = " ".repeat(width.saturating_sub(cell.chars().count()));
    if right {
        format!("{}{}", fill, cell)
    } else {
        format!("{}{}", cell, fill)
    }
}

fn looks_numeric(s: &str) -> bool {
    let s = s.trim_start_matches("R$ ").trim_end_matches('%');
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
}

#[derive(Serialize)]
struct JsonReport<'a> {
    inventory: &'a Inventory,
    survey: &'a Survey,
    tables: &'a [Table],
}

/// Survey (routes with their map style and coordinates) plus every table.
pub fn json(inventory: &Inventory, survey: &Survey, tables: &[Table]) -> Result<String> {
    let report = JsonReport {
        inventory,
        survey,
        tables,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
