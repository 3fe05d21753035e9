use crate::report::{RowKind, Table};

pub fn make_typst_document(title: &str, tables: &[Table]) -> String {
    let mut doc = String::from("#set page(paper: \"a4\", flipped: true)\n#set text(size: 9pt)\n\n");
    doc.push_str(&format!("= {}\n\n", escape(title)));

    for table in tables {
        doc.push_str(&format!("== {}\n\n", escape(&table.title)));

        doc.push_str("#table(\n");
        doc.push_str(&format!(
            "  columns: ({}),\n",
            vec!["auto"; table.headers.len() + 1].join(", ")
        ));
        doc.push_str("  inset: 6pt,\n");
        doc.push_str("  align: horizon,\n");
        let header: Vec<String> = std::iter::once("ID".to_string())
            .chain(table.headers.iter().map(|h| escape(h)))
            .map(|h| format!("[*{}*]", h))
            .collect();
        doc.push_str(&format!("  {},\n", header.join(", ")));
        for row in &table.rows {
            let id = row.id.map(|id| id.to_string()).unwrap_or_default();
            let cells: Vec<String> = std::iter::once(id)
                .chain(row.cells.iter().map(|c| escape(&c.render())))
                .map(|c| match row.kind {
                    RowKind::Data => format!("[{}]", c),
                    _ if c.is_empty() => "[]".to_string(),
                    _ => format!("[*{}*]", c),
                })
                .collect();
            doc.push_str(&format!("  {},\n", cells.join(", ")));
        }
        doc.push_str(")\n\n");
    }

    doc
}

/// Escapes characters that carry markup meaning inside Typst content.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(
            c,
            '\\' | '/' | '[' | ']' | '#' | '$' | '*' | '_' | '@' | '<' | '>' | '`' | '~' | '='
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}
