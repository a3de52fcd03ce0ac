use std::fmt::Write as _;

use crate::schema::RecordSchema;

/// Renders left-aligned columns separated by two spaces, with a dashed rule
/// under the header row.
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths = headers
        .iter()
        .map(|header| header.chars().count().max(3))
        .collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut output = String::new();
    push_row(&mut output, headers, &widths);
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    push_row(&mut output, &rule, &widths);
    for row in rows {
        push_row(&mut output, row, &widths);
    }
    output
}

pub fn render_fields(schema: &RecordSchema) -> String {
    let rows = schema
        .fields
        .iter()
        .enumerate()
        .map(|(idx, field)| {
            vec![
                (idx + 1).to_string(),
                field.name.clone(),
                field.field_type.to_string(),
                if field.nullable { "yes" } else { "no" }.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    render_table(&["#", "name", "type", "nullable"], &rows)
}

fn push_row<S: AsRef<str>>(output: &mut String, cells: &[S], widths: &[usize]) {
    let mut line = String::new();
    for (idx, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if idx > 0 {
            line.push_str("  ");
        }
        let _ = write!(line, "{:<width$}", cell.as_ref().replace(['\n', '\r', '\t'], " "));
    }
    let _ = writeln!(output, "{}", line.trim_end());
}
