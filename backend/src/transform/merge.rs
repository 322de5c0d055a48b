//! Append new records to a platform template.

use crate::models::Table;

/// Drop the first `placeholder_rows` template rows and append `new_rows`.
///
/// Placeholder rows are removed by position only. The merged columns are the
/// template's, followed by any column only `new_rows` carries. Rows that lack
/// a column simply have no value for it.
pub fn merge(template: Table, new_rows: Table, placeholder_rows: usize) -> Table {
    let Table {
        mut headers,
        rows: template_rows,
    } = template;

    for header in new_rows.headers {
        if !headers.contains(&header) {
            headers.push(header);
        }
    }

    let rows = template_rows
        .into_iter()
        .skip(placeholder_rows)
        .chain(new_rows.rows)
        .collect();

    Table::with_rows(headers, rows)
}
