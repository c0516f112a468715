//! Table output formatting

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

/// Format rows as a rounded table, or `empty` when there are none
pub fn format_table<T: Tabled>(data: &[T], empty: &str) -> String {
    if data.is_empty() {
        return empty.to_string();
    }

    let mut table = Table::new(data);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Tabled)]
    struct RouteRow {
        #[tabled(rename = "PATH")]
        path: &'static str,
        #[tabled(rename = "AUTH")]
        auth: &'static str,
    }

    #[test]
    fn test_format_table_empty() {
        let rows: Vec<RouteRow> = vec![];
        assert_eq!(format_table(&rows, "No videos found."), "No videos found.");
    }

    #[test]
    fn test_format_table_rows() {
        let rows = vec![
            RouteRow {
                path: "/upload",
                auth: "required",
            },
            RouteRow {
                path: "/login",
                auth: "-",
            },
        ];

        let result = format_table(&rows, "");
        assert!(result.contains("PATH"));
        assert!(result.contains("/upload"));
        assert!(result.contains("/login"));
        // Rounded style uses ╭ for top-left corner
        assert!(result.contains("╭"));
    }
}
