//! Table output formatting

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Rows},
};

/// Format rows as a rounded table with centered headers
pub fn format_table<T: Tabled>(rows: &[T]) -> String {
    if rows.is_empty() {
        return "No session.".to_string();
    }

    let mut table = Table::new(rows);
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SessionDisplay, SessionRow};
    use crate::session::SessionState;

    #[test]
    fn test_format_table_empty() {
        let rows: Vec<SessionRow> = vec![];
        assert_eq!(format_table(&rows), "No session.");
    }

    #[test]
    fn test_format_table_anonymous() {
        let display = SessionDisplay::from_state(&SessionState::Anonymous, chrono::Utc::now());
        let result = format_table(&[SessionRow::from(&display)]);

        assert!(result.contains("STATE"));
        assert!(result.contains("REMAINING"));
        assert!(result.contains("anonymous"));
        assert!(result.contains("--"));
    }
}
