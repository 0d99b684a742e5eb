use std::{collections::HashMap, fs, path::Path};

use crate::error::ImportError;

/// One data row keyed by lower-cased header name.
pub type RawRow = HashMap<String, String>;

/// Delimited text split into a header and keyed rows.
///
/// Splitting is naive: there is no quoting or escaping, so a value that
/// contains the delimiter spills into the next column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    header: Vec<String>,
    rows: Vec<RawRow>,
}

impl RawTable {
    /// Build a table from an already-declared header and keyed rows.
    pub fn new(header: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self { header, rows }
    }

    /// Parse delimited text. The first non-blank line is the header; blank
    /// lines are ignored. Missing trailing cells read as empty and surplus
    /// cells are dropped.
    pub fn parse(text: &str, delimiter: char) -> Self {
        let mut lines = text.lines().filter(|line| !line.trim().is_empty());
        let header: Vec<String> = match lines.next() {
            Some(line) => line
                .split(delimiter)
                .map(|cell| cell.trim().to_lowercase())
                .collect(),
            None => return Self::default(),
        };

        let rows = lines
            .map(|line| {
                let mut cells = line.split(delimiter).map(str::trim);
                header
                    .iter()
                    .map(|column| {
                        (
                            column.clone(),
                            cells.next().unwrap_or_default().to_string(),
                        )
                    })
                    .collect()
            })
            .collect();

        Self { header, rows }
    }

    /// Read and parse a delimited file from disk.
    pub fn read(path: impl AsRef<Path>, delimiter: char) -> Result<Self, ImportError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text, delimiter))
    }

    /// Declared column names, trimmed and lower-cased.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    /// Data rows in input order.
    pub fn rows(&self) -> &[RawRow] {
        &self.rows
    }

    /// `true` when no non-blank header column was declared.
    pub fn has_header(&self) -> bool {
        self.header.iter().any(|column| !column.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_header_and_rows() {
        let table = RawTable::parse(
            " Projects , Programmers,QA\n\nApollo, Alice ,Bob\nGemini,Carol\n",
            ',',
        );
        assert_eq!(table.header(), &["projects", "programmers", "qa"]);
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.rows()[0]["programmers"], "Alice");
        assert_eq!(table.rows()[1]["qa"], "");
    }

    #[test]
    fn quoted_values_are_not_special() {
        let table = RawTable::parse("projects,programmers\n\"Apollo, Phase 2\",Alice\n", ',');
        assert_eq!(table.rows()[0]["projects"], "\"Apollo");
        assert_eq!(table.rows()[0]["programmers"], "Phase 2\"");
    }

    #[test]
    fn blank_input_has_no_header() {
        let table = RawTable::parse("\n   \n", ';');
        assert!(!table.has_header());
        assert!(table.rows().is_empty());
    }

    #[test]
    fn read_reports_missing_file() {
        let err = RawTable::read("/definitely/not/here.csv", ',').unwrap_err();
        assert!(matches!(err, ImportError::Io { .. }));
    }
}
