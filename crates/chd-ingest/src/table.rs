//! Header/row buffer shared by the CSV and JSON readers.

use std::collections::HashSet;

use polars::prelude::{Column, DataFrame, NamedFrom, Series};

use crate::error::{IngestError, Result};

/// Parsed upload before frame assembly: headers plus nullable text cells.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Appends a row, padding short rows with nulls and dropping cells past the last header.
    pub fn push_row(&mut self, mut row: Vec<Option<String>>) {
        row.resize(self.headers.len(), None);
        self.rows.push(row);
    }

    /// Builds a frame with one nullable string column per header.
    ///
    /// Blank headers become `column_<n>` and repeated headers get `.1`, `.2`
    /// suffixes so every column name is unique.
    pub fn into_frame(self) -> Result<DataFrame> {
        if self.headers.is_empty() {
            return Err(IngestError::malformed("upload has no columns"));
        }
        let names = unique_headers(&self.headers);
        let mut values: Vec<Vec<Option<String>>> = names
            .iter()
            .map(|_| Vec::with_capacity(self.rows.len()))
            .collect();
        for row in self.rows {
            for (idx, cell) in row.into_iter().enumerate() {
                values[idx].push(cell);
            }
        }
        let columns: Vec<Column> = names
            .iter()
            .zip(values)
            .map(|(name, cells)| Series::new(name.as_str().into(), cells).into())
            .collect();
        Ok(DataFrame::new(columns)?)
    }
}

fn unique_headers(headers: &[String]) -> Vec<String> {
    let mut seen = HashSet::with_capacity(headers.len());
    let mut names = Vec::with_capacity(headers.len());
    for (idx, raw) in headers.iter().enumerate() {
        let base = if raw.trim().is_empty() {
            format!("column_{}", idx + 1)
        } else {
            raw.clone()
        };
        let mut name = base.clone();
        let mut suffix = 1;
        while !seen.insert(name.clone()) {
            name = format!("{base}.{suffix}");
            suffix += 1;
        }
        names.push(name);
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_headers_suffixes_repeats() {
        let headers = vec![
            "age".to_string(),
            "age".to_string(),
            String::new(),
            "age".to_string(),
        ];
        assert_eq!(
            unique_headers(&headers),
            vec!["age", "age.1", "column_3", "age.2"]
        );
    }

    #[test]
    fn push_row_pads_and_truncates() {
        let mut table = RawTable::new(vec!["a".to_string(), "b".to_string()]);
        table.push_row(vec![Some("1".to_string())]);
        table.push_row(vec![
            Some("1".to_string()),
            Some("2".to_string()),
            Some("3".to_string()),
        ]);
        assert_eq!(table.rows[0], vec![Some("1".to_string()), None]);
        assert_eq!(table.rows[1].len(), 2);
    }

    #[test]
    fn into_frame_rejects_empty_header() {
        let err = RawTable::default().into_frame().unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn into_frame_keeps_header_only_tables() {
        let df = RawTable::new(vec!["age".to_string(), "sex".to_string()])
            .into_frame()
            .unwrap();
        assert_eq!(df.width(), 2);
        assert_eq!(df.height(), 0);
    }
}
