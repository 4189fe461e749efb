//! Column buffer carried between engine stages.

use chd_common::{any_to_f64, any_to_string_opt};
use polars::prelude::{AnyValue, Column, DataFrame, NamedFrom, PolarsResult, Series};

/// Named columns of equal height, kept apart from a `DataFrame` so an upload
/// with rows but no recognized columns still knows its height.
#[derive(Debug, Clone)]
pub(crate) struct StagingFrame {
    height: usize,
    columns: Vec<Column>,
}

impl StagingFrame {
    pub(crate) fn new(height: usize) -> Self {
        Self {
            height,
            columns: Vec::new(),
        }
    }

    pub(crate) fn height(&self) -> usize {
        self.height
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Column> {
        self.columns
            .iter()
            .find(|column| column.name().as_str() == name)
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Adds a column, replacing any column with the same name in place.
    pub(crate) fn insert(&mut self, column: Column) {
        debug_assert_eq!(column.len(), self.height);
        match self
            .columns
            .iter_mut()
            .find(|existing| existing.name() == column.name())
        {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
    }

    /// Builds a frame from the named columns, in the order given. Absent names are skipped.
    pub(crate) fn into_frame(mut self, order: &[String]) -> PolarsResult<DataFrame> {
        let mut selected = Vec::with_capacity(order.len());
        for name in order {
            if let Some(pos) = self
                .columns
                .iter()
                .position(|column| column.name().as_str() == name)
            {
                selected.push(self.columns.swap_remove(pos));
            }
        }
        DataFrame::new(selected)
    }
}

/// Cell text for every row; null, NaN and blank cells are `None`.
pub(crate) fn text_cells(column: &Column) -> Vec<Option<String>> {
    (0..column.len())
        .map(|idx| any_to_string_opt(column.get(idx).unwrap_or(AnyValue::Null)))
        .collect()
}

/// Finite numeric value for every row; anything unparseable is `None`.
pub(crate) fn numeric_cells(column: &Column) -> Vec<Option<f64>> {
    (0..column.len())
        .map(|idx| any_to_f64(column.get(idx).unwrap_or(AnyValue::Null)))
        .collect()
}

pub(crate) fn numeric_column(name: &str, values: Vec<Option<f64>>) -> Column {
    Series::new(name.into(), values).into()
}

pub(crate) fn text_column(name: &str, values: Vec<Option<String>>) -> Column {
    Series::new(name.into(), values).into()
}

#[cfg(test)]
mod tests {
    use polars::prelude::DataType;

    use super::*;

    #[test]
    fn insert_replaces_same_name() {
        let mut staging = StagingFrame::new(2);
        staging.insert(numeric_column("age", vec![Some(1.0), None]));
        staging.insert(text_column("gender", vec![None, Some("Male".to_string())]));
        staging.insert(numeric_column("age", vec![Some(2.0), Some(3.0)]));

        let frame = staging
            .into_frame(&["gender".to_string(), "age".to_string()])
            .unwrap();
        let names: Vec<String> = frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, vec!["gender", "age"]);
        assert_eq!(frame.column("age").unwrap().dtype(), &DataType::Float64);
        assert_eq!(
            frame.column("age").unwrap().f64().unwrap().get(0),
            Some(2.0)
        );
    }

    #[test]
    fn cells_read_mixed_dtypes() {
        let column: Column = Series::new("x".into(), vec![Some("5.5"), Some("abc"), None]).into();
        assert_eq!(numeric_cells(&column), vec![Some(5.5), None, None]);
        assert_eq!(
            text_cells(&column),
            vec![Some("5.5".to_string()), Some("abc".to_string()), None]
        );
    }
}
