//! In-memory table read from and written to JSON.
//!
//! Two input layouts are accepted:
//!
//! - *split*: `{"columns": ["a", "b"], "rows": [["x", "y"], ...]}`
//! - *records*: `[{"a": "x", "b": "y"}, ...]`
//!
//! Output is always written in the split layout, which keeps column order.

use std::borrow::Cow;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BatchError, BatchResult};

/// A header plus rows of JSON cells, one cell per column.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Append a row, padding short rows with `null`.
    pub fn push_row(&mut self, mut row: Vec<Value>) -> BatchResult<()> {
        if row.len() > self.columns.len() {
            return Err(BatchError::invalid(format!(
                "row {} has {} cells but the table has {} columns",
                self.rows.len(),
                row.len(),
                self.columns.len()
            )));
        }
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Parse either the split or the records layout.
    pub fn from_json_str(text: &str) -> BatchResult<Self> {
        match serde_json::from_str::<Value>(text)? {
            Value::Object(mut object) => {
                let columns = object
                    .remove("columns")
                    .ok_or_else(|| BatchError::invalid("object table needs a \"columns\" array"))?;
                let rows = object.remove("rows").unwrap_or(Value::Array(Vec::new()));
                Self::from_split(columns, rows)
            }
            Value::Array(records) => Self::from_records(records),
            other => Err(BatchError::invalid(format!(
                "expected an object or array, found {}",
                kind_name(&other)
            ))),
        }
    }

    fn from_split(columns: Value, rows: Value) -> BatchResult<Self> {
        let columns: Vec<String> = serde_json::from_value(columns)
            .map_err(|e| BatchError::invalid(format!("\"columns\" must be an array of strings: {e}")))?;
        let Value::Array(rows) = rows else {
            return Err(BatchError::invalid("\"rows\" must be an array"));
        };

        let mut table = Table::new(columns);
        for (idx, row) in rows.into_iter().enumerate() {
            match row {
                Value::Array(cells) => table.push_row(cells)?,
                other => {
                    return Err(BatchError::invalid(format!(
                        "row {idx} must be an array, found {}",
                        kind_name(&other)
                    )))
                }
            }
        }
        Ok(table)
    }

    fn from_records(records: Vec<Value>) -> BatchResult<Self> {
        let mut objects = Vec::with_capacity(records.len());
        let mut columns: Vec<String> = Vec::new();
        for (idx, record) in records.into_iter().enumerate() {
            let Value::Object(object) = record else {
                return Err(BatchError::invalid(format!("record {idx} must be an object")));
            };
            for key in object.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
            objects.push(object);
        }

        let rows = objects
            .into_iter()
            .map(|mut object| {
                columns
                    .iter()
                    .map(|c| object.remove(c).unwrap_or(Value::Null))
                    .collect()
            })
            .collect();
        Ok(Table { columns, rows })
    }

    /// Read a table file.
    pub fn load(path: impl AsRef<Path>) -> BatchResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| BatchError::io(path, e))?;
        let table = Self::from_json_str(&text)?;
        tracing::debug!(
            path = %path.display(),
            columns = table.columns.len(),
            rows = table.rows.len(),
            "loaded table"
        );
        Ok(table)
    }

    pub fn to_json_string(&self) -> BatchResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the table in the split layout.
    pub fn save(&self, path: impl AsRef<Path>) -> BatchResult<()> {
        let path = path.as_ref();
        let mut text = self.to_json_string()?;
        text.push('\n');
        std::fs::write(path, text).map_err(|e| BatchError::io(path, e))?;
        tracing::debug!(path = %path.display(), rows = self.rows.len(), "saved table");
        Ok(())
    }

    /// Strip surrounding whitespace from every header name.
    pub fn trim_headers(&mut self) {
        for column in &mut self.columns {
            let trimmed = column.trim();
            if trimmed.len() != column.len() {
                *column = trimmed.to_string();
            }
        }
    }

    /// Position of `name` in the header.
    ///
    /// With `trim`, surrounding whitespace on both the request and the
    /// header names is ignored.
    pub fn column_index(&self, name: &str, trim: bool) -> BatchResult<usize> {
        let wanted = if trim { name.trim() } else { name };
        self.columns
            .iter()
            .position(|c| if trim { c.trim() == wanted } else { c == wanted })
            .ok_or_else(|| BatchError::ColumnNotFound {
                column: wanted.to_string(),
                available: self.columns.clone(),
            })
    }

    /// Text of the cell at `row`, `column`; `None` for `null` or a short row.
    pub fn text(&self, row: usize, column: usize) -> Option<Cow<'_, str>> {
        self.rows.get(row).and_then(|r| r.get(column)).and_then(cell_text)
    }

    /// Replace the column called `name`, or append it.
    pub fn set_column(&mut self, name: &str, values: Vec<Value>) -> BatchResult<()> {
        if values.len() != self.rows.len() {
            return Err(BatchError::invalid(format!(
                "column '{name}' has {} values for {} rows",
                values.len(),
                self.rows.len()
            )));
        }

        match self.columns.iter().position(|c| c == name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }
}

/// Text form of a cell. `null` is a missing value.
pub fn cell_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Array(_) | Value::Object(_) => Some(Cow::Owned(value.to_string())),
    }
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
