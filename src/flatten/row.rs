//! Flat row type

use crate::types::JsonValue;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// One denormalized record: ordered `column -> scalar`
///
/// Column order is fixed by the flattener that produced the row and is kept
/// when the row is serialized.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: Vec<(&'static str, JsonValue)>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty row with room for `columns` cells
    pub fn with_capacity(columns: usize) -> Self {
        Self {
            cells: Vec::with_capacity(columns),
        }
    }

    /// Append a cell
    pub fn push(&mut self, column: &'static str, value: impl Into<JsonValue>) {
        self.cells.push((column, value.into()));
    }

    /// Value of a column
    pub fn get(&self, column: &str) -> Option<&JsonValue> {
        self.cells
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }

    /// Value of a column if it is a string
    pub fn get_str(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(JsonValue::as_str)
    }

    /// Column names in order
    pub fn columns(&self) -> Vec<&'static str> {
        self.cells.iter().map(|(name, _)| *name).collect()
    }

    /// Iterate over `(column, value)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &JsonValue)> {
        self.cells.iter().map(|(name, value)| (*name, value))
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the row has no columns
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (name, value) in &self.cells {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
