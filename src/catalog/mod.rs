//! Read-only product/user rows.
//!
//! Rows are JSON objects loaded once at startup from fixture files and keyed
//! by an id column (`product_id`, `user_id`). Lookups never write.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::CatalogConfig;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{table}: fixture must be a JSON array of objects")]
    NotAnArray { table: &'static str },

    #[error("{table}: row {index} has no usable '{key}' column")]
    MissingKey {
        table: &'static str,
        key: &'static str,
        index: usize,
    },
}

/// Row identifier. Integers order numerically and sort before text ids.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum RowKey {
    Int(i64),
    Text(String),
}

impl RowKey {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(RowKey::Int),
            Value::String(s) => Some(Self::parse(s)),
            _ => None,
        }
    }

    /// Path segments like `"7"` match integer ids.
    pub fn parse(raw: &str) -> Self {
        raw.parse::<i64>()
            .map(RowKey::Int)
            .unwrap_or_else(|_| RowKey::Text(raw.to_string()))
    }
}

/// One keyed table of rows.
#[derive(Debug, Clone)]
pub struct RowTable {
    name: &'static str,
    rows: BTreeMap<RowKey, Value>,
}

impl RowTable {
    pub fn empty(name: &'static str) -> Self {
        Self {
            name,
            rows: BTreeMap::new(),
        }
    }

    pub fn from_rows(name: &'static str, key: &'static str, rows: Vec<Value>) -> Result<Self, CatalogError> {
        let mut table = Self::empty(name);
        for (index, row) in rows.into_iter().enumerate() {
            let id = row
                .get(key)
                .and_then(RowKey::from_value)
                .ok_or(CatalogError::MissingKey { table: name, key, index })?;
            table.rows.insert(id, row);
        }
        Ok(table)
    }

    fn load(name: &'static str, key: &'static str, path: &Path) -> Result<Self, CatalogError> {
        let display = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: display.clone(),
            source,
        })?;
        let value: Value = serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
            path: display,
            source,
        })?;
        match value {
            Value::Array(rows) => Self::from_rows(name, key, rows),
            _ => Err(CatalogError::NotAnArray { table: name }),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn get(&self, id: &str) -> Option<&Value> {
        self.rows.get(&RowKey::parse(id))
    }

    /// All rows in ascending key order.
    pub fn all(&self) -> Vec<Value> {
        self.rows.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    pub products: RowTable,
    pub users: RowTable,
}

impl Catalog {
    pub fn empty() -> Self {
        Self {
            products: RowTable::empty("products"),
            users: RowTable::empty("users"),
        }
    }

    pub fn load(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let mut catalog = Self::empty();
        if let Some(path) = &config.products_file {
            catalog.products = RowTable::load("products", "product_id", Path::new(path))?;
        }
        if let Some(path) = &config.users_file {
            catalog.users = RowTable::load("users", "user_id", Path::new(path))?;
        }
        tracing::info!(
            products = catalog.products.len(),
            users = catalog.users.len(),
            "Catalog loaded"
        );
        Ok(catalog)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::empty()
    }
}
