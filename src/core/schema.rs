//! The unified schema model.
//!
//! Every dialect's catalog introspects into the same shapes: a [`Schema`]
//! owns tables, a [`Table`] owns ordered column and index maps, an [`Index`]
//! names its columns. Names everywhere must satisfy the identifier grammar,
//! and the maps preserve catalog discovery order because generated DDL and
//! DML walk them in order.
//!
//! Equality is structural. Two tables read from different servers compare
//! equal when their names, columns, and indexes agree.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::identifier::validate_identifier;
use crate::datatype::DataType;
use crate::error::{MetaError, Result};

/// A database schema (namespace) and the tables discovered in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    pub tables: Vec<Table>,
}

impl Schema {
    /// # Errors
    ///
    /// The name must satisfy the identifier grammar.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_identifier(&name)?;
        Ok(Schema {
            name,
            comment: None,
            tables: Vec::new(),
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A table: an ordered column map plus an ordered index map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    schema: Option<String>,
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default)]
    columns: IndexMap<String, Column>,
    #[serde(default)]
    indexes: IndexMap<String, Index>,
}

impl Table {
    /// # Errors
    ///
    /// The table name, and the schema name when present, must satisfy the
    /// identifier grammar.
    pub fn new(schema: Option<&str>, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_identifier(&name)?;
        if let Some(schema) = schema {
            validate_identifier(schema)?;
        }
        Ok(Table {
            schema: schema.map(str::to_string),
            name,
            comment: None,
            columns: IndexMap::new(),
            indexes: IndexMap::new(),
        })
    }

    #[must_use]
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn columns(&self) -> &IndexMap<String, Column> {
        &self.columns
    }

    #[must_use]
    pub fn indexes(&self) -> &IndexMap<String, Index> {
        &self.indexes
    }

    /// Replace the column map.
    ///
    /// # Errors
    ///
    /// The map must be non-empty and every key must equal its column's name.
    pub fn set_columns(&mut self, columns: IndexMap<String, Column>) -> Result<()> {
        if columns.is_empty() {
            return Err(MetaError::config(format!(
                "table {} must have at least one column",
                self.name
            )));
        }
        for (key, column) in &columns {
            if key != &column.name {
                return Err(MetaError::config(format!(
                    "column map key {key:?} does not match column name {:?}",
                    column.name
                )));
            }
        }
        self.columns = columns;
        Ok(())
    }

    /// Replace the index map.
    ///
    /// # Errors
    ///
    /// Every key must equal its index's name, every index column must exist
    /// in the column map, and at most one index may be a primary key.
    pub fn set_indexes(&mut self, indexes: IndexMap<String, Index>) -> Result<()> {
        let mut primary = None;
        for (key, index) in &indexes {
            if key != &index.name {
                return Err(MetaError::config(format!(
                    "index map key {key:?} does not match index name {:?}",
                    index.name
                )));
            }
            for column in &index.columns {
                if !self.columns.contains_key(column) {
                    return Err(MetaError::catalog(format!(
                        "index {} references unknown column {column:?} of table {}",
                        index.name, self.name
                    )));
                }
            }
            if index.kind == IndexKind::PrimaryKey {
                if let Some(first) = primary {
                    return Err(MetaError::config(format!(
                        "table {} has two primary keys: {first} and {}",
                        self.name, index.name
                    )));
                }
                primary = Some(&index.name);
            }
        }
        self.indexes = indexes;
        Ok(())
    }

    /// The primary key index, if one was discovered.
    #[must_use]
    pub fn primary_key(&self) -> Option<&Index> {
        self.indexes
            .values()
            .find(|i| i.kind == IndexKind::PrimaryKey)
    }

    /// The primary key columns, or every column when the table has no
    /// primary key. Keyless tables key row identity on all columns.
    #[must_use]
    pub fn primary_key_columns(&self) -> Vec<&Column> {
        match self.primary_key() {
            Some(pk) => pk
                .columns
                .iter()
                .filter_map(|name| self.columns.get(name))
                .collect(),
            None => self.columns.values().collect(),
        }
    }
}

/// One column of a table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    name: String,
    pub data_type: DataType,
    #[serde(default)]
    pub not_null: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Column {
    /// # Errors
    ///
    /// The name must satisfy the identifier grammar.
    pub fn new(name: impl Into<String>, data_type: DataType) -> Result<Self> {
        let name = name.into();
        validate_identifier(&name)?;
        Ok(Column {
            name,
            data_type,
            not_null: false,
            comment: None,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The role an index plays on its table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexKind {
    PrimaryKey,
    UniqueKey,
    Normal,
}

/// A named index over an ordered list of column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Index {
    name: String,
    pub kind: IndexKind,
    columns: Vec<String>,
}

impl Index {
    /// # Errors
    ///
    /// The index name and every column name must satisfy the identifier
    /// grammar, and the column list must be non-empty.
    pub fn new(name: impl Into<String>, kind: IndexKind, columns: Vec<String>) -> Result<Self> {
        let name = name.into();
        validate_identifier(&name)?;
        if columns.is_empty() {
            return Err(MetaError::config(format!(
                "index {name} must cover at least one column"
            )));
        }
        for column in &columns {
            validate_identifier(column)?;
        }
        Ok(Index {
            name,
            kind,
            columns,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_columns(names: &[&str]) -> Table {
        let mut table = Table::new(Some("app"), "users").unwrap();
        let mut columns = IndexMap::new();
        for name in names {
            columns.insert(
                name.to_string(),
                Column::new(*name, DataType::Integer).unwrap(),
            );
        }
        table.set_columns(columns).unwrap();
        table
    }

    #[test]
    fn test_names_follow_identifier_grammar() {
        assert!(Schema::new("app").is_ok());
        assert!(Schema::new("my schema").is_err());
        assert!(Table::new(Some("bad name"), "users").is_err());
        assert!(Column::new("1col", DataType::Integer).is_err());
    }

    #[test]
    fn test_set_columns_rejects_empty_and_mismatched_keys() {
        let mut table = Table::new(None, "users").unwrap();
        assert!(table.set_columns(IndexMap::new()).is_err());

        let mut columns = IndexMap::new();
        columns.insert(
            "wrong".to_string(),
            Column::new("id", DataType::Integer).unwrap(),
        );
        assert!(table.set_columns(columns).is_err());
    }

    #[test]
    fn test_set_indexes_enforces_single_primary_key() {
        let mut table = table_with_columns(&["id", "email"]);
        let mut indexes = IndexMap::new();
        indexes.insert(
            "pk1".to_string(),
            Index::new("pk1", IndexKind::PrimaryKey, vec!["id".into()]).unwrap(),
        );
        indexes.insert(
            "pk2".to_string(),
            Index::new("pk2", IndexKind::PrimaryKey, vec!["email".into()]).unwrap(),
        );
        let err = table.set_indexes(indexes).unwrap_err();
        assert!(err.to_string().contains("two primary keys"));
    }

    #[test]
    fn test_set_indexes_rejects_unknown_columns() {
        let mut table = table_with_columns(&["id"]);
        let mut indexes = IndexMap::new();
        indexes.insert(
            "ix_missing".to_string(),
            Index::new("ix_missing", IndexKind::Normal, vec!["nope".into()]).unwrap(),
        );
        assert!(table.set_indexes(indexes).is_err());
    }

    #[test]
    fn test_primary_key_columns_fall_back_to_all() {
        let table = table_with_columns(&["id", "email", "name"]);
        let all: Vec<&str> = table
            .primary_key_columns()
            .iter()
            .map(|c| c.name())
            .collect();
        assert_eq!(all, vec!["id", "email", "name"]);

        let mut keyed = table.clone();
        let mut indexes = IndexMap::new();
        indexes.insert(
            "pk_users".to_string(),
            Index::new("pk_users", IndexKind::PrimaryKey, vec!["id".into()]).unwrap(),
        );
        keyed.set_indexes(indexes).unwrap();
        let pk: Vec<&str> = keyed
            .primary_key_columns()
            .iter()
            .map(|c| c.name())
            .collect();
        assert_eq!(pk, vec!["id"]);
    }

    #[test]
    fn test_structural_equality() {
        let a = table_with_columns(&["id", "email"]);
        let b = table_with_columns(&["id", "email"]);
        assert_eq!(a, b);

        let c = table_with_columns(&["email", "id"]);
        assert_ne!(a, c);
    }
}
