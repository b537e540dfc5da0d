//! Purpose: Raw (schemaless key/value table) DTOs and GET query builders.
//! Exports: `RawDatabase`, `RawTable`, `RawRow`, `RawRowCreate`, `RawRowsQuery`, `RawListQuery`.
//! Role: Rows carry free-form JSON columns; only the envelope is typed.
//! Invariants: `columns` is sent as a comma-separated list; an empty list means "all columns".

use super::query::{QueryPairs, QueryParams};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RawDatabase {
    pub name: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRow {
    pub key: String,
    #[serde(default)]
    pub columns: Map<String, Value>,
    pub last_updated_time: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RawRowCreate {
    pub key: String,
    pub columns: Map<String, Value>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RawRowKey {
    pub key: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RawRowsQuery {
    pub limit: Option<u32>,
    pub cursor: Option<String>,
    pub columns: Vec<String>,
    pub min_last_updated_time: Option<i64>,
    pub max_last_updated_time: Option<i64>,
}

impl RawRowsQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn updated_between(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.min_last_updated_time = min;
        self.max_last_updated_time = max;
        self
    }
}

impl QueryParams for RawRowsQuery {
    fn to_query_params(&self) -> Vec<(&'static str, String)> {
        QueryPairs::new()
            .push("limit", self.limit)
            .push("cursor", self.cursor.as_deref())
            .push_joined("columns", &self.columns)
            .push("minLastUpdatedTime", self.min_last_updated_time)
            .push("maxLastUpdatedTime", self.max_last_updated_time)
            .finish()
    }
}

/// Paging options for database and table listings.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RawListQuery {
    pub limit: Option<u32>,
    pub cursor: Option<String>,
}

impl QueryParams for RawListQuery {
    fn to_query_params(&self) -> Vec<(&'static str, String)> {
        QueryPairs::new()
            .push("limit", self.limit)
            .push("cursor", self.cursor.as_deref())
            .finish()
    }
}
