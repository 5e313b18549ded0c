//! Query construction: bound statements, the View Logs filter, and the
//! catalog of analytical aggregations.

pub mod catalog;
pub mod filter;

use rusqlite::types::Value;

pub use catalog::Analysis;
pub use filter::LogFilter;

/// A SQL statement plus positionally bound parameters (`?1`, `?2`, ...).
///
/// User-supplied text only ever travels in `params`.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    sql: String,
    params: Vec<Value>,
}

impl Query {
    /// A statement without parameters.
    #[must_use]
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Append `clause` (which should reference the next `?n`) and bind `value`.
    #[must_use]
    pub fn and_bind(mut self, clause: &str, value: impl Into<Value>) -> Self {
        self.sql.push_str(clause);
        self.params.push(value.into());
        self
    }

    /// The statement text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Bound parameters in positional order.
    #[must_use]
    pub fn params(&self) -> &[Value] {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_without_params() {
        let query = Query::new("SELECT 1");
        assert_eq!(query.sql(), "SELECT 1");
        assert!(query.params().is_empty());
    }

    #[test]
    fn test_and_bind_appends_in_order() {
        let query = Query::new("SELECT * FROM t WHERE 1=1")
            .and_bind(" AND a = ?1", "x".to_string())
            .and_bind(" AND b = ?2", 5_i64);
        assert_eq!(query.sql(), "SELECT * FROM t WHERE 1=1 AND a = ?1 AND b = ?2");
        assert_eq!(
            query.params(),
            &[Value::Text("x".to_string()), Value::Integer(5)]
        );
    }
}
