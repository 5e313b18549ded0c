//! Free-text filters for the View Logs page.

use serde::{Deserialize, Serialize};

use super::Query;

/// Unfiltered browse query; predicates are appended to it.
pub const BASE_LOGS_SQL: &str = "SELECT * FROM traffic_stops WHERE 1=1";

/// Substring filters typed on the View Logs page.
///
/// Each non-empty field adds one conjunctive `LIKE '%value%'` predicate.
/// Matching is case-insensitive for ASCII, which is `SQLite`'s default for
/// `LIKE`. `%` and `_` typed by the user keep their wildcard meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFilter {
    /// Substring of `vehicle_number`.
    pub vehicle: String,
    /// Substring of `violation`.
    pub violation: String,
    /// Substring of `country_name`.
    pub country: String,
}

impl LogFilter {
    /// Check if no field is set (the browse is unfiltered).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields().all(|(_, value)| value.is_empty())
    }

    /// Build the browse query: vehicle, then violation, then country.
    #[must_use]
    pub fn to_query(&self) -> Query {
        let mut query = Query::new(BASE_LOGS_SQL);
        let mut position = 0;
        for (column, value) in self.fields() {
            if value.is_empty() {
                continue;
            }
            position += 1;
            query = query.and_bind(
                &format!(" AND {column} LIKE ?{position}"),
                format!("%{value}%"),
            );
        }
        query
    }

    fn fields(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("vehicle_number", self.vehicle.as_str()),
            ("violation", self.violation.as_str()),
            ("country_name", self.country.as_str()),
        ]
        .into_iter()
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::types::Value;

    use super::*;

    fn text(s: &str) -> Value {
        Value::Text(s.to_string())
    }

    #[test]
    fn test_empty_filter_is_base_query() {
        let filter = LogFilter::default();
        assert!(filter.is_empty());

        let query = filter.to_query();
        assert_eq!(query.sql(), BASE_LOGS_SQL);
        assert!(query.params().is_empty());
    }

    #[test]
    fn test_single_field() {
        let filter = LogFilter {
            violation: "Speed".to_string(),
            ..LogFilter::default()
        };
        let query = filter.to_query();
        assert_eq!(
            query.sql(),
            "SELECT * FROM traffic_stops WHERE 1=1 AND violation LIKE ?1"
        );
        assert_eq!(query.params(), &[text("%Speed%")]);
    }

    #[test]
    fn test_all_fields_in_order() {
        let filter = LogFilter {
            vehicle: "KA01".to_string(),
            violation: "DUI".to_string(),
            country: "India".to_string(),
        };
        let query = filter.to_query();
        assert_eq!(
            query.sql(),
            "SELECT * FROM traffic_stops WHERE 1=1 \
             AND vehicle_number LIKE ?1 AND violation LIKE ?2 AND country_name LIKE ?3"
        );
        assert_eq!(
            query.params(),
            &[text("%KA01%"), text("%DUI%"), text("%India%")]
        );
    }

    #[test]
    fn test_skipped_field_keeps_positions_dense() {
        let filter = LogFilter {
            vehicle: "KA".to_string(),
            country: "USA".to_string(),
            ..LogFilter::default()
        };
        let query = filter.to_query();
        assert!(query.sql().ends_with("vehicle_number LIKE ?1 AND country_name LIKE ?2"));
        assert_eq!(query.params().len(), 2);
    }

    #[test]
    fn test_quotes_are_bound_not_interpolated() {
        let filter = LogFilter {
            country: "x' OR '1'='1".to_string(),
            ..LogFilter::default()
        };
        let query = filter.to_query();
        assert!(!query.sql().contains("OR '1'"));
        assert_eq!(query.params(), &[text("%x' OR '1'='1%")]);
    }
}
