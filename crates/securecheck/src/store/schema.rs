//! `SQLite` schema for the stop log.
//!
//! The application owns no keys or constraints on this table; any row shape
//! the Add Logs form can produce is accepted as-is.

/// SQL statement to create the stops table.
pub const CREATE_STOPS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS traffic_stops (
    vehicle_number TEXT,
    driver_age INTEGER,
    driver_gender TEXT,
    driver_race TEXT,
    violation TEXT,
    country_name TEXT,
    stop_date TEXT,
    stop_time TEXT,
    search_type TEXT,
    stop_outcome TEXT,
    stop_duration TEXT,
    drugs_related_stop INTEGER
)
";

/// SQL statement to insert one stop. Parameters follow the column order above.
pub const INSERT_STOP: &str = r"
INSERT INTO traffic_stops (
    vehicle_number,
    driver_age,
    driver_gender,
    driver_race,
    violation,
    country_name,
    stop_date,
    stop_time,
    search_type,
    stop_outcome,
    stop_duration,
    drugs_related_stop
)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
";

/// Row count and stop date range.
pub const STATS_QUERY: &str = r"
SELECT COUNT(*), MIN(stop_date), MAX(stop_date) FROM traffic_stops
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_STOPS_TABLE];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.trim().is_empty());
        }
    }

    #[test]
    fn test_create_table_contains_stop_columns() {
        for column in [
            "vehicle_number TEXT",
            "driver_age INTEGER",
            "driver_gender TEXT",
            "stop_date TEXT",
            "stop_time TEXT",
            "search_type TEXT",
            "drugs_related_stop INTEGER",
        ] {
            assert!(CREATE_STOPS_TABLE.contains(column), "missing {column}");
        }
        assert!(CREATE_STOPS_TABLE.contains("traffic_stops"));
    }

    #[test]
    fn test_insert_binds_every_column() {
        assert!(INSERT_STOP.contains("?12"));
        assert!(!INSERT_STOP.contains("?13"));
    }
}
