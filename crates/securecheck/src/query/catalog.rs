//! Catalog of predefined analytical aggregations over `traffic_stops`.
//!
//! Each entry is a literal `SQLite` template selected by label. Two different
//! "search performed" predicates are in use and must not be unified:
//! `search_type != 'No Search'` excludes the sentinel, `search_type != ''`
//! counts it as a search.
//!
//! Rates are `ROUND(CAST(numerator AS REAL) / COUNT(*) * 100, 2)`. A zero
//! denominator yields `NULL` in `SQLite`; group counts are never zero, so
//! this does not arise for grouped rows. Ranking ties keep the store's row
//! order, which is unspecified.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::present::{ChartKind, ChartSpec};

use super::Query;

const VIOLATION_COUNTS: &str = r"
SELECT violation, COUNT(*) AS count
FROM traffic_stops
GROUP BY violation
ORDER BY count DESC
";

const GENDER_DISTRIBUTION: &str = r"
SELECT driver_gender AS gender, COUNT(*) AS count
FROM traffic_stops
GROUP BY driver_gender
ORDER BY count DESC
";

const DRUG_STOPS_BY_COUNTRY: &str = r"
SELECT country_name,
  CASE drugs_related_stop WHEN 1 THEN 'Yes' WHEN 0 THEN 'No' END AS drugs_related,
  COUNT(*) AS count
FROM traffic_stops
GROUP BY country_name, drugs_related
ORDER BY country_name, drugs_related
";

const TOP_DRUG_VEHICLES: &str = r"
SELECT vehicle_number, COUNT(*) AS stop_count
FROM traffic_stops
WHERE drugs_related_stop = 1
GROUP BY vehicle_number
ORDER BY stop_count DESC
LIMIT 10
";

const MOST_SEARCHED_VEHICLES: &str = r"
SELECT vehicle_number, COUNT(*) AS search_count
FROM traffic_stops
WHERE search_type IS NOT NULL AND search_type != 'No Search'
GROUP BY vehicle_number
ORDER BY search_count DESC
LIMIT 10
";

const ARRESTS_BY_AGE_GROUP: &str = r"
SELECT
  CASE
    WHEN driver_age < 18 THEN 'Under 18'
    WHEN driver_age BETWEEN 18 AND 25 THEN '18-25'
    WHEN driver_age BETWEEN 26 AND 40 THEN '26-40'
    WHEN driver_age BETWEEN 41 AND 60 THEN '41-60'
    ELSE '60+'
  END AS age_group,
  COUNT(*) AS arrest_count
FROM traffic_stops
WHERE stop_outcome = 'Arrest'
GROUP BY age_group
ORDER BY arrest_count DESC
";

const GENDER_BY_COUNTRY: &str = r"
SELECT country_name, driver_gender, COUNT(*) AS stop_count
FROM traffic_stops
GROUP BY country_name, driver_gender
ORDER BY country_name, driver_gender
";

const RACE_GENDER_TOP_SEARCH: &str = r"
SELECT driver_race, driver_gender, COUNT(*) AS search_count
FROM traffic_stops
WHERE search_type IS NOT NULL AND search_type != 'No Search'
GROUP BY driver_race, driver_gender
ORDER BY search_count DESC
LIMIT 1
";

const STOPS_BY_HOUR: &str = r"
SELECT CAST(strftime('%H', stop_time) AS INTEGER) AS hour_of_day, COUNT(*) AS stop_count
FROM traffic_stops
GROUP BY hour_of_day
ORDER BY stop_count DESC
";

const DURATION_BY_VIOLATION: &str = r"
SELECT violation, stop_duration, COUNT(*) AS count
FROM traffic_stops
GROUP BY violation, stop_duration
ORDER BY violation, stop_duration
";

const NIGHT_ARRESTS: &str = r"
SELECT
  CASE
    WHEN CAST(strftime('%H', stop_time) AS INTEGER) BETWEEN 20 AND 23 THEN 'Night'
    WHEN CAST(strftime('%H', stop_time) AS INTEGER) BETWEEN 0 AND 5 THEN 'Night'
    ELSE 'Day'
  END AS time_period,
  COUNT(*) AS total_stops,
  SUM(CASE WHEN stop_outcome = 'Arrest' THEN 1 ELSE 0 END) AS arrests,
  ROUND(CAST(SUM(CASE WHEN stop_outcome = 'Arrest' THEN 1 ELSE 0 END) AS REAL) / COUNT(*) * 100, 2) AS arrest_rate_pct
FROM traffic_stops
GROUP BY time_period
";

const SEARCH_OR_ARREST_VIOLATIONS: &str = r"
SELECT violation, COUNT(*) AS count
FROM traffic_stops
WHERE (search_type IS NOT NULL AND search_type != '') OR stop_outcome = 'Arrest'
GROUP BY violation
ORDER BY count DESC
";

const UNDER_25_VIOLATIONS: &str = r"
SELECT violation, COUNT(*) AS count
FROM traffic_stops
WHERE driver_age < 25
GROUP BY violation
ORDER BY count DESC
";

const RARELY_SEARCHED_VIOLATION: &str = r"
SELECT violation,
  COUNT(*) AS total_stops,
  SUM(CASE WHEN (search_type IS NOT NULL AND search_type != '') OR stop_outcome = 'Arrest' THEN 1 ELSE 0 END) AS searched_or_arrested,
  ROUND(CAST(SUM(CASE WHEN (search_type IS NOT NULL AND search_type != '') OR stop_outcome = 'Arrest' THEN 1 ELSE 0 END) AS REAL) / COUNT(*) * 100, 2) AS pct
FROM traffic_stops
GROUP BY violation
ORDER BY pct ASC
LIMIT 1
";

const DRUG_STOP_RATE_BY_COUNTRY: &str = r"
SELECT country_name,
  COUNT(*) AS total_stops,
  SUM(CASE WHEN drugs_related_stop = 1 THEN 1 ELSE 0 END) AS drug_stops,
  ROUND(CAST(SUM(CASE WHEN drugs_related_stop = 1 THEN 1 ELSE 0 END) AS REAL) / COUNT(*) * 100, 2) AS pct
FROM traffic_stops
GROUP BY country_name
ORDER BY pct DESC
";

const ARREST_RATE_BY_COUNTRY_VIOLATION: &str = r"
SELECT country_name, violation,
  COUNT(*) AS total_stops,
  SUM(CASE WHEN stop_outcome = 'Arrest' THEN 1 ELSE 0 END) AS arrests,
  ROUND(CAST(SUM(CASE WHEN stop_outcome = 'Arrest' THEN 1 ELSE 0 END) AS REAL) / COUNT(*) * 100, 2) AS arrest_rate_pct
FROM traffic_stops
GROUP BY country_name, violation
ORDER BY arrest_rate_pct DESC
";

const MOST_SEARCHED_COUNTRY: &str = r"
SELECT country_name, COUNT(*) AS search_count
FROM traffic_stops
WHERE search_type IS NOT NULL AND search_type != ''
GROUP BY country_name
ORDER BY search_count DESC
LIMIT 1
";

const YEARLY_STOPS_BY_COUNTRY: &str = r"
SELECT CAST(strftime('%Y', stop_date) AS INTEGER) AS year, country_name,
  COUNT(*) AS total_stops,
  SUM(CASE WHEN stop_outcome = 'Arrest' THEN 1 ELSE 0 END) AS arrests
FROM traffic_stops
GROUP BY year, country_name
ORDER BY year, country_name
";

const VIOLATION_TRENDS_BY_AGE_RACE: &str = r"
SELECT driver_race,
  CASE
    WHEN driver_age < 18 THEN 'Under 18'
    WHEN driver_age BETWEEN 18 AND 25 THEN '18-25'
    WHEN driver_age BETWEEN 26 AND 40 THEN '26-40'
    WHEN driver_age BETWEEN 41 AND 60 THEN '41-60'
    ELSE '60+'
  END AS age_group,
  violation,
  COUNT(*) AS stop_count
FROM traffic_stops
GROUP BY driver_race, age_group, violation
ORDER BY stop_count DESC
";

const STOPS_BY_YEAR_MONTH_HOUR: &str = r"
SELECT
  CAST(strftime('%Y', stop_date) AS INTEGER) AS year,
  CAST(strftime('%m', stop_date) AS INTEGER) AS month,
  CAST(strftime('%H', stop_time) AS INTEGER) AS hour,
  COUNT(*) AS stop_count
FROM traffic_stops
GROUP BY year, month, hour
ORDER BY year, month, hour
";

const HIGH_SEARCH_ARREST_VIOLATIONS: &str = r"
SELECT violation,
  COUNT(*) AS total_stops,
  SUM(CASE WHEN search_type IS NOT NULL AND search_type != 'No Search' THEN 1 ELSE 0 END) AS searches,
  SUM(CASE WHEN stop_outcome = 'Arrest' THEN 1 ELSE 0 END) AS arrests,
  ROUND(CAST(SUM(CASE WHEN search_type IS NOT NULL AND search_type != 'No Search' THEN 1 ELSE 0 END) AS REAL) / COUNT(*) * 100, 2) AS search_rate_pct,
  ROUND(CAST(SUM(CASE WHEN stop_outcome = 'Arrest' THEN 1 ELSE 0 END) AS REAL) / COUNT(*) * 100, 2) AS arrest_rate_pct
FROM traffic_stops
GROUP BY violation
ORDER BY arrest_rate_pct DESC, search_rate_pct DESC
";

const DEMOGRAPHICS_BY_COUNTRY: &str = r"
SELECT country_name, driver_gender, driver_race,
  CASE
    WHEN driver_age < 18 THEN 'Under 18'
    WHEN driver_age BETWEEN 18 AND 25 THEN '18-25'
    WHEN driver_age BETWEEN 26 AND 40 THEN '26-40'
    WHEN driver_age BETWEEN 41 AND 60 THEN '41-60'
    ELSE '60+'
  END AS age_group,
  COUNT(*) AS stop_count
FROM traffic_stops
GROUP BY country_name, driver_gender, driver_race, age_group
ORDER BY country_name, driver_gender, driver_race, age_group
";

const TOP_ARREST_RATE_VIOLATIONS: &str = r"
SELECT violation,
  COUNT(*) AS total_stops,
  SUM(CASE WHEN stop_outcome = 'Arrest' THEN 1 ELSE 0 END) AS arrests,
  ROUND(CAST(SUM(CASE WHEN stop_outcome = 'Arrest' THEN 1 ELSE 0 END) AS REAL) / COUNT(*) * 100, 2) AS arrest_rate_pct
FROM traffic_stops
GROUP BY violation
ORDER BY arrest_rate_pct DESC
LIMIT 5
";

/// Label of the page that charts the three overview aggregations together.
pub const OVERVIEW_LABEL: &str = "Violations & Gender & Drug Overview";

/// One entry of the analysis catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Analysis {
    /// Stops per violation.
    ViolationCounts,
    /// Stops per driver gender.
    GenderDistribution,
    /// Stops per (country, drug flag).
    DrugStopsByCountry,
    /// Top 10 vehicles by drug-related stops.
    TopDrugVehicles,
    /// Top 10 vehicles by searches (sentinel excluded).
    MostSearchedVehicles,
    /// Arrests per age bucket.
    ArrestsByAgeGroup,
    /// Stops per (country, gender).
    GenderByCountry,
    /// The (race, gender) pair searched most (sentinel excluded).
    RaceGenderTopSearch,
    /// Stops per hour of day.
    StopsByHour,
    /// Stops per (violation, duration bucket).
    DurationByViolation,
    /// Stops, arrests and arrest rate for night vs day.
    NightArrests,
    /// Violations with a non-empty search or an arrest.
    SearchOrArrestViolations,
    /// Violations among drivers under 25.
    UnderTwentyFiveViolations,
    /// The violation least often searched or arrested.
    RarelySearchedViolation,
    /// Drug-related stop rate per country.
    DrugStopRateByCountry,
    /// Arrest rate per (country, violation).
    ArrestRateByCountryViolation,
    /// The country with most non-empty searches.
    MostSearchedCountry,
    /// Stops and arrests per (year, country).
    YearlyStopsByCountry,
    /// Stops per (race, age bucket, violation).
    ViolationTrendsByAgeRace,
    /// Stops per (year, month, hour).
    StopsByYearMonthHour,
    /// Search and arrest rates per violation.
    HighSearchArrestViolations,
    /// Stops per (country, gender, race, age bucket).
    DemographicsByCountry,
    /// Top 5 violations by arrest rate.
    TopArrestRateViolations,
}

impl Analysis {
    /// Every catalog entry in menu order.
    pub const ALL: [Self; 23] = [
        Self::ViolationCounts,
        Self::GenderDistribution,
        Self::DrugStopsByCountry,
        Self::TopDrugVehicles,
        Self::MostSearchedVehicles,
        Self::ArrestsByAgeGroup,
        Self::GenderByCountry,
        Self::RaceGenderTopSearch,
        Self::StopsByHour,
        Self::DurationByViolation,
        Self::NightArrests,
        Self::SearchOrArrestViolations,
        Self::UnderTwentyFiveViolations,
        Self::RarelySearchedViolation,
        Self::DrugStopRateByCountry,
        Self::ArrestRateByCountryViolation,
        Self::MostSearchedCountry,
        Self::YearlyStopsByCountry,
        Self::ViolationTrendsByAgeRace,
        Self::StopsByYearMonthHour,
        Self::HighSearchArrestViolations,
        Self::DemographicsByCountry,
        Self::TopArrestRateViolations,
    ];

    /// The entries charted on the overview page.
    pub const OVERVIEW: [Self; 3] = [
        Self::ViolationCounts,
        Self::GenderDistribution,
        Self::DrugStopsByCountry,
    ];

    /// Human-readable catalog label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ViolationCounts => "Violation Counts",
            Self::GenderDistribution => "Driver Gender Distribution",
            Self::DrugStopsByCountry => "Drug-Related vs Non-Drug-Related Stops by Country",
            Self::TopDrugVehicles => "Top 10 Vehicles in Drug-Related Stops",
            Self::MostSearchedVehicles => "Most Frequently Searched Vehicles",
            Self::ArrestsByAgeGroup => "Driver Age Group with Highest Arrest Rate",
            Self::GenderByCountry => "Gender Distribution by Country",
            Self::RaceGenderTopSearch => "Race & Gender with Highest Search Rate",
            Self::StopsByHour => "Time of Day with Most Stops",
            Self::DurationByViolation => "Average Stop Duration by Violation",
            Self::NightArrests => "Are Night Stops More Likely to Lead to Arrests?",
            Self::SearchOrArrestViolations => "Violations Associated with Searches or Arrests",
            Self::UnderTwentyFiveViolations => "Most Common Violations for Drivers Under 25",
            Self::RarelySearchedViolation => "Violation Rarely Resulting in Search or Arrest",
            Self::DrugStopRateByCountry => "Countries with Highest Drug-Related Stop Rates",
            Self::ArrestRateByCountryViolation => "Arrest Rate by Country & Violation",
            Self::MostSearchedCountry => "Country with Most Searches Conducted",
            Self::YearlyStopsByCountry => "Yearly Breakdown of Stops & Arrests by Country",
            Self::ViolationTrendsByAgeRace => "Driver Violation Trends by Age & Race",
            Self::StopsByYearMonthHour => "Stops by Year, Month, Hour",
            Self::HighSearchArrestViolations => "Violations with High Search & Arrest Rates",
            Self::DemographicsByCountry => "Driver Demographics by Country",
            Self::TopArrestRateViolations => "Top 5 Violations with Highest Arrest Rates",
        }
    }

    /// Short command-line name.
    #[must_use]
    pub fn slug(self) -> &'static str {
        match self {
            Self::ViolationCounts => "violation-counts",
            Self::GenderDistribution => "gender-distribution",
            Self::DrugStopsByCountry => "drug-stops-by-country",
            Self::TopDrugVehicles => "top-drug-vehicles",
            Self::MostSearchedVehicles => "most-searched-vehicles",
            Self::ArrestsByAgeGroup => "arrests-by-age-group",
            Self::GenderByCountry => "gender-by-country",
            Self::RaceGenderTopSearch => "race-gender-top-search",
            Self::StopsByHour => "stops-by-hour",
            Self::DurationByViolation => "duration-by-violation",
            Self::NightArrests => "night-arrests",
            Self::SearchOrArrestViolations => "search-or-arrest-violations",
            Self::UnderTwentyFiveViolations => "under-25-violations",
            Self::RarelySearchedViolation => "rarely-searched-violation",
            Self::DrugStopRateByCountry => "drug-stop-rate-by-country",
            Self::ArrestRateByCountryViolation => "arrest-rate-by-country-violation",
            Self::MostSearchedCountry => "most-searched-country",
            Self::YearlyStopsByCountry => "yearly-stops-by-country",
            Self::ViolationTrendsByAgeRace => "violation-trends-by-age-race",
            Self::StopsByYearMonthHour => "stops-by-year-month-hour",
            Self::HighSearchArrestViolations => "high-search-arrest-violations",
            Self::DemographicsByCountry => "demographics-by-country",
            Self::TopArrestRateViolations => "top-arrest-rate-violations",
        }
    }

    /// The aggregation template.
    #[must_use]
    pub fn sql(self) -> &'static str {
        match self {
            Self::ViolationCounts => VIOLATION_COUNTS,
            Self::GenderDistribution => GENDER_DISTRIBUTION,
            Self::DrugStopsByCountry => DRUG_STOPS_BY_COUNTRY,
            Self::TopDrugVehicles => TOP_DRUG_VEHICLES,
            Self::MostSearchedVehicles => MOST_SEARCHED_VEHICLES,
            Self::ArrestsByAgeGroup => ARRESTS_BY_AGE_GROUP,
            Self::GenderByCountry => GENDER_BY_COUNTRY,
            Self::RaceGenderTopSearch => RACE_GENDER_TOP_SEARCH,
            Self::StopsByHour => STOPS_BY_HOUR,
            Self::DurationByViolation => DURATION_BY_VIOLATION,
            Self::NightArrests => NIGHT_ARRESTS,
            Self::SearchOrArrestViolations => SEARCH_OR_ARREST_VIOLATIONS,
            Self::UnderTwentyFiveViolations => UNDER_25_VIOLATIONS,
            Self::RarelySearchedViolation => RARELY_SEARCHED_VIOLATION,
            Self::DrugStopRateByCountry => DRUG_STOP_RATE_BY_COUNTRY,
            Self::ArrestRateByCountryViolation => ARREST_RATE_BY_COUNTRY_VIOLATION,
            Self::MostSearchedCountry => MOST_SEARCHED_COUNTRY,
            Self::YearlyStopsByCountry => YEARLY_STOPS_BY_COUNTRY,
            Self::ViolationTrendsByAgeRace => VIOLATION_TRENDS_BY_AGE_RACE,
            Self::StopsByYearMonthHour => STOPS_BY_YEAR_MONTH_HOUR,
            Self::HighSearchArrestViolations => HIGH_SEARCH_ARREST_VIOLATIONS,
            Self::DemographicsByCountry => DEMOGRAPHICS_BY_COUNTRY,
            Self::TopArrestRateViolations => TOP_ARREST_RATE_VIOLATIONS,
        }
    }

    /// The template as a runnable query.
    #[must_use]
    pub fn query(self) -> Query {
        Query::new(self.sql())
    }

    /// Row cap of ranking entries.
    #[must_use]
    pub fn limit(self) -> Option<usize> {
        match self {
            Self::TopDrugVehicles | Self::MostSearchedVehicles => Some(10),
            Self::TopArrestRateViolations => Some(5),
            Self::RaceGenderTopSearch
            | Self::RarelySearchedViolation
            | Self::MostSearchedCountry => Some(1),
            _ => None,
        }
    }

    /// How the overview page charts this entry, if it does.
    #[must_use]
    pub fn chart(self) -> Option<ChartSpec> {
        match self {
            Self::ViolationCounts => Some(ChartSpec {
                kind: ChartKind::Bar,
                title: "Violation Types",
                label_column: "violation",
                group_column: None,
                value_column: "count",
            }),
            Self::GenderDistribution => Some(ChartSpec {
                kind: ChartKind::Pie,
                title: "Driver Gender",
                label_column: "gender",
                group_column: None,
                value_column: "count",
            }),
            Self::DrugStopsByCountry => Some(ChartSpec {
                kind: ChartKind::GroupedBar,
                title: "Drug-Related vs Non-Drug-Related Stops by Country",
                label_column: "country_name",
                group_column: Some("drugs_related"),
                value_column: "count",
            }),
            _ => None,
        }
    }
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Analysis {
    type Err = Error;

    /// Accepts a label or a slug, ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|a| a.label().eq_ignore_ascii_case(wanted) || a.slug().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::UnknownAnalysis(s.to_string()))
    }
}
