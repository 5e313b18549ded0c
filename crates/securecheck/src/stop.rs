//! The traffic stop record and its enumerated attributes.
//!
//! A stop is only ever created through [`NewStop`]; the dashboard never
//! updates or deletes rows. The bucketing helpers here mirror the CASE
//! expressions used by the analysis catalog so both can be tested against
//! the same boundaries.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Value stored in `search_type` when no search took place.
pub const NO_SEARCH: &str = "No Search";

/// Youngest driver age accepted by the input form.
pub const MIN_DRIVER_AGE: i64 = 16;

/// Oldest driver age accepted by the input form.
pub const MAX_DRIVER_AGE: i64 = 100;

/// Driver gender code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// `M`
    #[serde(rename = "M")]
    Male,
    /// `F`
    #[serde(rename = "F")]
    Female,
}

impl Gender {
    /// The single-letter code stored in `driver_gender`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
        }
    }

    /// Adjective used in the stop summary.
    #[must_use]
    pub fn adjective(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "M" | "MALE" => Ok(Self::Male),
            "F" | "FEMALE" => Ok(Self::Female),
            _ => Err(Error::invalid_input("driver_gender", format!("expected M or F, got '{s}'"))),
        }
    }
}

/// Outcome of a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StopOutcome {
    /// A citation was issued.
    Citation,
    /// A warning was given.
    Warning,
    /// The driver was arrested.
    Arrest,
}

impl StopOutcome {
    /// The value stored in `stop_outcome`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Citation => "Citation",
            Self::Warning => "Warning",
            Self::Arrest => "Arrest",
        }
    }
}

impl fmt::Display for StopOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StopOutcome {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "citation" => Ok(Self::Citation),
            "warning" => Ok(Self::Warning),
            "arrest" => Ok(Self::Arrest),
            _ => Err(Error::invalid_input(
                "stop_outcome",
                format!("expected Citation, Warning or Arrest, got '{s}'"),
            )),
        }
    }
}

/// Bucketed length of a stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StopDuration {
    /// `0-5 Min`
    #[serde(rename = "0-5 Min")]
    UpTo5,
    /// `6-15 Min`
    #[serde(rename = "6-15 Min")]
    UpTo15,
    /// `16-30 Min`
    #[serde(rename = "16-30 Min")]
    UpTo30,
    /// `30+ Min`
    #[serde(rename = "30+ Min")]
    Over30,
}

impl StopDuration {
    /// All buckets in ascending order.
    pub const ALL: [Self; 4] = [Self::UpTo5, Self::UpTo15, Self::UpTo30, Self::Over30];

    /// The value stored in `stop_duration`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UpTo5 => "0-5 Min",
            Self::UpTo15 => "6-15 Min",
            Self::UpTo30 => "16-30 Min",
            Self::Over30 => "30+ Min",
        }
    }
}

impl fmt::Display for StopDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StopDuration {
    type Err = Error;

    /// Accepts the stored form (`"6-15 Min"`) or just the range (`"6-15"`).
    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| {
                let stored = d.as_str();
                stored.eq_ignore_ascii_case(wanted)
                    || stored.trim_end_matches(" Min").eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| {
                Error::invalid_input(
                    "stop_duration",
                    format!("expected one of 0-5, 6-15, 16-30, 30+, got '{s}'"),
                )
            })
    }
}

/// Named driver age range used for grouping.
///
/// Bounds are inclusive on both ends; anything past 60 lands in `60+`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeBucket {
    /// `Under 18`
    Under18,
    /// `18-25`
    From18To25,
    /// `26-40`
    From26To40,
    /// `41-60`
    From41To60,
    /// `60+`
    Over60,
}

impl AgeBucket {
    /// Classify a driver age.
    #[must_use]
    pub fn from_age(age: i64) -> Self {
        match age {
            a if a < 18 => Self::Under18,
            18..=25 => Self::From18To25,
            26..=40 => Self::From26To40,
            41..=60 => Self::From41To60,
            _ => Self::Over60,
        }
    }

    /// The label produced by the catalog's `age_group` column.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Under18 => "Under 18",
            Self::From18To25 => "18-25",
            Self::From26To40 => "26-40",
            Self::From41To60 => "41-60",
            Self::Over60 => "60+",
        }
    }
}

impl fmt::Display for AgeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Night or day, by hour of the stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimePeriod {
    /// Hours 20-23 and 0-5.
    Night,
    /// Hours 6-19.
    Day,
}

impl TimePeriod {
    /// Classify an hour of day (0-23).
    #[must_use]
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            20..=23 | 0..=5 => Self::Night,
            _ => Self::Day,
        }
    }

    /// The label produced by the catalog's `time_period` column.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Night => "Night",
            Self::Day => "Day",
        }
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A stop record collected by the Add Logs form, before insertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStop {
    /// Vehicle identifier.
    pub vehicle_number: String,
    /// Driver age in years.
    pub driver_age: i64,
    /// Driver gender.
    pub driver_gender: Gender,
    /// Driver race, free text.
    pub driver_race: String,
    /// Violation category, free text.
    pub violation: String,
    /// Country name.
    pub country_name: String,
    /// Calendar date of the stop.
    pub stop_date: NaiveDate,
    /// Time of day of the stop.
    pub stop_time: NaiveTime,
    /// Search type as typed; blank means no search.
    pub search_type: String,
    /// How the stop ended.
    pub stop_outcome: StopOutcome,
    /// How long the stop lasted.
    pub stop_duration: StopDuration,
    /// Whether the stop was drug related.
    pub drugs_related_stop: bool,
}

impl NewStop {
    /// The value to store in `search_type`.
    ///
    /// Blank or whitespace-only input becomes [`NO_SEARCH`]; anything else is
    /// kept verbatim.
    #[must_use]
    pub fn normalized_search_type(&self) -> &str {
        if self.search_type.trim().is_empty() {
            NO_SEARCH
        } else {
            &self.search_type
        }
    }

    /// Whether a search was performed, judged on the normalized value.
    #[must_use]
    pub fn search_conducted(&self) -> bool {
        self.normalized_search_type() != NO_SEARCH
    }

    /// `stop_time` formatted for storage.
    #[must_use]
    pub fn stop_time_text(&self) -> String {
        self.stop_time.format("%H:%M:%S").to_string()
    }

    /// `stop_date` formatted for storage.
    #[must_use]
    pub fn stop_date_text(&self) -> String {
        self.stop_date.format("%Y-%m-%d").to_string()
    }

    /// Input-layer checks: age range and required text fields.
    ///
    /// The store enforces none of these.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] naming the first rejected field.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_DRIVER_AGE..=MAX_DRIVER_AGE).contains(&self.driver_age) {
            return Err(Error::invalid_input(
                "driver_age",
                format!(
                    "{} is outside {MIN_DRIVER_AGE}..={MAX_DRIVER_AGE}",
                    self.driver_age
                ),
            ));
        }

        let required = [
            ("vehicle_number", &self.vehicle_number),
            ("driver_race", &self.driver_race),
            ("violation", &self.violation),
            ("country_name", &self.country_name),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(Error::invalid_input(field, "must not be blank"));
            }
        }

        Ok(())
    }

    /// Natural-language description of the stop, shown after insertion.
    ///
    /// The search clause follows [`NewStop::search_conducted`], so a typed
    /// `"No Search"` reads as no search. Earlier releases of the dashboard
    /// reported any non-blank text as a search; this one deliberately does not.
    #[must_use]
    pub fn summary(&self) -> String {
        let readable_time = self.stop_time.format("%-I:%M %p");
        let search_statement = if self.search_conducted() {
            "A search was conducted"
        } else {
            "No search was conducted"
        };
        let drug_statement = if self.drugs_related_stop {
            "drug-related."
        } else {
            "not drug-related."
        };

        format!(
            "A {}-year-old {} {} driver was stopped for {} at {}. {}, and they received a {}. \
             The stop lasted {} and was {}",
            self.driver_age,
            self.driver_gender.adjective(),
            self.driver_race,
            self.violation,
            readable_time,
            search_statement,
            self.stop_outcome.as_str().to_lowercase(),
            self.stop_duration,
            drug_statement,
        )
    }
}
