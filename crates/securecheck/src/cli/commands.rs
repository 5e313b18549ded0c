//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands and the
//! conversions from their arguments into dashboard requests.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use clap::{Args, Subcommand, ValueEnum};

use crate::error::Result;
use crate::query::LogFilter;
use crate::stop::{Gender, NewStop, StopDuration, StopOutcome, MAX_DRIVER_AGE, MIN_DRIVER_AGE};

/// View Logs arguments.
#[derive(Debug, Args)]
pub struct LogsCommand {
    /// Substring of the vehicle number
    #[arg(long, default_value = "")]
    pub vehicle: String,

    /// Substring of the violation
    #[arg(long, default_value = "")]
    pub violation: String,

    /// Substring of the country name
    #[arg(long, default_value = "")]
    pub country: String,
}

impl From<LogsCommand> for LogFilter {
    fn from(cmd: LogsCommand) -> Self {
        Self {
            vehicle: cmd.vehicle,
            violation: cmd.violation,
            country: cmd.country,
        }
    }
}

/// Data Analytics arguments.
#[derive(Debug, Args)]
pub struct AnalyticsCommand {
    /// Catalog label, slug, or "overview". Omit to list the catalog
    pub analysis: Option<String>,

    /// List every available analysis
    #[arg(short, long)]
    pub list: bool,
}

/// Add Logs arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Vehicle number
    #[arg(long)]
    pub vehicle: String,

    /// Driver age
    #[arg(long, default_value_t = 27, value_parser = parse_age)]
    pub age: i64,

    /// Driver gender
    #[arg(long, value_enum)]
    pub gender: GenderArg,

    /// Driver race
    #[arg(long)]
    pub race: String,

    /// Violation
    #[arg(long)]
    pub violation: String,

    /// Country name
    #[arg(long)]
    pub country: String,

    /// Stop date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Stop time (HH:MM or HH:MM:SS)
    #[arg(long, default_value = "14:30", value_parser = parse_time)]
    pub time: NaiveTime,

    /// Search type; leave blank when no search took place
    #[arg(long, default_value = "")]
    pub search_type: String,

    /// Stop outcome
    #[arg(long, value_enum)]
    pub outcome: OutcomeArg,

    /// Stop duration bucket
    #[arg(long, value_enum)]
    pub duration: DurationArg,

    /// The stop was drug related
    #[arg(long)]
    pub drugs: bool,
}

impl AddCommand {
    /// Build and validate the stop record.
    ///
    /// # Errors
    ///
    /// Returns an input error if a required field is blank.
    pub fn into_stop(self) -> Result<NewStop> {
        let stop = NewStop {
            vehicle_number: self.vehicle,
            driver_age: self.age,
            driver_gender: self.gender.into(),
            driver_race: self.race,
            violation: self.violation,
            country_name: self.country,
            stop_date: self
                .date
                .unwrap_or_else(|| chrono::Local::now().date_naive()),
            stop_time: self.time,
            search_type: self.search_type,
            stop_outcome: self.outcome.into(),
            stop_duration: self.duration.into(),
            drugs_related_stop: self.drugs,
        };
        stop.validate()?;
        Ok(stop)
    }
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

/// Driver gender argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GenderArg {
    /// Male
    #[value(name = "M", alias = "m")]
    M,
    /// Female
    #[value(name = "F", alias = "f")]
    F,
}

impl From<GenderArg> for Gender {
    fn from(arg: GenderArg) -> Self {
        match arg {
            GenderArg::M => Self::Male,
            GenderArg::F => Self::Female,
        }
    }
}

/// Stop outcome argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutcomeArg {
    /// A citation was issued
    Citation,
    /// A warning was given
    Warning,
    /// The driver was arrested
    Arrest,
}

impl From<OutcomeArg> for StopOutcome {
    fn from(arg: OutcomeArg) -> Self {
        match arg {
            OutcomeArg::Citation => Self::Citation,
            OutcomeArg::Warning => Self::Warning,
            OutcomeArg::Arrest => Self::Arrest,
        }
    }
}

/// Stop duration argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DurationArg {
    /// 0-5 minutes
    #[value(name = "0-5")]
    UpTo5,
    /// 6-15 minutes
    #[value(name = "6-15")]
    UpTo15,
    /// 16-30 minutes
    #[value(name = "16-30")]
    UpTo30,
    /// More than 30 minutes
    #[value(name = "30+")]
    Over30,
}

impl From<DurationArg> for StopDuration {
    fn from(arg: DurationArg) -> Self {
        match arg {
            DurationArg::UpTo5 => Self::UpTo5,
            DurationArg::UpTo15 => Self::UpTo15,
            DurationArg::UpTo30 => Self::UpTo30,
            DurationArg::Over30 => Self::Over30,
        }
    }
}

/// Output format for pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Formatted tables and charts
    #[default]
    Table,
    /// JSON output
    Json,
}

fn parse_age(s: &str) -> std::result::Result<i64, String> {
    let age: i64 = s.parse().map_err(|_| format!("'{s}' is not a whole number"))?;
    if (MIN_DRIVER_AGE..=MAX_DRIVER_AGE).contains(&age) {
        Ok(age)
    } else {
        Err(format!("age must be between {MIN_DRIVER_AGE} and {MAX_DRIVER_AGE}"))
    }
}

fn parse_time(s: &str) -> std::result::Result<NaiveTime, String> {
    NaiveTime::parse_from_str(s, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M"))
        .map_err(|_| format!("'{s}' is not a time of day (HH:MM or HH:MM:SS)"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_command() -> AddCommand {
        AddCommand {
            vehicle: "KA01AB1234".to_string(),
            age: 27,
            gender: GenderArg::M,
            race: "Asian".to_string(),
            violation: "Speeding".to_string(),
            country: "India".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 9),
            time: NaiveTime::from_hms_opt(14, 30, 0).unwrap(),
            search_type: String::new(),
            outcome: OutcomeArg::Arrest,
            duration: DurationArg::UpTo15,
            drugs: false,
        }
    }

    #[test]
    fn test_parse_age_bounds() {
        assert_eq!(parse_age("16"), Ok(16));
        assert_eq!(parse_age("100"), Ok(100));
        assert!(parse_age("15").is_err());
        assert!(parse_age("101").is_err());
        assert!(parse_age("old").is_err());
    }

    #[test]
    fn test_parse_time_formats() {
        assert_eq!(parse_time("14:30"), Ok(NaiveTime::from_hms_opt(14, 30, 0).unwrap()));
        assert_eq!(
            parse_time("07:05:09"),
            Ok(NaiveTime::from_hms_opt(7, 5, 9).unwrap())
        );
        assert!(parse_time("25:00").is_err());
        assert!(parse_time("noon").is_err());
    }

    #[test]
    fn test_arg_conversions() {
        assert_eq!(Gender::from(GenderArg::F), Gender::Female);
        assert_eq!(StopOutcome::from(OutcomeArg::Warning), StopOutcome::Warning);
        assert_eq!(StopDuration::from(DurationArg::Over30), StopDuration::Over30);
        assert_eq!(StopDuration::from(DurationArg::UpTo15).as_str(), "6-15 Min");
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }

    #[test]
    fn test_logs_command_into_filter() {
        let filter = LogFilter::from(LogsCommand {
            vehicle: "KA".to_string(),
            violation: String::new(),
            country: "India".to_string(),
        });
        assert_eq!(filter.vehicle, "KA");
        assert!(filter.violation.is_empty());
        assert_eq!(filter.country, "India");
    }

    #[test]
    fn test_into_stop() {
        let stop = add_command().into_stop().unwrap();
        assert_eq!(stop.driver_gender, Gender::Male);
        assert_eq!(stop.stop_outcome, StopOutcome::Arrest);
        assert_eq!(stop.stop_duration, StopDuration::UpTo15);
        assert_eq!(stop.stop_date_text(), "2024-03-09");
    }

    #[test]
    fn test_into_stop_defaults_date_to_today() {
        let mut cmd = add_command();
        cmd.date = None;
        let stop = cmd.into_stop().unwrap();
        assert_eq!(stop.stop_date, chrono::Local::now().date_naive());
    }

    #[test]
    fn test_into_stop_rejects_blank_field() {
        let mut cmd = add_command();
        cmd.race = "  ".to_string();
        let err = cmd.into_stop().unwrap_err();
        assert!(err.is_input_error());
    }
}
