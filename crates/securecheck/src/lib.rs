//! `securecheck` - A police post dashboard for traffic stop logs
//!
//! This library provides the data access layer, the analysis catalog, the
//! View Logs filter, record insertion and page rendering behind the
//! `securecheck` binary.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod logging;
pub mod present;
pub mod query;
pub mod stop;
pub mod store;

pub use config::Config;
pub use dashboard::{handle, AnalysisChoice, Request};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use query::{Analysis, LogFilter, Query};
pub use stop::NewStop;
pub use store::{Store, StoreStats};
