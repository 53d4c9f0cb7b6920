//! Forecast-horizon interpreter for SolarCast.
//!
//! Decides whether a chat message asks for a forecast, how far ahead it asks
//! for (as a `Duration` and a count of 15-minute intervals), and renders the
//! forecaster's per-interval values into a reply.
//!
//! Everything here is synchronous and pure; regexes and number-word tables
//! are compiled once per process.

pub mod error;
pub mod intent;
pub mod lexicon;
pub mod parser;
pub mod report;

pub use error::{ReportError, ReportResult};
pub use intent::{Intent, classify, is_forecast_request};
pub use lexicon::resolve_quantity;
pub use parser::{DurationMatch, ParseRule, normalize, parse_duration, parse_with_rule};
pub use report::{CLARIFICATION, NOT_AVAILABLE, format_report, try_format};
