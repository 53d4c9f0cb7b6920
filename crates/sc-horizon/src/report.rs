//! Render forecaster output as a chat reply.

use sc_protocol::{Duration, INTERVAL_MINUTES, PredictionSeries};

use crate::error::{ReportError, ReportResult};

/// Reply when the forecaster has nothing usable.
pub const NOT_AVAILABLE: &str = "The prediction is not available right now. Please try again later.";

/// Reply when a forecast request has no recognizable time span.
pub const CLARIFICATION: &str = "I couldn't work out how far ahead you want the forecast. \
Please say it with a time span, for example:
  - \"forecast for the next hour\"
  - \"give me a prediction for the next 2 hours\"
  - \"predict 30 minutes ahead\"
  - \"forecast in a couple of days\"";

/// Format a prediction series, rejecting empty or wrongly sized input.
///
/// Values are fixed-point with three decimals; Rust formatting always uses
/// "." as the decimal separator.
pub fn try_format(duration: Duration, series: &PredictionSeries) -> ReportResult<String> {
    if series.is_empty() {
        return Err(ReportError::Empty);
    }
    let expected = duration.intervals().get();
    if series.len() as u64 != expected {
        return Err(ReportError::LengthMismatch {
            expected,
            actual: series.len(),
        });
    }
    let Some(mean) = series.mean() else {
        return Err(ReportError::Empty);
    };

    let plural = if expected == 1 { "" } else { "s" };
    let mut out = format!(
        "Forecast for the next {} ({expected} interval{plural} of {INTERVAL_MINUTES} minutes):\n",
        duration.label()
    );
    for (i, value) in series.values().iter().enumerate() {
        out.push_str(&format!("  Interval {}: {value:.3}\n", i + 1));
    }
    out.push_str(&format!("Average: {mean:.3}"));
    Ok(out)
}

/// Total variant of [`try_format`]: any failure becomes [`NOT_AVAILABLE`].
pub fn format_report(duration: Duration, series: Option<&PredictionSeries>) -> String {
    let Some(series) = series else {
        tracing::debug!("forecaster returned no series");
        return NOT_AVAILABLE.to_string();
    };
    match try_format(duration, series) {
        Ok(text) => text,
        Err(e @ ReportError::LengthMismatch { .. }) => {
            tracing::warn!(error = %e, "discarding mismatched prediction series");
            NOT_AVAILABLE.to_string()
        }
        Err(e) => {
            tracing::debug!(error = %e, "prediction unavailable");
            NOT_AVAILABLE.to_string()
        }
    }
}
