//! Forecast intent detection.
//!
//! A message is a forecast request when it mentions one of a few keywords.
//! Everything else is routed to the general chat path.

use sc_protocol::Duration;

use crate::parser;

const FORECAST_KEYWORDS: &[&str] = &["prediction", "predict", "forecast"];

/// What the pipeline should do with a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Forecast request; `horizon` is `None` when no duration could be read.
    Forecast { horizon: Option<Duration> },
    /// Anything else goes to the language model.
    Chat,
}

/// Case-insensitive keyword containment test.
pub fn is_forecast_request(text: &str) -> bool {
    let lower = text.to_lowercase();
    matches_any(&lower, FORECAST_KEYWORDS)
}

/// Detect intent, parsing the horizon only for forecast requests.
pub fn classify(text: &str) -> Intent {
    if is_forecast_request(text) {
        Intent::Forecast {
            horizon: parser::parse_duration(text),
        }
    } else {
        Intent::Chat
    }
}

fn matches_any(text: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| text.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_each_keyword() {
        assert!(is_forecast_request("give me a prediction"));
        assert!(is_forecast_request("can you predict tomorrow"));
        assert!(is_forecast_request("forecast please"));
    }

    #[test]
    fn case_insensitive() {
        assert!(is_forecast_request("FORECAST for the next hour"));
        assert!(is_forecast_request("Prediction?"));
    }

    #[test]
    fn substring_match_inside_words() {
        assert!(is_forecast_request("forecasting is fun"));
        assert!(is_forecast_request("unpredictable weather"));
    }

    #[test]
    fn plain_chat_is_not_forecast() {
        assert!(!is_forecast_request("how do solar panels work?"));
        assert!(!is_forecast_request(""));
        assert!(!is_forecast_request("pre dict"));
    }

    #[test]
    fn classify_forecast_with_horizon() {
        assert_eq!(
            classify("forecast for the next hour"),
            Intent::Forecast {
                horizon: Some(Duration::from_hours(1))
            }
        );
    }

    #[test]
    fn classify_forecast_without_horizon() {
        assert_eq!(
            classify("give me a prediction"),
            Intent::Forecast { horizon: None }
        );
    }

    #[test]
    fn classify_chat_skips_parsing() {
        // Has a duration but no keyword.
        assert_eq!(classify("what happens in 2 hours?"), Intent::Chat);
    }
}
