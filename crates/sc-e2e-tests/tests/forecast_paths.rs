//! E2E tests for forecast requests: text → horizon → forecaster HTTP → report.

mod helpers;

use serde_json::json;

use helpers::TestHarness;
use sc_horizon::{CLARIFICATION, NOT_AVAILABLE};
use sc_protocol::Role;

/// "next hour" asks for four 15-minute intervals and reports them.
#[tokio::test]
async fn e2e_next_hour_report() {
    let h = TestHarness::start().await;
    h.mount_predictions(Some(vec![1.0, 1.2, 0.8, 1.5])).await;

    let turns = h.pipeline.handle("forecast for the next hour").await;
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[1].role, Role::Assistant);

    let expected = "Forecast for the next 1 hour (4 intervals of 15 minutes):\n\
                    \x20 Interval 1: 1.000\n\
                    \x20 Interval 2: 1.200\n\
                    \x20 Interval 3: 0.800\n\
                    \x20 Interval 4: 1.500\n\
                    Average: 1.125";
    assert_eq!(turns[1].text, expected);

    assert_eq!(h.forecast_requests().await, vec![json!({"intervals": 4})]);
}

/// Word quantities resolve through the lexicon: a couple of days = 192 intervals.
#[tokio::test]
async fn e2e_couple_of_days() {
    let h = TestHarness::start().await;
    h.mount_ramp(192).await;

    let turns = h.pipeline.handle("predict in a couple of days").await;
    assert!(turns[1].text.starts_with("Forecast for the next 2 days (192 intervals"));
    assert!(turns[1].text.contains("Interval 192: 192.000"));
    assert_eq!(h.forecast_requests().await, vec![json!({"intervals": 192})]);
}

/// A leading number with a unit works without a "next"/"in" phrase.
#[tokio::test]
async fn e2e_thirty_minutes() {
    let h = TestHarness::start().await;
    h.mount_predictions(Some(vec![0.5, 0.7])).await;

    let turns = h.pipeline.handle("30 minutes forecast").await;
    assert!(turns[1].text.contains("(2 intervals of 15 minutes)"));
    assert!(turns[1].text.ends_with("Average: 0.600"));
}

/// Spans that are not a multiple of 15 minutes round up.
#[tokio::test]
async fn e2e_partial_interval_rounds_up() {
    let h = TestHarness::start().await;
    h.mount_ramp(1).await;

    let turns = h.pipeline.handle("forecast 10 minutes").await;
    assert!(turns[1].text.contains("(1 interval of 15 minutes)"));
    assert_eq!(h.forecast_requests().await, vec![json!({"intervals": 1})]);
}

/// Without a readable span the user is asked to clarify and no request is made.
#[tokio::test]
async fn e2e_missing_horizon_clarifies() {
    let h = TestHarness::start().await;

    let turns = h.pipeline.handle("give me a prediction").await;
    assert_eq!(turns[1].text, CLARIFICATION);
    assert!(h.forecast_requests().await.is_empty());
    assert!(h.chat_requests().await.is_empty());
}

/// A null series from the forecaster is reported as not available.
#[tokio::test]
async fn e2e_null_predictions() {
    let h = TestHarness::start().await;
    h.mount_predictions(None).await;

    let turns = h.pipeline.handle("forecast tomorrow").await;
    assert_eq!(turns[1].role, Role::Assistant);
    assert_eq!(turns[1].text, NOT_AVAILABLE);
}

/// A series of the wrong length is never partially rendered.
#[tokio::test]
async fn e2e_wrong_length_series() {
    let h = TestHarness::start().await;
    h.mount_predictions(Some(vec![1.0, 2.0, 3.0])).await;

    let turns = h.pipeline.handle("forecast the next hour").await;
    assert_eq!(turns[1].text, NOT_AVAILABLE);
}

/// Forecast turns land in the log after the greeting seed.
#[tokio::test]
async fn e2e_forecast_is_logged() {
    let h = TestHarness::start().await;
    h.mount_ramp(96).await;

    h.pipeline.handle("forecast next day").await;

    let log = h.pipeline.log().snapshot().await;
    assert_eq!(log.len(), 4);
    assert_eq!(log[0].text, "Hi");
    assert_eq!(log[2].text, "forecast next day");
    assert!(log[3].text.contains("(96 intervals of 15 minutes)"));
}

/// A unit glued to the number after "next" keeps the number.
#[tokio::test]
async fn e2e_next_with_glued_unit() {
    let h = TestHarness::start().await;
    h.mount_ramp(8).await;

    let turns = h.pipeline.handle("forecast the next 2hours").await;
    assert!(turns[1].text.starts_with("Forecast for the next 2 hours (8 intervals"));
    assert_eq!(h.forecast_requests().await, vec![json!({"intervals": 8})]);
}
