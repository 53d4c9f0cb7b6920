//! End-to-end tests for SolarCast live under `tests/`.
//!
//! They drive `ChatPipeline` with the real HTTP clients against wiremock
//! stand-ins for Ollama and the prediction service.
