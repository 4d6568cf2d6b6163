use anyhow::Result;
use art_valuer::core::render::{format_estimate, paragraphs, render_text};
use art_valuer::core::session::MISSING_ARTIST_MESSAGE;
use art_valuer::{GeminiValuationClient, Session, SessionState, ValuerConfig};
use httpmock::prelude::*;
use serde_json::json;

const GENERATE_PATH: &str = "/v1beta/models/test-model:generateContent";

fn config_for(base_url: String) -> ValuerConfig {
    let mut config = ValuerConfig::default();
    config.service.api_key = Some("integration-key".to_string());
    config.service.api_base_url = base_url;
    config.service.model = "test-model".to_string();
    config.service.request_timeout_secs = 5;
    config
}

fn gemini_reply(text: &str, chunks: serde_json::Value) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "groundingMetadata": { "groundingChunks": chunks }
        }]
    })
}

fn session_for(server: &MockServer) -> Result<Session<GeminiValuationClient<ValuerConfig>>> {
    let client = GeminiValuationClient::new(config_for(server.base_url()))?;
    Ok(Session::new(client))
}

#[tokio::test]
async fn test_empty_artist_makes_no_request() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(200).json_body(gemini_reply("{}", json!([])));
    });

    let mut session = session_for(&server)?;
    session.update_field("title", "Triumphs and Laments")?;

    let err = session.submit().await.unwrap_err();

    assert_eq!(err.to_string(), MISSING_ARTIST_MESSAGE);
    assert_eq!(
        session.state(),
        &SessionState::Error(MISSING_ARTIST_MESSAGE.to_string())
    );
    api_mock.assert_hits(0);
    Ok(())
}

#[tokio::test]
async fn test_well_formed_reply_renders_estimates_paragraphs_and_source() -> Result<()> {
    let server = MockServer::start();
    let text = r#"{"estimateLow": 50000, "estimateHigh": 120000, "currency": "ZAR", "analysis": "Para1\nPara2"}"#;
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path(GENERATE_PATH)
            .header("x-goog-api-key", "integration-key")
            .body_contains("William Kentridge");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(gemini_reply(
                text,
                json!([{ "web": { "title": "Strauss & Co Lot 12", "uri": "https://example.com/lot12" } }]),
            ));
    });

    let mut session = session_for(&server)?;
    session.update_field("artist", "William Kentridge")?;
    session.update_field("medium", "Charcoal on paper")?;

    let result = session.submit().await?;
    api_mock.assert();

    assert!(matches!(session.state(), SessionState::Success(_)));
    assert_eq!(format_estimate(result.estimate_low, &result.currency), "R 50 000");
    assert_eq!(format_estimate(result.estimate_high, &result.currency), "R 120 000");
    assert_eq!(paragraphs(&result.analysis), vec!["Para1", "Para2"]);
    assert_eq!(result.sources.len(), 1);
    assert_eq!(result.sources[0].uri, "https://example.com/lot12");

    let text = render_text(&result, &ValuerConfig::default().market);
    assert!(text.contains("Strauss & Co Lot 12"));
    Ok(())
}

#[tokio::test]
async fn test_zero_or_missing_estimates_render_as_unknown() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(200).json_body(gemini_reply(
            r#"{"estimateLow": 0, "analysis": "Too few comparable sales."}"#,
            json!([]),
        ));
    });

    let mut session = session_for(&server)?;
    session.update_field("artist", "Unknown Workshop")?;
    let result = session.submit().await?;

    assert_eq!(format_estimate(result.estimate_low, &result.currency), "N/A");
    assert_eq!(format_estimate(result.estimate_high, &result.currency), "N/A");
    Ok(())
}

#[tokio::test]
async fn test_invalid_citations_are_dropped() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(200).json_body(gemini_reply(
            r#"{"estimateLow": 1000, "estimateHigh": 2000}"#,
            json!([
                { "web": { "title": "No link" } },
                { "web": { "title": "Bad link", "uri": "::::" } },
                {},
                { "web": { "title": "Aspire Lot 3", "uri": "https://aspireart.net/lots/3" } }
            ]),
        ));
    });

    let mut session = session_for(&server)?;
    session.update_field("artist", "Gerard Sekoto")?;
    let result = session.submit().await?;

    assert_eq!(result.sources.len(), 1);
    assert_eq!(result.sources[0].title, "Aspire Lot 3");
    Ok(())
}

#[tokio::test]
async fn test_transport_failure_ends_in_error_state() -> Result<()> {
    // 沒有任何服務在監聽的位址
    let client = GeminiValuationClient::new(config_for("http://127.0.0.1:9".to_string()))?;
    let mut session = Session::new(client);
    session.update_field("artist", "Maggie Laubser")?;

    assert!(session.submit().await.is_err());

    assert!(session.valuation().is_none());
    assert!(!session.is_loading());
    assert!(session.error_message().is_some_and(|m| !m.is_empty()));
    Ok(())
}

#[tokio::test]
async fn test_quota_failure_surfaces_upstream_message() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(429).json_body(json!({
            "error": { "code": 429, "message": "Resource has been exhausted", "status": "RESOURCE_EXHAUSTED" }
        }));
    });

    let mut session = session_for(&server)?;
    session.update_field("artist", "Walter Battiss")?;
    assert!(session.submit().await.is_err());

    assert!(session
        .error_message()
        .is_some_and(|m| m.contains("Resource has been exhausted")));
    Ok(())
}

#[tokio::test]
async fn test_second_submit_replaces_first() -> Result<()> {
    let server = MockServer::start();
    let mut first_mock = server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(200).json_body(gemini_reply(
            r#"{"estimateLow": 100, "estimateHigh": 200, "analysis": "First"}"#,
            json!([{ "web": { "title": "Old", "uri": "https://old.example.com" } }]),
        ));
    });

    let mut session = session_for(&server)?;
    session.update_field("artist", "Alexis Preller")?;
    let first = session.submit().await?;
    first_mock.assert();
    first_mock.delete();

    let second_mock = server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(200).json_body(gemini_reply(
            r#"{"estimateLow": 300, "estimateHigh": 400, "analysis": "Second"}"#,
            json!([{ "web": { "title": "New", "uri": "https://new.example.com" } }]),
        ));
    });

    let second = session.submit().await?;
    second_mock.assert();

    assert_eq!(first.analysis, "First");
    let current = session.valuation().expect("second valuation present");
    assert_eq!(current, &second);
    assert_eq!(current.analysis, "Second");
    assert_eq!(current.sources.len(), 1);
    assert_eq!(current.sources[0].title, "New");
    assert!(current.generated_at >= first.generated_at);
    Ok(())
}

#[tokio::test]
async fn test_timed_out_request_ends_in_error_state() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(200)
            .delay(std::time::Duration::from_secs(3))
            .json_body(gemini_reply(r#"{"estimateLow": 1, "estimateHigh": 2}"#, json!([])));
    });

    let mut config = config_for(server.base_url());
    config.service.request_timeout_secs = 1;
    let mut session = Session::new(GeminiValuationClient::new(config)?);
    session.update_field("artist", "Gerard Sekoto")?;

    let err = session.submit().await.unwrap_err();

    assert!(matches!(err, art_valuer::ValuationError::Timeout { seconds: 1 }));
    assert!(matches!(session.state(), SessionState::Error(_)));
    assert!(!session.is_loading());
    assert!(session.valuation().is_none());
    assert!(session.error_message().is_some_and(|m| m.contains("1 seconds")));
    Ok(())
}
