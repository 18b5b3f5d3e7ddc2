/// Integration tests with a mocked enrichment provider
/// Tests the two-stage enrichment workflow and the HTTP surface without hitting the real service
use axum::body::Body;
use axum::http::{Request, StatusCode};
use rust_impact_api::config::{ApiKeySource, Config, EnrichmentMode, PollPolicy};
use rust_impact_api::enrichment::EnrichmentClient;
use rust_impact_api::errors::{AppError, Stage};
use rust_impact_api::handlers::{router, AppState};
use rust_impact_api::impact::{Enricher, ImpactService};
use rust_impact_api::mock_enricher::MockEnricher;
use rust_impact_api::models::{CompanySize, Field};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REVERSE: &str = "/contact/reverse/email/bulk";
const ENRICH: &str = "/contact/enrich/bulk";

/// Helper function to create a client pointed at the mock server
fn create_test_client(base_url: String, max_attempts: u32) -> EnrichmentClient {
    EnrichmentClient::with_settings(
        base_url,
        ApiKeySource::Fixed("test-key".to_string()),
        PollPolicy {
            max_attempts,
            interval: Duration::from_millis(1),
        },
    )
    .unwrap()
}

fn reverse_lookup_contact() -> serde_json::Value {
    serde_json::json!({
        "id": "rev-1",
        "status": "FINISHED",
        "datas": [{
            "contact": {
                "profile": {
                    "full_name": "Jane Roe",
                    "linkedin_url": "linkedin.com/in/janeroe/",
                    "position": {
                        "title": "VP of Engineering",
                        "start_at": {"month": 3, "year": 2024},
                        "company": {
                            "name": "Acme Corp",
                            "domain": "acme.com",
                            "industry": "Software",
                            "headcount": 250,
                            "headquarters": {"city": "Austin", "country": "United States"}
                        }
                    }
                },
                "emails": [{"email": "jane@acme.com"}]
            }
        }]
    })
}

async fn mount_submit(server: &MockServer, route: &str, id: &str) {
    Mock::given(method("POST"))
        .and(path(route))
        .and(header("Authorization", "Bearer test-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "enrichment_id": id })),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_two_stage_enrichment_polls_until_finished_and_merges() {
    let mock_server = MockServer::start().await;

    mount_submit(&mock_server, REVERSE, "rev-1").await;

    // First poll is still running, the next one finishes
    Mock::given(method("GET"))
        .and(path(format!("{}/rev-1", REVERSE)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"id": "rev-1", "status": "IN_PROGRESS"})),
        )
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{}/rev-1", REVERSE)))
        .respond_with(ResponseTemplate::new(200).set_body_json(reverse_lookup_contact()))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Stage 2 must be keyed on the normalized LinkedIn URL from stage 1
    Mock::given(method("POST"))
        .and(path(ENRICH))
        .and(body_partial_json(serde_json::json!({
            "datas": [{"linkedin_url": "https://www.linkedin.com/in/janeroe"}]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "enrichment_id": "enr-1" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{}/enr-1", ENRICH)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "enr-1",
            "status": "FINISHED",
            "datas": [{
                "contact": {
                    "profile": {
                        "full_name": "Jane Q. Roe",
                        "location": "Austin, TX"
                    },
                    "emails": ["Jane@Acme.com", "jane.roe@acme.com"],
                    "personal_emails": [{"email": "jane.roe@gmail.com"}],
                    "phones": [{"number": "+1 512 555 0100"}]
                }
            }]
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(mock_server.uri(), 5);
    let profile = client.enrich_email("jane@acme.com").await.unwrap();

    // Stage 1 values win
    assert_eq!(profile.display_name(), "Jane Roe");
    assert_eq!(profile.display_role(), "VP of Engineering");
    assert_eq!(profile.display_company(), "Acme Corp");
    assert_eq!(profile.display_industry(), "Software");
    assert_eq!(profile.company_size, Field::Known(CompanySize::Medium));
    assert_eq!(
        profile.linkedin_url.as_deref(),
        Some("https://www.linkedin.com/in/janeroe")
    );

    // Stage 2 fills gaps and unions contact points
    assert_eq!(profile.display_location(), "Austin, TX");
    assert_eq!(profile.work_emails, vec!["jane@acme.com", "jane.roe@acme.com"]);
    assert_eq!(profile.personal_emails, vec!["jane.roe@gmail.com"]);
    assert_eq!(profile.phones, vec!["+1 512 555 0100"]);
    assert!(!profile.is_mocked);
}

#[tokio::test]
async fn test_stage_one_http_error_aborts_with_provider_message() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(REVERSE))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(serde_json::json!({"message": "Invalid API key"})),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(ENRICH))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = create_test_client(mock_server.uri(), 5);
    let err = client.enrich_email("jane@acme.com").await.unwrap_err();

    match err {
        AppError::StageFailure { stage, message } => {
            assert_eq!(stage, Stage::ReverseLookup);
            assert_eq!(message, "Invalid API key");
        }
        other => panic!("expected stage failure, got {:?}", other),
    }
}

#[tokio::test]
async fn test_stage_one_poll_error_falls_back_to_status_message() {
    let mock_server = MockServer::start().await;

    mount_submit(&mock_server, REVERSE, "rev-1").await;

    Mock::given(method("GET"))
        .and(path(format!("{}/rev-1", REVERSE)))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream unavailable"))
        .mount(&mock_server)
        .await;

    let client = create_test_client(mock_server.uri(), 5);
    let err = client.enrich_email("jane@acme.com").await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "reverse email lookup failed: enrichment provider returned status 503"
    );
}

#[tokio::test]
async fn test_stage_two_failure_returns_stage_one_profile() {
    let mock_server = MockServer::start().await;

    mount_submit(&mock_server, REVERSE, "rev-1").await;

    Mock::given(method("GET"))
        .and(path(format!("{}/rev-1", REVERSE)))
        .respond_with(ResponseTemplate::new(200).set_body_json(reverse_lookup_contact()))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(ENRICH))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(serde_json::json!({"error": "boom"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(mock_server.uri(), 5);
    let profile = client.enrich_email("jane@acme.com").await.unwrap();

    assert_eq!(profile.display_name(), "Jane Roe");
    assert_eq!(profile.work_emails, vec!["jane@acme.com"]);
    assert_eq!(profile.location, Field::Unset);
    assert!(profile.personal_emails.is_empty());
}

#[tokio::test]
async fn test_stage_two_poll_error_returns_stage_one_profile() {
    let mock_server = MockServer::start().await;

    mount_submit(&mock_server, REVERSE, "rev-1").await;

    Mock::given(method("GET"))
        .and(path(format!("{}/rev-1", REVERSE)))
        .respond_with(ResponseTemplate::new(200).set_body_json(reverse_lookup_contact()))
        .mount(&mock_server)
        .await;

    // Submit is accepted, but polling the job fails
    mount_submit(&mock_server, ENRICH, "enr-1").await;

    Mock::given(method("GET"))
        .and(path(format!("{}/enr-1", ENRICH)))
        .respond_with(
            ResponseTemplate::new(502).set_body_json(serde_json::json!({"message": "gateway down"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(mock_server.uri(), 5);
    let profile = client.enrich_email("jane@acme.com").await.unwrap();

    assert_eq!(profile.display_name(), "Jane Roe");
    assert_eq!(profile.display_role(), "VP of Engineering");
    assert_eq!(profile.work_emails, vec!["jane@acme.com"]);
    assert_eq!(profile.location, Field::Unset);
    assert!(profile.phones.is_empty());
}

#[tokio::test]
async fn test_polling_budget_exhausted_accepts_last_response() {
    let mock_server = MockServer::start().await;

    mount_submit(&mock_server, REVERSE, "rev-1").await;

    // Never reaches a terminal status: 3 budgeted polls plus the final attempt
    Mock::given(method("GET"))
        .and(path(format!("{}/rev-1", REVERSE)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "rev-1",
            "status": "IN_PROGRESS",
            "datas": [{"contact": {"emails": ["ops@acme.com"]}}]
        })))
        .expect(4)
        .mount(&mock_server)
        .await;

    let client = create_test_client(mock_server.uri(), 3);

    // No name tokens and no LinkedIn URL, so stage 2 is skipped
    let profile = client.enrich_email("42@acme.com").await.unwrap();

    assert_eq!(profile.work_emails, vec!["ops@acme.com"]);
    assert_eq!(profile.display_company(), "ACME");
    assert_eq!(profile.name, Field::Unset);
}

#[tokio::test]
async fn test_canceled_job_stops_polling() {
    let mock_server = MockServer::start().await;

    mount_submit(&mock_server, REVERSE, "rev-1").await;

    Mock::given(method("GET"))
        .and(path(format!("{}/rev-1", REVERSE)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"id": "rev-1", "status": "CANCELED"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = create_test_client(mock_server.uri(), 10);
    let profile = client.enrich_email("99@example.org").await.unwrap();

    assert_eq!(profile.display_company(), "EXAMPLE");
}

#[tokio::test]
async fn test_stage_two_uses_name_and_domain_without_linkedin() {
    let mock_server = MockServer::start().await;

    mount_submit(&mock_server, REVERSE, "rev-1").await;

    Mock::given(method("GET"))
        .and(path(format!("{}/rev-1", REVERSE)))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"id": "rev-1", "status": "FINISHED", "datas": []})),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(ENRICH))
        .and(body_partial_json(serde_json::json!({
            "datas": [{
                "firstname": "John",
                "lastname": "Doe",
                "domain": "acme.com",
                "company_name": "ACME"
            }]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "enrichment_id": "enr-1" })),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{}/enr-1", ENRICH)))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "CREDITS_INSUFFICIENT",
            "datas": []
        })))
        .mount(&mock_server)
        .await;

    let client = create_test_client(mock_server.uri(), 5);
    let profile = client.enrich_email("john.doe@acme.com").await.unwrap();

    assert_eq!(profile.display_name(), "John Doe");
    assert_eq!(profile.display_company(), "ACME");
    assert_eq!(profile.display_role(), "Professional");
    assert_eq!(profile.display_location(), "Unknown");
}

#[tokio::test]
async fn test_missing_api_key_is_configuration_error_without_requests() {
    let mock_server = MockServer::start().await;

    let client = EnrichmentClient::with_settings(
        mock_server.uri(),
        ApiKeySource::Environment("IMPACT_TEST_KEY_NEVER_SET".to_string()),
        PollPolicy::default(),
    )
    .unwrap();

    let err = client.enrich_email("jane@acme.com").await.unwrap_err();
    assert!(matches!(err, AppError::Configuration(_)));

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}

// ============ HTTP surface (mock enricher) ============

fn mock_app() -> axum::Router {
    let config = Config {
        port: 0,
        enrichment_base_url: "http://localhost".to_string(),
        enrichment_mode: EnrichmentMode::Mock,
        poll: PollPolicy::default(),
    };
    router(Arc::new(AppState {
        config,
        service: ImpactService::new(Enricher::Mock(MockEnricher)),
    }))
}

async fn post_json(path: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    let response = mock_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(path)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_reports_mode() {
    let response = mock_app()
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["enrichmentMode"], "mock");
}

#[tokio::test]
async fn test_impact_map_endpoint_returns_camel_case_map() {
    let (status, body) = post_json(
        "/api/v1/impact-map",
        serde_json::json!({
            "email": "john.doe@acme.com",
            "ageRange": "30-39",
            "maritalStatus": "married"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["person"]["name"], "John Doe");
    assert_eq!(body["person"]["company"], "ACME");
    assert_eq!(body["person"]["role"], "Professional");
    assert_eq!(body["enrichedProfile"]["isMocked"], true);
    assert_eq!(body["enrichedProfile"]["role"], "Professional");
    assert_eq!(body["enrichedProfile"]["headline"], serde_json::Value::Null);
    assert!(body["annualIncomeEstimate"].as_u64().unwrap() > 0);

    let score = body["decisioning"]["coverageConfidenceScore"].as_u64().unwrap();
    assert!(score <= 100);

    let events = body["decisioning"]["lifeEvents"].as_array().unwrap();
    assert!(events
        .iter()
        .any(|e| e["type"] == "family_formation_stage" && e["confidence"] == "high"));
}

#[tokio::test]
async fn test_enrich_endpoint_returns_profile() {
    let (status, body) = post_json(
        "/api/v1/enrich",
        serde_json::json!({"email": "maria.silva@globex.io"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Maria Silva");
    assert_eq!(body["company"], "GLOBEX");
}

#[tokio::test]
async fn test_invalid_email_is_bad_request() {
    let (status, body) = post_json(
        "/api/v1/impact-map",
        serde_json::json!({"email": "not-an-email"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("email"));

    let (status, _) = post_json("/api/v1/enrich", serde_json::json!({"email": "   "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
