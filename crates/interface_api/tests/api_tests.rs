//! HTTP API Tests
//!
//! Drives the router in-process with `tower::ServiceExt::oneshot`.
//!
//! # Test Organization
//!
//! - `catalog_tests` - policy types, provider listings, comparison
//! - `session_tests` - session lifecycle and raw actions
//! - `purchase_tests` - quote, OTP, dependents and submission end to end

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use interface_api::{config::ApiConfig, create_router, AppState};
use core_kernel::Money;
use test_utils::{assert_money_eq, CatalogFixtures, FormFixtures, MoneyFixtures};

fn test_config() -> ApiConfig {
    ApiConfig {
        quote_latency_ms: 0,
        otp_latency_ms: 0,
        ..ApiConfig::default()
    }
}

fn app() -> Router {
    app_with(test_config())
}

fn app_with(config: ApiConfig) -> Router {
    let state = AppState::new(CatalogFixtures::owned_catalog(), config).unwrap();
    create_router(state)
}

/// Real delays, for use with paused time
fn delayed_app() -> Router {
    app_with(ApiConfig {
        quote_latency_ms: 500,
        otp_latency_ms: 1000,
        ..ApiConfig::default()
    })
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn money(value: &Value) -> Money {
    serde_json::from_value(value.clone()).unwrap()
}

async fn new_session(app: &Router, policy_type: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/sessions",
        Some(json!({"policy_type": policy_type})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

mod catalog_tests {
    use super::*;

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["active_sessions"], 0);
    }

    #[tokio::test]
    async fn test_list_policy_types() {
        let (status, body) = send(&app(), Method::GET, "/api/v1/policy-types", None).await;
        assert_eq!(status, StatusCode::OK);
        let codes: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|t| t["code"].as_str().unwrap())
            .collect();
        assert!(codes.contains(&"health"));
        assert!(codes.contains(&"car"));
    }

    #[tokio::test]
    async fn test_providers_sorted_by_premium() {
        let (status, body) = send(
            &app(),
            Method::GET,
            "/api/v1/policy-types/health/providers?sort=premium_asc",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let ids: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["star-health", "care-health", "hdfc-ergo-health"]);
    }

    #[tokio::test]
    async fn test_unknown_policy_type_is_404() {
        let (status, body) =
            send(&app(), Method::GET, "/api/v1/policy-types/pet/providers", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
    }

    #[tokio::test]
    async fn test_compare_rejects_four_providers() {
        let (status, _) = send(
            &app(),
            Method::POST,
            "/api/v1/providers/compare",
            Some(json!({"provider_ids": ["care-health", "star-health", "hdfc-ergo-health", "acko-bike"]})),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_compare_two_providers() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/api/v1/providers/compare",
            Some(json!({"provider_ids": ["care-health", "star-health"]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["providers"].as_array().unwrap().len(), 2);
        assert_eq!(body["cheapest"], "star-health");
    }
}

mod session_tests {
    use super::*;

    #[tokio::test]
    async fn test_create_and_fetch_session() {
        let app = app();
        let id = new_session(&app, "health").await;

        let (status, body) = send(&app, Method::GET, &format!("/api/v1/sessions/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"]["policy_type"], "health");
        assert_eq!(body["state"]["current_step"], 1);
        assert_eq!(body["state"]["total_steps"], 4);
    }

    #[tokio::test]
    async fn test_unknown_policy_type_rejected_on_create() {
        let (status, _) = send(
            &app(),
            Method::POST,
            "/api/v1/sessions",
            Some(json!({"policy_type": "spaceship"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_raw_actions_merge_form_data() {
        let app = app();
        let id = new_session(&app, "car").await;
        let uri = format!("/api/v1/sessions/{}/actions", id);

        send(
            &app,
            Method::POST,
            &uri,
            Some(json!({"type": "UPDATE_FORM_DATA", "payload": {"fields": {"mobile": "9876543210"}}})),
        )
        .await;
        let (status, body) = send(
            &app,
            Method::POST,
            &uri,
            Some(json!({"type": "UPDATE_FORM_DATA", "payload": {"fields": {"email": "a@b.com"}}})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["outcome"], "applied");
        assert_eq!(body["state"]["form_data"]["fields"]["mobile"], "9876543210");
        assert_eq!(body["state"]["form_data"]["fields"]["email"], "a@b.com");
    }

    #[tokio::test]
    async fn test_unknown_action_is_reported_not_applied() {
        let app = app();
        let id = new_session(&app, "car").await;

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{}/actions", id),
            Some(json!({"type": "APPLY_COUPON", "payload": "SAVE10"})),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["outcome"], "unknown_action");
        assert_eq!(body["action"], "APPLY_COUPON");
        assert_eq!(body["state"]["policy_type"], "car");
    }

    #[tokio::test]
    async fn test_reset_and_delete() {
        let app = app();
        let id = new_session(&app, "health").await;

        let (_, body) = send(&app, Method::POST, &format!("/api/v1/sessions/{}/reset", id), None).await;
        assert_eq!(body["state"]["policy_type"], Value::Null);

        let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/sessions/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, Method::GET, &format!("/api/v1/sessions/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_session_id() {
        let (status, _) = send(&app(), Method::GET, "/api/v1/sessions/not-a-uuid", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

mod purchase_tests {
    use super::*;

    #[tokio::test]
    async fn test_quote_publishes_breakdown() {
        let app = app();
        let id = new_session(&app, "health").await;

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{}/quote", id),
            Some(json!({"provider_id": "care-health", "add_on_ids": ["room-rent-waiver", "maternity"]})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "fresh");

        let (_, session) = send(&app, Method::GET, &format!("/api/v1/sessions/{}", id), None).await;
        let breakdown = &session["state"]["premium_breakdown"];
        assert_money_eq(
            &money(&breakdown["total_premium"]),
            &MoneyFixtures::health_total_with_two_add_ons(),
        );
        assert_eq!(session["state"]["current_provider"]["id"], "care-health");
    }

    #[tokio::test]
    async fn test_quote_for_other_policy_type_is_rejected() {
        let app = app();
        let id = new_session(&app, "health").await;

        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{}/quote", id),
            Some(json!({"provider_id": "bajaj-allianz-car"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_dependents_not_allowed_for_car() {
        let app = app();
        let id = new_session(&app, "car").await;

        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{}/dependents", id),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_wrong_otp_is_outcome_not_error() {
        let app = app();
        let id = new_session(&app, "car").await;

        let (status, _) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{}/otp/send", id),
            Some(json!({"mobile": FormFixtures::mobile()})),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);

        let (status, body) = send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{}/otp/verify", id),
            Some(json!({"code": "000000"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "mismatch");
        assert_eq!(body["message"], "Invalid OTP. Please try again.");
        assert_eq!(body["mobile_verified"], false);
    }

    #[tokio::test]
    async fn test_submit_blocked_lists_issues() {
        let app = app();
        let id = new_session(&app, "car").await;

        let (status, body) =
            send(&app, Method::POST, &format!("/api/v1/sessions/{}/submit", id), None).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "conflict");

        send(
            &app,
            Method::POST,
            &format!("/api/v1/sessions/{}/quote", id),
            Some(json!({"provider_id": "bajaj-allianz-car"})),
        )
        .await;
        let (status, body) =
            send(&app, Method::POST, &format!("/api/v1/sessions/{}/submit", id), None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "submission_blocked");
        let details = body["details"].as_array().unwrap();
        assert!(details.contains(&json!("Full Name is required")));
        assert!(details.contains(&json!("Mobile number must be verified")));
    }

    #[tokio::test]
    async fn test_full_health_purchase() {
        let app = app();
        let id = new_session(&app, "health").await;
        let base = format!("/api/v1/sessions/{}", id);

        let patch = serde_json::to_value(FormFixtures::valid_health_patch()).unwrap();
        let (status, _) = send(
            &app,
            Method::POST,
            &format!("{}/actions", base),
            Some(json!({"type": "UPDATE_FORM_DATA", "payload": patch})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(&app, Method::POST, &format!("{}/dependents", base), None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["dependents"].as_array().unwrap().len(), 1);

        for edit in [
            json!({"field": "name", "value": "Meera Menon"}),
            json!({"field": "age", "value": 6}),
            json!({"field": "relation", "value": "daughter"}),
        ] {
            let (status, _) =
                send(&app, Method::PUT, &format!("{}/dependents/0", base), Some(edit)).await;
            assert_eq!(status, StatusCode::OK);
        }

        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("{}/dependents/5", base),
            Some(json!({"field": "name", "value": "Ghost"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, quote) = send(
            &app,
            Method::POST,
            &format!("{}/quote", base),
            Some(json!({"provider_id": "care-health", "add_on_ids": ["room-rent-waiver", "maternity"]})),
        )
        .await;
        assert_eq!(quote["status"], "fresh");

        send(&app, Method::POST, &format!("{}/otp/send", base), None).await;
        let (_, otp) = send(
            &app,
            Method::POST,
            &format!("{}/otp/verify", base),
            Some(json!({"code": "123456"})),
        )
        .await;
        assert_eq!(otp["status"], "verified");
        assert_eq!(otp["mobile_verified"], true);

        let (status, confirmation) =
            send(&app, Method::POST, &format!("{}/submit", base), None).await;
        assert_eq!(status, StatusCode::CREATED, "{}", confirmation);
        assert!(confirmation["policy_number"]
            .as_str()
            .unwrap()
            .starts_with("HEALTH-"));
        assert_eq!(confirmation["dependents_covered"], 1);
        assert_money_eq(
            &money(&confirmation["premium"]["total_premium"]),
            &MoneyFixtures::health_total_with_two_add_ons(),
        );
    }
}

mod race_tests {
    use super::*;
    use std::time::Duration;

    fn spawn_post(
        app: &Router,
        uri: String,
        body: Value,
    ) -> tokio::task::JoinHandle<(StatusCode, Value)> {
        let app = app.clone();
        tokio::spawn(async move { send(&app, Method::POST, &uri, Some(body)).await })
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_discards_quote_in_flight() {
        let app = delayed_app();
        let id = new_session(&app, "health").await;
        let base = format!("/api/v1/sessions/{}", id);

        let quote = spawn_post(
            &app,
            format!("{}/quote", base),
            json!({"provider_id": "care-health"}),
        );
        tokio::time::sleep(Duration::from_millis(100)).await;

        let (status, _) = send(&app, Method::POST, &format!("{}/reset", base), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = quote.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "superseded");

        let (_, session) = send(&app, Method::GET, &base, None).await;
        assert_eq!(session["state"]["policy_type"], Value::Null);
        assert_eq!(session["state"]["current_provider"], Value::Null);
        assert_eq!(session["state"]["premium_breakdown"], Value::Null);
    }

    #[tokio::test(start_paused = true)]
    async fn test_policy_type_change_discards_quote_in_flight() {
        let app = delayed_app();
        let id = new_session(&app, "health").await;
        let base = format!("/api/v1/sessions/{}", id);

        let quote = spawn_post(
            &app,
            format!("{}/quote", base),
            json!({"provider_id": "care-health"}),
        );
        tokio::time::sleep(Duration::from_millis(100)).await;

        let (status, _) = send(
            &app,
            Method::POST,
            &format!("{}/actions", base),
            Some(json!({"type": "SET_POLICY_TYPE", "payload": "car"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = quote.await.unwrap();
        assert_eq!(body["status"], "superseded");

        let (_, session) = send(&app, Method::GET, &base, None).await;
        assert_eq!(session["state"]["policy_type"], "car");
        assert_eq!(session["state"]["current_provider"], Value::Null);
        assert_eq!(session["state"]["premium_breakdown"], Value::Null);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resend_to_new_number_discards_waiting_verification() {
        let app = delayed_app();
        let id = new_session(&app, "car").await;
        let base = format!("/api/v1/sessions/{}", id);

        let (status, _) = send(
            &app,
            Method::POST,
            &format!("{}/otp/send", base),
            Some(json!({"mobile": "9000000001"})),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);

        let verify = spawn_post(&app, format!("{}/otp/verify", base), json!({"code": "123456"}));
        tokio::time::sleep(Duration::from_millis(100)).await;

        let (status, _) = send(
            &app,
            Method::POST,
            &format!("{}/otp/send", base),
            Some(json!({"mobile": "9000000002"})),
        )
        .await;
        assert_eq!(status, StatusCode::ACCEPTED);

        let (status, body) = verify.await.unwrap();
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "superseded");
        assert_eq!(body["mobile_verified"], false);

        let (_, session) = send(&app, Method::GET, &base, None).await;
        let form = &session["state"]["form_data"];
        assert_eq!(form["fields"]["mobile"], "9000000002");
        assert_eq!(form["mobile_verified"], false);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_discards_waiting_verification() {
        let app = delayed_app();
        let id = new_session(&app, "car").await;
        let base = format!("/api/v1/sessions/{}", id);

        send(
            &app,
            Method::POST,
            &format!("{}/otp/send", base),
            Some(json!({"mobile": FormFixtures::mobile()})),
        )
        .await;
        let verify = spawn_post(&app, format!("{}/otp/verify", base), json!({"code": "123456"}));
        tokio::time::sleep(Duration::from_millis(100)).await;

        send(&app, Method::POST, &format!("{}/reset", base), None).await;

        let (_, body) = verify.await.unwrap();
        assert_eq!(body["status"], "superseded");

        let (_, session) = send(&app, Method::GET, &base, None).await;
        let form = &session["state"]["form_data"];
        assert_eq!(form["fields"].get("mobile"), None);
        assert_eq!(form["mobile_verified"], false);
    }
}
