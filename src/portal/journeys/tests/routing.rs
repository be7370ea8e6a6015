use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::portal::identity::domain::{Role, SessionToken};
use crate::portal::journeys::domain::JourneyStage;
use crate::portal::journeys::{journeys_router, NewJourney};
use crate::portal::store::Store;

fn router(harness: &Harness) -> Router {
    journeys_router(harness.state.clone())
}

fn request(
    method: &str,
    path: &str,
    token: Option<SessionToken>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[tokio::test]
async fn journey_creation_requires_a_session() {
    let harness = harness();
    let body = json!({
        "clinicId": harness.clinic.0,
        "candidateId": harness.candidate.0,
        "stage": "FIRST_INTERVIEW",
    });

    let response = router(&harness)
        .oneshot(request("POST", "/owner/journeys/new", None, Some(body)))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn journey_creation_refuses_non_owner_roles() {
    let harness = harness();
    let client = sample_user(
        "client@clinic.test",
        Role::Client,
        Some(harness.clinic),
        None,
    );
    harness
        .store
        .insert_user(client.clone())
        .expect("client inserted");
    let token = open_session(&harness, client.id);

    let body = json!({
        "clinicId": harness.clinic.0,
        "candidateId": harness.candidate.0,
    });
    let response = router(&harness)
        .oneshot(request("POST", "/owner/journeys/new", Some(token), Some(body)))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn owner_creates_a_journey_over_http() {
    let harness = harness();
    let token = open_session(&harness, harness.owner);

    let body = json!({
        "clinicId": harness.clinic.0,
        "candidateId": harness.candidate.0,
        "stage": "TRIAL_DAY",
        "scheduledAt": "2026-03-02T14:30",
        "notes": "  bring scrubs  ",
    });
    let response = router(&harness)
        .oneshot(request("POST", "/owner/journeys/new", Some(token), Some(body)))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);

    let payload = read_json_body(response).await;
    assert_eq!(payload.get("stage"), Some(&json!("TRIAL_DAY")));
    assert_eq!(payload.get("notes"), Some(&json!("bring scrubs")));

    let stored = harness.store.journeys().expect("listing");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].stage, JourneyStage::TrialDay);
    assert!(stored[0].scheduled_at.is_some());
}

#[tokio::test]
async fn malformed_stage_values_are_rejected_with_bad_request() {
    let harness = harness();
    let token = open_session(&harness, harness.owner);

    let body = json!({
        "clinicId": harness.clinic.0,
        "candidateId": harness.candidate.0,
        "stage": "HIRED",
    });
    let response = router(&harness)
        .oneshot(request("POST", "/owner/journeys/new", Some(token), Some(body)))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(harness.store.journeys().expect("listing").is_empty());
}

#[tokio::test]
async fn owner_updates_a_journey_to_placed_over_http() {
    let harness = harness();
    let token = open_session(&harness, harness.owner);

    let journey = service(&harness)
        .create(
            NewJourney {
                clinic: harness.clinic,
                candidate: harness.candidate,
                stage: Some("FINAL_OFFER".to_string()),
                scheduled_at: None,
                notes: None,
            },
            harness.owner,
        )
        .expect("journey created");

    let response = router(&harness)
        .oneshot(request(
            "POST",
            &format!("/owner/journeys/{}/update", journey.id),
            Some(token),
            Some(json!({ "stage": "PLACED" })),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let candidate = harness
        .store
        .candidate(harness.candidate)
        .expect("lookup")
        .expect("present");
    assert_eq!(candidate.placed_clinic, Some(harness.clinic));
    assert!(candidate.placed_at.is_some());
}

#[tokio::test]
async fn updating_an_unknown_journey_is_not_found() {
    let harness = harness();
    let token = open_session(&harness, harness.owner);

    let response = router(&harness)
        .oneshot(request(
            "POST",
            &format!("/owner/journeys/{}/update", uuid::Uuid::new_v4()),
            Some(token),
            Some(json!({ "stage": "PLACED" })),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn journey_listing_joins_names_for_the_owner() {
    let harness = harness();
    let token = open_session(&harness, harness.owner);

    service(&harness)
        .create(
            NewJourney {
                clinic: harness.clinic,
                candidate: harness.candidate,
                stage: None,
                scheduled_at: None,
                notes: None,
            },
            harness.owner,
        )
        .expect("journey created");

    let response = router(&harness)
        .oneshot(request("GET", "/owner/journeys", Some(token), None))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json_body(response).await;
    let entries = payload.as_array().expect("array payload");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].get("stage"), Some(&json!("FIRST_INTERVIEW")));
    assert_eq!(
        entries[0].get("candidateName"),
        Some(&json!("Noor Jansen"))
    );
}
