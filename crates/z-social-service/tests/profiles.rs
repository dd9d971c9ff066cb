//! Profile integration tests.

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use common::TestHarness;
use serde_json::json;

fn picture(bytes: Vec<u8>, file_name: &str, mime: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "picture",
        Part::bytes(bytes).file_name(file_name).mime_type(mime),
    )
}

fn png(bytes: Vec<u8>) -> MultipartForm {
    picture(bytes, "me.png", "image/png")
}

// ============================================================================
// Viewing
// ============================================================================

#[tokio::test]
async fn new_account_has_default_profile() {
    let harness = TestHarness::new();
    let alice = harness.register("alice").await;

    let response = harness
        .server
        .get("/v1/profiles/me")
        .add_header(AUTHORIZATION, alice.bearer())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["account_id"], alice.id);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["name"], "New User");
    assert_eq!(body["bio"], "");
    assert_eq!(body["is_self"], true);
    assert!(body["picture_url"].is_null());
}

#[tokio::test]
async fn anonymous_view_has_no_relationship_flags() {
    let harness = TestHarness::new();
    let alice = harness.register("alice").await;
    harness.register("bob").await;

    let response = harness
        .server
        .get(&format!("/v1/profiles/{}", alice.id))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["followers_count"], 1);
    assert_eq!(body["followers"][0]["username"], "bob");
    assert_eq!(body["is_following"], false);
    assert_eq!(body["is_followed_by"], false);
    assert_eq!(body["is_self"], false);
}

#[tokio::test]
async fn unknown_profile_not_found() {
    let harness = TestHarness::new();

    let response = harness.server.get("/v1/profiles/42").await;

    response.assert_status_not_found();
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn own_profile_requires_token() {
    let harness = TestHarness::new();

    harness
        .server
        .get("/v1/profiles/me")
        .await
        .assert_status_unauthorized();
}

// ============================================================================
// Editing
// ============================================================================

#[tokio::test]
async fn owner_edits_profile() {
    let harness = TestHarness::new();
    let alice = harness.register("alice").await;

    let response = harness
        .server
        .put(&format!("/v1/profiles/{}", alice.id))
        .add_header(AUTHORIZATION, alice.bearer())
        .json(&json!({ "name": "Alice Liddell", "bio": "down the hole", "gender": "female" }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["name"], "Alice Liddell");
    assert_eq!(body["bio"], "down the hole");
    assert_eq!(body["gender"], "female");
}

#[tokio::test]
async fn custom_gender_and_blank_name() {
    let harness = TestHarness::new();
    let alice = harness.register("alice").await;
    let path = format!("/v1/profiles/{}", alice.id);

    harness
        .server
        .put(&path)
        .add_header(AUTHORIZATION, alice.bearer())
        .json(&json!({ "name": "Alice", "bio": "hi" }))
        .await
        .assert_status_ok();

    let response = harness
        .server
        .put(&path)
        .add_header(AUTHORIZATION, alice.bearer())
        .json(&json!({ "name": "  ", "gender": "custom", "custom_gender": " two-spirit " }))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["name"], "Alice");
    assert_eq!(body["bio"], "");
    assert_eq!(body["gender"], "two-spirit");
}

#[tokio::test]
async fn name_too_long_rejected() {
    let harness = TestHarness::new();
    let alice = harness.register("alice").await;

    let response = harness
        .server
        .put(&format!("/v1/profiles/{}", alice.id))
        .add_header(AUTHORIZATION, alice.bearer())
        .json(&json!({ "name": "a".repeat(151) }))
        .await;

    response.assert_status_bad_request();
}

#[tokio::test]
async fn editing_someone_else_forbidden() {
    let harness = TestHarness::new();
    let alice = harness.register("alice").await;
    let bob = harness.register("bob").await;
    let path = format!("/v1/profiles/{}", alice.id);

    let response = harness
        .server
        .put(&path)
        .add_header(AUTHORIZATION, bob.bearer())
        .json(&json!({ "name": "Hacked" }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);

    let body: serde_json::Value = harness.server.get(&path).await.json();
    assert_eq!(body["name"], "New User");
}

#[tokio::test]
async fn editing_requires_token() {
    let harness = TestHarness::new();
    let alice = harness.register("alice").await;

    harness
        .server
        .put(&format!("/v1/profiles/{}", alice.id))
        .json(&json!({ "name": "Anon" }))
        .await
        .assert_status_unauthorized();
}

// ============================================================================
// Pictures
// ============================================================================

#[tokio::test]
async fn picture_upload_is_served() {
    let harness = TestHarness::new();
    let alice = harness.register("alice").await;

    let response = harness
        .server
        .post(&format!("/v1/profiles/{}/picture", alice.id))
        .add_header(AUTHORIZATION, alice.bearer())
        .multipart(png(vec![7; 2048]))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let url = body["picture_url"].as_str().unwrap().to_string();
    assert!(url.starts_with("/uploads/"));
    assert!(url.ends_with(".png"));

    let served = harness.server.get(&url).await;
    served.assert_status_ok();
    assert_eq!(served.as_bytes().len(), 2048);
}

#[tokio::test]
async fn picture_replacement_removes_old_file() {
    let harness = TestHarness::new();
    let alice = harness.register("alice").await;
    let path = format!("/v1/profiles/{}/picture", alice.id);

    harness
        .server
        .post(&path)
        .add_header(AUTHORIZATION, alice.bearer())
        .multipart(png(vec![1; 64]))
        .await
        .assert_status_ok();

    harness
        .server
        .post(&path)
        .add_header(AUTHORIZATION, alice.bearer())
        .multipart(picture(vec![2; 64], "me.jpg", "image/jpeg"))
        .await
        .assert_status_ok();

    assert_eq!(harness.stored_pictures(), 1);
}

#[tokio::test]
async fn oversized_picture_rejected_and_previous_kept() {
    let harness = TestHarness::new();
    let alice = harness.register("alice").await;
    let path = format!("/v1/profiles/{}/picture", alice.id);

    let first: serde_json::Value = harness
        .server
        .post(&path)
        .add_header(AUTHORIZATION, alice.bearer())
        .multipart(png(vec![1; 128]))
        .await
        .json();

    let response = harness
        .server
        .post(&path)
        .add_header(AUTHORIZATION, alice.bearer())
        .multipart(png(vec![0; 6 * 1024 * 1024]))
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["code"], "payload_too_large");

    let profile: serde_json::Value = harness
        .server
        .get(&format!("/v1/profiles/{}", alice.id))
        .await
        .json();
    assert_eq!(profile["picture_url"], first["picture_url"]);
    assert_eq!(harness.stored_pictures(), 1);
}

#[tokio::test]
async fn picture_of_exactly_the_limit_accepted() {
    let harness = TestHarness::new();
    let alice = harness.register("alice").await;
    let path = format!("/v1/profiles/{}/picture", alice.id);

    let response = harness
        .server
        .post(&path)
        .add_header(AUTHORIZATION, alice.bearer())
        .multipart(png(vec![3; harness.max_upload_bytes]))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body["picture_url"].is_string());
    assert_eq!(harness.stored_pictures(), 1);

    harness
        .server
        .post(&path)
        .add_header(AUTHORIZATION, alice.bearer())
        .multipart(png(vec![3; harness.max_upload_bytes + 1]))
        .await
        .assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(harness.stored_pictures(), 1);
}

#[tokio::test]
async fn non_numeric_profile_id_gets_json_error() {
    let harness = TestHarness::new();
    let alice = harness.register("alice").await;

    for response in [
        harness.server.get("/v1/profiles/abc").await,
        harness
            .server
            .post("/v1/follows/abc")
            .add_header(AUTHORIZATION, alice.bearer())
            .await,
    ] {
        response.assert_status_bad_request();
        let body: serde_json::Value = response.json();
        assert_eq!(body["error"]["code"], "bad_request");
    }
}

#[tokio::test]
async fn non_image_upload_rejected() {
    let harness = TestHarness::new();
    let alice = harness.register("alice").await;

    let response = harness
        .server
        .post(&format!("/v1/profiles/{}/picture", alice.id))
        .add_header(AUTHORIZATION, alice.bearer())
        .multipart(picture(b"#!/bin/sh".to_vec(), "run.sh", "text/x-shellscript"))
        .await;

    response.assert_status_bad_request();
    assert_eq!(harness.stored_pictures(), 0);
}

#[tokio::test]
async fn uploading_to_someone_else_forbidden() {
    let harness = TestHarness::new();
    let alice = harness.register("alice").await;
    let bob = harness.register("bob").await;

    let response = harness
        .server
        .post(&format!("/v1/profiles/{}/picture", alice.id))
        .add_header(AUTHORIZATION, bob.bearer())
        .multipart(png(vec![1; 16]))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(harness.stored_pictures(), 0);
}
