mod common;

use anyhow::Result;
use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn create_requires_reviewer_match() -> Result<()> {
    let api = common::test_api();

    let token = common::token_for("someone-else");
    let (status, body) = common::send(
        &api.router,
        "POST",
        "/reviews",
        Some(&token),
        Some(common::review_payload("buyer-1001")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Reviewer ID must match authenticated user.");

    let token = common::token_for("buyer-1001");
    let (status, body) = common::send(
        &api.router,
        "POST",
        "/reviews",
        Some(&token),
        Some(common::review_payload("buyer-1001")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["reviewId"].as_str().is_some());
    assert!(body["reviewedAt"].is_string());
    assert_eq!(body["isApproved"], true);
    assert_eq!(body["helpfulVotes"], 0);
    Ok(())
}

#[tokio::test]
async fn out_of_range_fields_are_rejected() -> Result<()> {
    let api = common::test_api();
    let token = common::token_for("buyer-1001");

    let mut payload = common::review_payload("buyer-1001");
    payload["rating"] = json!(6);
    let (status, body) =
        common::send(&api.router, "POST", "/reviews", Some(&token), Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field_errors"]["rating"], "must be between 1 and 5");

    let mut payload = common::review_payload("buyer-1001");
    payload["comment"] = json!("too short");
    let (status, _) =
        common::send(&api.router, "POST", "/reviews", Some(&token), Some(payload)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn list_and_get_are_public() -> Result<()> {
    let api = common::test_api();
    let token = common::token_for("buyer-1001");

    let (_, created) = common::send(
        &api.router,
        "POST",
        "/reviews",
        Some(&token),
        Some(common::review_payload("buyer-1001")),
    )
    .await;
    let review_id = created["reviewId"].as_str().unwrap();

    let (status, body) = common::send(&api.router, "GET", "/reviews", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let path = format!("/reviews/{}", review_id);
    let (status, body) = common::send(&api.router, "GET", &path, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reviewId"], *review_id);
    Ok(())
}

#[tokio::test]
async fn only_the_reviewer_may_update_or_delete() -> Result<()> {
    let api = common::test_api();
    let reviewer = common::token_for("buyer-1001");
    let stranger = common::token_for("seller-1001");

    let (_, created) = common::send(
        &api.router,
        "POST",
        "/reviews",
        Some(&reviewer),
        Some(common::review_payload("buyer-1001")),
    )
    .await;
    let path = format!("/reviews/{}", created["reviewId"].as_str().unwrap());

    let (status, _) = common::send(
        &api.router,
        "PUT",
        &path,
        Some(&stranger),
        Some(json!({ "helpfulVotes": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = common::send(
        &api.router,
        "PUT",
        &path,
        Some(&reviewer),
        Some(json!({ "helpfulVotes": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["helpfulVotes"], 3);
    // Unpatched fields are untouched.
    assert_eq!(body["rating"], created["rating"]);
    assert_eq!(body["comment"], created["comment"]);
    assert_eq!(body["reviewedAt"], created["reviewedAt"]);

    let (status, _) = common::send(&api.router, "DELETE", &path, Some(&stranger), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = common::send(&api.router, "DELETE", &path, Some(&reviewer), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = common::send(&api.router, "GET", &path, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn empty_patch_is_rejected() -> Result<()> {
    let api = common::test_api();
    let reviewer = common::token_for("buyer-1001");

    let (_, created) = common::send(
        &api.router,
        "POST",
        "/reviews",
        Some(&reviewer),
        Some(common::review_payload("buyer-1001")),
    )
    .await;
    let path = format!("/reviews/{}", created["reviewId"].as_str().unwrap());

    let (status, _) =
        common::send(&api.router, "PUT", &path, Some(&reviewer), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}
