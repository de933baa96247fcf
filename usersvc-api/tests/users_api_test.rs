/// End-to-end tests for the user endpoints
///
/// These tests require a running PostgreSQL database reachable through the
/// `DB_*` environment variables. Run with:
/// cargo test -p usersvc-api --test users_api_test -- --ignored
///
/// Names are randomized so runs sharing a database do not collide.

mod common;

use axum::http::StatusCode;
use common::TestContext;
use serde_json::{json, Value};
use uuid::Uuid;

fn unique_name() -> String {
    format!("user-{}", Uuid::new_v4())
}

async fn create_user(ctx: &TestContext, name: &str, address: &str) -> i64 {
    let (status, body) = ctx
        .send(
            "POST",
            "/submit_data",
            Some(json!({ "name": name, "address": address })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    assert_eq!(body["message"], "User created successfully");
    body["id"].as_i64().expect("id in response")
}

fn find(users: &[Value], id: i64) -> Option<&Value> {
    users.iter().find(|u| u["id"].as_i64() == Some(id))
}

/// Walks one user through its whole lifecycle
#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_user_lifecycle() {
    let ctx = TestContext::new().await.unwrap();
    let name = unique_name();

    let id = create_user(&ctx, &name, "1 Main St").await;

    let users = ctx.list_users().await;
    assert_eq!(
        find(&users, id),
        Some(&json!({ "id": id, "name": &name, "address": "1 Main St" }))
    );

    let (status, body) = ctx
        .send(
            "PUT",
            &format!("/update/{}", id),
            Some(json!({ "address": "2 Oak St" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User address updated successfully");

    let users = ctx.list_users().await;
    assert_eq!(find(&users, id).unwrap()["address"], "2 Oak St");
    assert_eq!(find(&users, id).unwrap()["name"], name.as_str());

    let (status, body) = ctx.send("DELETE", &format!("/delete/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted successfully");

    let users = ctx.list_users().await;
    assert!(find(&users, id).is_none());

    let (status, body) = ctx.send("DELETE", &format!("/delete/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_created_users_get_fresh_ids() {
    let ctx = TestContext::new().await.unwrap();
    let name = unique_name();

    let first = create_user(&ctx, &name, "a").await;
    let second = create_user(&ctx, &name, "b").await;
    assert_ne!(first, second);

    let users = ctx.list_users().await;
    assert!(find(&users, first).is_some());
    assert!(find(&users, second).is_some());

    for id in [first, second] {
        ctx.send("DELETE", &format!("/delete/{}", id), None).await;
    }
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_update_missing_user_leaves_table_unchanged() {
    let ctx = TestContext::new().await.unwrap();
    let id = create_user(&ctx, &unique_name(), "1 Main St").await;

    let before = ctx.list_users().await;

    let (status, body) = ctx
        .send(
            "PUT",
            &format!("/update/{}", i32::MAX),
            Some(json!({ "address": "nowhere" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");

    let after = ctx.list_users().await;
    assert_eq!(find(&before, id), find(&after, id));

    ctx.send("DELETE", &format!("/delete/{}", id), None).await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_delete_missing_user_is_not_found() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx
        .send("DELETE", &format!("/delete/{}", i32::MAX), None)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "User not found");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_invalid_create_inserts_nothing() {
    let ctx = TestContext::new().await.unwrap();
    let name = unique_name();

    let (status, _) = ctx
        .send("POST", "/submit_data", Some(json!({ "name": name })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let users = ctx.list_users().await;
    assert!(users.iter().all(|u| u["name"] != name.as_str()));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_health_reports_connected() {
    let ctx = TestContext::new().await.unwrap();

    let (status, body) = ctx.send("GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_list_includes_rows_with_null_columns() {
    let ctx = TestContext::new().await.unwrap();
    let name = unique_name();
    let insert_name = name.clone();

    let (id,): (i32,) = ctx
        .db
        .run(move |conn| {
            Box::pin(async move {
                sqlx::query_as("INSERT INTO users (name, address) VALUES ($1, NULL) RETURNING id")
                    .bind(insert_name)
                    .fetch_one(&mut *conn)
                    .await
            })
        })
        .await
        .unwrap();
    let id = i64::from(id);

    let (status, body) = ctx.send("GET", "/show_data", None).await;
    assert_eq!(status, StatusCode::OK, "list failed: {}", body);

    let users = body.as_array().unwrap();
    assert_eq!(
        find(users, id),
        Some(&json!({ "id": id, "name": &name, "address": null }))
    );

    ctx.send("DELETE", &format!("/delete/{}", id), None).await;
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL database"]
async fn test_update_accepts_empty_and_null_address() {
    let ctx = TestContext::new().await.unwrap();
    let id = create_user(&ctx, &unique_name(), "1 Main St").await;

    let (status, _) = ctx
        .send("PUT", &format!("/update/{}", id), Some(json!({ "address": "" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(find(&ctx.list_users().await, id).unwrap()["address"], "");

    let (status, _) = ctx
        .send("PUT", &format!("/update/{}", id), Some(json!({ "address": null })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(find(&ctx.list_users().await, id).unwrap()["address"].is_null());

    ctx.send("DELETE", &format!("/delete/{}", id), None).await;
}
