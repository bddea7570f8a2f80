use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use yieldgap::{
    scene::SceneSettings,
    web::{router, AppState},
    RegionDataset,
};

fn app() -> Router {
    let registry = RegionDataset::builtin().unwrap().into_registry();
    router(Arc::new(AppState::new(
        registry,
        SceneSettings::default(),
        Duration::from_millis(10),
    )))
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    // Rejections carry a plain-text body.
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn chat_submission_statuses() {
    let app = app();
    let blank = Some(json!({ "text": "   " }));
    let (status, body) = call(&app, Method::POST, "/api/chat?session=s1", blank).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/chat?session=s1",
        Some(json!({ "text": "<img src=x onerror=alert(1)>" })),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["author"], "user");
    assert_eq!(body["text"], "<img src=x onerror=alert(1)>");

    let (status, body) = call(&app, Method::GET, "/api/chat?session=s1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["messages"].as_array().map(Vec::len), Some(2));

    let (status, _) = call(&app, Method::DELETE, "/api/chat?session=s1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, body) = call(&app, Method::GET, "/api/chat?session=s1", None).await;
    assert_eq!(body["messages"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["typing"], false);
}

#[tokio::test]
async fn selection_can_be_set_and_deleted() {
    let app = app();
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/selection?session=s2",
        Some(json!({ "region_id": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selection"], 4);
    assert_eq!(body["view"]["panel"], "detail");
    assert_eq!(body["view"]["name"], "Central Valley");
    // Dry level 32 sits under 40: three recommendations.
    assert_eq!(body["view"]["recommendations"].as_array().map(Vec::len), Some(3));

    let (status, body) = call(&app, Method::DELETE, "/api/selection?session=s2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["selection"], Value::Null);
    assert_eq!(body["view"]["panel"], "overview");
}

#[tokio::test]
async fn season_change_stays_in_its_session() {
    let app = app();
    let wet = Some(json!({ "season": "wet" }));
    let (status, body) = call(&app, Method::POST, "/api/season?session=a", wet).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["season"], "wet");

    let (_, other) = call(&app, Method::GET, "/api/state?session=b", None).await;
    assert_eq!(other["season"], "dry");
    let (_, scene) = call(&app, Method::GET, "/api/scene?session=b", None).await;
    assert_eq!(scene["season"], "dry");

    let (_, same) = call(&app, Method::GET, "/api/state?session=a", None).await;
    assert_eq!(same["season"], "wet");
}

#[tokio::test]
async fn session_scoped_routes_need_a_valid_id() {
    let app = app();
    let (status, _) = call(&app, Method::GET, "/api/state", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = call(&app, Method::GET, "/api/state?session=", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = call(&app, Method::GET, "/api/chat?session=a%20b", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, regions) = call(&app, Method::GET, "/api/regions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(regions.is_object() || regions.is_array());
}
