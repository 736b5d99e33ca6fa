use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use axum_test::TestServer;
use halo_config::constants::default_image_set;
use halo_model::{ImageSet, ResourceDescriptor};
use halo_server::{AppState, create_app};
use serde_json::{Value, json};
use tower::ServiceExt;

fn server_for(set: ImageSet) -> TestServer {
    TestServer::new(create_app(AppState::new(set))).unwrap()
}

#[tokio::test]
async fn serves_default_image_set() {
    let server = server_for(default_image_set());

    let response = server.get("/api/images").await;
    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["name"], "Super 30");
    assert_eq!(body["count"], 4);

    let images = body["images"].as_array().unwrap();
    assert_eq!(images.len(), 4);
    assert_eq!(images[2]["error"], true);
    assert_eq!(images[2]["url"], "https://picsum.photos/seed/error/200/200");
    assert!(
        images
            .iter()
            .enumerate()
            .all(|(i, image)| image["ready"] == true
                && (i == 2 || image["error"] == false))
    );
    assert!(body.get("locationText").is_none());
}

#[tokio::test]
async fn serves_configured_set_with_caption() {
    let set = ImageSet::new(
        "Crew",
        vec![
            ResourceDescriptor::ready("https://img/a"),
            ResourceDescriptor::not_ready("https://img/b"),
        ],
    )
    .with_location("Moradabad, Uttar Pradesh");
    let server = server_for(set);

    let body: Value = server.get("/api/images").await.json();
    assert_eq!(
        body,
        json!({
            "name": "Crew",
            "count": 2,
            "images": [
                { "url": "https://img/a", "ready": true, "error": false },
                { "url": "https://img/b", "ready": false, "error": false }
            ],
            "locationText": "Moradabad, Uttar Pradesh"
        })
    );
}

#[tokio::test]
async fn health_check_answers_ok() {
    let server = server_for(default_image_set());
    let response = server.get("/healthz").await;
    response.assert_status_ok();
    response.assert_text("ok");
}

#[tokio::test]
async fn unknown_routes_use_error_body() {
    let server = server_for(default_image_set());
    let response = server.get("/api/nope").await;
    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&json!({ "error": "Not found" }));
}

#[tokio::test]
async fn browsers_on_other_origins_may_read_images() {
    let app = create_app(AppState::new(default_image_set()));
    let request = Request::builder()
        .uri("/api/images")
        .header("origin", "http://localhost:5173")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}
