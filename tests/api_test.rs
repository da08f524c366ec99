mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use noticeboard::{api::create_app, auth::Argon2Verifier};
use serde_json::{json, Value};
use tower::ServiceExt;

const PASSWORD: &str = "correct horse battery staple";

async fn app_with_admin() -> anyhow::Result<(common::TestApp, Router)> {
    let hash = Argon2Verifier::hash_password(PASSWORD)?;
    let test_app = common::setup(Some(hash)).await?;
    let router = create_app(test_app.context.clone(), test_app.settings.clone());
    Ok((test_app, router))
}

async fn body_json(response: axum::response::Response) -> anyhow::Result<Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn json_request(method: &str, uri: &str, body: Value, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

/// Logs in and returns the `name=value` pair to send back as a cookie.
async fn login(router: &Router) -> anyhow::Result<String> {
    let response = router
        .clone()
        .oneshot(json_request("POST", "/auth/login", json!({ "password": PASSWORD }), None))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("login sets a session cookie")
        .to_str()?
        .to_string();
    assert!(set_cookie.starts_with("admin_session="));
    assert!(set_cookie.contains("HttpOnly"));

    Ok(set_cookie.split(';').next().unwrap_or_default().to_string())
}

#[tokio::test]
async fn test_health_check() -> anyhow::Result<()> {
    let (_app, router) = app_with_admin().await?;

    let response = router.oneshot(get_request("/health", None)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await?["status"], "healthy");

    Ok(())
}

#[tokio::test]
async fn test_admin_routes_require_session() -> anyhow::Result<()> {
    let (_app, router) = app_with_admin().await?;

    let response = router.clone().oneshot(get_request("/api/admin/notices", None)).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = router
        .clone()
        .oneshot(get_request("/api/admin/notices", Some("admin_session=forged")))
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = router
        .oneshot(json_request(
            "POST",
            "/api/admin/notices",
            json!({ "title": "t", "content": "c", "author": "a" }),
            None,
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_wrong_password_is_rejected() -> anyhow::Result<()> {
    let (_app, router) = app_with_admin().await?;

    let response = router
        .oneshot(json_request("POST", "/auth/login", json!({ "password": "guess" }), None))
        .await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    Ok(())
}

#[tokio::test]
async fn test_publish_and_view_notice() -> anyhow::Result<()> {
    let (_app, router) = app_with_admin().await?;
    let cookie = login(&router).await?;

    let response = router.clone().oneshot(get_request("/auth/status", Some(&cookie))).await?;
    assert_eq!(body_json(response).await?["authenticated"], true);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/notices",
            json!({
                "title": "Fire alarm test",
                "content": "The alarm will sound briefly at 11:00.",
                "author": "Building Management",
                "is_urgent": true,
                "publish": { "mode": "now" }
            }),
            Some(&cookie),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let live = body_json(response).await?;

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/notices",
            json!({
                "title": "Window cleaning",
                "content": "Scheduled for next year.",
                "author": "Caretaker",
                "publish": { "mode": "scheduled", "at": "2099-03-01T08:00" }
            }),
            Some(&cookie),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let scheduled = body_json(response).await?;

    // Public board only shows what is live
    let response = router.clone().oneshot(get_request("/api/notices", None)).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let board = body_json(response).await?;
    assert_eq!(board["count"], 1);
    assert_eq!(board["notices"][0]["title"], "Fire alarm test");
    assert_eq!(board["sort_order"], "newest_first");
    assert_eq!(board["sort_label"], "Newest first");
    assert_eq!(board["filter_active"], false);

    let response = router
        .clone()
        .oneshot(get_request(&format!("/api/notices/{}", scheduled["id"]), None))
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = router
        .clone()
        .oneshot(get_request(&format!("/api/notices/{}", live["id"]), None))
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    // Admin sees both
    let response = router.clone().oneshot(get_request("/api/admin/notices", Some(&cookie))).await?;
    let listed = body_json(response).await?;
    assert_eq!(listed.as_array().map(Vec::len), Some(2));

    // Logout ends the session
    let response = router
        .clone()
        .oneshot(json_request("POST", "/auth/logout", json!({}), Some(&cookie)))
        .await?;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = router.oneshot(get_request("/api/admin/notices", Some(&cookie))).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    Ok(())
}

#[tokio::test]
async fn test_board_query_controls() -> anyhow::Result<()> {
    let (app, router) = app_with_admin().await?;
    let service = &app.context.notice_service;

    for (title, publish) in [("June", "2024-06-10T09:00"), ("July", "2024-07-05T09:00")] {
        service
            .create(noticeboard::service::NoticeDraft {
                title: title.to_string(),
                content: "c".to_string(),
                author: "a".to_string(),
                is_urgent: false,
                pdf_url: None,
                publish: noticeboard::service::PublishMode::Scheduled { at: publish.to_string() },
                expiry_date: None,
            })
            .await?;
    }

    let response = router
        .clone()
        .oneshot(get_request("/api/notices?sort=oldest_first", None))
        .await?;
    let board = body_json(response).await?;
    assert_eq!(board["notices"][0]["title"], "June");
    assert_eq!(board["sort_label"], "Oldest first");

    let response = router
        .clone()
        .oneshot(get_request("/api/notices?start=2024-07-01&end=2024-07-31&filter=true", None))
        .await?;
    let board = body_json(response).await?;
    assert_eq!(board["count"], 1);
    assert_eq!(board["notices"][0]["title"], "July");
    assert_eq!(board["filter_active"], true);

    // Bounds without filter=true stay pending
    let response = router
        .clone()
        .oneshot(get_request("/api/notices?start=2024-07-01&end=2024-07-31", None))
        .await?;
    assert_eq!(body_json(response).await?["count"], 2);

    let response = router
        .oneshot(get_request("/api/notices?start=soon&filter=true", None))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    Ok(())
}

fn multipart_request(uri: &str, filename: &str, data: &[u8], cookie: &str) -> Request<Body> {
    let boundary = "noticeboard-test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n",
            filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", boundary))
        .header(header::COOKIE, cookie)
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_photo_upload_and_gallery() -> anyhow::Result<()> {
    let (app, router) = app_with_admin().await?;
    let cookie = login(&router).await?;

    let response = router
        .clone()
        .oneshot(multipart_request("/api/admin/uploads/gallery-photos", "roof party.jpg", b"\xFF\xD8\xFFimage", &cookie))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let url = body_json(response).await?["url"].as_str().unwrap_or_default().to_string();
    assert!(url.starts_with("http://board.test/uploads/gallery-photos/"));
    assert!(url.ends_with("roof_party.jpg"));

    // Wrong type for the bucket
    let response = router
        .clone()
        .oneshot(multipart_request("/api/admin/uploads/notice-pdfs", "photo.jpg", b"data", &cookie))
        .await?;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = router
        .clone()
        .oneshot(multipart_request("/api/admin/uploads/elsewhere", "photo.jpg", b"data", &cookie))
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/admin/photos",
            json!({ "url": url, "caption": "Summer party" }),
            Some(&cookie),
        ))
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);
    let photo = body_json(response).await?;

    let response = router.clone().oneshot(get_request("/api/photos", None)).await?;
    let gallery = body_json(response).await?;
    assert_eq!(gallery[0]["caption"], "Summer party");

    let stored_name = url.rsplit('/').next().unwrap_or_default();
    let file_path = app.uploads.path().join("gallery-photos").join(stored_name);
    assert!(file_path.exists());

    let response = router
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/admin/photos/{}", photo["id"]))
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await?["asset"], "removed");
    assert!(!file_path.exists());

    Ok(())
}
