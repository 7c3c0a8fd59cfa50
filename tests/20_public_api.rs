mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::Value;

// Public listing endpoints answer 200 with a JSON envelope when the
// database is reachable, or 503 when it is not. Either way the server
// must not crash or return malformed bodies.

#[tokio::test]
async fn cities_listing_returns_envelope_or_degraded() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/cities", server.base_url))
        .send()
        .await?;
    let status = res.status();
    let body = res.json::<Value>().await?;

    match status {
        StatusCode::OK => {
            assert_eq!(body["success"], Value::Bool(true));
            assert!(body["data"].is_array(), "expected array payload: {}", body);
        }
        StatusCode::SERVICE_UNAVAILABLE => {
            assert_eq!(body["error"], Value::Bool(true));
        }
        other => panic!("unexpected status: {}", other),
    }
    Ok(())
}

#[tokio::test]
async fn browse_root_matches_cities_shape() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/browse", server.base_url))
        .send()
        .await?;
    let status = res.status();

    if status == StatusCode::OK {
        let body = res.json::<Value>().await?;
        assert_eq!(body["data"]["heading"], Value::String("Cities".to_string()));
        assert!(body["data"]["items"].is_array());
    } else {
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }
    Ok(())
}

// Path validation happens before any database access, so these hold with
// or without a reachable database.

#[tokio::test]
async fn browse_rejects_unknown_level() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/browse/planet/3", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<Value>().await?;
    assert_eq!(body["code"], Value::String("BAD_REQUEST".to_string()));
    Ok(())
}

#[tokio::test]
async fn browse_rejects_level_without_id() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/browse/city", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn browse_rejects_path_not_rooted_at_city() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/browse/school/1", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn browse_rejects_out_of_order_levels() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // semester cannot directly follow city
    let res = client
        .get(format!("{}/api/browse/city/1/semester/2", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn navigate_rejects_unknown_level() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/navigate/planet/earth", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn navigate_requires_parent_for_child_levels() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/api/navigate/school/engineering", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

// Uploaded file serving

#[tokio::test]
async fn uploads_missing_file_is_404() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    let res = client
        .get(format!("{}/uploads/does-not-exist.pdf", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn uploads_rejects_path_traversal() -> Result<()> {
    let server = common::ensure_server().await?;
    let client = reqwest::Client::new();

    // %2e%2e%2f decodes to ../ inside the single path segment
    let res = client
        .get(format!("{}/uploads/%2e%2e%2fsecret.txt", server.base_url))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    Ok(())
}
