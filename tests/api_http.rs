// tests/api_http.rs
//
// HTTP-level tests for the public API Router without opening sockets.
// We exercise the router directly via tower::ServiceExt::oneshot.
//
// Covered:
// - GET /health, GET /metrics
// - identity header handling (401 / 404)
// - product → launch → upvote → review → credibility/quadrant/matchmaking flow
// - badge data, escaped HTML preview, SVG images behind the embed links
// - ownership / admin checks, admin moderation
// - stateless /scoring utilities

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value as Json};
use tower::ServiceExt as _; // for `oneshot`

use startup_credibility::{app, AppConfig};

const BODY_LIMIT: usize = 1024 * 1024; // 1MB, safe for tests

fn test_router() -> Router {
    app(AppConfig {
        public_base_url: "https://cred.example.org".into(),
        ..AppConfig::default()
    })
}

async fn send_raw(
    app: &Router,
    method: &str,
    uri: &str,
    user: Option<&str>,
    body: Option<Json>,
) -> (StatusCode, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(u) = user {
        builder = builder.header("x-user-id", u);
    }
    let req = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("build request");

    let resp = app.clone().oneshot(req).await.expect("oneshot");
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), BODY_LIMIT)
        .await
        .expect("read body")
        .to_vec();
    (status, bytes)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    user: Option<&str>,
    body: Option<Json>,
) -> (StatusCode, Json) {
    let (status, bytes) = send_raw(app, method, uri, user, body).await;
    let v = if bytes.is_empty() {
        Json::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            panic!("{method} {uri} returned non-JSON: {}", String::from_utf8_lossy(&bytes))
        })
    };
    (status, v)
}

async fn sync_user(app: &Router, external_id: &str, full_name: Option<&str>) -> Json {
    let (status, v) = send(
        app,
        "POST",
        "/api/v1/users/sync",
        None,
        Some(json!({
            "external_id": external_id,
            "email": format!("{external_id}@example.org"),
            "full_name": full_name,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "sync failed: {v}");
    v
}

async fn create_product(app: &Router, owner: &str, name: &str) -> u64 {
    let (status, v) = send(
        app,
        "POST",
        "/api/v1/products",
        Some(owner),
        Some(json!({
            "name": name,
            "website": "https://acme.io",
            "category": "AI/ML",
            "funding_stage": "Series A",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create product failed: {v}");
    v["id"].as_u64().expect("product id")
}

#[tokio::test]
async fn api_health_returns_200_and_ok_body() {
    let app = test_router();
    let (status, bytes) = send_raw(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(String::from_utf8(bytes).unwrap().trim(), "OK");
}

#[tokio::test]
async fn identity_header_is_required_and_must_be_known() {
    let app = test_router();
    let payload = json!({
        "name": "Acme", "website": "https://acme.io",
        "category": "AI/ML", "funding_stage": "Seed"
    });

    let (status, v) = send(&app, "POST", "/api/v1/products", None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(v["error"], "Unauthorized");

    let (status, v) = send(&app, "POST", "/api/v1/products", Some("ghost"), Some(payload)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(v["error"], "User not found");
}

#[tokio::test]
async fn missing_product_is_404_everywhere() {
    let app = test_router();
    for uri in [
        "/api/v1/products/999",
        "/api/v1/products/999/score",
        "/api/v1/insights/999/credibility",
        "/api/v1/insights/999/badge",
        "/api/v1/matchmaking/999",
        "/api/v1/badges/999",
        "/api/v1/reviews/999/sentiment-summary",
    ] {
        let (status, v) = send(&app, "GET", uri, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(v["error"], "Product not found", "{uri}");
    }

    let (status, v) = send(&app, "GET", "/api/v1/launches/999/upvote-status", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(v["error"], "Launch not found");
}

#[tokio::test]
async fn new_product_starts_from_defaults_or_signals() {
    let app = test_router();
    sync_user(&app, "founder", None).await;

    let id = create_product(&app, "founder", "Plain").await;
    let (_, score) = send(&app, "GET", &format!("/api/v1/products/{id}/score"), None, None).await;
    assert_eq!(score["trust_score"], 70);
    assert_eq!(score["level"], "Silver");

    let (status, v) = send(
        &app,
        "POST",
        "/api/v1/products",
        Some("founder"),
        Some(json!({
            "name": "Signals", "website": "https://signals.io",
            "category": "DevOps", "funding_stage": "Seed",
            "signals": {"has_https": true, "domain_age_years": 5, "employee_count": 120, "average_rating": 5.0}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(v["trust_score"], 96);
    assert_eq!(v["baseline"]["market_traction"], 90);

    let (_, mine) = send(&app, "GET", "/api/v1/products/mine", Some("founder"), None).await;
    assert_eq!(mine.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn activity_flows_into_trust_and_credibility() {
    let app = test_router();
    sync_user(&app, "founder", Some("Fran")).await;
    sync_user(&app, "buyer", Some("Bea")).await;
    let pid = create_product(&app, "founder", "Acme").await;

    // Launch + one upvote: traction 71, trust 0.40*71 + 0.35*70 + 0.25*70 = 70.4 → 70
    let (status, launch) = send(
        &app,
        "POST",
        "/api/v1/launches",
        Some("founder"),
        Some(json!({"product_id": pid, "tagline": "Ship it"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let lid = launch["id"].as_u64().unwrap();

    let (_, up) = send(&app, "POST", &format!("/api/v1/launches/{lid}/upvote"), Some("buyer"), None).await;
    assert_eq!(up["user_upvoted"], true);
    assert_eq!(up["upvotes"], 1);
    assert_eq!(up["trust_score"], 70);

    let (_, status_v) = send(
        &app,
        "GET",
        &format!("/api/v1/launches/{lid}/upvote-status"),
        Some("buyer"),
        None,
    )
    .await;
    assert_eq!(status_v["user_upvoted"], true);

    // 5 stars, empty comment: blend 0.8, sentiment floor(50 + 40) = 90,
    // 0.40*71 + 0.35*70 + 0.25*90 = 75.4 → 75, +2 review bonus
    let (status, created) = send(
        &app,
        "POST",
        "/api/v1/reviews",
        Some("buyer"),
        Some(json!({"product_id": pid, "rating": 5})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{created}");
    assert_eq!(created["trust_score"], 77);
    assert_eq!(created["review"]["sentiment_score"], 0.8);
    assert_eq!(created["review"]["reviewer_name"], "Bea");
    let rid = created["review"]["id"].as_u64().unwrap();

    let (_, reviews) = send(&app, "GET", &format!("/api/v1/reviews/{pid}"), None, None).await;
    assert_eq!(reviews[0]["sentiment_label"], "positive");

    let (_, summary) = send(
        &app,
        "GET",
        &format!("/api/v1/reviews/{pid}/sentiment-summary"),
        None,
        None,
    )
    .await;
    assert_eq!(summary["total_reviews"], 1);
    assert_eq!(summary["average_sentiment"], 80);

    // Credibility: 0.30*1 + 0.30*62 + 0.40*77 = 49.7 → 50
    let (_, cred) = send(&app, "GET", &format!("/api/v1/insights/{pid}/credibility"), None, None).await;
    assert_eq!(cred["overall_score"], 50);
    assert_eq!(cred["badge"]["tier"], "Emerging");
    assert_eq!(cred["breakdown"]["review_signal"], 62.0);
    assert_eq!(cred["raw_metrics"]["total_upvotes"], 1);
    assert_eq!(cred["weights"]["trust_score"], "40%");

    let (_, quadrant) = send(&app, "GET", "/api/v1/insights/quadrant", None, None).await;
    let entry = &quadrant["products"][0];
    assert_eq!(entry["quadrant"], "Visionaries");
    assert_eq!(entry["coordinates"], json!({"x": 50, "y": 71}));
    assert_eq!(quadrant["quadrants"].as_array().unwrap().len(), 4);

    let (_, mm) = send(&app, "GET", &format!("/api/v1/matchmaking/{pid}"), None, None).await;
    assert_eq!(mm["total_matches"], 5);
    assert_eq!(mm["recommended_buyers"][0]["buyer_type"], "Enterprise Fintech");
    assert_eq!(mm["recommended_buyers"][0]["match_score"], 85);
    assert_eq!(mm["recommended_buyers"][4]["buyer_type"], "Healthcare Provider");

    // Only the author may delete; trust falls back once the review is gone.
    let (status, _) = send(&app, "DELETE", &format!("/api/v1/reviews/{rid}"), Some("founder"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, del) = send(&app, "DELETE", &format!("/api/v1/reviews/{rid}"), Some("buyer"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(del["trust_score"], 70);

    // Toggling again removes the upvote.
    let (_, down) = send(&app, "POST", &format!("/api/v1/launches/{lid}/upvote"), Some("buyer"), None).await;
    assert_eq!(down["user_upvoted"], false);
    assert_eq!(down["upvotes"], 0);
}

#[tokio::test]
async fn leaderboard_marks_callers_upvotes() {
    let app = test_router();
    sync_user(&app, "founder", None).await;
    sync_user(&app, "voter", None).await;
    let pid = create_product(&app, "founder", "Acme").await;

    let mut launch_ids = Vec::new();
    for tagline in ["first", "second"] {
        let (_, l) = send(
            &app,
            "POST",
            "/api/v1/launches",
            Some("founder"),
            Some(json!({"product_id": pid, "tagline": tagline})),
        )
        .await;
        launch_ids.push(l["id"].as_u64().unwrap());
    }
    send(&app, "POST", &format!("/api/v1/launches/{}/upvote", launch_ids[1]), Some("voter"), None).await;

    let (_, board) = send(&app, "GET", "/api/v1/launches/leaderboard", Some("voter"), None).await;
    assert_eq!(board[0]["tagline"], "second");
    assert_eq!(board[0]["rank"], 1);
    assert_eq!(board[0]["user_upvoted"], true);
    assert_eq!(board[1]["user_upvoted"], false);

    let (_, anon) = send(&app, "GET", "/api/v1/launches/leaderboard", None, None).await;
    assert!(anon.as_array().unwrap().iter().all(|e| e["user_upvoted"] == false));
}

#[tokio::test]
async fn badge_data_and_escaped_preview() {
    let app = test_router();
    sync_user(&app, "founder", None).await;
    let pid = create_product(&app, "founder", "<b>Acme</b>").await;

    let (status, badge) = send(&app, "GET", &format!("/api/v1/badges/{pid}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(badge["badge"]["level"], "Silver");
    assert_eq!(
        badge["preview_url"],
        format!("https://cred.example.org/api/v1/badges/{pid}/preview")
    );
    assert!(badge["embed_codes"]["markdown"]
        .as_str()
        .unwrap()
        .contains("https://cred.example.org/product/"));

    let (status, bytes) = send_raw(&app, "GET", &format!("/api/v1/badges/{pid}/preview"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(bytes).unwrap();
    assert!(html.contains("&lt;b&gt;Acme&lt;/b&gt;"));
    assert!(!html.contains("<b>Acme</b>"));

    // Image links in the embed codes resolve to served SVGs.
    let image = format!("https://cred.example.org/api/v1/badges/{pid}/image");
    assert!(badge["embed_codes"]["markdown"].as_str().unwrap().contains(&image));
    assert!(badge["embed_codes"]["html"].as_str().unwrap().contains(&image));
    let path = image.trim_start_matches("https://cred.example.org");
    let (status, bytes) = send_raw(&app, "GET", path, None, None).await;
    assert_eq!(status, StatusCode::OK);
    let svg = String::from_utf8(bytes).unwrap();
    assert!(svg.starts_with("<svg"));
    assert!(svg.contains("&lt;b&gt;Acme&lt;/b&gt;"));
    assert!(svg.contains(">70</text>"));

    let (_, cred_badge) = send(&app, "GET", &format!("/api/v1/insights/{pid}/badge"), None, None).await;
    let svg_url = cred_badge["svg_url"].as_str().unwrap();
    assert_eq!(svg_url, format!("https://cred.example.org/api/v1/insights/{pid}/badge/image"));
    let (status, bytes) = send_raw(&app, "GET", svg_url.trim_start_matches("https://cred.example.org"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    let svg = String::from_utf8(bytes).unwrap();
    assert!(svg.contains("Credibility \u{b7} Emerging"));

    let (status, _) = send_raw(&app, "GET", "/api/v1/badges/999/image", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn owner_and_admin_guards() {
    let app = test_router();
    sync_user(&app, "founder", None).await;
    let other = sync_user(&app, "other", None).await;
    let pid = create_product(&app, "founder", "Acme").await;

    let edit = json!({
        "name": "Renamed", "website": "https://acme.io",
        "category": "AI/ML", "funding_stage": "Series B"
    });
    let (status, _) = send(&app, "PUT", &format!("/api/v1/products/{pid}"), Some("other"), Some(edit.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, v) = send(&app, "PUT", &format!("/api/v1/products/{pid}"), Some("founder"), Some(edit)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(v["name"], "Renamed");

    let other_id = other["id"].as_u64().unwrap();
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/v1/users/{other_id}/role"),
        Some("founder"),
        Some(json!({"role": "buyer"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "PUT", "/api/v1/users/me", Some("founder"), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, me) = send(
        &app,
        "PUT",
        "/api/v1/users/me",
        Some("founder"),
        Some(json!({"company_name": "Acme Inc"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["company_name"], "Acme Inc");
}

#[tokio::test]
async fn admin_moderation_flow() {
    let app = test_router();
    sync_user(&app, "founder", None).await;
    sync_user(&app, "reviewer", Some("Rita")).await;
    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/users/sync",
        None,
        Some(json!({"external_id": "mod", "email": "mod@example.org", "role": "admin"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let pid = create_product(&app, "founder", "Acme").await;

    let (status, _) = send(&app, "GET", "/api/v1/admin/stats", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, v) = send(&app, "GET", "/api/v1/admin/stats", Some("founder"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(v["details"], "Admin access required");

    let (status, created) = send(
        &app,
        "POST",
        "/api/v1/reviews",
        Some("reviewer"),
        Some(json!({"product_id": pid, "rating": 5, "comment": "great"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(created["trust_score"].as_u64().unwrap() > 70);
    let rid = created["review"]["id"].as_u64().unwrap();

    let (status, stats) = send(&app, "GET", "/api/v1/admin/stats", Some("mod"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        stats,
        json!({
            "total_products": 1, "total_users": 3, "total_reviews": 1,
            "total_upvotes": 0, "pending_products": 1
        })
    );

    let (status, approved) = send(&app, "POST", &format!("/api/v1/admin/products/{pid}/approve"), Some("mod"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(approved["success"], true);
    assert_eq!(approved["admin"], "mod@example.org");
    assert_eq!(approved["product"]["status"], "approved");
    let (_, pending) = send(&app, "GET", "/api/v1/admin/products?status=pending", Some("mod"), None).await;
    assert_eq!(pending, json!([]));
    let (_, listed) = send(&app, "GET", "/api/v1/admin/products?status=approved", Some("mod"), None).await;
    assert_eq!(listed[0]["id"], pid);

    let (_, all) = send(&app, "GET", "/api/v1/admin/reviews", Some("mod"), None).await;
    assert_eq!(all[0]["verified"], false);
    let (status, verified) = send(&app, "POST", &format!("/api/v1/admin/reviews/{rid}/verify"), Some("mod"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(verified["review"]["verified"], true);
    let (_, public) = send(&app, "GET", &format!("/api/v1/reviews/{pid}"), None, None).await;
    assert_eq!(public[0]["verified"], true);

    // Removing the only review drops the trust score back to the baseline.
    let (status, removed) = send(&app, "DELETE", &format!("/api/v1/admin/reviews/{rid}"), Some("mod"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(removed["trust_score"], 70);
    let (status, _) = send(&app, "DELETE", &format!("/api/v1/admin/reviews/{rid}"), Some("mod"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, deleted) = send(&app, "DELETE", &format!("/api/v1/admin/products/{pid}"), Some("mod"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["message"], format!("Product {pid} deleted"));
    let (status, _) = send(&app, "GET", &format!("/api/v1/products/{pid}"), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "POST", &format!("/api/v1/admin/products/{pid}/reject"), Some("mod"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deals_carry_computed_credibility() {
    let app = test_router();
    sync_user(&app, "founder", None).await;
    let pid = create_product(&app, "founder", "Acme").await;

    let (status, deal) = send(
        &app,
        "POST",
        "/api/v1/deals",
        Some("founder"),
        Some(json!({
            "product_id": pid,
            "pilot_title": "30-day pilot",
            "ideal_buyer": "Tech Enterprise",
            "pilot_duration": "30 days"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{deal}");
    // No activity: 0.30*0 + 0.30*0 + 0.40*70 = 28
    assert_eq!(deal["credibility_score"], 28);
    assert_eq!(deal["startup_name"], "Acme");
    assert_eq!(deal["status"], "open");

    let deal_id = deal["id"].as_u64().unwrap();
    let (status, req) = send(
        &app,
        "POST",
        "/api/v1/deals/request",
        None,
        Some(json!({"deal_id": deal_id, "company_name": "BigCo", "contact_email": "cto@bigco.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(req["request"]["status"], "pending");

    let (status, _) = send(
        &app,
        "POST",
        "/api/v1/deals/request",
        None,
        Some(json!({"deal_id": 9999, "company_name": "BigCo", "contact_email": "cto@bigco.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/api/v1/deals/requests", Some("founder"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn stateless_scoring_utilities() {
    let app = test_router();

    let (_, trust) = send(
        &app,
        "POST",
        "/api/v1/scoring/trust",
        None,
        Some(json!({"has_https": true, "domain_age_years": 5, "employee_count": 120, "average_rating": 5.0})),
    )
    .await;
    assert_eq!(trust["trust_score"], 96);

    let (_, cred) = send(
        &app,
        "POST",
        "/api/v1/scoring/credibility",
        None,
        Some(json!({"upvotes": 45, "review_count": 5, "average_rating": 4.2, "trust_score": 78})),
    )
    .await;
    assert_eq!(cred["overall_score"], 63);
    assert_eq!(cred["badge"]["tier"], "Validated");
    assert_eq!(cred["funding_stage"], "Series A");

    let (_, sent) = send(
        &app,
        "POST",
        "/api/v1/scoring/sentiment",
        None,
        Some(json!({"text": ""})),
    )
    .await;
    assert_eq!(sent["label"], "neutral");
    assert_eq!(sent["confidence"], 0.0);

    let (_, q) = send(&app, "GET", "/api/v1/scoring/quadrant?credibility=70&traction=70", None, None).await;
    assert_eq!(q["quadrant"], "Leaders");
    let (status, q) = send(&app, "GET", "/api/v1/scoring/quadrant?credibility=150&traction=-5", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(q["quadrant"], "Challengers");
    assert_eq!(q["coordinates"], json!({"x": 100, "y": 0}));

    let (status, m) = send(
        &app,
        "GET",
        "/api/v1/scoring/matches?category=AI%2FML&trust_score=400&traction=90",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(m[0]["reasons"][1], "High credibility (Trust Score: 100)");

    let (_, m) = send(
        &app,
        "GET",
        "/api/v1/scoring/matches?category=Gardening&trust_score=20&traction=20",
        None,
        None,
    )
    .await;
    assert_eq!(m, json!([]));
}

#[tokio::test]
async fn metrics_endpoint_reports_activity() {
    let app = test_router();
    sync_user(&app, "founder", None).await;
    let pid = create_product(&app, "founder", "Acme").await;
    send(
        &app,
        "POST",
        "/api/v1/reviews",
        Some("founder"),
        Some(json!({"product_id": pid, "rating": 4, "comment": "works well"})),
    )
    .await;

    let (status, bytes) = send_raw(&app, "GET", "/metrics", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(bytes).unwrap();
    for needle in ["reviews_created_total", "trust_refreshes_total", "sentiment_analyses_total"] {
        assert!(text.contains(needle), "missing {needle} in /metrics:\n{text}");
    }
}
