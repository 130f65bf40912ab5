//! HTTP API tests over the in-process router

mod common;

use axum::http::{header, StatusCode};
use serde_json::json;
use wiremock::{matchers::method, Mock, MockServer, ResponseTemplate};

use common::{empty, get, send_json, spawn_app, ADMIN_AUTH, WRONG_AUTH};

async fn sheet() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_health_check() {
    let app = spawn_app("http://127.0.0.1:9/exec");

    let (status, body) = app.json(get("/api/v1/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = app.json(get("/api/v1/ready", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_check_in_returns_ticket() {
    let server = sheet().await;
    let app = spawn_app(&server.uri());

    let (status, body) = app
        .json(send_json(
            "POST",
            "/api/v1/checkins",
            None,
            json!({
                "name": "  Budi Santoso ",
                "school": "SMA 1 Malang",
                "memberId": "M-77",
                "purpose": "Meminjam"
            }),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["greeting"], "Halo Budi Santoso");
    assert_eq!(body["visitor"]["name"], "Budi Santoso");
    assert_eq!(body["visitor"]["purpose"], "Meminjam");
    assert_eq!(body["visitor"]["aiGreeting"], "Halo Budi Santoso");

    let id = body["visitor"]["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("LIB-"));
    assert_eq!(
        body["ticket"]["qr_payload"],
        format!("UMMLIB:{}|Budi Santoso", id).as_str()
    );

    let (status, ticket) = app.json(get(&format!("/api/v1/tickets/{}", id), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ticket["visitor_id"], id.as_str());
}

#[tokio::test]
async fn test_check_in_requires_name() {
    let app = spawn_app("http://127.0.0.1:9/exec");

    let (status, body) = app
        .json(send_json("POST", "/api/v1/checkins", None, json!({ "name": "   " })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "BadValue");
}

#[tokio::test]
async fn test_unknown_ticket_is_not_found() {
    let app = spawn_app("http://127.0.0.1:9/exec");

    let (status, body) = app.json(get("/api/v1/tickets/LIB-404", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NoSuchVisitor");
    assert_eq!(body["code"], 4);
}

#[tokio::test]
async fn test_admin_endpoints_require_credentials() {
    let app = spawn_app("http://127.0.0.1:9/exec");

    for uri in [
        "/api/v1/visitors",
        "/api/v1/visitors/stats",
        "/api/v1/visitors/export",
        "/api/v1/settings/script-url",
    ] {
        let (status, _) = app.json(get(uri, None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);

        let (status, _) = app.json(get(uri, Some(WRONG_AUTH))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
    }

    let (status, _) = app.json(empty("POST", "/api/v1/visitors/sync", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_and_stats_show_local_cache() {
    let server = sheet().await;
    let app = spawn_app(&server.uri());

    for name in ["Ana", "Bayu"] {
        let (status, _) = app
            .json(send_json("POST", "/api/v1/checkins", None, json!({ "name": name })))
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, list) = app.json(get("/api/v1/visitors", Some(ADMIN_AUTH))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["source"], "local");
    assert_eq!(list["total"], 2);
    // Newest first
    assert_eq!(list["visitors"][0]["name"], "Bayu");

    let (status, stats) = app.json(get("/api/v1/visitors/stats", Some(ADMIN_AUTH))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["today"], 2);
    assert_eq!(stats["endpoint"], "default");
}

#[tokio::test]
async fn test_export_returns_csv_attachment() {
    let server = sheet().await;
    let app = spawn_app(&server.uri());

    app.json(send_json(
        "POST",
        "/api/v1/checkins",
        None,
        json!({ "name": "Citra, S.Pd", "phone": "08123", "purpose": "Belajar" }),
    ))
    .await;

    let (status, headers, body) = app
        .send(get("/api/v1/visitors/export?period=daily", Some(ADMIN_AUTH)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers.get(header::CONTENT_TYPE).unwrap(),
        "text/csv; charset=utf-8"
    );
    let disposition = headers
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(disposition.starts_with("attachment; filename=\"Export_Pengunjung_daily_"));
    assert!(disposition.ends_with(".csv\""));

    let csv = String::from_utf8(body).unwrap();
    let lines: Vec<&str> = csv.split('\n').collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        "ID,Nama,Email,No HP,Instansi,ID Anggota,Tujuan,Waktu Check-in,Pesan AI"
    );
    assert!(lines[1].contains("\"Citra, S.Pd\""));
    assert!(lines[1].contains(",'08123,"));
    assert!(lines[1].contains("\"Belajar\""));
}

#[tokio::test]
async fn test_export_rejects_unknown_period_and_empty_bucket() {
    let app = spawn_app("http://127.0.0.1:9/exec");

    let (status, _) = app
        .json(get("/api/v1/visitors/export?period=yearly", Some(ADMIN_AUTH)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .json(get("/api/v1/visitors/export", Some(ADMIN_AUTH)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_clear_cache_requires_confirmation() {
    let server = sheet().await;
    let app = spawn_app(&server.uri());
    app.json(send_json("POST", "/api/v1/checkins", None, json!({ "name": "Ana" })))
        .await;

    let (status, body) = app
        .json(empty("DELETE", "/api/v1/visitors/cache", Some(ADMIN_AUTH)))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "ConfirmationRequired");

    let (_, list) = app.json(get("/api/v1/visitors", Some(ADMIN_AUTH))).await;
    assert_eq!(list["total"], 1);

    let (status, _) = app
        .json(empty("DELETE", "/api/v1/visitors/cache?confirm=true", Some(ADMIN_AUTH)))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, list) = app.json(get("/api/v1/visitors", Some(ADMIN_AUTH))).await;
    assert_eq!(list["total"], 0);
}

#[tokio::test]
async fn test_sync_against_unreachable_sheet_reports_hint() {
    let app = spawn_app("http://127.0.0.1:9/exec");

    let (status, body) = app
        .json(empty("POST", "/api/v1/visitors/sync", Some(ADMIN_AUTH)))
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["message"].as_str().unwrap().contains("Anyone"));
}

#[tokio::test]
async fn test_script_url_settings_roundtrip() {
    let app = spawn_app("https://script.example.com/default/exec");

    let (status, settings) = app
        .json(get("/api/v1/settings/script-url", Some(ADMIN_AUTH)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["script_url"], "https://script.example.com/default/exec");
    assert_eq!(settings["endpoint"], "default");

    let (status, settings) = app
        .json(send_json(
            "PUT",
            "/api/v1/settings/script-url",
            Some(ADMIN_AUTH),
            json!({ "script_url": "https://script.example.com/custom/exec" }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["script_url"], "https://script.example.com/custom/exec");
    assert_eq!(settings["endpoint"], "custom");

    let (status, _) = app
        .json(send_json(
            "PUT",
            "/api/v1/settings/script-url",
            Some(ADMIN_AUTH),
            json!({ "script_url": "ftp://nope" }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, settings) = app
        .json(send_json(
            "PUT",
            "/api/v1/settings/script-url",
            Some(ADMIN_AUTH),
            json!({ "script_url": "" }),
        ))
        .await;
    assert_eq!(settings["endpoint"], "default");
}
