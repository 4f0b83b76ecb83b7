//! Local mock Helix endpoints for tests, served from an ephemeral localhost
//! port so no test touches the real API.

use std::net::{Ipv4Addr, SocketAddr};

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use crate::helix::Helix;
use crate::util::env::Env;

pub const MOCK_TOKEN: &str = "mockedapptoken0000000000000000";

pub fn test_env() -> Env {
    Env {
        client_id: "mock-client-id".into(),
        client_secret: "mock-client-secret".into(),
        ignore_rate_limit: false,
        output_dir: "./data".into(),
    }
}

/// Binds a router on an ephemeral localhost port and returns a `Helix` client
/// pointed at it.
pub async fn client_for(router: Router) -> Helix {
    let listener = TcpListener::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let base = format!("http://{addr}");
    Helix::with_endpoints(&test_env(), &base, &format!("{base}/helix"))
}

/// Token + categories + streams all healthy.
pub async fn stock_server() -> Helix {
    client_for(
        Router::new()
            .route("/oauth2/token", post(token_ok))
            .route("/helix/games/top", get(categories_ok))
            .route("/helix/streams", get(streams_ok)),
    )
    .await
}

pub async fn failing_token_server() -> Helix {
    client_for(Router::new().route("/oauth2/token", post(upstream_error))).await
}

pub async fn empty_token_server() -> Helix {
    client_for(Router::new().route(
        "/oauth2/token",
        post(|| async { Json(json!({"token_type": "bearer", "expires_in": 4_846_074})) }),
    ))
    .await
}

pub async fn failing_categories_server() -> Helix {
    client_for(
        Router::new()
            .route("/oauth2/token", post(token_ok))
            .route("/helix/games/top", get(upstream_error)),
    )
    .await
}

pub async fn failing_streams_server() -> Helix {
    client_for(
        Router::new()
            .route("/oauth2/token", post(token_ok))
            .route("/helix/games/top", get(categories_ok))
            .route("/helix/streams", get(upstream_error)),
    )
    .await
}

async fn token_ok() -> Json<Value> {
    Json(json!({
        "access_token": MOCK_TOKEN,
        "expires_in": 4_846_074,
        "token_type": "bearer"
    }))
}

async fn categories_ok() -> impl IntoResponse {
    rate_limited(json!({
        "data": [
            {
                "id": "509658",
                "name": "Just Chatting",
                "box_art_url": "https://static-cdn.jtvnw.net/ttv-boxart/509658-{width}x{height}.jpg"
            },
            {
                "id": "516575",
                "name": "VALORANT",
                "box_art_url": "https://static-cdn.jtvnw.net/ttv-boxart/516575-{width}x{height}.jpg"
            }
        ]
    }))
}

/// Three live streams, one of them missing `language`, all carrying the extra
/// columns the projection is expected to drop.
async fn streams_ok() -> impl IntoResponse {
    rate_limited(json!({
        "data": [
            {
                "id": "40952121085",
                "user_id": "101051819",
                "user_login": "grimm",
                "user_name": "Grimm",
                "game_id": "509658",
                "game_name": "Just Chatting",
                "type": "live",
                "title": "comfy morning chat",
                "viewer_count": 28312,
                "started_at": "2026-08-30T08:02:31Z",
                "language": "en",
                "thumbnail_url": "https://static-cdn.jtvnw.net/previews-ttv/live_user_grimm-{width}x{height}.jpg",
                "tag_ids": ["6ea6bca4-4712-4ab9-a906-e3336a9d8039"]
            },
            {
                "id": "40952121086",
                "user_id": "101051820",
                "user_login": "miaou",
                "user_name": "miaou",
                "game_id": "509658",
                "game_name": "Just Chatting",
                "type": "live",
                "title": "drawing emotes !commands",
                "viewer_count": 412,
                "started_at": "2026-08-30T09:14:02Z",
                "thumbnail_url": "https://static-cdn.jtvnw.net/previews-ttv/live_user_miaou-{width}x{height}.jpg",
                "tag_ids": []
            },
            {
                "id": "40952121087",
                "user_id": "101051821",
                "user_login": "bune",
                "user_name": "bune",
                "game_id": "509658",
                "game_name": "Just Chatting",
                "type": "live",
                "title": "VODS LATER",
                "viewer_count": 9901,
                "started_at": "2026-08-30T07:45:00Z",
                "language": "en",
                "thumbnail_url": "https://static-cdn.jtvnw.net/previews-ttv/live_user_bune-{width}x{height}.jpg",
                "tag_ids": ["6ea6bca4-4712-4ab9-a906-e3336a9d8039"]
            }
        ]
    }))
}

fn rate_limited(body: Value) -> impl IntoResponse {
    (
        [("ratelimit-limit", "800"), ("ratelimit-remaining", "799")],
        Json(body),
    )
}

async fn upstream_error() -> impl IntoResponse {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "Internal Server Error",
            "status": 500,
            "message": ""
        })),
    )
}
