//! Basic usage example for the pixedge image gateway
//!
//! This example demonstrates:
//! - Starting a stand-in transform origin
//! - Uploading an image through the gateway
//! - Reading it back through the cache (MISS, then HIT)
//!
//! Run with: cargo run --example basic_usage

use axum::{http::header, routing::get, Router};
use bytes::Bytes;
use pixedge_core::CACHE_STATUS_HEADER;
use pixedge_gateway::{routes, AppState, GatewayConfig};
use std::sync::Arc;
use tokio::net::TcpListener;

const PNG: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

async fn spawn(app: Router) -> anyhow::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{}", addr))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    println!("🖼  pixedge - Basic Usage Example\n");

    // Stand-in origin that "transforms" every image into the same PNG
    let origin = Router::new().route(
        "/transform/{*key}",
        get(|| async {
            (
                [
                    (header::CONTENT_TYPE, "image/png"),
                    (header::CACHE_CONTROL, "public, max-age=3600"),
                ],
                Bytes::from_static(&PNG),
            )
        }),
    );
    let origin_url = spawn(origin).await?;
    println!("🔧 Transform origin at {}", origin_url);

    let config = GatewayConfig {
        origin_url,
        ..Default::default()
    };
    let state = Arc::new(AppState::new(config)?);
    let gateway = spawn(routes::create_router(state)).await?;
    println!("🚀 Gateway at {}\n", gateway);

    let client = reqwest::Client::new();

    // ==================== Upload ====================

    println!("📤 Uploading 'gallery/sunset.png'...");
    let mut body = PNG.to_vec();
    body.resize(256, 0);
    let res = client
        .put(format!("{}/images/gallery/sunset.png", gateway))
        .body(body)
        .send()
        .await?;
    let json: serde_json::Value = res.json().await?;
    println!("   ✅ {}", json);

    // ==================== Read through the cache ====================

    for attempt in 1..=2 {
        let res = client
            .get(format!("{}/images/gallery/sunset.png?w=320&format=webp", gateway))
            .send()
            .await?;
        let status = res
            .headers()
            .get(CACHE_STATUS_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_string();
        println!(
            "📥 Read #{}: {} {} ({} bytes)",
            attempt,
            res.status(),
            status,
            res.bytes().await?.len()
        );
        // Write-back happens in the background
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }

    println!("\n✨ Done");
    Ok(())
}
