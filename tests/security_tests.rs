//! Adversarial input tests
//!
//! Drives the router in-process so raw, unnormalized request targets reach
//! the gateway exactly as written.

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use bytes::Bytes;
use pixedge_gateway::{routes, AppState, GatewayConfig, TokioSpawner};
use pixedge_store::{
    CacheStore, CachedResponse, MemoryCacheStore, MemoryObjectStore, ObjectMetadata, ObjectStore,
    StoreError, StoredObject,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

fn router_with(
    origin_url: &str,
    cache: Arc<dyn CacheStore>,
    objects: Arc<dyn ObjectStore>,
) -> Router {
    let mut config = GatewayConfig::default();
    config.origin_url = origin_url.to_string();
    let state = AppState::with_stores(config, cache, objects, Arc::new(TokioSpawner::new())).unwrap();
    routes::create_router(Arc::new(state))
}

fn router(origin_url: &str) -> (Router, MemoryObjectStore) {
    let objects = MemoryObjectStore::new();
    let app = router_with(
        origin_url,
        Arc::new(MemoryCacheStore::new(16)),
        Arc::new(objects.clone()),
    );
    (app, objects)
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Body that records whether anyone tried to read it
fn tripwire_body(polled: Arc<AtomicBool>) -> Body {
    let stream = futures::stream::once(async move {
        polled.store(true, Ordering::SeqCst);
        Ok::<_, std::io::Error>(Bytes::from(vec![0xFF, 0xD8, 0xFF, 0xE0]))
    });
    Body::from_stream(stream)
}

struct OfflineObjectStore;

#[async_trait]
impl ObjectStore for OfflineObjectStore {
    async fn put(&self, _key: &str, _data: Bytes, _metadata: ObjectMetadata) -> pixedge_store::Result<()> {
        Err(StoreError::Unavailable("bucket r2://internal-images unreachable".into()))
    }

    async fn get(&self, _key: &str) -> pixedge_store::Result<Option<StoredObject>> {
        Err(StoreError::Unavailable("bucket r2://internal-images unreachable".into()))
    }
}

struct OfflineCacheStore;

#[async_trait]
impl CacheStore for OfflineCacheStore {
    async fn lookup(&self, _key: &str) -> pixedge_store::Result<Option<CachedResponse>> {
        Err(StoreError::Unavailable("cache offline".into()))
    }

    async fn store(&self, _key: &str, _response: CachedResponse) -> pixedge_store::Result<()> {
        Err(StoreError::Unavailable("cache offline".into()))
    }
}

mod key_validation {
    use super::*;

    #[tokio::test]
    async fn test_traversal_rejected() {
        let origin = MockServer::start().await;
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&origin).await;
        let (app, _) = router(&origin.uri());

        let response = app
            .oneshot(Request::get("/images/../etc/passwd").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_text(response).await;
        assert!(body.contains("InvalidKey"));
        assert!(!body.contains("passwd"));
    }

    #[tokio::test]
    async fn test_hostile_keys_rejected() {
        let origin = MockServer::start().await;
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&origin).await;
        let (app, _) = router(&origin.uri());

        for target in [
            "/images//etc/passwd",
            "/images/a//b.png",
            "/images/a/../../b.png",
            "/images/.",
            "/images/a/./b.png",
            "/images/%2e%2e/secret.png",
            "/images/a%0d%0aSet-Cookie:x.png",
            "/images/a%00.png",
            "/images/%3Cscript%3E.png",
            "/images/a@evil.test/x.png",
            "/images/",
            "/images",
        ] {
            let response = app
                .clone()
                .oneshot(Request::get(target).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{target}");
            let body = body_text(response).await;
            assert!(!body.contains("script") && !body.contains("Cookie"), "{target}");
        }
    }

    #[tokio::test]
    async fn test_invalid_key_checked_before_size() {
        let (app, objects) = router("http://127.0.0.1:1");
        let polled = Arc::new(AtomicBool::new(false));

        let response = app
            .oneshot(
                Request::put("/images/../x.png")
                    .header("content-length", "20000000")
                    .body(tripwire_body(polled.clone()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(!polled.load(Ordering::SeqCst));
        assert!(objects.is_empty());
    }
}

mod upload_limits {
    use super::*;

    #[tokio::test]
    async fn test_declared_size_rejected_without_reading_body() {
        let (app, objects) = router("http://127.0.0.1:1");
        let polled = Arc::new(AtomicBool::new(false));

        let response = app
            .oneshot(
                Request::put("/images/x.png")
                    .header("content-length", "20000000")
                    .body(tripwire_body(polled.clone()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(!polled.load(Ordering::SeqCst), "body was read");
        assert!(objects.is_empty());
    }

    #[tokio::test]
    async fn test_undeclared_oversized_body_rejected() {
        let (app, objects) = router("http://127.0.0.1:1");

        // Chunked body with no Content-Length, 11 chunks of 1 MiB
        let chunks = (0..11).map(|i| {
            let mut chunk = vec![0u8; 1024 * 1024];
            if i == 0 {
                chunk[..3].copy_from_slice(&[0xFF, 0xD8, 0xFF]);
            }
            Ok::<_, std::io::Error>(Bytes::from(chunk))
        });
        let body = Body::from_stream(futures::stream::iter(chunks));

        let response = app
            .oneshot(Request::put("/images/x.jpg").body(body).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(objects.is_empty());
    }

    #[tokio::test]
    async fn test_understated_length_still_checked() {
        let (app, objects) = router("http://127.0.0.1:1");

        let chunks = (0..11).map(|_| Ok::<_, std::io::Error>(Bytes::from(vec![0xFFu8; 1024 * 1024])));
        let response = app
            .oneshot(
                Request::put("/images/liar.jpg")
                    .header("content-length", "16")
                    .body(Body::from_stream(futures::stream::iter(chunks)))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(objects.is_empty());
    }
}

mod content_sniffing {
    use super::*;

    #[tokio::test]
    async fn test_declared_content_type_ignored() {
        let (app, objects) = router("http://127.0.0.1:1");
        let mut gif = b"GIF89a".to_vec();
        gif.resize(32, 0);

        let response = app
            .oneshot(
                Request::put("/images/anim.png")
                    .header("content-type", "image/png")
                    .body(Body::from(gif))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let stored = objects.get("anim.png").await.unwrap().unwrap();
        assert_eq!(stored.metadata.content_type, "image/gif");
    }

    #[tokio::test]
    async fn test_script_with_image_content_type_rejected() {
        let (app, objects) = router("http://127.0.0.1:1");

        let response = app
            .oneshot(
                Request::put("/images/x.png")
                    .header("content-type", "image/png")
                    .body(Body::from("<svg onload=alert(1)></svg>"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert!(objects.is_empty());
    }
}

mod ssrf_protection {
    use super::*;

    #[tokio::test]
    async fn test_crafted_queries_stay_on_origin() {
        let origin = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
            .mount(&origin)
            .await;
        let (app, _) = router(&origin.uri());

        let targets = [
            "/images/a.png?@evil.test",
            "/images/a.png?url=http://evil.test/",
            "/images/a.png?//evil.test/x",
            "/images/a.png?%40evil.test:80",
            "/images/a.png?x=%2F%2Fevil.test",
        ];
        for target in targets {
            let response = app
                .clone()
                .oneshot(Request::get(target).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{target}");
        }

        // Every outbound request landed on the configured origin's transform route
        let received = origin.received_requests().await.unwrap();
        assert_eq!(received.len(), targets.len());
        for request in received {
            assert_eq!(request.url.path(), "/transform/a.png");
        }
    }
}

mod failure_handling {
    use super::*;

    #[tokio::test]
    async fn test_object_store_failure_is_generic_500() {
        let app = router_with(
            "http://127.0.0.1:1",
            Arc::new(MemoryCacheStore::new(16)),
            Arc::new(OfflineObjectStore),
        );
        let mut png = vec![0x89, 0x50, 0x4E, 0x47];
        png.resize(32, 0);

        let response = app
            .oneshot(Request::put("/images/a.png").body(Body::from(png)).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(response).await;
        assert!(body.contains("InternalError"));
        assert!(!body.contains("internal-images"));
        assert!(!body.contains("a.png"));
    }

    #[tokio::test]
    async fn test_cache_outage_fails_open() {
        let origin = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("cache-control", "max-age=60")
                    .set_body_bytes(b"img".to_vec()),
            )
            .expect(1)
            .mount(&origin)
            .await;

        let app = router_with(
            &origin.uri(),
            Arc::new(OfflineCacheStore),
            Arc::new(MemoryObjectStore::new()),
        );

        let response = app
            .oneshot(Request::get("/images/a.png").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("x-cache-status").unwrap(), "MISS");
        assert_eq!(body_text(response).await, "img");
    }
}
