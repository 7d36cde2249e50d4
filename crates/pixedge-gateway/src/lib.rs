//! # pixedge gateway
//!
//! Edge caching proxy for image assets with a validated upload path.
//!
//! This crate provides:
//! - **Read path**: cache lookup, origin forwarding, background write-back
//! - **Origin gateway**: SSRF-checked forwarding with timeout mapping
//! - **Upload pipeline**: size ceiling, magic-byte sniffing, object storage
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                   HTTP Clients                      │
//! └─────────────────────────┬───────────────────────────┘
//!                           │
//! ┌─────────────────────────▼───────────────────────────┐
//! │                   pixedge gateway                   │
//! ├─────────────────────────────────────────────────────┤
//! │   Request ID  │  Access Log  │  CORS  │  Tracing    │
//! ├──────────────────────────┬──────────────────────────┤
//! │   GET /images/{key}      │   PUT /images/{key}      │
//! │   CacheAdapter           │   size check + sniff     │
//! │   OriginGateway ──► origin /transform/{key}         │
//! ├──────────────────────────┴──────────────────────────┤
//! │                   pixedge-store                     │
//! │          (CacheStore, ObjectStore backends)         │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod background;
pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod origin;
pub mod routes;
pub mod server;
pub mod state;

pub use background::{TaskSpawner, TokioSpawner};
pub use cache::CacheAdapter;
pub use config::GatewayConfig;
pub use error::{ApiError, ErrorCode};
pub use origin::{OriginGateway, OriginResponse};
pub use server::{run_server, run_server_with_shutdown};
pub use state::AppState;
