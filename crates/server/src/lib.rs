//! Crop Server - HTTP front end for the smart crop recommender
//!
//! Serves the seven-slider recommendation form, a JSON variant of the same
//! call, and the usual probes. The model artifact is loaded once when
//! [`ServerState`] is built; if that fails the server never binds.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # Endpoints
//!
//! - `GET /` - Recommendation form
//! - `POST /recommend` - Form submission, renders the result page
//! - `GET /api/v1` - API information
//! - `POST /api/v1/recommend` - JSON recommendation
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe with model provenance
//! - `GET /metrics` - Prometheus metrics
//!
//! # Configuration
//!
//! `server.{toml,yaml,json}` in the working directory (optional), then
//! `CROP_SERVER__*` environment variables, e.g. `CROP_SERVER__PORT=8080` or
//! `CROP_SERVER__ARTIFACT__PATH=models/forest.bin`. A `.env` file is read
//! first if present.

pub mod config;
pub mod error;
pub mod middleware;
pub mod render;
pub mod routes;
pub mod server;
pub mod state;
pub mod telemetry;

pub use crate::config::ServerConfig;
pub use crate::error::{ServerError, ServerResult};
pub use crate::server::{build_router, start_server};
pub use crate::state::ServerState;
