//! # coupon-scout
//!
//! HTTP service that finds coupons for shopping-list items. The search
//! itself lives in the `coupon-search` crate; this crate adds the TOML
//! configuration layer and the axum API consumed by the web UI.

pub mod config;
pub mod error;
pub mod server;

pub use config::{ServerConfig, ServiceConfig};
pub use error::{Result, ServiceError};
pub use server::{router, run_server, serve};
