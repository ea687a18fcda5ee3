//! # routedef
//!
//! A route-definition DSL: declare verb routes, nested groups with shared prefixes and
//! middleware, and conventional resource routes backed by controllers, then export the
//! flattened route list for an HTTP layer to register.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use routedef::dispatch::RouteTable;
//! use routedef::router::{handler, scope, RouteBuilder};
//! use routedef::{Method, Request, Response, StatusCode};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut routes = RouteBuilder::new();
//!     routes.group("/api", scope(|api| {
//!         api.get("/hello", handler(|_ctx| async {
//!             Response::new(StatusCode::Ok).body("Hello, World!")
//!         }))
//!     }))?;
//!
//!     let table = RouteTable::from_records(routes.export());
//!     let response = table.dispatch(Request::new(Method::Get, "/api/hello")).await;
//!     println!("{}", response.text());
//!     Ok(())
//! }
//! ```

// ── Route definition ──────────────────────────────────────────────────────────
pub mod router;

// ── Request handling for exported routes ──────────────────────────────────────
pub mod context;
pub mod dispatch;
pub mod http;
pub mod middleware;

// ── Convenience re-exports ────────────────────────────────────────────────────
pub use dispatch::RouteTable;
pub use http::{Headers, Method, Request, Response, StatusCode};
pub use router::{InvalidRouteArguments, RouteBuilder, RouteRecord};
