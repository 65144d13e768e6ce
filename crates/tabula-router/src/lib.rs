//! # tabula-router
//!
//! Path/verb routing and response dispatch for the tabula REST surface.
//!
//! This crate provides:
//! - Path patterns with `{name}` parameters
//! - A route table mapping each path to its verb map
//! - A dispatcher with uniform not-found / method-not-allowed handling
//! - Payload conversion (bytes, text, JSON) with a 500 fallback
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use tabula_router::{Dispatcher, Method, Reply, Request, RouteTable};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut table = RouteTable::new();
//! table
//!     .register("/widgets/{id}", Method::Get, |req: Request| async move {
//!         let id = req.params.get("id").unwrap_or_default().to_string();
//!         Reply::text(200, id)
//!     })
//!     .unwrap();
//!
//! let dispatcher = Dispatcher::new(Arc::new(table));
//! let res = dispatcher.dispatch(Request::get("/widgets/7")).await;
//! assert_eq!(res.status, 200);
//! assert_eq!(res.body_string(), Some("7".to_string()));
//!
//! let res = dispatcher.dispatch(Request::post("/widgets/7")).await;
//! assert_eq!(res.status, 405);
//! assert_eq!(res.headers.get("Allow"), Some(&"GET".to_string()));
//! # }
//! ```

mod dispatch;
mod error;
mod handler;
mod path;
mod request;
mod response;
mod table;

pub use dispatch::{dispatch_to, Dispatcher};
pub use error::{Result, RouterError};
pub use handler::{BoxFuture, Handler, JsonBody, Payload, Reply};
pub use path::PathPattern;
pub use request::{Method, PathParams, Request};
pub use response::{ErrorBody, Response};
pub use table::{allowed_methods, RouteDescriptor, RouteTable, VerbMap};
