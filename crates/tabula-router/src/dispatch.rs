//! Request dispatch: route lookup, handler invocation, response writing.

use std::sync::Arc;

use tracing::{debug, error};

use crate::error::RouterError;
use crate::handler::Reply;
use crate::request::Request;
use crate::response::Response;
use crate::table::{allowed_methods, RouteTable, VerbMap};

/// Dispatches requests through a shared [`RouteTable`].
#[derive(Debug, Clone)]
pub struct Dispatcher {
    table: Arc<RouteTable>,
}

impl Dispatcher {
    /// Creates a dispatcher over a route table.
    pub fn new(table: Arc<RouteTable>) -> Self {
        Self { table }
    }

    /// Returns the route table.
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Handles an incoming request.
    ///
    /// Unknown paths yield 404, known paths with an unregistered verb yield
    /// 405 with an `Allow` header, everything else goes to the handler.
    pub async fn dispatch(&self, mut request: Request) -> Response {
        debug!(method = %request.method, path = %request.path, "dispatching");

        let Some((verbs, params)) = self.table.lookup(&request.path) else {
            debug!(path = %request.path, "no route");
            return not_found(request.method.as_str(), &request.path);
        };

        request.params = params;
        dispatch_to(verbs, request).await
    }

    /// Answers a request whose verb is not a known [`crate::Method`].
    pub fn reject_unknown_method(&self, method: &str, path: &str) -> Response {
        match self.table.lookup(path) {
            Some((verbs, _)) => method_not_allowed(method, verbs),
            None => not_found(method, path),
        }
    }
}

/// Invokes the handler registered on `verbs` for the request's verb and
/// writes its reply.
pub async fn dispatch_to(verbs: &VerbMap, request: Request) -> Response {
    let Some(handler) = verbs.handler(request.method) else {
        debug!(method = %request.method, path = %verbs.path(), "method not allowed");
        return method_not_allowed(request.method.as_str(), verbs);
    };

    let reply = handler.call(request).await;
    write_reply(reply)
}

/// Converts a handler reply into a response.
///
/// A payload that cannot be serialized becomes a 500 carrying the
/// serialization error instead of the original status.
fn write_reply(reply: Reply) -> Response {
    let status = reply.status;
    let content_type = reply.payload.content_type();

    match reply.payload.into_bytes() {
        Ok(body) => {
            debug!(status, bytes = body.len(), "reply written");
            let response = Response::new(status).body(body);
            match content_type {
                Some(ct) => response.header("Content-Type", ct),
                None => response,
            }
        }
        Err(err) => {
            error!(status, error = %err, "error handling API request");
            Response::from(err)
        }
    }
}

fn not_found(method: &str, path: &str) -> Response {
    Response::from(RouterError::NotFound {
        method: method.to_string(),
        path: path.to_string(),
    })
}

fn method_not_allowed(method: &str, verbs: &VerbMap) -> Response {
    Response::from(RouterError::MethodNotAllowed {
        method: method.to_string(),
        path: verbs.path().to_string(),
        allowed: allowed_methods(verbs)
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}
