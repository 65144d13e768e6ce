//! Handler abstraction and handler results.

use std::fmt;
use std::future::Future;

use futures::FutureExt;
use serde::Serialize;

pub use futures::future::BoxFuture;

use crate::error::Result;
use crate::request::Request;
use crate::response::ErrorBody;

/// A request handler bound to one (path, verb) pair.
///
/// Closures of the form `Fn(Request) -> impl Future<Output = Reply>`
/// implement this trait, so simple routes need no dedicated type.
pub trait Handler: Send + Sync {
    /// Handles a request, producing a status and payload.
    fn call(&self, req: Request) -> BoxFuture<'static, Reply>;
}

impl<F, Fut> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Reply> + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture<'static, Reply> {
        self(req).boxed()
    }
}

/// A value that can be rendered as a JSON response body.
pub trait JsonBody: Send {
    /// Serializes the value.
    fn to_json(&self) -> serde_json::Result<Vec<u8>>;
}

impl<T: Serialize + Send> JsonBody for T {
    fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }
}

/// The data part of a handler result.
pub enum Payload {
    /// No body.
    Empty,
    /// Raw bytes, written unchanged.
    Bytes(Vec<u8>),
    /// Text, written as UTF-8.
    Text(String),
    /// A structured value, serialized to JSON when the response is written.
    Json(Box<dyn JsonBody>),
}

impl Payload {
    /// Wraps a serializable value.
    pub fn json<T: Serialize + Send + 'static>(value: T) -> Self {
        Self::Json(Box::new(value))
    }

    /// Converts the payload to the bytes written on the wire.
    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            Self::Empty => Ok(Vec::new()),
            Self::Bytes(bytes) => Ok(bytes),
            Self::Text(text) => Ok(text.into_bytes()),
            Self::Json(value) => Ok(value.to_json()?),
        }
    }

    /// Returns the content type matching the payload kind.
    pub const fn content_type(&self) -> Option<&'static str> {
        match self {
            Self::Empty => None,
            Self::Bytes(_) => Some("application/octet-stream"),
            Self::Text(_) => Some("text/plain; charset=utf-8"),
            Self::Json(_) => Some("application/json"),
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("Empty"),
            Self::Bytes(b) => f.debug_tuple("Bytes").field(&b.len()).finish(),
            Self::Text(t) => f.debug_tuple("Text").field(t).finish(),
            Self::Json(_) => f.write_str("Json(..)"),
        }
    }
}

/// What a handler returns: a status code and a payload.
#[derive(Debug)]
pub struct Reply {
    /// HTTP status code.
    pub status: u16,
    /// Response payload.
    pub payload: Payload,
}

impl Reply {
    /// Creates a reply.
    pub const fn new(status: u16, payload: Payload) -> Self {
        Self { status, payload }
    }

    /// Creates a reply with a JSON payload.
    pub fn json<T: Serialize + Send + 'static>(status: u16, value: T) -> Self {
        Self::new(status, Payload::json(value))
    }

    /// Creates a reply with a text payload.
    pub fn text(status: u16, text: impl Into<String>) -> Self {
        Self::new(status, Payload::Text(text.into()))
    }

    /// Creates a reply carrying an [`ErrorBody`].
    pub fn error(status: u16, message: impl Into<String>) -> Self {
        Self::json(status, ErrorBody::new(status, message))
    }
}
