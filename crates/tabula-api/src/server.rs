//! HTTP/1 server bridging hyper to the dispatcher.

use std::convert::Infallible;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request as HyperRequest, Response as HyperResponse, StatusCode};
use hyper_util::rt::TokioIo;
use tabula_router::{Dispatcher, Method, Request, Response};
use tokio::net::TcpListener;
use tracing::{debug, error, info};

/// Accepts connections forever, serving each on its own task.
pub async fn serve(listener: TcpListener, dispatcher: Dispatcher) -> std::io::Result<()> {
    info!(addr = %listener.local_addr()?, "listening");

    loop {
        let (stream, peer) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let dispatcher = dispatcher.clone();

        tokio::task::spawn(async move {
            let service = service_fn(move |req| {
                let dispatcher = dispatcher.clone();
                handle_request(req, dispatcher)
            });

            if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                debug!(peer = %peer, error = %err, "error serving connection");
            }
        });
    }
}

/// Converts a hyper request, dispatches it and converts the response back.
pub async fn handle_request(
    req: HyperRequest<Incoming>,
    dispatcher: Dispatcher,
) -> Result<HyperResponse<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    let path = Request::decode_path(parts.uri.path());

    let method = match parts.method.as_str().parse::<Method>() {
        Ok(method) => method,
        Err(_) => {
            let res = dispatcher.reject_unknown_method(parts.method.as_str(), &path);
            return Ok(into_hyper(res));
        }
    };

    let mut request = Request::new(method, path);
    if let Some(query) = parts.uri.query() {
        request.query = Request::parse_query_string(query);
    }
    for (key, value) in &parts.headers {
        if let Ok(v) = value.to_str() {
            request.append_header(key.as_str(), v);
        }
    }

    match body.collect().await {
        Ok(collected) => request.body = collected.to_bytes().to_vec(),
        Err(err) => {
            let res = Response::error(400, format!("failed to read request body: {err}"));
            return Ok(into_hyper(res));
        }
    }

    Ok(into_hyper(dispatcher.dispatch(request).await))
}

fn into_hyper(res: Response) -> HyperResponse<Full<Bytes>> {
    let status = StatusCode::from_u16(res.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut builder = HyperResponse::builder().status(status);
    for (key, value) in &res.headers {
        builder = builder.header(key.as_str(), value.as_str());
    }

    builder
        .body(Full::new(Bytes::from(res.body)))
        .unwrap_or_else(|err| {
            error!(error = %err, "invalid response");
            let mut fallback = HyperResponse::new(Full::new(Bytes::new()));
            *fallback.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
            fallback
        })
}
