use axum::{extract::Request, http::HeaderName, middleware::Next, response::Response};
use log::*;
use tower_http::request_id::{
    MakeRequestUuid, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};

pub const CORRELATION_ID_HEADER: HeaderName = HeaderName::from_static("x-correlation-id");

/// Assigns a UUID correlation id to requests that arrive without one. A caller-supplied
/// `x-correlation-id` is kept as is.
pub fn set_correlation_id() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(CORRELATION_ID_HEADER, MakeRequestUuid)
}

/// Echoes the request's correlation id on the response.
pub fn propagate_correlation_id() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(CORRELATION_ID_HEADER)
}

/// Logs the start and outcome of every request tagged with its correlation id.
///
/// Must run inside [`set_correlation_id`], which stores the id as a [`RequestId`]
/// extension.
pub async fn log_request(request: Request, next: Next) -> Response {
    let id = request
        .extensions()
        .get::<RequestId>()
        .and_then(|id| id.header_value().to_str().ok())
        .unwrap_or("-")
        .to_string();

    let method = request.method().clone();
    let path = request.uri().path().to_string();
    info!("[{id}] {method} {path}");

    let response = next.run(request).await;

    info!("[{id}] {method} {path} -> {}", response.status());
    response
}
