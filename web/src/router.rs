use crate::{
    controller::{health_check_controller, meeting_summary_controller},
    error::{Error, ErrorMessage, ErrorResponse, Severity, NOT_FOUND_MESSAGE},
    middleware::{
        auth_context::auth_context,
        correlation_id::{log_request, propagate_correlation_id, set_correlation_id},
    },
    params, AppState,
};
use axum::{
    error_handling::HandleErrorLayer,
    http::StatusCode,
    middleware::from_fn,
    routing::{get, post},
    BoxError, Router,
};
use log::*;
use tower::{timeout::error::Elapsed, timeout::TimeoutLayer, ServiceBuilder};

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
        info(
            title = "Meeting Analyzer API"
        ),
        paths(
            health_check_controller::health_check,
            meeting_summary_controller::generate,
            meeting_summary_controller::index,
            meeting_summary_controller::read,
        ),
        components(
            schemas(
                domain::meeting_summary::MeetingSummary,
                params::meeting_summary::GenerateParams,
                params::meeting_summary::TranscriptionParams,
                ErrorResponse,
                ErrorMessage,
                Severity,
            )
        ),
        tags(
            (name = "meeting_analyzer", description = "Meeting transcript summarization API")
        )
    )]
struct ApiDoc;

pub const REQUEST_TIMEOUT_MESSAGE: &str = "Request timed out";
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "Method not allowed";

pub fn define_routes(app_state: AppState) -> Router {
    let request_timeout = app_state.config.request_timeout();

    Router::new()
        .merge(health_routes())
        .merge(meeting_summary_routes(app_state))
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        // Layers run bottom-up: the correlation id is assigned before anything else
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .layer(from_fn(auth_context))
        .layer(from_fn(log_request))
        .layer(propagate_correlation_id())
        .layer(set_correlation_id())
}

async fn not_found() -> Error {
    ErrorResponse::new(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE).into()
}

async fn method_not_allowed() -> Error {
    ErrorResponse::new(StatusCode::METHOD_NOT_ALLOWED, METHOD_NOT_ALLOWED_MESSAGE).into()
}

/// Turns failures raised by the tower middleware stack into the JSON error envelope.
async fn handle_middleware_error(err: BoxError) -> Error {
    if err.is::<Elapsed>() {
        warn!("Request exceeded the configured request timeout");
        ErrorResponse::new(StatusCode::GATEWAY_TIMEOUT, REQUEST_TIMEOUT_MESSAGE).into()
    } else {
        error!("Unhandled middleware error: {err}");
        ErrorResponse::new(StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into()
    }
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

fn meeting_summary_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/meeting-summaries",
            post(meeting_summary_controller::generate).get(meeting_summary_controller::index),
        )
        .route(
            "/meeting-summaries/{id}",
            get(meeting_summary_controller::read),
        )
        .with_state(app_state)
}
