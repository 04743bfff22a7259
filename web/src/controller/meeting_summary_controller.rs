use crate::controller::ApiResponse;
use crate::error::ErrorResponse;
use crate::middleware::auth_context::AuthContext;
use crate::params::meeting_summary::{GenerateParams, IndexParams};
use crate::{AppState, Error};
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use domain::meeting::MeetingDetails;
use domain::meeting_summary::MeetingSummary;
use domain::query::SummaryQuery;
use domain::Id;

use log::*;

/// POST generate a summary for a meeting transcript
#[utoipa::path(
    post,
    path = "/meeting-summaries",
    request_body = GenerateParams,
    responses(
        (status = 202, description = "Summary generated", body = MeetingSummary),
        (status = 400, description = "Malformed request body", body = ErrorResponse),
        (status = 500, description = "Completion provider failed", body = ErrorResponse)
    )
)]
pub async fn generate(
    State(app_state): State<AppState>,
    auth_context: Option<Extension<AuthContext>>,
    params: Result<Json<GenerateParams>, JsonRejection>,
) -> Result<impl IntoResponse, Error> {
    let Json(params) = params?;
    let initiator = auth_context
        .as_ref()
        .map(|Extension(context)| context.initiator.as_str())
        .unwrap_or("unknown");
    debug!(
        "POST generate summary for meeting {} requested by {initiator}",
        params.meeting_id
    );

    let summary = app_state
        .meeting_summaries
        .generate(MeetingDetails::from(params))
        .await?;

    debug!("Generated meeting summary: {}", summary.id);

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse::new(StatusCode::ACCEPTED.into(), summary)),
    ))
}

/// GET all retained meeting summaries
#[utoipa::path(
    get,
    path = "/meeting-summaries",
    params(IndexParams),
    responses(
        (status = 200, description = "Successfully retrieved meeting summaries", body = [MeetingSummary]),
        (status = 400, description = "Bad pagination or filter parameters", body = ErrorResponse),
        (status = 501, description = "Summary retention is disabled", body = ErrorResponse)
    )
)]
pub async fn index(
    State(app_state): State<AppState>,
    params: Result<Query<IndexParams>, QueryRejection>,
) -> Result<impl IntoResponse, Error> {
    let Query(params) = params?;
    debug!("GET all meeting summaries with {params:?}");

    let query = SummaryQuery::new(params.offset, params.limit, params.filter.as_deref())?;
    let summaries = app_state.meeting_summaries.find_all(&query).await?;

    debug!("Found {} meeting summaries", summaries.len());

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), summaries)))
}

/// GET a particular meeting summary specified by its id.
#[utoipa::path(
    get,
    path = "/meeting-summaries/{id}",
    params(
        ("id" = uuid::Uuid, Path, description = "Meeting summary id to retrieve")
    ),
    responses(
        (status = 200, description = "Successfully retrieved a meeting summary", body = MeetingSummary),
        (status = 400, description = "Id is not a UUID", body = ErrorResponse),
        (status = 404, description = "Meeting summary not found", body = ErrorResponse),
        (status = 501, description = "Summary retention is disabled", body = ErrorResponse)
    )
)]
pub async fn read(
    State(app_state): State<AppState>,
    id: Result<Path<Id>, PathRejection>,
) -> Result<impl IntoResponse, Error> {
    let Path(id) = id?;
    debug!("GET meeting summary by id: {id}");

    let summary = app_state.meeting_summaries.find_by_id(id).await?;

    Ok(Json(ApiResponse::new(StatusCode::OK.into(), summary)))
}
