use axum::{extract::Request, http::HeaderName, middleware::Next, response::Response};

pub const INITIATOR_HEADER: HeaderName = HeaderName::from_static("x-initiator-id");

/// Identity established by the upstream authentication layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub initiator: String,
}

/// Copies the upstream identity header into an [`AuthContext`] extension.
///
/// Authentication happens before requests reach this service, so nothing is rejected
/// here: requests without the header simply carry no context.
pub async fn auth_context(mut request: Request, next: Next) -> Response {
    let initiator = request
        .headers()
        .get(&INITIATOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    if let Some(initiator) = initiator {
        request.extensions_mut().insert(AuthContext { initiator });
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, middleware::from_fn, routing::get, Extension, Router};
    use tower::ServiceExt;

    async fn whoami(context: Option<Extension<AuthContext>>) -> String {
        context
            .map(|Extension(context)| context.initiator)
            .unwrap_or_else(|| "anonymous".to_string())
    }

    fn app() -> Router {
        Router::new()
            .route("/whoami", get(whoami))
            .layer(from_fn(auth_context))
    }

    async fn body(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_initiator_header_becomes_auth_context() {
        let request = Request::builder()
            .uri("/whoami")
            .header("x-initiator-id", "user-7")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body(response).await, "user-7");
    }

    #[tokio::test]
    async fn test_requests_without_identity_are_not_rejected() {
        let request = Request::builder().uri("/whoami").body(Body::empty()).unwrap();
        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body(response).await, "anonymous");
    }
}
