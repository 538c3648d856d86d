use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, Method},
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::warn;

/// Restricts browser access to the configured frontend origins. Non-browser
/// clients are unaffected.
pub fn add<S: Clone + Send + Sync + 'static>(
    allowed_origins: &[String],
) -> impl FnOnce(Router<S>) -> Router<S> {
    let origins = allowed_origins
        .iter()
        .filter_map(|origin| {
            origin
                .parse::<HeaderValue>()
                .inspect_err(|err| warn!("Ignoring invalid CORS origin {origin:?}: {err}"))
                .ok()
        })
        .collect::<Vec<_>>();

    move |router| {
        router.layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([CONTENT_TYPE]),
        )
    }
}
