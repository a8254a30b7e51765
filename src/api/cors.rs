use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

/// CORS policy for one endpoint.
///
/// Credentials are always allowed, so the origin is echoed back rather than
/// answered with a literal `*`. `OPTIONS` requests are answered by the layer
/// itself with an empty 200.
pub fn policy(allowed_origins: &[String], methods: &[Method], headers: &[HeaderName]) -> CorsLayer {
    let allow_origin = if allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::mirror_request()
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        AllowOrigin::list(origins)
    };

    let mut methods = methods.to_vec();
    if !methods.contains(&Method::OPTIONS) {
        methods.push(Method::OPTIONS);
    }

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods(methods)
        .allow_headers(headers.to_vec())
}
