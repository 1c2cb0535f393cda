//! Outer response cache middleware.
//!
//! Caches successful GET responses of the public page routes for the outer
//! revalidation window and serves them until a tag purge or expiry.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderName, HeaderValue, Method, Request, StatusCode, header::CACHE_CONTROL},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{debug, instrument, warn};

use super::{PageCache, keys::ResponseKey, store::CachedResponse};

const MAX_CACHED_BODY_BYTES: usize = 4 * 1024 * 1024;

#[instrument(skip_all, fields(path = %request.uri().path()))]
pub async fn response_cache_layer(
    State(cache): State<Arc<PageCache>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    if !cache.config().enabled || request.method() != Method::GET {
        return next.run(request).await;
    }

    let key = ResponseKey::new(request.uri().path(), request.uri().query());

    if let Some(cached) = cache.response(&key) {
        debug!(cache = "response", outcome = "hit", "serving cached response");
        return build_response(&cached);
    }

    debug!(cache = "response", outcome = "miss", "rendering response");
    let response = next.run(request).await;

    if response.status() != StatusCode::OK || forbids_storage(&response) {
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_CACHED_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(err) => {
            warn!(
                target = "vizesayfa::cache::middleware",
                error = %err,
                "failed to buffer response body"
            );
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let cached = CachedResponse {
        status: parts.status.as_u16(),
        headers: parts
            .headers
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.to_string(), value.to_string()))
            })
            .collect(),
        body: bytes.clone(),
    };
    cache.store_response(key, cached);

    Response::from_parts(parts, Body::from(bytes))
}

/// Responses marked `no-store` were rendered from a partial read.
fn forbids_storage(response: &Response) -> bool {
    response
        .headers()
        .get_all(CACHE_CONTROL)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .any(|directive| directive.trim().eq_ignore_ascii_case("no-store"))
}

fn build_response(cached: &CachedResponse) -> Response {
    let mut response = Response::new(Body::from(cached.body.clone()));
    *response.status_mut() = StatusCode::from_u16(cached.status).unwrap_or(StatusCode::OK);

    let headers = response.headers_mut();
    for (name, value) in &cached.headers {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            headers.append(name, value);
        }
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_store_directive_blocks_storage() {
        let mut response = StatusCode::OK.into_response();
        assert!(!forbids_storage(&response));

        response
            .headers_mut()
            .insert(CACHE_CONTROL, HeaderValue::from_static("private, No-Store"));
        assert!(forbids_storage(&response));
    }
}
