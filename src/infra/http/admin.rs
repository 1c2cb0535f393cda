//! Admin listener: cache revalidation hooks for the editing tools and a
//! database health probe. Bound to a separate, non-public socket.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;

use crate::{
    application::{error::HttpError, repos::HealthProbe},
    cache::{CacheTag, PageCache},
};

use super::{db_health_response, middleware::log_responses};

#[derive(Clone)]
pub struct AdminState {
    pub cache: Arc<PageCache>,
    pub health: Arc<dyn HealthProbe>,
}

pub fn build_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/_cache/revalidate", post(revalidate_tag))
        .route("/_cache/invalidate", post(invalidate_cache))
        .route("/_health/db", get(admin_health))
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RevalidateQuery {
    tag: String,
}

async fn revalidate_tag(
    State(state): State<AdminState>,
    Query(query): Query<RevalidateQuery>,
) -> Response {
    match query.tag.parse::<CacheTag>() {
        Ok(tag) => {
            state.cache.invalidate_tag(tag);
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => HttpError::from_error(
            "infra::http::admin::revalidate_tag",
            StatusCode::BAD_REQUEST,
            "Unknown cache tag",
            &err,
        )
        .into_response(),
    }
}

async fn invalidate_cache(State(state): State<AdminState>) -> Response {
    state.cache.invalidate_all();
    StatusCode::NO_CONTENT.into_response()
}

async fn admin_health(State(state): State<AdminState>) -> Response {
    db_health_response(state.health.check().await)
}
