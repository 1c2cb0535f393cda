use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header::CACHE_CONTROL},
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::get,
};

use crate::{
    application::{
        page::{LoadedPage, PageOutcome, PageService},
        repos::HealthProbe,
    },
    cache::{PageCache, response_cache_layer},
    domain::types::Locale,
    presentation::views::{
        CountryTemplate, CustomPageTemplate, MenuTemplate, render_not_found_response,
        render_template_response,
    },
};

use super::{
    db_health_response,
    middleware::{log_responses, set_request_context},
};

#[derive(Clone)]
pub struct HttpState {
    pub pages: PageService,
    pub cache: Arc<PageCache>,
    pub health: Arc<dyn HealthProbe>,
}

pub fn build_router(state: HttpState) -> Router {
    // Rendered pages go through the outer response tier.
    let cached_routes = Router::new()
        .route("/", get(tr_home))
        .route("/en", get(en_home))
        .route("/en/", get(en_home))
        .route("/en/{slug}", get(en_page))
        .route("/{slug}", get(tr_page))
        .layer(middleware::from_fn_with_state(
            state.cache.clone(),
            response_cache_layer,
        ));

    let static_routes = Router::new().route("/_health/db", get(public_health));

    cached_routes
        .merge(static_routes)
        .fallback(fallback)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn tr_page(State(state): State<HttpState>, Path(slug): Path<String>) -> Response {
    render_page(&state, &slug, Locale::Tr).await
}

async fn en_page(State(state): State<HttpState>, Path(slug): Path<String>) -> Response {
    render_page(&state, &slug, Locale::En).await
}

async fn tr_home(State(state): State<HttpState>) -> Response {
    render_not_found_response(state.pages.brand(Locale::Tr), Locale::Tr)
}

async fn en_home(State(state): State<HttpState>) -> Response {
    render_not_found_response(state.pages.brand(Locale::En), Locale::En)
}

async fn fallback(State(state): State<HttpState>) -> Response {
    render_not_found_response(state.pages.brand(Locale::Tr), Locale::Tr)
}

async fn public_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.health.check().await)
}

async fn render_page(state: &HttpState, slug: &str, locale: Locale) -> Response {
    let LoadedPage { outcome, degraded } = state.pages.load_tracked(slug, locale).await;
    let mut response = match outcome {
        PageOutcome::Country(view) => {
            render_template_response(CountryTemplate { view: *view }, StatusCode::OK)
        }
        PageOutcome::CustomPage(view) => {
            render_template_response(CustomPageTemplate { view: *view }, StatusCode::OK)
        }
        PageOutcome::Menu(view) => {
            render_template_response(MenuTemplate { view: *view }, StatusCode::OK)
        }
        PageOutcome::Redirect(location) => return Redirect::permanent(&location).into_response(),
        PageOutcome::NotFound => return render_not_found_response(state.pages.brand(locale), locale),
    };

    if degraded {
        set_no_store(&mut response);
        return response;
    }
    with_revalidation_headers(response, state.cache.config().response_max_age_secs())
}

fn set_no_store(response: &mut Response) {
    let value = HeaderValue::from_static("no-store");
    response.headers_mut().insert(CACHE_CONTROL, value);
}

fn with_revalidation_headers(mut response: Response, max_age: u64) -> Response {
    if response.status() != StatusCode::OK {
        return response;
    }

    let value = format!("public, s-maxage={max_age}, stale-while-revalidate={max_age}");
    if let Ok(value) = HeaderValue::from_str(&value) {
        response.headers_mut().insert(CACHE_CONTROL, value);
    }
    response
}
