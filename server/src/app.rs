use std::path::Path;

use axum::{
    Router,
    extract::Request,
    http::{HeaderValue, Method, header},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::routes;
use crate::state::AppState;

pub(crate) fn build_app(state: AppState) -> Router {
    let static_assets = Router::new()
        .fallback_service(
            ServeDir::new(state.assets_dir.as_path())
                .precompressed_br()
                .precompressed_gzip(),
        )
        .layer(middleware::from_fn(set_static_cache_control));

    // The block editor runs on the host site's origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::IF_NONE_MATCH])
        .expose_headers([header::ETAG]);

    let app = Router::new()
        .route("/api/health", get(routes::api::health))
        .route("/api/metrics", get(routes::api::metrics))
        .route("/api/color", get(routes::api::convert_color))
        .route("/api/assets/{context}", get(routes::api::get_assets))
        .route("/api/blocks", get(routes::blocks::get_catalogue))
        .route(
            "/api/blocks/register",
            post(routes::blocks::register_block_type),
        )
        .route("/api/blocks/panel", post(routes::blocks::get_panel))
        .route(
            "/api/blocks/editor-props",
            post(routes::blocks::get_editor_props),
        )
        .route("/api/render", post(routes::blocks::render))
        .layer(cors);

    app.layer(CompressionLayer::new())
        .fallback_service(static_assets)
        .with_state(state)
}

async fn set_static_cache_control(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_owned();
    let mut response = next.run(request).await;

    if response.status().is_success()
        && let Some(cache_control) = cache_control_for_path(&path)
    {
        response.headers_mut().insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static(cache_control),
        );
    }

    response
}

fn cache_control_for_path(path: &str) -> Option<&'static str> {
    let ext = Path::new(path).extension().and_then(|ext| ext.to_str())?;
    if !matches!(ext, "js" | "css") {
        return None;
    }

    if is_hashed_bundle_asset(path) {
        return Some("public, max-age=31536000, immutable");
    }

    // Unhashed assets are versioned by the host with a query string.
    Some("public, max-age=3600")
}

fn is_hashed_bundle_asset(path: &str) -> bool {
    let Some(filename) = Path::new(path).file_name().and_then(|name| name.to_str()) else {
        return false;
    };

    filename
        .split(['-', '_', '.'])
        .any(|segment| segment.len() >= 8 && segment.chars().all(|c| c.is_ascii_hexdigit()))
}
