use std::sync::Arc;

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use glassmorph_shared::{
    BlockInstance, GlassAttributes, PanelDescriptor, WrapperProps, editor_wrapper_props,
    panel_for, register_attributes, render_block,
};
use serde::Deserialize;
use tracing::debug;

use crate::state::AppState;

const CATALOGUE_CACHE_CONTROL: &str = "public, max-age=300";
const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Serve the pre-serialized block catalogue and attribute schema.
pub async fn get_catalogue(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let etag = Arc::clone(&state.catalogue_etag);
    if if_none_match_matches(&headers, &etag) {
        return not_modified_response(CATALOGUE_CACHE_CONTROL, &etag);
    }

    json_bytes_response(
        (*state.catalogue_json).clone(),
        CATALOGUE_CACHE_CONTROL,
        &etag,
    )
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    name: String,
    #[serde(default)]
    settings: serde_json::Value,
}

/// Block-type registration hook: returns the settings with the glass
/// attributes merged in for supported blocks.
pub async fn register_block_type(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Json<serde_json::Value> {
    state.observability.record_editor_request();
    Json(register_attributes(request.settings, &request.name))
}

#[derive(Debug, Deserialize)]
pub struct PanelRequest {
    name: String,
    #[serde(default)]
    attributes: GlassAttributes,
}

pub async fn get_panel(
    State(state): State<AppState>,
    Json(request): Json<PanelRequest>,
) -> Json<Option<PanelDescriptor>> {
    state.observability.record_editor_request();
    Json(panel_for(&request.name, &request.attributes))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorPropsRequest {
    name: String,
    #[serde(default)]
    attributes: GlassAttributes,
    #[serde(default)]
    wrapper_props: WrapperProps,
}

pub async fn get_editor_props(
    State(state): State<AppState>,
    Json(request): Json<EditorPropsRequest>,
) -> Json<WrapperProps> {
    state.observability.record_editor_request();
    Json(editor_wrapper_props(
        &request.name,
        &request.attributes,
        request.wrapper_props,
    ))
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    #[serde(flatten)]
    block: BlockInstance,
    #[serde(default)]
    content: String,
}

/// Render filter for one block's served HTML.
pub async fn render(State(state): State<AppState>, Json(request): Json<RenderRequest>) -> Response {
    let styled = request.block.wants_glass();
    state.observability.record_render_request(styled);

    let html = render_block(&request.content, &request.block, || {
        let glass_id = state.next_glass_id();
        debug!(
            block = request.block.block_name.as_deref().unwrap_or_default(),
            %glass_id,
            "applying glass styles"
        );
        glass_id
    });

    ([(header::CONTENT_TYPE, HTML_CONTENT_TYPE)], html).into_response()
}

fn json_bytes_response(body: Bytes, cache_control: &'static str, etag: &str) -> Response {
    let mut response = Response::new(Body::from(body));
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache_control),
    );
    if let Ok(etag_header) = HeaderValue::from_str(etag) {
        headers.insert(header::ETAG, etag_header);
    }
    response
}

fn not_modified_response(cache_control: &'static str, etag: &str) -> Response {
    let mut response = StatusCode::NOT_MODIFIED.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(cache_control),
    );
    if let Ok(etag_header) = HeaderValue::from_str(etag) {
        headers.insert(header::ETAG, etag_header);
    }
    response
}

fn normalize_etag(candidate: &str) -> &str {
    candidate.strip_prefix("W/").unwrap_or(candidate).trim()
}

fn if_none_match_matches(headers: &HeaderMap, etag: &str) -> bool {
    let Some(value) = headers.get(header::IF_NONE_MATCH) else {
        return false;
    };
    let Ok(raw) = value.to_str() else {
        return false;
    };

    raw.split(',').any(|candidate| {
        let candidate = candidate.trim();
        candidate == "*" || normalize_etag(candidate) == normalize_etag(etag)
    })
}
