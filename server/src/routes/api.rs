use std::fmt::Write as _;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use chrono::Utc;
use glassmorph_shared::color_to_rgba;
use glassmorph_shared::numeric::leading_number;
use serde::Deserialize;

use crate::assets::{AssetContext, AssetHandle, asset_manifest};
use crate::state::{AppState, ObservabilitySnapshot};

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    let observability = state.observability.snapshot();
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::config::ASSET_VERSION,
        "started_at": state.started_at.to_rfc3339(),
        "uptime_secs": uptime_secs(&state),
        "observability": {
            "render_requests_total": observability.render_requests_total,
            "blocks_styled_total": observability.blocks_styled_total,
            "blocks_passthrough_total": observability.blocks_passthrough_total,
            "color_requests_total": observability.color_requests_total,
            "editor_requests_total": observability.editor_requests_total,
        }
    }))
}

pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let body = render_prometheus_metrics(uptime_secs(&state), state.observability.snapshot());

    (
        [
            (header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE),
            (header::CACHE_CONTROL, "no-store"),
        ],
        body,
    )
}

fn uptime_secs(state: &AppState) -> i64 {
    Utc::now()
        .signed_duration_since(state.started_at)
        .num_seconds()
        .max(0)
}

fn render_prometheus_metrics(uptime_secs: i64, observability: ObservabilitySnapshot) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "# HELP glassmorph_uptime_seconds Seconds since the server started."
    );
    let _ = writeln!(body, "# TYPE glassmorph_uptime_seconds gauge");
    let _ = writeln!(body, "glassmorph_uptime_seconds {uptime_secs}");

    let counters = [
        (
            "glassmorph_render_requests_total",
            "Total blocks passed through the render filter.",
            observability.render_requests_total,
        ),
        (
            "glassmorph_blocks_styled_total",
            "Total blocks that received glass styles.",
            observability.blocks_styled_total,
        ),
        (
            "glassmorph_blocks_passthrough_total",
            "Total blocks returned unchanged by the render filter.",
            observability.blocks_passthrough_total,
        ),
        (
            "glassmorph_color_requests_total",
            "Total /api/color conversions.",
            observability.color_requests_total,
        ),
        (
            "glassmorph_editor_requests_total",
            "Total editor registration, panel and preview requests.",
            observability.editor_requests_total,
        ),
    ];
    for (name, help, value) in counters {
        let _ = writeln!(body, "# HELP {name} {help}");
        let _ = writeln!(body, "# TYPE {name} counter");
        let _ = writeln!(body, "{name} {value}");
    }

    body
}

#[derive(Debug, Deserialize)]
pub struct ColorQuery {
    #[serde(default)]
    color: String,
    #[serde(default)]
    opacity: Option<String>,
}

/// Convert `?color=…&opacity=…` to an `rgba()` string. Opacity defaults to 1.
pub async fn convert_color(
    State(state): State<AppState>,
    Query(query): Query<ColorQuery>,
) -> Json<serde_json::Value> {
    state.observability.record_color_request();
    let opacity = query.opacity.as_deref().map_or(1.0, leading_number);
    Json(serde_json::json!({ "rgba": color_to_rgba(&query.color, opacity) }))
}

pub async fn get_assets(
    State(state): State<AppState>,
    Path(raw_context): Path<String>,
) -> Result<Json<Vec<AssetHandle>>, StatusCode> {
    let context = AssetContext::parse(&raw_context).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(asset_manifest(&state.assets_dir, context).await))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::render_prometheus_metrics;
    use crate::routes::test_support::spawn_test_server;
    use crate::state::{AppState, ObservabilitySnapshot};

    #[test]
    fn metrics_output_contains_prometheus_help_type_and_values() {
        let observability = ObservabilitySnapshot {
            render_requests_total: 12,
            blocks_styled_total: 9,
            blocks_passthrough_total: 3,
            color_requests_total: 4,
            editor_requests_total: 7,
        };

        let metrics = render_prometheus_metrics(42, observability);

        assert!(metrics.contains("# HELP glassmorph_uptime_seconds"));
        assert!(metrics.contains("# TYPE glassmorph_uptime_seconds gauge"));
        assert!(metrics.contains("glassmorph_uptime_seconds 42"));
        assert!(metrics.contains("# TYPE glassmorph_render_requests_total counter"));
        assert!(metrics.contains("glassmorph_render_requests_total 12"));
        assert!(metrics.contains("glassmorph_blocks_styled_total 9"));
        assert!(metrics.contains("glassmorph_blocks_passthrough_total 3"));
        assert!(metrics.contains("glassmorph_color_requests_total 4"));
        assert!(metrics.contains("glassmorph_editor_requests_total 7"));
    }

    #[tokio::test]
    async fn color_endpoint_normalizes_and_counts() {
        let state = AppState::new(PathBuf::from("assets"));
        let (addr, server_handle) = spawn_test_server(state).await;
        let base_url = format!("http://{addr}");
        let client = reqwest::Client::new();

        let cases = [
            ("color=%23fff&opacity=0.5", "rgba(255, 255, 255, 0.5)"),
            ("color=rgba(10,20,30,0.4)&opacity=0.5", "rgba(10, 20, 30, 0.2)"),
            ("color=%2312345&opacity=0.3", "rgba(255, 255, 255, 0.3)"),
            ("color=%23000000", "rgba(0, 0, 0, 1)"),
            ("opacity=0.7", "rgba(255, 255, 255, 0.7)"),
        ];
        for (query, expected) in cases {
            let body = client
                .get(format!("{base_url}/api/color?{query}"))
                .send()
                .await
                .expect("color request")
                .error_for_status()
                .expect("color status")
                .json::<serde_json::Value>()
                .await
                .expect("parse color response");
            assert_eq!(body["rgba"], expected, "query {query}");
        }

        let health = client
            .get(format!("{base_url}/api/health"))
            .send()
            .await
            .expect("health request")
            .json::<serde_json::Value>()
            .await
            .expect("parse health");
        assert_eq!(health["status"], "ok");
        assert_eq!(health["observability"]["color_requests_total"], 5);

        server_handle.abort();
        let _ = server_handle.await;
    }

    #[tokio::test]
    async fn metrics_endpoint_is_not_cached() {
        let state = AppState::new(PathBuf::from("assets"));
        let (addr, server_handle) = spawn_test_server(state).await;

        let response = reqwest::get(format!("http://{addr}/api/metrics"))
            .await
            .expect("metrics request");
        assert_eq!(
            response
                .headers()
                .get("cache-control")
                .and_then(|v| v.to_str().ok()),
            Some("no-store")
        );
        let text = response.text().await.expect("metrics text");
        assert!(text.contains("glassmorph_render_requests_total 0"));

        server_handle.abort();
        let _ = server_handle.await;
    }

    #[tokio::test]
    async fn asset_manifest_rejects_unknown_context() {
        let dir = tempfile::tempdir().expect("tempdir");
        let state = AppState::new(dir.path().to_path_buf());
        let (addr, server_handle) = spawn_test_server(state).await;

        let unknown = reqwest::get(format!("http://{addr}/api/assets/admin"))
            .await
            .expect("assets request");
        assert_eq!(unknown.status(), reqwest::StatusCode::NOT_FOUND);

        let frontend = reqwest::get(format!("http://{addr}/api/assets/frontend"))
            .await
            .expect("assets request")
            .json::<serde_json::Value>()
            .await
            .expect("parse assets");
        assert_eq!(frontend[0]["handle"], "glassmorph-frontend");
        assert_eq!(frontend[0]["inFooter"], false);

        server_handle.abort();
        let _ = server_handle.await;
    }
}
