use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use glassmorph_shared::{EDITOR_BLOCKS, RENDER_BLOCKS, attribute_schema};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::config::GLASS_ID_PREFIX;

/// Block catalogue served by `/api/blocks`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockCatalogue {
    pub version: &'static str,
    pub render_blocks: &'static [&'static str],
    pub editor_blocks: &'static [&'static str],
    pub attributes: Map<String, Value>,
}

impl BlockCatalogue {
    pub fn current() -> Self {
        Self {
            version: crate::config::ASSET_VERSION,
            render_blocks: RENDER_BLOCKS,
            editor_blocks: EDITOR_BLOCKS,
            attributes: attribute_schema(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    /// Last handed-out block id number; ids start at 1.
    pub glass_id_seq: Arc<AtomicU64>,
    /// Pre-serialized catalogue, built once and shared by every request.
    pub catalogue_json: Arc<Bytes>,
    pub catalogue_etag: Arc<str>,
    pub assets_dir: Arc<PathBuf>,
    pub started_at: DateTime<Utc>,
    pub observability: Arc<ObservabilityCounters>,
}

#[derive(Debug, Default)]
pub struct ObservabilityCounters {
    render_requests_total: AtomicU64,
    blocks_styled_total: AtomicU64,
    blocks_passthrough_total: AtomicU64,
    color_requests_total: AtomicU64,
    editor_requests_total: AtomicU64,
}

#[derive(Debug, Clone, Copy)]
pub struct ObservabilitySnapshot {
    pub render_requests_total: u64,
    pub blocks_styled_total: u64,
    pub blocks_passthrough_total: u64,
    pub color_requests_total: u64,
    pub editor_requests_total: u64,
}

impl ObservabilityCounters {
    pub fn snapshot(&self) -> ObservabilitySnapshot {
        ObservabilitySnapshot {
            render_requests_total: self.render_requests_total.load(Ordering::Relaxed),
            blocks_styled_total: self.blocks_styled_total.load(Ordering::Relaxed),
            blocks_passthrough_total: self.blocks_passthrough_total.load(Ordering::Relaxed),
            color_requests_total: self.color_requests_total.load(Ordering::Relaxed),
            editor_requests_total: self.editor_requests_total.load(Ordering::Relaxed),
        }
    }

    pub fn record_render_request(&self, styled: bool) {
        self.render_requests_total.fetch_add(1, Ordering::Relaxed);
        if styled {
            self.blocks_styled_total.fetch_add(1, Ordering::Relaxed);
        } else {
            self.blocks_passthrough_total
                .fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_color_request(&self) {
        self.color_requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_editor_request(&self) {
        self.editor_requests_total.fetch_add(1, Ordering::Relaxed);
    }
}

impl AppState {
    pub fn new(assets_dir: PathBuf) -> Self {
        let catalogue_json = serde_json::to_vec(&BlockCatalogue::current())
            .map(Bytes::from)
            .unwrap_or_else(|e| {
                warn!(error = %e, "failed to serialize block catalogue");
                Bytes::from_static(br#"{"renderBlocks":[],"editorBlocks":[],"attributes":{}}"#)
            });
        let catalogue_etag = format!("\"{:08x}\"", crc32fast::hash(&catalogue_json));

        Self {
            glass_id_seq: Arc::new(AtomicU64::new(0)),
            catalogue_json: Arc::new(catalogue_json),
            catalogue_etag: Arc::from(catalogue_etag),
            assets_dir: Arc::new(assets_dir),
            started_at: Utc::now(),
            observability: Arc::new(ObservabilityCounters::default()),
        }
    }

    /// Hand out the next process-unique block id (`glass-1`, `glass-2`, ...).
    pub fn next_glass_id(&self) -> String {
        let n = self.glass_id_seq.fetch_add(1, Ordering::Relaxed) + 1;
        format!("{GLASS_ID_PREFIX}{n}")
    }
}
