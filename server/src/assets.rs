use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{
    ASSET_VERSION, EDITOR_SCRIPT, EDITOR_SCRIPT_MANIFEST, EDITOR_STYLESHEET, FRONTEND_STYLESHEET,
};

/// Where a set of assets is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetContext {
    /// The block editor canvas and inspector.
    Editor,
    /// The served page.
    Frontend,
}

impl AssetContext {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "editor" => Some(Self::Editor),
            "frontend" => Some(Self::Frontend),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Script,
    Style,
}

/// One asset the host page should load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetHandle {
    pub handle: &'static str,
    pub kind: AssetKind,
    pub src: String,
    pub dependencies: Vec<String>,
    pub version: String,
    pub in_footer: bool,
}

/// Build metadata written next to the compiled editor script.
#[derive(Debug, Default, Deserialize)]
struct ScriptManifest {
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default)]
    version: Option<String>,
}

/// List the assets to load for `context`.
///
/// The editor script and stylesheet are only offered once the script has
/// been built, which is detected through its manifest file. The frontend
/// stylesheet is loaded in both contexts so the canvas preview matches.
pub async fn asset_manifest(assets_dir: &Path, context: AssetContext) -> Vec<AssetHandle> {
    let mut assets = Vec::new();

    if context == AssetContext::Editor {
        match read_script_manifest(assets_dir).await {
            Some(manifest) => {
                assets.push(AssetHandle {
                    handle: "glassmorph-editor",
                    kind: AssetKind::Script,
                    src: format!("/{EDITOR_SCRIPT}"),
                    dependencies: manifest.dependencies,
                    version: manifest
                        .version
                        .unwrap_or_else(|| ASSET_VERSION.to_owned()),
                    in_footer: true,
                });
                assets.push(stylesheet("glassmorph-editor", EDITOR_STYLESHEET));
            }
            None => debug!("editor script is not built, skipping editor assets"),
        }
    }

    assets.push(stylesheet("glassmorph-frontend", FRONTEND_STYLESHEET));
    assets
}

fn stylesheet(handle: &'static str, file: &str) -> AssetHandle {
    AssetHandle {
        handle,
        kind: AssetKind::Style,
        src: format!("/{file}"),
        dependencies: Vec::new(),
        version: ASSET_VERSION.to_owned(),
        in_footer: false,
    }
}

async fn read_script_manifest(assets_dir: &Path) -> Option<ScriptManifest> {
    let path = assets_dir.join(EDITOR_SCRIPT_MANIFEST);
    let raw = tokio::fs::read(&path).await.ok()?;
    match serde_json::from_slice(&raw) {
        Ok(manifest) => Some(manifest),
        Err(e) => {
            warn!(error = %e, path = %path.display(), "ignoring unreadable editor script manifest");
            None
        }
    }
}
