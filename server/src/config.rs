use std::path::PathBuf;

pub const DEFAULT_SERVER_PORT: u16 = 3000;
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_ASSETS_DIR: &str = "assets";

/// Prefix of the per-block element ids handed out by the render filter.
pub const GLASS_ID_PREFIX: &str = "glass-";
/// Version stamped on enqueued assets for cache busting.
pub const ASSET_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const EDITOR_SCRIPT: &str = "build/index.js";
pub const EDITOR_SCRIPT_MANIFEST: &str = "build/index.asset.json";
pub const EDITOR_STYLESHEET: &str = "editor.css";
pub const FRONTEND_STYLESHEET: &str = "frontend.css";

pub fn server_port() -> u16 {
    std::env::var("GLASSMORPH_PORT")
        .ok()
        .and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_SERVER_PORT)
}

pub fn bind_addr() -> String {
    std::env::var("GLASSMORPH_BIND_ADDR")
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned())
}

pub fn assets_dir() -> PathBuf {
    std::env::var("GLASSMORPH_ASSETS_DIR")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ASSETS_DIR))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{assets_dir, bind_addr, server_port};

    #[test]
    fn port_defaults_when_unset_or_invalid() {
        temp_env::with_var_unset("GLASSMORPH_PORT", || assert_eq!(server_port(), 3000));
        temp_env::with_var("GLASSMORPH_PORT", Some("0"), || assert_eq!(server_port(), 3000));
        temp_env::with_var("GLASSMORPH_PORT", Some("http"), || {
            assert_eq!(server_port(), 3000);
        });
        temp_env::with_var("GLASSMORPH_PORT", Some(" 8080 "), || {
            assert_eq!(server_port(), 8080);
        });
    }

    #[test]
    fn bind_addr_ignores_blank_values() {
        temp_env::with_var("GLASSMORPH_BIND_ADDR", Some("  "), || {
            assert_eq!(bind_addr(), "0.0.0.0");
        });
        temp_env::with_var("GLASSMORPH_BIND_ADDR", Some("127.0.0.1"), || {
            assert_eq!(bind_addr(), "127.0.0.1");
        });
    }

    #[test]
    fn assets_dir_can_be_overridden() {
        temp_env::with_var_unset("GLASSMORPH_ASSETS_DIR", || {
            assert_eq!(assets_dir(), PathBuf::from("assets"));
        });
        temp_env::with_var("GLASSMORPH_ASSETS_DIR", Some("/srv/glass"), || {
            assert_eq!(assets_dir(), PathBuf::from("/srv/glass"));
        });
    }
}
