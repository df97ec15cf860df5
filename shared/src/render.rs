//! Server-side filter that adds the glass effect to rendered block markup.
//!
//! Each styled block gets a unique element id, the `has-glassmorphism` class
//! and a `<style>` block scoped to that id. The backdrop filter sits on the
//! element itself so it blurs what is behind it; the tint and border live on
//! `::before` below the content. No `isolation: isolate` is emitted because
//! the extra stacking context stops the backdrop blur.

use std::fmt::Write as _;
use std::sync::LazyLock;

use regex::{Captures, NoExpand, Regex};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::attributes::{GlassAttributes, GlassSettings};
use crate::blocks::is_render_supported;
use crate::colors::color_to_rgba;
use crate::editor::GLASS_CLASS;
use crate::numeric::format_number;

static FIRST_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i-u)<([a-z][a-z0-9]*)\s+").expect("opening tag pattern compiles")
});

static ID_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[\t\n\x0B\x0C\r ]+id=["'][^"']*["']"#).expect("id attribute pattern compiles")
});

static CLASS_DOUBLE_QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"class="([^"]*)""#).expect("class attribute pattern compiles")
});

static CLASS_SINGLE_QUOTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"class='([^']*)'").expect("class attribute pattern compiles")
});

/// A parsed block as handed to the render filter.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BlockInstance {
    /// `None` for freeform content between blocks.
    #[serde(rename = "blockName", default)]
    pub block_name: Option<String>,
    #[serde(default, deserialize_with = "attrs_or_default")]
    pub attrs: GlassAttributes,
}

impl BlockInstance {
    pub fn wants_glass(&self) -> bool {
        self.block_name.as_deref().is_some_and(is_render_supported) && self.attrs.is_enabled()
    }
}

/// Filter one block's rendered HTML.
///
/// `next_id` is only called when the block is styled, so ids are not burned
/// on blocks that pass through unchanged.
pub fn render_block(
    content: &str,
    block: &BlockInstance,
    next_id: impl FnOnce() -> String,
) -> String {
    if !block.wants_glass() {
        return content.to_owned();
    }

    let glass_id = next_id();
    let settings = GlassSettings::resolve(&block.attrs);
    let mut html = scoped_style(&glass_id, &settings);
    html.push_str(&apply_glass_markup(content, &glass_id));
    html
}

/// `<style>` block carrying the effect for the element with id `glass_id`.
pub fn scoped_style(glass_id: &str, settings: &GlassSettings) -> String {
    let id = esc_attr(glass_id);
    let tint = esc_attr(&color_to_rgba(&settings.tint, settings.opacity));
    let blur = esc_attr(&format_number(settings.blur_px));
    let saturation = esc_attr(&format_number(settings.saturation_percent));
    let border = esc_attr(&format_number(settings.border_opacity));

    let mut css = String::from("<style>\n");
    let _ = writeln!(css, "#{id} {{");
    let _ = writeln!(css, "    position: relative;");
    let _ = writeln!(css, "    backdrop-filter: blur({blur}px) saturate({saturation}%);");
    let _ = writeln!(css, "    -webkit-backdrop-filter: blur({blur}px) saturate({saturation}%);");
    let _ = writeln!(css, "}}");
    let _ = writeln!(css, "#{id}::before {{");
    let _ = writeln!(css, "    content: \"\";");
    let _ = writeln!(css, "    position: absolute;");
    let _ = writeln!(css, "    inset: 0;");
    let _ = writeln!(css, "    z-index: -1;");
    let _ = writeln!(css, "    pointer-events: none;");
    let _ = writeln!(css, "    background: {tint};");
    let _ = writeln!(css, "    border: 1px solid rgba(255, 255, 255, {border});");
    let _ = writeln!(css, "    border-radius: inherit;");
    let _ = writeln!(css, "}}");
    css.push_str("</style>");
    css
}

/// Put `glass_id` and the glass class on the block markup.
///
/// The id goes on the first opening tag that has attributes; if the markup
/// already carries an id anywhere, the first one is overwritten instead. The
/// class is appended to the first double-quoted `class` attribute, falling
/// back to a single-quoted one.
pub fn apply_glass_markup(content: &str, glass_id: &str) -> String {
    let id = esc_attr(glass_id);
    let mut html = content.to_owned();

    if FIRST_TAG.is_match(&html) {
        html = if ID_ATTRIBUTE.is_match(&html) {
            ID_ATTRIBUTE
                .replacen(&html, 1, NoExpand(&format!(" id=\"{id}\"")))
                .into_owned()
        } else {
            FIRST_TAG
                .replacen(&html, 1, |caps: &Captures| format!("<{} id=\"{id}\" ", &caps[1]))
                .into_owned()
        };
    }

    if html.contains("class=\"") {
        html = CLASS_DOUBLE_QUOTED
            .replacen(&html, 1, |caps: &Captures| {
                format!("class=\"{} {GLASS_CLASS}\"", &caps[1])
            })
            .into_owned();
    } else if html.contains("class='") {
        html = CLASS_SINGLE_QUOTED
            .replacen(&html, 1, |caps: &Captures| {
                format!("class='{} {GLASS_CLASS}'", &caps[1])
            })
            .into_owned();
    }

    html
}

/// Escape a value for use inside a quoted HTML attribute or style block.
pub fn esc_attr(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

// Blocks without attributes serialize them as `[]`.
fn attrs_or_default<'de, D>(deserializer: D) -> Result<GlassAttributes, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => serde_json::from_value(value).map_err(serde::de::Error::custom),
        _ => Ok(GlassAttributes::default()),
    }
}
