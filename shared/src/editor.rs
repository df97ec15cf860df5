use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::attributes::GlassAttributes;
use crate::blocks::is_editor_supported;

/// Class added to every block wearing the effect, in the editor and on the page.
pub const GLASS_CLASS: &str = "has-glassmorphism";

/// Props forwarded to a block's wrapper element in the editor canvas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WrapperProps {
    #[serde(default, deserialize_with = "object_or_empty")]
    pub style: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    /// Anything else the editor put on the wrapper, passed through.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Merge the preview custom properties and class into the wrapper props of
/// an enabled, supported block. Other blocks keep their props as-is.
///
/// `frontend.css` turns the `--glass-*` properties into the actual backdrop
/// filter and tint so the canvas matches the served page.
pub fn editor_wrapper_props(
    name: &str,
    attrs: &GlassAttributes,
    mut wrapper: WrapperProps,
) -> WrapperProps {
    if !is_editor_supported(name) || !attrs.is_enabled() {
        return wrapper;
    }

    wrapper.style.extend(glass_custom_properties(attrs));
    let class_name = format!("{} {GLASS_CLASS}", wrapper.class_name.unwrap_or_default());
    wrapper.class_name = Some(class_name.trim().to_owned());
    wrapper
}

fn glass_custom_properties(attrs: &GlassAttributes) -> [(String, Value); 5] {
    [
        (
            "--glass-blur".to_owned(),
            Value::from(format!("{}px", attrs.blur_px())),
        ),
        (
            "--glass-opacity".to_owned(),
            Value::from(attrs.opacity_percent() / 100.0),
        ),
        ("--glass-tint".to_owned(), Value::from(attrs.tint())),
        (
            "--glass-saturation".to_owned(),
            Value::from(attrs.saturation_percent() / 100.0),
        ),
        (
            "--glass-border-opacity".to_owned(),
            Value::from(attrs.border_opacity_percent() / 100.0),
        ),
    ]
}

fn object_or_empty<'de, D>(deserializer: D) -> Result<Map<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Map<String, Value>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{WrapperProps, editor_wrapper_props};
    use crate::attributes::GlassAttributes;

    fn enabled() -> GlassAttributes {
        GlassAttributes {
            enabled: Some(true),
            ..GlassAttributes::default()
        }
    }

    #[test]
    fn enabled_block_gets_custom_properties_and_class() {
        let attrs = GlassAttributes {
            blur: Some(16.0),
            tint: Some("#ff000080".to_owned()),
            ..enabled()
        };

        let props = editor_wrapper_props("core/group", &attrs, WrapperProps::default());

        assert_eq!(props.class_name.as_deref(), Some("has-glassmorphism"));
        assert_eq!(props.style["--glass-blur"], json!("16px"));
        assert_eq!(props.style["--glass-opacity"], json!(0.5));
        assert_eq!(props.style["--glass-tint"], json!("#ff000080"));
        assert_eq!(props.style["--glass-saturation"], json!(1.0));
        assert_eq!(props.style["--glass-border-opacity"], json!(0.3));
    }

    #[test]
    fn existing_style_and_class_are_kept() {
        let wrapper: WrapperProps = serde_json::from_value(json!({
            "style": { "color": "red", "--glass-blur": "1px" },
            "className": "is-layout-flow",
            "data-align": "wide"
        }))
        .expect("wrapper props should parse");

        let props = editor_wrapper_props("core/columns", &enabled(), wrapper);

        assert_eq!(props.class_name.as_deref(), Some("is-layout-flow has-glassmorphism"));
        assert_eq!(props.style["color"], json!("red"));
        assert_eq!(props.style["--glass-blur"], json!("10px"));
        assert_eq!(props.extra["data-align"], json!("wide"));
    }

    #[test]
    fn null_style_is_treated_as_empty() {
        let wrapper: WrapperProps =
            serde_json::from_value(json!({ "style": null })).expect("wrapper props should parse");
        assert!(wrapper.style.is_empty());
    }

    #[test]
    fn disabled_or_unsupported_blocks_are_untouched() {
        let wrapper = WrapperProps {
            class_name: Some("custom".to_owned()),
            ..WrapperProps::default()
        };

        let disabled = editor_wrapper_props("core/group", &GlassAttributes::default(), wrapper.clone());
        assert_eq!(disabled, wrapper);

        let unsupported = editor_wrapper_props("core/paragraph", &enabled(), wrapper.clone());
        assert_eq!(unsupported, wrapper);
    }
}
