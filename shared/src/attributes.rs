use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::blocks::is_editor_supported;
use crate::numeric::{format_number, leading_number};

pub const ATTR_ENABLED: &str = "glassmorphismEnabled";
pub const ATTR_BLUR: &str = "glassmorphismBlur";
pub const ATTR_OPACITY: &str = "glassmorphismOpacity";
pub const ATTR_TINT: &str = "glassmorphismTint";
pub const ATTR_SATURATION: &str = "glassmorphismSaturation";
pub const ATTR_BORDER_OPACITY: &str = "glassmorphismBorderOpacity";

pub const DEFAULT_BLUR_PX: f64 = 10.0;
pub const DEFAULT_OPACITY_PERCENT: f64 = 50.0;
pub const DEFAULT_TINT: &str = "rgba(255,255,255,0.1)";
pub const DEFAULT_SATURATION_PERCENT: f64 = 100.0;
pub const DEFAULT_BORDER_OPACITY_PERCENT: f64 = 30.0;

/// Glass attributes as stored on a block instance.
///
/// Every field is optional; a missing one falls back to its registered
/// default. Values saved by older editors may be strings, so numeric fields
/// accept numeric strings as well.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlassAttributes {
    #[serde(
        rename = "glassmorphismEnabled",
        default,
        deserialize_with = "truthy",
        skip_serializing_if = "Option::is_none"
    )]
    pub enabled: Option<bool>,
    #[serde(
        rename = "glassmorphismBlur",
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub blur: Option<f64>,
    #[serde(
        rename = "glassmorphismOpacity",
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub opacity: Option<f64>,
    #[serde(
        rename = "glassmorphismTint",
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub tint: Option<String>,
    #[serde(
        rename = "glassmorphismSaturation",
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub saturation: Option<f64>,
    #[serde(
        rename = "glassmorphismBorderOpacity",
        default,
        deserialize_with = "lenient_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub border_opacity: Option<f64>,
}

impl GlassAttributes {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(false)
    }

    pub fn blur_px(&self) -> f64 {
        self.blur.unwrap_or(DEFAULT_BLUR_PX)
    }

    pub fn opacity_percent(&self) -> f64 {
        self.opacity.unwrap_or(DEFAULT_OPACITY_PERCENT)
    }

    pub fn tint(&self) -> &str {
        self.tint.as_deref().unwrap_or(DEFAULT_TINT)
    }

    pub fn saturation_percent(&self) -> f64 {
        self.saturation.unwrap_or(DEFAULT_SATURATION_PERCENT)
    }

    pub fn border_opacity_percent(&self) -> f64 {
        self.border_opacity.unwrap_or(DEFAULT_BORDER_OPACITY_PERCENT)
    }
}

/// Attribute values with defaults applied and percentages turned into
/// fractions, ready for CSS output.
#[derive(Debug, Clone, PartialEq)]
pub struct GlassSettings {
    pub blur_px: f64,
    /// Tint opacity in `[0, 1]`.
    pub opacity: f64,
    pub tint: String,
    pub saturation_percent: f64,
    /// Border opacity in `[0, 1]`.
    pub border_opacity: f64,
}

impl GlassSettings {
    pub fn resolve(attrs: &GlassAttributes) -> Self {
        Self {
            blur_px: attrs.blur_px(),
            opacity: attrs.opacity_percent() / 100.0,
            tint: attrs.tint().to_owned(),
            saturation_percent: attrs.saturation_percent(),
            border_opacity: attrs.border_opacity_percent() / 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    Boolean,
    Number,
    String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeDefinition {
    #[serde(skip)]
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: AttributeType,
    pub default: Value,
}

pub fn attribute_definitions() -> Vec<AttributeDefinition> {
    vec![
        AttributeDefinition {
            name: ATTR_ENABLED,
            kind: AttributeType::Boolean,
            default: Value::Bool(false),
        },
        AttributeDefinition {
            name: ATTR_BLUR,
            kind: AttributeType::Number,
            default: DEFAULT_BLUR_PX.into(),
        },
        AttributeDefinition {
            name: ATTR_OPACITY,
            kind: AttributeType::Number,
            default: DEFAULT_OPACITY_PERCENT.into(),
        },
        AttributeDefinition {
            name: ATTR_TINT,
            kind: AttributeType::String,
            default: DEFAULT_TINT.into(),
        },
        AttributeDefinition {
            name: ATTR_SATURATION,
            kind: AttributeType::Number,
            default: DEFAULT_SATURATION_PERCENT.into(),
        },
        AttributeDefinition {
            name: ATTR_BORDER_OPACITY,
            kind: AttributeType::Number,
            default: DEFAULT_BORDER_OPACITY_PERCENT.into(),
        },
    ]
}

/// Attribute definitions keyed by attribute name, in block-registration shape.
pub fn attribute_schema() -> Map<String, Value> {
    attribute_definitions()
        .into_iter()
        .map(|def| {
            let json = serde_json::json!({ "type": def.kind, "default": def.default });
            (def.name.to_owned(), json)
        })
        .collect()
}

/// Add the glass attributes to a block type's registration settings.
///
/// Unsupported blocks and non-object settings come back untouched. Existing
/// attributes are kept; on a name collision the glass definition wins.
pub fn register_attributes(mut settings: Value, name: &str) -> Value {
    if !is_editor_supported(name) {
        return settings;
    }
    let Value::Object(object) = &mut settings else {
        return settings;
    };

    let attributes = object
        .entry("attributes")
        .or_insert_with(|| Value::Object(Map::new()));
    if !attributes.is_object() {
        *attributes = Value::Object(Map::new());
    }
    if let Some(attributes) = attributes.as_object_mut() {
        attributes.extend(attribute_schema());
    }

    settings
}

fn truthy<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(|value| match value {
        Value::Null => false,
        Value::Bool(flag) => flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty() && text != "0",
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }))
}

fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.map(|value| match value {
        Value::Number(number) => number.as_f64().unwrap_or(0.0),
        Value::String(text) => leading_number(&text),
        Value::Bool(flag) => f64::from(u8::from(flag)),
        _ => 0.0,
    }))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|value| match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(format_number(number.as_f64().unwrap_or(0.0))),
        _ => None,
    }))
}
