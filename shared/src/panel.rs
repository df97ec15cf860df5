use serde::Serialize;

use crate::attributes::{
    ATTR_BLUR, ATTR_BORDER_OPACITY, ATTR_ENABLED, ATTR_OPACITY, ATTR_SATURATION, ATTR_TINT,
    GlassAttributes,
};
use crate::blocks::is_editor_supported;

pub const PANEL_TITLE: &str = "Glassmorphism";
pub const PANEL_CLASS: &str = "glassmorph-panel";

/// Side panel shown in the block inspector.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelDescriptor {
    pub title: &'static str,
    pub initial_open: bool,
    pub class_name: &'static str,
    pub toggle: ToggleControl,
    /// Empty while the effect is disabled.
    pub ranges: Vec<RangeControl>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tint: Option<ColorControl>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToggleControl {
    pub attribute: &'static str,
    pub label: &'static str,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeControl {
    pub attribute: &'static str,
    pub label: &'static str,
    pub help: &'static str,
    pub value: f64,
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorControl {
    pub attribute: &'static str,
    pub label: &'static str,
    pub color: String,
    pub enable_alpha: bool,
}

/// Describe the inspector panel for a block, or `None` when the block does
/// not support the effect.
pub fn panel_for(name: &str, attrs: &GlassAttributes) -> Option<PanelDescriptor> {
    if !is_editor_supported(name) {
        return None;
    }

    let enabled = attrs.is_enabled();
    let toggle = ToggleControl {
        attribute: ATTR_ENABLED,
        label: "Enable Glassmorphism",
        checked: enabled,
    };
    if !enabled {
        return Some(PanelDescriptor {
            title: PANEL_TITLE,
            initial_open: false,
            class_name: PANEL_CLASS,
            toggle,
            ranges: Vec::new(),
            tint: None,
        });
    }

    let ranges = vec![
        RangeControl {
            attribute: ATTR_BLUR,
            label: "Blur Amount",
            help: "Controls the blur intensity (px)",
            value: attrs.blur_px(),
            min: 0.0,
            max: 50.0,
            step: 1.0,
        },
        RangeControl {
            attribute: ATTR_OPACITY,
            label: "Background Opacity",
            help: "Transparency of the glass layer (%)",
            value: attrs.opacity_percent(),
            min: 0.0,
            max: 100.0,
            step: 1.0,
        },
        RangeControl {
            attribute: ATTR_SATURATION,
            label: "Saturation",
            help: "Color saturation of backdrop (%)",
            value: attrs.saturation_percent(),
            min: 0.0,
            max: 200.0,
            step: 1.0,
        },
        RangeControl {
            attribute: ATTR_BORDER_OPACITY,
            label: "Border Opacity",
            help: "Opacity of the glass border (%)",
            value: attrs.border_opacity_percent(),
            min: 0.0,
            max: 100.0,
            step: 1.0,
        },
    ];

    Some(PanelDescriptor {
        title: PANEL_TITLE,
        initial_open: false,
        class_name: PANEL_CLASS,
        toggle,
        ranges,
        tint: Some(ColorControl {
            attribute: ATTR_TINT,
            label: "Tint Color",
            color: attrs.tint().to_owned(),
            enable_alpha: true,
        }),
    })
}
