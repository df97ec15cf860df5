pub mod attributes;
pub mod blocks;
pub mod colors;
pub mod editor;
pub mod numeric;
pub mod panel;
pub mod render;

pub use attributes::{GlassAttributes, GlassSettings, attribute_schema, register_attributes};
pub use blocks::{EDITOR_BLOCKS, RENDER_BLOCKS, is_editor_supported, is_render_supported};
pub use colors::{ColorMatch, classify, color_to_rgba};
pub use editor::{GLASS_CLASS, WrapperProps, editor_wrapper_props};
pub use panel::{PanelDescriptor, panel_for};
pub use render::{BlockInstance, render_block};
