/// Blocks whose served markup gets the glass styles.
pub const RENDER_BLOCKS: &[&str] = &[
    "core/paragraph",
    "core/heading",
    "core/group",
    "core/columns",
    "core/column",
    "core/cover",
    "core/media-text",
    "core/buttons",
    "core/button",
    "core/quote",
    "core/pullquote",
    "core/table",
    "kadence/rowlayout",
    "kadence/column",
    "kadence/tabs",
    "kadence/accordion",
    "kadence/infobox",
    "kadence/testimonials",
    "kadence/advancedbtn",
    "kadence/form",
];

/// Blocks that get the attributes, the side panel and the editor preview.
/// Text-level blocks are left out here even though a stored attribute on
/// them is still honored at render time.
pub const EDITOR_BLOCKS: &[&str] = &[
    "core/group",
    "core/columns",
    "core/column",
    "core/cover",
    "core/media-text",
    "core/buttons",
    "core/button",
    "core/quote",
    "core/pullquote",
    "core/table",
    "kadence/rowlayout",
    "kadence/column",
    "kadence/tabs",
    "kadence/accordion",
    "kadence/infobox",
    "kadence/testimonials",
    "kadence/advancedbtn",
    "kadence/form",
];

pub fn is_render_supported(name: &str) -> bool {
    RENDER_BLOCKS.contains(&name)
}

pub fn is_editor_supported(name: &str) -> bool {
    EDITOR_BLOCKS.contains(&name)
}
