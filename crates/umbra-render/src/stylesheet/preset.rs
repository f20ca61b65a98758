use minijinja::context;
use tracing::debug;

use super::{
    canonical_palette, render, StyleStrategy, HEADING_TEXT, PLACEHOLDER_TEXT,
    PRESET_VISITED_LINK, SELECTION_TEXT,
};
use crate::error::RenderError;
use crate::palette::{CustomColors, Palette, PresetRegistry};

const TEMPLATE: &str = include_str!("templates/preset.css.jinja");

/// Whole-document dark sheet driven by a palette alone.
///
/// Rules are unscoped and forced with `!important`, so the sheet darkens the
/// page as soon as it is inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetStyle {
    palette: Palette,
}

impl PresetStyle {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    /// Resolves `preset` in `registry` and layers `custom` on top.
    ///
    /// Unknown preset names fall back to the default preset.
    pub fn from_preferences(registry: &PresetRegistry, preset: &str, custom: &CustomColors) -> Self {
        Self::new(registry.resolve(preset).with_overrides(custom))
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }
}

impl StyleStrategy for PresetStyle {
    fn style_text(&self) -> Result<String, RenderError> {
        let palette = canonical_palette(&self.palette)?;
        debug!(background = %palette.background, "rendering preset stylesheet");
        render(
            TEMPLATE,
            context! {
                palette => palette,
                visited => PRESET_VISITED_LINK,
                selection_text => SELECTION_TEXT,
                heading => HEADING_TEXT,
                placeholder => PLACEHOLDER_TEXT,
            },
        )
    }
}
