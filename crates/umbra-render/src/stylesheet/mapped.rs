use minijinja::context;
use serde::Serialize;
use tracing::{debug, warn};

use super::{
    canonical_palette, render, StyleStrategy, SCOPE_SELECTOR, SCROLLBAR_THUMB_HOVER,
    SELECTION_TEXT, VISITED_LINK,
};
use crate::color;
use crate::error::RenderError;
use crate::mapping::ColorMappings;
use crate::palette::Palette;

const TEMPLATE: &str = include_str!("templates/mapped.css.jinja");

/// Inline-style properties whose values are matched against mapping keys.
pub const MATCHED_PROPERTIES: [&str; 4] = ["color", "background-color", "border-color", "background"];

/// The inline-style fragments a mapping for `original` matches, with and
/// without a space after the colon.
///
/// ```rust
/// use umbra_render::stylesheet::inline_patterns;
///
/// let patterns = inline_patterns("#fff");
/// assert_eq!(patterns.len(), 8);
/// assert!(patterns.contains(&"background:#fff".to_string()));
/// ```
pub fn inline_patterns(original: &str) -> Vec<String> {
    MATCHED_PROPERTIES
        .iter()
        .flat_map(|property| {
            [": ", ":"]
                .into_iter()
                .map(move |sep| format!("{}{}{}", property, sep, original))
        })
        .collect()
}

#[derive(Serialize)]
struct MappingRule {
    patterns: Vec<String>,
    replacement: String,
}

/// Scoped palette rules followed by one rule per color mapping.
///
/// Each mapping rule targets elements whose inline `style` attribute
/// contains the original color (case-insensitively) under any of the
/// [`MATCHED_PROPERTIES`], and sets their text color to the replacement.
/// Mappings whose original or replacement does not parse as a color are
/// left out.
#[derive(Debug, Clone, Copy)]
pub struct MappedStyle<'a> {
    palette: &'a Palette,
    mappings: &'a ColorMappings,
}

impl<'a> MappedStyle<'a> {
    pub fn new(palette: &'a Palette, mappings: &'a ColorMappings) -> Self {
        Self { palette, mappings }
    }

    fn rules(&self) -> Vec<MappingRule> {
        self.mappings
            .iter()
            .filter_map(|(original, replacement)| {
                if color::parse(original).is_none() {
                    warn!(original, "dropping mapping with unparseable original");
                    return None;
                }
                match color::parse(replacement) {
                    Some(rgba) => Some(MappingRule {
                        patterns: inline_patterns(original),
                        replacement: rgba.to_string(),
                    }),
                    None => {
                        warn!(original, replacement, "dropping mapping with unparseable replacement");
                        None
                    }
                }
            })
            .collect()
    }
}

impl StyleStrategy for MappedStyle<'_> {
    fn style_text(&self) -> Result<String, RenderError> {
        let palette = canonical_palette(self.palette)?;
        let rules = self.rules();
        debug!(rules = rules.len(), "rendering mapped stylesheet");
        render(
            TEMPLATE,
            context! {
                scope => SCOPE_SELECTOR,
                palette => palette,
                visited => VISITED_LINK,
                scrollbar_hover => SCROLLBAR_THUMB_HOVER,
                selection_text => SELECTION_TEXT,
                rules => rules,
            },
        )
    }
}
