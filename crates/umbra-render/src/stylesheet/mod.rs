//! Stylesheet synthesis.
//!
//! Two strategies produce the text of the injected style element:
//!
//! - [`MappedStyle`]: palette base rules plus one rule per explicit color
//!   mapping, all scoped under [`SCOPE_SELECTOR`] so they only take effect
//!   while the root carries [`ACTIVE_CLASS`].
//! - [`PresetStyle`]: an unscoped whole-document sheet driven purely by a
//!   palette, for pages that should always be dark.
//!
//! Both render through one minijinja environment. Untrusted text (mapping
//! keys, attribute values) only enters the output through the `css_string`
//! filter, and color values only as their canonical serialization, so no
//! input can close a declaration or open a new rule.

mod escape;
mod mapped;
mod preset;

use minijinja::Environment;
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::color;
use crate::error::RenderError;
use crate::palette::{Palette, Slot};

pub use escape::css_string;
pub use mapped::{inline_patterns, MappedStyle, MATCHED_PROPERTIES};
pub use preset::PresetStyle;

/// Id of the single style element the engine owns.
pub const STYLE_ELEMENT_ID: &str = "__dark-mode-styles";

/// Class toggled on the document root while dark mode is enabled.
pub const ACTIVE_CLASS: &str = "__dark-mode-active";

/// Selector prefix for every scoped rule.
pub const SCOPE_SELECTOR: &str = "html.__dark-mode-active";

pub(crate) const VISITED_LINK: &str = "#b366ff";
pub(crate) const PRESET_VISITED_LINK: &str = "#ba68c8";
pub(crate) const SCROLLBAR_THUMB_HOVER: &str = "#505050";
pub(crate) const SELECTION_TEXT: &str = "#000000";
pub(crate) const HEADING_TEXT: &str = "#ffffff";
pub(crate) const PLACEHOLDER_TEXT: &str = "#808080";

/// Something that can produce the full text of the dark-mode style element.
pub trait StyleStrategy {
    fn style_text(&self) -> Result<String, RenderError>;
}

static ENV: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.add_filter("css_string", css_string);
    env
});

pub(crate) fn render<S: Serialize>(source: &str, ctx: S) -> Result<String, RenderError> {
    Ok(ENV.render_str(source, ctx)?)
}

/// Validates `palette` and rewrites every slot into its canonical form.
pub(crate) fn canonical_palette(palette: &Palette) -> Result<Palette, RenderError> {
    palette.validate()?;
    let mut out = palette.clone();
    for slot in Slot::ALL {
        if let Some(rgba) = color::parse(palette.get(slot)) {
            *out.slot_mut(slot) = rgba.to_string();
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_selector_uses_active_class() {
        assert_eq!(SCOPE_SELECTOR, format!("html.{}", ACTIVE_CLASS));
    }

    #[test]
    fn test_canonical_palette_normalizes_slots() {
        let palette = Palette::new("WHITE", "#FFF", "rgb(1, 2, 3)", "#404060", "#64B5F6");
        let out = canonical_palette(&palette).unwrap();
        assert_eq!(out.background, "#ffffff");
        assert_eq!(out.text, "#ffffff");
        assert_eq!(out.secondary, "#010203");
        assert_eq!(out.link, "#64b5f6");
    }

    #[test]
    fn test_canonical_palette_rejects_invalid_slot() {
        let mut palette = Palette::default();
        palette.border = "red; } body { display: none".to_string();
        let err = canonical_palette(&palette).unwrap_err();
        assert!(matches!(err, RenderError::InvalidColor { ref slot, .. } if slot == "border"));
    }

    #[test]
    fn test_css_string_filter_is_registered() {
        let out = render("{{ v | css_string }}", minijinja::context! { v => "a\"b" }).unwrap();
        assert_eq!(out, r#""a\"b""#);
    }
}
