//! Luminance-driven dark-mode color transform.
//!
//! A color with relative luminance above [`LIGHT_THRESHOLD`] is classified
//! light and pulled down toward the top of the range (`255 - c * 0.15`), so
//! near-white surfaces stay near-white instead of flipping to black. Anything
//! else is classified dark and brightened (`min(255, c * 1.3 + 30)`).
//! Alpha passes through unchanged.
//!
//! The factors are fixed. Per-color tuning happens through explicit entries
//! in a [`ColorMappings`] table, which take precedence over this transform.

use tracing::debug;

use crate::color::{self, Rgba};
use crate::mapping::ColorMappings;

/// Luminance above which a color is classified "light".
pub const LIGHT_THRESHOLD: f64 = 0.5;

const DARKEN_FACTOR: f64 = 0.15;
const BRIGHTEN_FACTOR: f64 = 1.3;
const BRIGHTEN_OFFSET: f64 = 30.0;

/// Returns true when `color` is classified light.
pub fn is_light(color: &Rgba) -> bool {
    color.luminance() > LIGHT_THRESHOLD
}

/// Derives the dark-mode replacement for `color`.
///
/// # Example
///
/// ```rust
/// use umbra_render::{generate_dark_color, Rgba};
///
/// // White is light: 255 - 255 * 0.15 = 216.75, rounded.
/// assert_eq!(generate_dark_color(Rgba::opaque(255, 255, 255)), Rgba::opaque(217, 217, 217));
///
/// // Black is dark: 0 * 1.3 + 30.
/// assert_eq!(generate_dark_color(Rgba::opaque(0, 0, 0)), Rgba::opaque(30, 30, 30));
/// ```
pub fn generate_dark_color(color: Rgba) -> Rgba {
    let shift: fn(u8) -> u8 = if is_light(&color) { darken } else { brighten };
    Rgba::new(shift(color.r), shift(color.g), shift(color.b), color.a)
}

fn darken(channel: u8) -> u8 {
    (255.0 - channel as f64 * DARKEN_FACTOR).round() as u8
}

fn brighten(channel: u8) -> u8 {
    (channel as f64 * BRIGHTEN_FACTOR + BRIGHTEN_OFFSET)
        .round()
        .min(255.0) as u8
}

/// Builds a mapping table that sends each parseable color in `colors` to its
/// generated dark replacement. Keys are the normalized `#rrggbb` form;
/// unparseable entries are skipped.
///
/// # Example
///
/// ```rust
/// use umbra_render::dark_mappings;
///
/// let table = dark_mappings(["#FFFFFF", "#000000", "bogus"]);
/// assert_eq!(table.get("#ffffff"), Some("#d9d9d9"));
/// assert_eq!(table.get("#000000"), Some("#1e1e1e"));
/// assert_eq!(table.len(), 2);
/// ```
pub fn dark_mappings<'a, I>(colors: I) -> ColorMappings
where
    I: IntoIterator<Item = &'a str>,
{
    let mut table = ColorMappings::new();
    for expression in colors {
        match color::parse(expression) {
            Some(rgba) => {
                table.insert(rgba.to_hex(), generate_dark_color(rgba).to_string());
            }
            None => debug!(color = expression, "skipping unparseable color"),
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_white_darkens() {
        assert_eq!(
            generate_dark_color(Rgba::opaque(255, 255, 255)),
            Rgba::opaque(217, 217, 217)
        );
    }

    #[test]
    fn test_black_brightens() {
        assert_eq!(
            generate_dark_color(Rgba::opaque(0, 0, 0)),
            Rgba::opaque(30, 30, 30)
        );
    }

    #[test]
    fn test_brighten_clamps() {
        // #ff0000 has luminance 0.2126, so it is "dark" and gets brightened.
        assert_eq!(
            generate_dark_color(Rgba::opaque(255, 0, 0)),
            Rgba::opaque(255, 30, 30)
        );
    }

    #[test]
    fn test_alpha_passes_through() {
        let out = generate_dark_color(Rgba::new(255, 255, 255, 0.4));
        assert_eq!(out.a, 0.4);
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // #bcbcbc is just above 0.5, #bbbbbb just below.
        assert!(is_light(&Rgba::opaque(188, 188, 188)));
        assert!(!is_light(&Rgba::opaque(187, 187, 187)));
    }

    #[test]
    fn test_light_gray_is_pulled_up_not_down() {
        // Light colors land in [217, 255] per channel regardless of input,
        // so a pale gray below that band ends up brighter.
        let out = generate_dark_color(Rgba::opaque(200, 200, 200));
        assert_eq!(out, Rgba::opaque(225, 225, 225));
    }

    #[test]
    fn test_dark_mappings_case_folds_keys() {
        let table = dark_mappings(["#ABCDEF"]);
        assert!(table.get("#abcdef").is_some());
    }

    #[test]
    fn test_dark_mappings_keys_are_normalized() {
        let table = dark_mappings(["rgb(0, 0, 0)", "White"]);
        assert_eq!(table.get("#000000"), Some("#1e1e1e"));
        assert_eq!(table.get("#ffffff"), Some("#d9d9d9"));
        assert_eq!(table.get("rgb(0, 0, 0)"), None);
    }

    proptest! {
        #[test]
        fn light_colors_stay_in_range(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let input = Rgba::opaque(r, g, b);
            prop_assume!(is_light(&input));
            let out = generate_dark_color(input);
            for channel in [out.r, out.g, out.b] {
                prop_assert!((217..=255).contains(&channel));
            }
        }

        #[test]
        fn near_white_colors_darken(r in 223u8..=255, g in 223u8..=255, b in 223u8..=255) {
            let input = Rgba::opaque(r, g, b);
            prop_assert!(is_light(&input));
            let out = generate_dark_color(input);
            prop_assert!(out.r <= r && out.g <= g && out.b <= b);
            prop_assert!(out.luminance() < input.luminance());
        }

        #[test]
        fn dark_colors_brighten(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let input = Rgba::opaque(r, g, b);
            prop_assume!(!is_light(&input));
            let out = generate_dark_color(input);
            prop_assert!(out.r >= r && out.g >= g && out.b >= b);
        }
    }
}
