//! sRGB colorspace helpers.
//!
//! # Relative Luminance
//!
//! Light/dark classification uses WCAG 2.x relative luminance. Each channel
//! is scaled to `[0, 1]` and linearized:
//!
//! ```text
//! c' = c / 12.92                     if c <= 0.03928
//! c' = ((c + 0.055) / 1.055) ^ 2.4   otherwise
//! ```
//!
//! and the channels are weighted `0.2126 R + 0.7152 G + 0.0722 B`.
//!
//! The WCAG threshold `0.03928` (not the IEC `0.04045`) is deliberate: the
//! two differ for a handful of dark channel values, and classification must
//! match the browser-side engine bit for bit.

/// Linearize one sRGB channel (0–255) per WCAG.
fn channel_to_linear(c: u8) -> f64 {
    let c = c as f64 / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// WCAG relative luminance in `[0, 1]`.
///
/// # Example
///
/// ```rust
/// use umbra_render::relative_luminance;
///
/// assert!((relative_luminance(255, 255, 255) - 1.0).abs() < 1e-9);
/// assert_eq!(relative_luminance(0, 0, 0), 0.0);
/// ```
pub fn relative_luminance(r: u8, g: u8, b: u8) -> f64 {
    0.2126 * channel_to_linear(r) + 0.7152 * channel_to_linear(g) + 0.0722 * channel_to_linear(b)
}

/// Converts an RGB triplet to the nearest ANSI 256-color palette index.
///
/// Used to draw color swatches in terminal output.
///
/// # Example
///
/// ```rust
/// use umbra_render::to_ansi256;
///
/// assert_eq!(to_ansi256((255, 0, 0)), 196);
/// assert_eq!(to_ansi256((0, 255, 0)), 46);
/// ```
pub fn to_ansi256((r, g, b): (u8, u8, u8)) -> u8 {
    if r == g && g == b {
        if r < 8 {
            16
        } else if r > 248 {
            231
        } else {
            232 + ((r as u16 - 8) * 24 / 247) as u8
        }
    } else {
        let red = (r as u16 * 5 / 255) as u8;
        let green = (g as u16 * 5 / 255) as u8;
        let blue = (b as u16 * 5 / 255) as u8;
        16 + 36 * red + 6 * green + blue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_luminance_extremes() {
        assert!((relative_luminance(255, 255, 255) - 1.0).abs() < 1e-9);
        assert!(relative_luminance(0, 0, 0).abs() < 1e-9);
    }

    #[test]
    fn test_luminance_primaries_match_weights() {
        assert!((relative_luminance(255, 0, 0) - 0.2126).abs() < 1e-12);
        assert!((relative_luminance(0, 255, 0) - 0.7152).abs() < 1e-12);
        assert!((relative_luminance(0, 0, 255) - 0.0722).abs() < 1e-12);
    }

    #[test]
    fn test_luminance_uses_wcag_threshold() {
        // 10/255 = 0.0392..., below 0.03928: linear segment.
        let expected = 10.0 / 255.0 / 12.92;
        assert!((relative_luminance(10, 10, 10) - expected).abs() < 1e-15);

        // 11/255 = 0.0431..., above 0.03928: power segment.
        let c: f64 = 11.0 / 255.0;
        let expected = ((c + 0.055) / 1.055).powf(2.4);
        assert!((relative_luminance(11, 11, 11) - expected).abs() < 1e-15);
    }

    #[test]
    fn test_mid_gray_is_dark() {
        // #808080 sits well below the 0.5 light/dark split.
        let l = relative_luminance(128, 128, 128);
        assert!(l > 0.21 && l < 0.22, "got {l}");
    }

    #[test]
    fn test_grayscale_to_ansi256() {
        assert_eq!(to_ansi256((0, 0, 0)), 16);
        assert_eq!(to_ansi256((255, 255, 255)), 231);
        assert!((232..=255).contains(&to_ansi256((128, 128, 128))));
    }

    proptest! {
        #[test]
        fn luminance_stays_in_unit_range(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
            let l = relative_luminance(r, g, b);
            prop_assert!((0.0..=1.0 + 1e-9).contains(&l));
        }

        #[test]
        fn luminance_is_monotonic_per_channel(v in 0u8..255) {
            prop_assert!(relative_luminance(v, v, v) < relative_luminance(v + 1, v + 1, v + 1));
        }
    }
}
