//! Color model: parsing, normalization and the RGBA value type.
//!
//! Every color that enters the system, whether sampled from a page or typed
//! by a user, passes through [`parse`] or [`normalize`]. Both degrade to
//! `None` on input they cannot interpret instead of failing.
//!
//! The canonical textual form of a color is lowercase six-digit hex
//! (`#rrggbb`). Alpha is tracked on [`Rgba`] but never encoded in that form,
//! so normalization is idempotent:
//!
//! ```rust
//! use umbra_render::color::normalize;
//!
//! let once = normalize("RGB(255, 107, 53)").unwrap();
//! assert_eq!(once, "#ff6b35");
//! assert_eq!(normalize(&once).as_deref(), Some("#ff6b35"));
//! ```

mod named;
mod parse;

use std::fmt;

pub use parse::parse;

use crate::colorspace::relative_luminance;

/// An sRGB color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity in `[0, 1]`.
    pub a: f64,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Lowercase `#rrggbb`, alpha dropped.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// WCAG relative luminance of the color channels (alpha ignored).
    pub fn luminance(&self) -> f64 {
        relative_luminance(self.r, self.g, self.b)
    }

    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }
}

/// Rounding scale for alpha in `rgba()` output (three decimals).
const ALPHA_PRECISION: f64 = 1000.0;

/// Formats as hex when opaque, `rgba()` otherwise, so the value can be
/// embedded in a declaration without losing alpha. Alpha is rounded to three
/// decimals.
impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            f.write_str(&self.to_hex())
        } else {
            let alpha = (self.a * ALPHA_PRECISION).round() / ALPHA_PRECISION;
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
        }
    }
}

/// Parses `expression` and formats it as lowercase `#rrggbb`.
///
/// Returns `None` wherever [`parse`] does.
pub fn normalize(expression: &str) -> Option<String> {
    parse(expression).map(|rgba| rgba.to_hex())
}
