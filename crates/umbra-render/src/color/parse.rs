//! CSS color expression parsing.
//!
//! Built on the `cssparser` tokenizer, so comments, escapes and whitespace
//! follow the CSS syntax rules. The grammar covered here:
//!
//! | Form | Example |
//! |------|---------|
//! | Hex, 3/4/6/8 digits | `#fff`, `#ffff`, `#ff6b35`, `#ff6b3580` |
//! | `rgb()` / `rgba()`, comma syntax | `rgb(255, 107, 53)`, `rgba(0, 0, 0, 0.5)` |
//! | `rgb()` / `rgba()`, space syntax | `rgb(255 107 53 / 50%)` |
//! | `hsl()` / `hsla()` | `hsl(120deg, 100%, 25%)` |
//! | Named colors | `rebeccapurple`, `White` |
//!
//! Sentinel keywords (`transparent`, `none`, `inherit`, `initial`, `unset`,
//! `currentcolor`) and the empty string carry no concrete color and parse to
//! `None`, as does anything malformed.

use cssparser::{ParseError, Parser, ParserInput, Token};

use super::named;
use super::Rgba;

const SENTINELS: &[&str] = &[
    "transparent",
    "none",
    "inherit",
    "initial",
    "unset",
    "currentcolor",
];

/// Parses a CSS color expression into an [`Rgba`] value.
///
/// Never fails loudly: sentinel values and unparseable input both yield
/// `None`, which callers treat as "skip this color".
///
/// # Example
///
/// ```rust
/// use umbra_render::color::{parse, Rgba};
///
/// assert_eq!(parse("#f80"), Some(Rgba::opaque(255, 136, 0)));
/// assert_eq!(parse("rgb(10, 20, 30)"), Some(Rgba::opaque(10, 20, 30)));
/// assert_eq!(parse("transparent"), None);
/// assert_eq!(parse("not a color"), None);
/// ```
pub fn parse(expression: &str) -> Option<Rgba> {
    let expression = expression.trim();
    if expression.is_empty() || is_sentinel(expression) {
        return None;
    }

    let mut input = ParserInput::new(expression);
    let mut parser = Parser::new(&mut input);
    parser.parse_entirely(parse_color).ok()
}

fn is_sentinel(expression: &str) -> bool {
    SENTINELS
        .iter()
        .any(|sentinel| expression.eq_ignore_ascii_case(sentinel))
}

fn invalid<'i>(input: &Parser<'i, '_>) -> ParseError<'i, ()> {
    input.new_custom_error::<(), ()>(())
}

fn parse_color<'i>(input: &mut Parser<'i, '_>) -> Result<Rgba, ParseError<'i, ()>> {
    let token = input.next()?.clone();
    match token {
        Token::Hash(ref digits) | Token::IDHash(ref digits) => {
            parse_hex(digits).ok_or_else(|| invalid(input))
        }
        Token::Ident(ref name) => named::lookup(name)
            .map(|(r, g, b)| Rgba::opaque(r, g, b))
            .ok_or_else(|| invalid(input)),
        Token::Function(ref name) => {
            let name = name.to_ascii_lowercase();
            input.parse_nested_block(|args| match name.as_str() {
                "rgb" | "rgba" => parse_rgb_args(args),
                "hsl" | "hsla" => parse_hsl_args(args),
                _ => Err(invalid(args)),
            })
        }
        _ => Err(invalid(input)),
    }
}

/// Parses the digits of a hex color (without the `#`).
fn parse_hex(digits: &str) -> Option<Rgba> {
    let nibble = |c: u8| -> Option<u8> {
        match c {
            b'0'..=b'9' => Some(c - b'0'),
            b'a'..=b'f' => Some(c - b'a' + 10),
            b'A'..=b'F' => Some(c - b'A' + 10),
            _ => None,
        }
    };
    let byte = |hi: u8, lo: u8| -> Option<u8> { Some(nibble(hi)? << 4 | nibble(lo)?) };

    let bytes = digits.as_bytes();
    let (r, g, b, a) = match bytes.len() {
        3 | 4 => {
            let r = nibble(bytes[0])? * 17;
            let g = nibble(bytes[1])? * 17;
            let b = nibble(bytes[2])? * 17;
            let a = match bytes.get(3) {
                Some(&d) => nibble(d)? * 17,
                None => 255,
            };
            (r, g, b, a)
        }
        6 | 8 => {
            let r = byte(bytes[0], bytes[1])?;
            let g = byte(bytes[2], bytes[3])?;
            let b = byte(bytes[4], bytes[5])?;
            let a = if bytes.len() == 8 {
                byte(bytes[6], bytes[7])?
            } else {
                255
            };
            (r, g, b, a)
        }
        _ => return None,
    };

    Some(Rgba::new(r, g, b, a as f64 / 255.0))
}

/// `rgb(r, g, b[, a])` or `rgb(r g b[ / a])`.
fn parse_rgb_args<'i>(args: &mut Parser<'i, '_>) -> Result<Rgba, ParseError<'i, ()>> {
    let r = parse_channel(args)?;
    let legacy = args.try_parse(|p| p.expect_comma()).is_ok();
    let g = parse_channel(args)?;
    if legacy {
        args.expect_comma()?;
    }
    let b = parse_channel(args)?;
    let a = parse_alpha_tail(args, legacy)?;
    Ok(Rgba::new(r, g, b, a))
}

/// `hsl(h, s%, l%[, a])` or `hsl(h s% l%[ / a])`.
fn parse_hsl_args<'i>(args: &mut Parser<'i, '_>) -> Result<Rgba, ParseError<'i, ()>> {
    let hue = parse_hue(args)?;
    let legacy = args.try_parse(|p| p.expect_comma()).is_ok();
    let saturation = parse_fraction(args)?;
    if legacy {
        args.expect_comma()?;
    }
    let lightness = parse_fraction(args)?;
    let a = parse_alpha_tail(args, legacy)?;

    let (r, g, b) = hsl_to_rgb(hue, saturation, lightness);
    Ok(Rgba::new(
        unit_to_channel(r),
        unit_to_channel(g),
        unit_to_channel(b),
        a,
    ))
}

fn parse_channel<'i>(args: &mut Parser<'i, '_>) -> Result<u8, ParseError<'i, ()>> {
    let token = args.next()?.clone();
    let value = match token {
        Token::Number { value, .. } => value as f64,
        Token::Percentage { unit_value, .. } => unit_value as f64 * 255.0,
        _ => return Err(invalid(args)),
    };
    Ok(value.round().clamp(0.0, 255.0) as u8)
}

/// Saturation/lightness: a percentage, or a bare number read as a percentage.
fn parse_fraction<'i>(args: &mut Parser<'i, '_>) -> Result<f64, ParseError<'i, ()>> {
    let token = args.next()?.clone();
    let value = match token {
        Token::Percentage { unit_value, .. } => unit_value as f64,
        Token::Number { value, .. } => value as f64 / 100.0,
        _ => return Err(invalid(args)),
    };
    Ok(value.clamp(0.0, 1.0))
}

/// Hue in degrees; accepts bare numbers and `deg`/`rad`/`grad`/`turn`.
fn parse_hue<'i>(args: &mut Parser<'i, '_>) -> Result<f64, ParseError<'i, ()>> {
    let token = args.next()?.clone();
    match token {
        Token::Number { value, .. } => Ok(value as f64),
        Token::Dimension {
            value, ref unit, ..
        } => {
            let value = value as f64;
            match unit.to_ascii_lowercase().as_str() {
                "deg" => Ok(value),
                "rad" => Ok(value.to_degrees()),
                "grad" => Ok(value * 0.9),
                "turn" => Ok(value * 360.0),
                _ => Err(invalid(args)),
            }
        }
        _ => Err(invalid(args)),
    }
}

fn parse_alpha_tail<'i>(
    args: &mut Parser<'i, '_>,
    legacy: bool,
) -> Result<f64, ParseError<'i, ()>> {
    if args.is_exhausted() {
        return Ok(1.0);
    }
    if legacy {
        args.expect_comma()?;
    } else {
        args.expect_delim('/')?;
    }

    let token = args.next()?.clone();
    let alpha = match token {
        Token::Number { value, .. } => value as f64,
        Token::Percentage { unit_value, .. } => unit_value as f64,
        _ => return Err(invalid(args)),
    };
    Ok(alpha.clamp(0.0, 1.0))
}

fn unit_to_channel(value: f64) -> u8 {
    (value * 255.0).round().clamp(0.0, 255.0) as u8
}

fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (f64, f64, f64) {
    if saturation == 0.0 {
        return (lightness, lightness, lightness);
    }

    let h = hue.rem_euclid(360.0) / 360.0;
    let q = if lightness < 0.5 {
        lightness * (1.0 + saturation)
    } else {
        lightness + saturation - lightness * saturation
    };
    let p = 2.0 * lightness - q;

    (
        hue_to_channel(p, q, h + 1.0 / 3.0),
        hue_to_channel(p, q, h),
        hue_to_channel(p, q, h - 1.0 / 3.0),
    )
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Hex
    // =========================================================================

    #[test]
    fn test_parse_hex_6_digit() {
        assert_eq!(parse("#ff6b35"), Some(Rgba::opaque(255, 107, 53)));
        assert_eq!(parse("#000000"), Some(Rgba::opaque(0, 0, 0)));
    }

    #[test]
    fn test_parse_hex_3_digit() {
        assert_eq!(parse("#fff"), Some(Rgba::opaque(255, 255, 255)));
        assert_eq!(parse("#f80"), Some(Rgba::opaque(255, 136, 0)));
        // Numeric-start digits tokenize as a plain hash, not an id hash.
        assert_eq!(parse("#123"), Some(Rgba::opaque(17, 34, 51)));
    }

    #[test]
    fn test_parse_hex_with_alpha() {
        let c = parse("#ff000080").unwrap();
        assert_eq!((c.r, c.g, c.b), (255, 0, 0));
        assert!((c.a - 128.0 / 255.0).abs() < 1e-9);

        let c = parse("#f008").unwrap();
        assert_eq!((c.r, c.g, c.b), (255, 0, 0));
        assert!((c.a - 136.0 / 255.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_hex_case_insensitive() {
        assert_eq!(parse("#FF6B35"), Some(Rgba::opaque(255, 107, 53)));
    }

    #[test]
    fn test_parse_hex_invalid() {
        assert_eq!(parse("#ff"), None);
        assert_eq!(parse("#fffff"), None);
        assert_eq!(parse("#gggggg"), None);
        assert_eq!(parse("#"), None);
    }

    // =========================================================================
    // Functional notation
    // =========================================================================

    #[test]
    fn test_parse_rgb_legacy() {
        assert_eq!(parse("rgb(255, 107, 53)"), Some(Rgba::opaque(255, 107, 53)));
        assert_eq!(parse("RGB(1,2,3)"), Some(Rgba::opaque(1, 2, 3)));
    }

    #[test]
    fn test_parse_rgba_legacy() {
        let c = parse("rgba(0, 0, 0, 0.5)").unwrap();
        assert_eq!((c.r, c.g, c.b), (0, 0, 0));
        assert!((c.a - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_parse_rgb_space_syntax() {
        let c = parse("rgb(255 107 53 / 25%)").unwrap();
        assert_eq!((c.r, c.g, c.b), (255, 107, 53));
        assert!((c.a - 0.25).abs() < 1e-6);
        assert_eq!(parse("rgb(1 2 3)"), Some(Rgba::opaque(1, 2, 3)));
    }

    #[test]
    fn test_parse_rgb_percentages_and_clamping() {
        assert_eq!(parse("rgb(100%, 50%, 0%)"), Some(Rgba::opaque(255, 128, 0)));
        assert_eq!(parse("rgb(300, -20, 12.4)"), Some(Rgba::opaque(255, 0, 12)));
    }

    #[test]
    fn test_parse_rgb_malformed() {
        assert_eq!(parse("rgb(1, 2)"), None);
        assert_eq!(parse("rgb(1, 2, 3, 4, 5)"), None);
        assert_eq!(parse("rgb(1 2, 3)"), None);
        assert_eq!(parse("rgb(a, b, c)"), None);
    }

    #[test]
    fn test_parse_hsl() {
        assert_eq!(parse("hsl(0, 100%, 50%)"), Some(Rgba::opaque(255, 0, 0)));
        assert_eq!(parse("hsl(120deg 100% 25%)"), Some(Rgba::opaque(0, 128, 0)));
        assert_eq!(parse("hsl(0.5turn, 100%, 50%)"), Some(Rgba::opaque(0, 255, 255)));
        assert_eq!(parse("hsl(0, 0%, 100%)"), Some(Rgba::opaque(255, 255, 255)));
    }

    #[test]
    fn test_parse_unknown_function() {
        assert_eq!(parse("lab(50% 40 59)"), None);
        assert_eq!(parse("var(--accent)"), None);
    }

    // =========================================================================
    // Names and sentinels
    // =========================================================================

    #[test]
    fn test_parse_named() {
        assert_eq!(parse("white"), Some(Rgba::opaque(255, 255, 255)));
        assert_eq!(parse("  Navy "), Some(Rgba::opaque(0, 0, 128)));
    }

    #[test]
    fn test_parse_sentinels() {
        for sentinel in ["", "   ", "transparent", "none", "inherit", "initial", "Unset", "currentColor"] {
            assert_eq!(parse(sentinel), None, "sentinel {sentinel:?}");
        }
    }

    #[test]
    fn test_parse_garbage_degrades_to_none() {
        assert_eq!(parse("not a color"), None);
        assert_eq!(parse("#fff extra"), None);
        assert_eq!(parse("red;"), None);
        assert_eq!(parse("\"#fff\""), None);
        assert_eq!(parse("foo\"};body{color:red"), None);
    }

    #[test]
    fn test_parse_ignores_comments() {
        assert_eq!(parse("/* brand */ #000"), Some(Rgba::opaque(0, 0, 0)));
    }
}
