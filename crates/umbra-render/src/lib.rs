//! # Umbra Render - Dark-Mode Colors and Stylesheets
//!
//! `umbra-render` holds everything about on-demand page darkening that does
//! not need a live page: the color model, the luminance-driven dark transform,
//! color mapping tables, palettes and presets, and synthesis of the injected
//! stylesheet text.
//!
//! The page-facing engine lives in `umbra-engine`, which samples colors from
//! a page and applies the text produced here.
//!
//! ## Core Concepts
//!
//! - [`Rgba`], [`parse`], [`normalize`]: read any CSS color expression and
//!   reduce it to canonical `#rrggbb`
//! - [`generate_dark_color`]: the fixed light/dark transform
//! - [`ColorMappings`]: explicit original → replacement overrides
//! - [`Palette`], [`PresetRegistry`]: the five-slot color sets stylesheets are
//!   built from
//! - [`StyleStrategy`]: [`MappedStyle`] for scoped, mapping-aware sheets and
//!   [`PresetStyle`] for whole-document preset sheets
//!
//! ## Quick Start
//!
//! ```rust
//! use umbra_render::{dark_mappings, MappedStyle, Palette, StyleStrategy, SCOPE_SELECTOR};
//!
//! let mappings = dark_mappings(["#ffffff", "rgb(0, 0, 0)"]);
//! assert_eq!(mappings.get("#ffffff"), Some("#d9d9d9"));
//!
//! let palette = Palette::engine();
//! let css = MappedStyle::new(&palette, &mappings).style_text().unwrap();
//! assert!(css.contains(SCOPE_SELECTOR));
//! assert!(css.contains("color: #d9d9d9 !important;"));
//! ```

pub mod color;
mod colorspace;
mod error;
mod mapping;
mod palette;
pub mod stylesheet;
mod transform;

pub use color::{normalize, parse, Rgba};
pub use colorspace::{relative_luminance, to_ansi256};
pub use error::RenderError;
pub use mapping::ColorMappings;
pub use palette::{CustomColors, Palette, PresetRegistry, Slot, DEFAULT_PRESET};
pub use stylesheet::{
    MappedStyle, PresetStyle, StyleStrategy, ACTIVE_CLASS, SCOPE_SELECTOR, STYLE_ELEMENT_ID,
};
pub use transform::{dark_mappings, generate_dark_color, is_light, LIGHT_THRESHOLD};
