//! The page seen by the engine.
//!
//! The engine never touches a document directly. It reads rendered colors
//! through [`ColorSource`] and writes its single style element through
//! [`StyleHost`]. [`SnapshotPage`](crate::SnapshotPage) implements both over
//! a serialized page; an embedding that drives a real browser implements
//! them over the live document.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AccessError, InjectionError};

/// Rendered size of an element.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// True only when both dimensions are zero.
    ///
    /// A zero-height but wide element (a collapsed rule line, say) still
    /// counts as rendered.
    pub fn is_empty(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// A computed color property read during sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    Color,
    BackgroundColor,
}

impl Property {
    /// Properties read from every rendered element, in sampling order.
    pub const SAMPLED: [Property; 2] = [Property::Color, Property::BackgroundColor];

    pub fn css_name(&self) -> &'static str {
        match self {
            Property::Color => "color",
            Property::BackgroundColor => "background-color",
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_name())
    }
}

/// Read access to a page's rendered colors.
pub trait ColorSource {
    /// Handle to one element.
    type Element;

    /// Every element in document order.
    fn elements(&self) -> Vec<Self::Element>;

    fn bounding_box(&self, element: &Self::Element) -> Result<Rect, AccessError>;

    /// The computed value of `property`, or `None` when the element has none.
    fn computed_value(
        &self,
        element: &Self::Element,
        property: Property,
    ) -> Result<Option<String>, AccessError>;
}

/// Write access to a page's style element and root marker.
pub trait StyleHost {
    /// Inserts an empty style element identified by `id`.
    fn append_style_element(&mut self, id: &str) -> Result<(), InjectionError>;

    /// Replaces the text of the style element identified by `id`.
    fn set_style_text(&mut self, id: &str, text: &str) -> Result<(), InjectionError>;

    /// Adds or removes `class` on the document root.
    fn set_root_class(&mut self, class: &str, present: bool) -> Result<(), InjectionError>;
}
