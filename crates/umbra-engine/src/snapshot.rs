//! Serialized page snapshots.
//!
//! A snapshot is a flat list of elements with their rendered size and
//! computed colors, as captured from a browser:
//!
//! ```yaml
//! url: https://example.com
//! elements:
//!   - tag: body
//!     width: 1280
//!     height: 2400
//!     color: rgb(33, 33, 33)
//!     background_color: rgb(255, 255, 255)
//!   - tag: div
//!     width: 300
//!     height: 40
//!     style: "color: #FF6B35"
//!     color: rgb(255, 107, 53)
//! ```
//!
//! [`SnapshotPage`] replays that capture through [`ColorSource`] and records
//! style writes through [`StyleHost`], so the full engine cycle can run
//! without a browser.

use std::collections::BTreeSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use umbra_render::stylesheet::inline_patterns;

use crate::error::{AccessError, InjectionError, SnapshotError};
use crate::page::{ColorSource, Property, Rect, StyleHost};

/// One captured element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotElement {
    pub tag: String,
    pub width: f64,
    pub height: f64,
    /// Computed `color`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Computed `background-color`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// Raw inline `style` attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// Reads of this element fail, as for cross-origin frames.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub restricted: bool,
}

impl SnapshotElement {
    /// True when a mapping rule for `original` would select this element.
    ///
    /// Mirrors the generated attribute selectors: an ASCII case-insensitive
    /// substring match of the inline style against each pattern.
    pub fn inline_style_matches(&self, original: &str) -> bool {
        let Some(style) = &self.style else {
            return false;
        };
        let style = style.to_ascii_lowercase();
        inline_patterns(original)
            .iter()
            .any(|pattern| style.contains(&pattern.to_ascii_lowercase()))
    }
}

/// A style element written into the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleElement {
    pub id: String,
    pub text: String,
}

/// A page replayed from a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotPage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// The document rejects style injection.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub restricted: bool,
    pub elements: Vec<SnapshotElement>,
    #[serde(skip)]
    styles: Vec<StyleElement>,
    #[serde(skip)]
    root_classes: BTreeSet<String>,
}

impl SnapshotPage {
    pub fn new(elements: Vec<SnapshotElement>) -> Self {
        Self {
            elements,
            ..Self::default()
        }
    }

    pub fn from_json(text: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_yaml(text: &str) -> Result<Self, SnapshotError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Loads a snapshot file. `.yaml` and `.yml` are read as YAML, anything
    /// else as JSON.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&text),
            _ => Self::from_json(&text),
        }
    }

    /// Style elements in insertion order.
    pub fn style_elements(&self) -> &[StyleElement] {
        &self.styles
    }

    /// Text of the first style element with `id`.
    pub fn style_text(&self, id: &str) -> Option<&str> {
        self.styles
            .iter()
            .find(|style| style.id == id)
            .map(|style| style.text.as_str())
    }

    pub fn has_root_class(&self, class: &str) -> bool {
        self.root_classes.contains(class)
    }

    /// Number of elements a mapping rule for `original` would select.
    pub fn inline_matches(&self, original: &str) -> usize {
        self.elements
            .iter()
            .filter(|element| element.inline_style_matches(original))
            .count()
    }

    fn element(&self, index: usize) -> Result<&SnapshotElement, AccessError> {
        let element = self
            .elements
            .get(index)
            .ok_or(AccessError::Detached(index))?;
        if element.restricted {
            return Err(AccessError::Restricted(index));
        }
        Ok(element)
    }

    fn check_writable(&self) -> Result<(), InjectionError> {
        if self.restricted {
            Err(InjectionError::Restricted)
        } else {
            Ok(())
        }
    }
}

impl ColorSource for SnapshotPage {
    type Element = usize;

    fn elements(&self) -> Vec<usize> {
        (0..self.elements.len()).collect()
    }

    fn bounding_box(&self, element: &usize) -> Result<Rect, AccessError> {
        let element = self.element(*element)?;
        Ok(Rect::new(element.width, element.height))
    }

    fn computed_value(
        &self,
        element: &usize,
        property: Property,
    ) -> Result<Option<String>, AccessError> {
        let element = self.element(*element)?;
        Ok(match property {
            Property::Color => element.color.clone(),
            Property::BackgroundColor => element.background_color.clone(),
        })
    }
}

impl StyleHost for SnapshotPage {
    fn append_style_element(&mut self, id: &str) -> Result<(), InjectionError> {
        self.check_writable()?;
        self.styles.push(StyleElement {
            id: id.to_string(),
            text: String::new(),
        });
        Ok(())
    }

    fn set_style_text(&mut self, id: &str, text: &str) -> Result<(), InjectionError> {
        self.check_writable()?;
        let style = self
            .styles
            .iter_mut()
            .find(|style| style.id == id)
            .ok_or_else(|| InjectionError::MissingElement(id.to_string()))?;
        style.text = text.to_string();
        Ok(())
    }

    fn set_root_class(&mut self, class: &str, present: bool) -> Result<(), InjectionError> {
        self.check_writable()?;
        if present {
            self.root_classes.insert(class.to_string());
        } else {
            self.root_classes.remove(class);
        }
        Ok(())
    }
}
