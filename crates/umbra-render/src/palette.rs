//! Base palettes, named presets and per-slot custom overrides.
//!
//! A [`Palette`] is the five-color base set every generated stylesheet is
//! built from. Presets are named palettes; [`CustomColors`] replaces
//! individual slots of a preset.
//!
//! # Presets from YAML
//!
//! User presets extend the built-ins. Omitted slots fall back to the
//! `default` preset:
//!
//! ```rust
//! use umbra_render::PresetRegistry;
//!
//! let mut registry = PresetRegistry::builtin();
//! registry.extend_from_yaml(r##"
//! solarized:
//!   background: "#002b36"
//!   text: "#839496"
//!   link: "#268bd2"
//! "##).unwrap();
//!
//! let solarized = registry.get("solarized").unwrap();
//! assert_eq!(solarized.background, "#002b36");
//! assert_eq!(solarized.border, "#404060");
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::color;
use crate::error::RenderError;

/// Name of the preset used when none (or an unknown one) is requested.
pub const DEFAULT_PRESET: &str = "default";

/// One of the five palette slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Background,
    Text,
    Secondary,
    Border,
    Link,
}

impl Slot {
    pub const ALL: [Slot; 5] = [
        Slot::Background,
        Slot::Text,
        Slot::Secondary,
        Slot::Border,
        Slot::Link,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Slot::Background => "background",
            Slot::Text => "text",
            Slot::Secondary => "secondary",
            Slot::Border => "border",
            Slot::Link => "link",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Slot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "background" | "bg" => Ok(Slot::Background),
            "text" | "fg" => Ok(Slot::Text),
            "secondary" => Ok(Slot::Secondary),
            "border" => Ok(Slot::Border),
            "link" => Ok(Slot::Link),
            _ => Err(format!(
                "unknown palette slot '{}' (expected background, text, secondary, border or link)",
                s
            )),
        }
    }
}

/// The base color set a stylesheet is generated from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: String,
    pub text: String,
    pub secondary: String,
    pub border: String,
    pub link: String,
}

impl Palette {
    pub fn new(
        background: impl Into<String>,
        text: impl Into<String>,
        secondary: impl Into<String>,
        border: impl Into<String>,
        link: impl Into<String>,
    ) -> Self {
        Self {
            background: background.into(),
            text: text.into(),
            secondary: secondary.into(),
            border: border.into(),
            link: link.into(),
        }
    }

    /// Base palette of the sampled-color mapping engine.
    pub fn engine() -> Self {
        Self::new("#1a1a1a", "#e0e0e0", "#2d2d2d", "#404040", "#4da6ff")
    }

    pub fn get(&self, slot: Slot) -> &str {
        match slot {
            Slot::Background => &self.background,
            Slot::Text => &self.text,
            Slot::Secondary => &self.secondary,
            Slot::Border => &self.border,
            Slot::Link => &self.link,
        }
    }

    pub(crate) fn slot_mut(&mut self, slot: Slot) -> &mut String {
        match slot {
            Slot::Background => &mut self.background,
            Slot::Text => &mut self.text,
            Slot::Secondary => &mut self.secondary,
            Slot::Border => &mut self.border,
            Slot::Link => &mut self.link,
        }
    }

    /// Checks that every slot parses as a color.
    ///
    /// Palette values are embedded verbatim in declarations, so anything that
    /// is not a color is rejected before it reaches generated text.
    pub fn validate(&self) -> Result<(), RenderError> {
        for slot in Slot::ALL {
            let value = self.get(slot);
            if color::parse(value).is_none() {
                return Err(RenderError::InvalidColor {
                    slot: slot.name().to_string(),
                    value: value.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Returns a copy with every valid custom slot applied.
    ///
    /// Overrides that do not parse as colors are ignored.
    pub fn with_overrides(&self, custom: &CustomColors) -> Self {
        let mut palette = self.clone();
        for slot in Slot::ALL {
            let Some(value) = custom.get(slot) else {
                continue;
            };
            if color::parse(value).is_some() {
                *palette.slot_mut(slot) = value.trim().to_string();
            } else {
                warn!(%slot, value, "ignoring custom color that does not parse");
            }
        }
        palette
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::new("#1a1a2e", "#e0e0e0", "#252540", "#404060", "#64b5f6")
    }
}

/// User-chosen replacements for individual palette slots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomColors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl CustomColors {
    pub fn get(&self, slot: Slot) -> Option<&str> {
        match slot {
            Slot::Background => self.background.as_deref(),
            Slot::Text => self.text.as_deref(),
            Slot::Secondary => self.secondary.as_deref(),
            Slot::Border => self.border.as_deref(),
            Slot::Link => self.link.as_deref(),
        }
        .filter(|value| !value.trim().is_empty())
    }

    pub fn set(&mut self, slot: Slot, value: impl Into<String>) {
        let value = Some(value.into());
        match slot {
            Slot::Background => self.background = value,
            Slot::Text => self.text = value,
            Slot::Secondary => self.secondary = value,
            Slot::Border => self.border = value,
            Slot::Link => self.link = value,
        }
    }

    pub fn is_empty(&self) -> bool {
        Slot::ALL.iter().all(|slot| self.get(*slot).is_none())
    }
}

/// Named palettes: the built-ins plus any user-defined presets.
#[derive(Debug, Clone)]
pub struct PresetRegistry {
    presets: Vec<(String, Palette)>,
}

impl PresetRegistry {
    /// The five built-in presets, `default` first.
    pub fn builtin() -> Self {
        Self {
            presets: vec![
                (DEFAULT_PRESET.to_string(), Palette::default()),
                (
                    "midnight".to_string(),
                    Palette::new("#0d1b2a", "#e0e1dd", "#1b263b", "#415a77", "#778da9"),
                ),
                (
                    "deep".to_string(),
                    Palette::new("#1a1a2e", "#eaeaea", "#16213e", "#0f3460", "#e94560"),
                ),
                (
                    "neon".to_string(),
                    Palette::new("#16213e", "#e94560", "#0f3460", "#e94560", "#00fff5"),
                ),
                (
                    "amoled".to_string(),
                    Palette::new("#000000", "#ffffff", "#1a1a1a", "#333333", "#64b5f6"),
                ),
            ],
        }
    }

    pub fn get(&self, name: &str) -> Option<&Palette> {
        self.presets
            .iter()
            .find(|(preset, _)| preset.eq_ignore_ascii_case(name))
            .map(|(_, palette)| palette)
    }

    /// Like [`get`](Self::get), falling back to the `default` preset.
    pub fn resolve(&self, name: &str) -> Palette {
        match self.get(name) {
            Some(palette) => palette.clone(),
            None => {
                debug!(preset = name, "unknown preset, using default");
                self.get(DEFAULT_PRESET).cloned().unwrap_or_default()
            }
        }
    }

    /// Preset names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Palette)> {
        self.presets.iter().map(|(name, palette)| (name.as_str(), palette))
    }

    /// Adds a preset, replacing any existing preset with the same name.
    pub fn insert(&mut self, name: impl Into<String>, palette: Palette) -> Result<(), RenderError> {
        palette.validate()?;
        let name = name.into();
        match self
            .presets
            .iter_mut()
            .find(|(preset, _)| preset.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = palette,
            None => self.presets.push((name, palette)),
        }
        Ok(())
    }

    /// Loads presets from a YAML mapping of `name: palette`.
    ///
    /// All presets are validated before any is added. Returns the number of
    /// presets loaded.
    pub fn extend_from_yaml(&mut self, yaml: &str) -> Result<usize, RenderError> {
        let parsed: BTreeMap<String, Palette> = serde_yaml::from_str(yaml)?;
        for (name, palette) in &parsed {
            palette.validate().map_err(|err| match err {
                RenderError::InvalidColor { slot, value } => RenderError::InvalidColor {
                    slot: format!("{}.{}", name, slot),
                    value,
                },
                other => other,
            })?;
        }

        let count = parsed.len();
        for (name, palette) in parsed {
            self.insert(name, palette)?;
        }
        Ok(count)
    }
}

impl Default for PresetRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
