//! Persisted user preferences and preset loading.
//!
//! Preferences live in `preferences.json` inside the config directory, which
//! is taken from `--config-dir`, then `$UMBRA_CONFIG_DIR`, then the platform
//! config directory (`~/.config/umbra` on Linux). User presets are read from
//! `presets.yaml` in the same directory and layered over the built-ins.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;
use umbra_render::{CustomColors, Palette, PresetRegistry, Slot, DEFAULT_PRESET};

/// Environment variable naming the config directory.
pub const CONFIG_DIR_ENV: &str = "UMBRA_CONFIG_DIR";

const PREFERENCES_FILE: &str = "preferences.json";
const PRESETS_FILE: &str = "presets.yaml";

/// What the user last chose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub enabled: bool,
    pub custom_colors: CustomColors,
    pub active_preset: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            enabled: false,
            custom_colors: CustomColors::default(),
            active_preset: DEFAULT_PRESET.to_string(),
        }
    }
}

impl Preferences {
    /// Flips `enabled` and returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.enabled = !self.enabled;
        self.enabled
    }

    /// Switches preset. Custom colors belong to the old preset and are cleared.
    pub fn select_preset(&mut self, name: impl Into<String>) {
        self.active_preset = name.into();
        self.custom_colors = CustomColors::default();
    }

    pub fn set_custom_color(&mut self, slot: Slot, value: impl Into<String>) {
        self.custom_colors.set(slot, value);
    }

    /// The active preset with custom colors applied.
    pub fn palette(&self, registry: &PresetRegistry) -> Palette {
        registry
            .resolve(&self.active_preset)
            .with_overrides(&self.custom_colors)
    }
}

/// Reads and writes files in one config directory.
#[derive(Debug, Clone)]
pub struct PrefsStore {
    dir: PathBuf,
}

impl PrefsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Picks the config directory: explicit path, then environment, then the
    /// platform default.
    pub fn locate(explicit: Option<&Path>) -> Result<Self> {
        if let Some(dir) = explicit {
            return Ok(Self::new(dir));
        }
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::new(dir));
        }
        let base = dirs::config_dir()
            .ok_or_else(|| anyhow!("no config directory; set {}", CONFIG_DIR_ENV))?;
        Ok(Self::new(base.join("umbra")))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.dir.join(PREFERENCES_FILE)
    }

    pub fn presets_path(&self) -> PathBuf {
        self.dir.join(PRESETS_FILE)
    }

    /// Loads preferences, defaulting when the file does not exist yet.
    pub fn load(&self) -> Result<Preferences> {
        let path = self.preferences_path();
        if !path.exists() {
            debug!(path = %path.display(), "no preferences file, using defaults");
            return Ok(Preferences::default());
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("invalid preferences in {}", path.display()))
    }

    pub fn save(&self, prefs: &Preferences) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create {}", self.dir.display()))?;
        let path = self.preferences_path();
        let text = serde_json::to_string_pretty(prefs)?;
        fs::write(&path, text + "\n")
            .with_context(|| format!("failed to write {}", path.display()))?;
        debug!(path = %path.display(), "preferences saved");
        Ok(())
    }

    /// Built-in presets plus any from `presets.yaml`.
    pub fn registry(&self) -> Result<PresetRegistry> {
        let mut registry = PresetRegistry::builtin();
        let path = self.presets_path();
        if path.exists() {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let added = registry
                .extend_from_yaml(&text)
                .with_context(|| format!("invalid presets in {}", path.display()))?;
            debug!(added, "loaded user presets");
        }
        Ok(registry)
    }
}
