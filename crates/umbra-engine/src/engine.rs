//! The dark-mode engine for one page context.
//!
//! [`Engine`] is a two-state machine, Disabled (initial) and Enabled, moved
//! only by [`Engine::apply`]. While enabled, the page holds one style element
//! whose text is the mapped stylesheet and the root carries the activation
//! class every generated rule is scoped under. Disabling clears that text and
//! drops the class; the element itself stays so re-enabling only rewrites
//! text.
//!
//! ```rust
//! use umbra_engine::{Engine, SnapshotPage};
//! use umbra_render::{ColorMappings, ACTIVE_CLASS, STYLE_ELEMENT_ID};
//!
//! let mut engine = Engine::new(SnapshotPage::default());
//! assert!(engine.apply(true, ColorMappings::new()));
//! assert!(engine.page().has_root_class(ACTIVE_CLASS));
//!
//! assert!(engine.apply(false, ColorMappings::new()));
//! assert_eq!(engine.page().style_text(STYLE_ELEMENT_ID), Some(""));
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, info, warn};
use umbra_render::{
    ColorMappings, MappedStyle, Palette, StyleStrategy, ACTIVE_CLASS, STYLE_ELEMENT_ID,
};

use crate::error::InjectionError;
use crate::page::{ColorSource, StyleHost};
use crate::sampling::{self, ColorCount};

/// Everything the engine remembers about the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineState {
    pub enabled: bool,
    pub color_mappings: ColorMappings,
}

/// Drives sampling and style application for one page.
#[derive(Debug)]
pub struct Engine<P> {
    page: P,
    palette: Palette,
    state: EngineState,
    style_attached: bool,
    active_scans: AtomicUsize,
}

impl<P> Engine<P> {
    /// Creates a disabled engine using the engine palette.
    pub fn new(page: P) -> Self {
        Self::with_palette(page, Palette::engine())
    }

    pub fn with_palette(page: P, palette: Palette) -> Self {
        Self {
            page,
            palette,
            state: EngineState::default(),
            style_attached: false,
            active_scans: AtomicUsize::new(0),
        }
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.state.enabled
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn into_page(self) -> P {
        self.page
    }
}

impl<P: ColorSource> Engine<P> {
    /// Samples the page's most frequent rendered colors.
    ///
    /// Concurrent scans are permitted; each owns its own tally.
    pub async fn extract_colors(&self) -> Vec<ColorCount> {
        let _guard = ScanGuard::enter(&self.active_scans);
        sampling::extract_colors(&self.page).await
    }
}

impl<P: StyleHost> Engine<P> {
    /// Enables or disables dark mode with `mappings` as the full mapping table.
    ///
    /// The new state is recorded even when the page rejects the style write;
    /// the return value reports whether the page now reflects it.
    pub fn apply(&mut self, enabled: bool, mappings: ColorMappings) -> bool {
        self.state.enabled = enabled;
        self.state.color_mappings = mappings;
        info!(enabled, mappings = self.state.color_mappings.len(), "applying");
        if enabled {
            self.install()
        } else {
            report(self.remove())
        }
    }

    /// Merges one mapping entry, regenerating the stylesheet when enabled.
    ///
    /// While disabled the entry is only stored; it takes effect on the next
    /// `apply(true, ..)` that carries it.
    pub fn update_color_mapping(&mut self, original: &str, replacement: &str) -> bool {
        self.state.color_mappings.insert(original, replacement);
        debug!(original, replacement, enabled = self.state.enabled, "mapping updated");
        if !self.state.enabled {
            return true;
        }
        self.install()
    }

    fn install(&mut self) -> bool {
        let rendered = MappedStyle::new(&self.palette, &self.state.color_mappings).style_text();
        match rendered {
            Ok(text) => report(self.write_styles(&text)),
            Err(err) => {
                warn!(%err, "could not render stylesheet");
                false
            }
        }
    }

    fn write_styles(&mut self, text: &str) -> Result<(), InjectionError> {
        self.ensure_style_element()?;
        self.page.set_style_text(STYLE_ELEMENT_ID, text)?;
        self.page.set_root_class(ACTIVE_CLASS, true)
    }

    fn remove(&mut self) -> Result<(), InjectionError> {
        if self.style_attached {
            self.page.set_style_text(STYLE_ELEMENT_ID, "")?;
        }
        self.page.set_root_class(ACTIVE_CLASS, false)
    }

    fn ensure_style_element(&mut self) -> Result<(), InjectionError> {
        if !self.style_attached {
            self.page.append_style_element(STYLE_ELEMENT_ID)?;
            self.style_attached = true;
        }
        Ok(())
    }
}

fn report(result: Result<(), InjectionError>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            warn!(%err, "style injection failed");
            false
        }
    }
}

/// Counts scans in flight on one engine.
struct ScanGuard<'a> {
    active: &'a AtomicUsize,
}

impl<'a> ScanGuard<'a> {
    fn enter(active: &'a AtomicUsize) -> Self {
        let already = active.fetch_add(1, Ordering::SeqCst);
        if already > 0 {
            debug!(already, "scan started while another is running");
        }
        Self { active }
    }
}

impl Drop for ScanGuard<'_> {
    fn drop(&mut self) {
        self.active.fetch_sub(1, Ordering::SeqCst);
    }
}
