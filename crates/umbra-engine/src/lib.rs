//! Umbra Engine - on-demand dark mode for one page.
//!
//! The engine samples the colors a page actually renders, lets a caller
//! decide replacements, and installs a single scoped stylesheet that
//! overrides them. Stylesheet text comes from `umbra-render`; this crate
//! owns the page-facing half:
//!
//! - [`ColorSource`] / [`StyleHost`]: the page as the engine sees it
//! - [`SnapshotPage`]: both traits over a serialized page capture
//! - [`extract_colors`]: batched, yielding frequency scan
//! - [`Engine`]: the Disabled/Enabled state machine
//! - [`Command`], [`Reply`], [`serve`], [`EngineHandle`]: typed messaging
//!
//! # Quick Start
//!
//! ```rust
//! use umbra_engine::{EngineHandle, Engine, SnapshotPage};
//! use umbra_render::dark_mappings;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let page = SnapshotPage::from_json(r##"{"elements": [
//!     {"tag": "body", "width": 800, "height": 600,
//!      "color": "rgb(20, 20, 20)", "background_color": "#ffffff"}
//! ]}"##).unwrap();
//!
//! let (handle, task) = EngineHandle::spawn(Engine::new(page));
//! let colors = handle.extract_colors().await.unwrap();
//! assert_eq!(colors.len(), 2);
//!
//! let mappings = dark_mappings(colors.iter().map(|c| c.color.as_str()));
//! assert!(handle.apply(true, mappings).await.unwrap());
//!
//! drop(handle);
//! let engine = task.await.unwrap();
//! assert!(engine.is_enabled());
//! # });
//! ```
//!
//! # Failure Policy
//!
//! Visual operations never return errors. Unreadable elements are skipped
//! during sampling; a page that refuses style writes makes `apply` and
//! `update_color_mapping` return `false` while the new state is kept.

mod engine;
mod error;
mod message;
mod page;
mod sampling;
mod snapshot;

pub use engine::{Engine, EngineState};
pub use error::{AccessError, EngineError, InjectionError, Result, SnapshotError};
pub use message::{serve, Command, EngineHandle, Envelope, Reply};
pub use page::{ColorSource, Property, Rect, StyleHost};
pub use sampling::{extract_colors, ColorCount, BATCH_SIZE, MAX_COLORS};
pub use snapshot::{SnapshotElement, SnapshotPage, StyleElement};
