//! # Umbra - dark mode from the terminal
//!
//! Command-line companion to `umbra-engine`. It runs the engine against page
//! snapshots, keeps the user's dark-mode preferences, and renders preset
//! stylesheets:
//!
//! ```text
//! umbra extract page.json            # rank rendered colors
//! umbra map page.json --auto 10      # dark mappings for the top 10
//! umbra map page.json --set '#fff=#1e1e1e' --css
//! umbra css --preset midnight        # whole-document preset sheet
//! umbra prefs preset amoled          # persist the active preset
//! umbra serve page.json < cmds.jsonl # answer JSON commands line by line
//! ```
//!
//! Data results honor `--output text|json|yaml|csv`. Logging goes to stderr,
//! filtered by `UMBRA_LOG` (default `warn`).

pub mod cli;
mod commands;
pub mod output;
pub mod prefs;

pub use cli::{run, Cli};
pub use output::OutputMode;
pub use prefs::{Preferences, PrefsStore};
