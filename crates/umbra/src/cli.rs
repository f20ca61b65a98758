//! Command-line definition and dispatch.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use umbra_render::Slot;

use crate::commands;
use crate::output::OutputMode;
use crate::prefs::PrefsStore;

/// Sample page colors, build dark-mode mappings and manage presets.
#[derive(Debug, Parser)]
#[command(name = "umbra", version, about)]
pub struct Cli {
    /// Config directory (defaults to $UMBRA_CONFIG_DIR, then the platform config dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Format for data results
    #[arg(long, short, global = true, value_enum, default_value_t = OutputMode::Text)]
    pub output: OutputMode,

    /// Log more (-v info, -vv debug); overrides UMBRA_LOG
    #[arg(long, short, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rank the colors a page snapshot renders
    Extract {
        /// Snapshot file (.json, .yaml or .yml)
        snapshot: PathBuf,
    },

    /// Build dark-mode mappings for a snapshot and apply them
    Map {
        snapshot: PathBuf,

        /// Explicit mapping; may be repeated
        #[arg(long = "set", value_name = "ORIGINAL=NEW", value_parser = parse_assignment)]
        set: Vec<(String, String)>,

        /// Generate mappings for the N most frequent colors
        /// (default: all of them, unless --set is given)
        #[arg(long, value_name = "N")]
        auto: Option<usize>,

        /// Print the resulting stylesheet instead of the mapping table
        #[arg(long)]
        css: bool,
    },

    /// Print the full-document stylesheet for a preset
    Css {
        /// Preset to render (default: the active preset with custom colors)
        #[arg(long)]
        preset: Option<String>,
    },

    /// List available presets
    Presets,

    /// Show or change preferences
    Prefs {
        #[command(subcommand)]
        action: Option<PrefsAction>,
    },

    /// Answer JSON commands, one per line, against a snapshot
    Serve {
        snapshot: PathBuf,

        /// Read commands from a file instead of stdin
        #[arg(long, value_name = "FILE")]
        input: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum PrefsAction {
    /// Print current preferences
    Show,
    /// Flip dark mode on or off
    Toggle,
    /// Switch preset (clears custom colors)
    Preset { name: String },
    /// Override one palette slot of the active preset
    Color { slot: Slot, value: String },
    /// Restore defaults
    Reset,
}

fn parse_assignment(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((original, new)) if !original.trim().is_empty() && !new.trim().is_empty() => {
            Ok((original.trim().to_string(), new.trim().to_string()))
        }
        _ => Err(format!("expected ORIGINAL=NEW, got '{}'", s)),
    }
}

/// Runs one parsed command, writing results to `out`.
pub async fn run<W: Write>(cli: Cli, out: &mut W) -> Result<()> {
    let mode = cli.output;
    match cli.command {
        Command::Extract { snapshot } => commands::extract(&snapshot, mode, out).await,
        Command::Map {
            snapshot,
            set,
            auto,
            css,
        } => commands::map(&snapshot, &set, auto, css, mode, out).await,
        Command::Css { preset } => {
            let store = PrefsStore::locate(cli.config_dir.as_deref())?;
            commands::css(&store, preset.as_deref(), out)
        }
        Command::Presets => {
            let store = PrefsStore::locate(cli.config_dir.as_deref())?;
            commands::presets(&store, mode, out)
        }
        Command::Prefs { action } => {
            let store = PrefsStore::locate(cli.config_dir.as_deref())?;
            commands::prefs(&store, action.unwrap_or(PrefsAction::Show), mode, out)
        }
        Command::Serve { snapshot, input } => {
            commands::serve(&snapshot, input.as_deref(), out).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("#fff=#222"),
            Ok(("#fff".to_string(), "#222".to_string()))
        );
        assert_eq!(
            parse_assignment("rgb(1, 2, 3) = navy"),
            Ok(("rgb(1, 2, 3)".to_string(), "navy".to_string()))
        );
        assert!(parse_assignment("#fff").is_err());
        assert!(parse_assignment("=#fff").is_err());
    }

    #[test]
    fn test_parse_map_flags() {
        let cli = Cli::try_parse_from([
            "umbra", "map", "page.json", "--set", "#fff=#111", "--set", "red=#800", "--auto", "3",
            "-o", "json",
        ])
        .unwrap();
        assert_eq!(cli.output, OutputMode::Json);
        let Command::Map { set, auto, css, .. } = cli.command else {
            panic!("expected map");
        };
        assert_eq!(set.len(), 2);
        assert_eq!(auto, Some(3));
        assert!(!css);
    }

    #[test]
    fn test_parse_prefs_color_slot() {
        let cli = Cli::try_parse_from(["umbra", "prefs", "color", "bg", "#000"]).unwrap();
        let Command::Prefs {
            action: Some(PrefsAction::Color { slot, value }),
        } = cli.command
        else {
            panic!("expected prefs color");
        };
        assert_eq!(slot, Slot::Background);
        assert_eq!(value, "#000");
    }

    #[test]
    fn test_unknown_slot_is_rejected() {
        assert!(Cli::try_parse_from(["umbra", "prefs", "color", "accent", "#000"]).is_err());
    }
}
