//! Command handlers.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use serde_json::json;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use umbra_engine::{ColorCount, Command, Engine, EngineHandle, SnapshotPage};
use umbra_render::{
    color, dark_mappings, is_light, Palette, PresetStyle, Slot, StyleStrategy, STYLE_ELEMENT_ID,
};

use crate::cli::PrefsAction;
use crate::output::{emit, swatch, OutputMode};
use crate::prefs::{Preferences, PrefsStore};

type EngineTask = JoinHandle<Engine<SnapshotPage>>;

fn start_engine(snapshot: &Path) -> Result<(EngineHandle, EngineTask)> {
    let page = SnapshotPage::load(snapshot)
        .with_context(|| format!("failed to load snapshot {}", snapshot.display()))?;
    info!(elements = page.elements.len(), "snapshot loaded");
    Ok(EngineHandle::spawn(Engine::new(page)))
}

async fn stop_engine(handle: EngineHandle, task: EngineTask) -> Result<Engine<SnapshotPage>> {
    drop(handle);
    task.await.context("engine task failed")
}

#[derive(Debug, Serialize)]
struct ColorRow<'a> {
    rank: usize,
    color: &'a str,
    count: usize,
    tone: &'static str,
}

fn tone(expression: &str) -> &'static str {
    match color::parse(expression) {
        Some(rgba) if is_light(&rgba) => "light",
        Some(_) => "dark",
        None => "unknown",
    }
}

pub async fn extract<W: Write>(snapshot: &Path, mode: OutputMode, out: &mut W) -> Result<()> {
    let (handle, task) = start_engine(snapshot)?;
    let colors = handle.extract_colors().await?;
    stop_engine(handle, task).await?;

    let rows: Vec<ColorRow> = colors
        .iter()
        .enumerate()
        .map(|(i, c)| ColorRow {
            rank: i + 1,
            color: &c.color,
            count: c.count,
            tone: tone(&c.color),
        })
        .collect();

    emit(out, mode, &rows, |w| {
        if rows.is_empty() {
            return writeln!(w, "no colors found");
        }
        for row in &rows {
            writeln!(
                w,
                "{:>3}  {}  {}  {:>6}  {}",
                row.rank,
                swatch(row.color),
                row.color,
                row.count,
                row.tone
            )?;
        }
        Ok(())
    })
}

#[derive(Debug, Serialize)]
struct MappingRow<'a> {
    original: &'a str,
    replacement: &'a str,
    count: usize,
    inline_matches: usize,
}

pub async fn map<W: Write>(
    snapshot: &Path,
    set: &[(String, String)],
    auto: Option<usize>,
    css: bool,
    mode: OutputMode,
    out: &mut W,
) -> Result<()> {
    for (_, replacement) in set {
        if color::parse(replacement).is_none() {
            bail!("'{}' is not a color", replacement);
        }
    }

    let (handle, task) = start_engine(snapshot)?;
    let colors = handle.extract_colors().await?;

    let top = auto.unwrap_or(if set.is_empty() { colors.len() } else { 0 });
    let mappings = dark_mappings(colors.iter().take(top).map(|c| c.color.as_str()));
    if !handle.apply(true, mappings).await? {
        bail!("page rejected the dark-mode stylesheet");
    }
    for (original, replacement) in set {
        if !handle.update_color(original.as_str(), replacement.as_str()).await? {
            bail!("page rejected the mapping {} → {}", original, replacement);
        }
    }
    let engine = stop_engine(handle, task).await?;

    if css {
        let text = engine.page().style_text(STYLE_ELEMENT_ID).unwrap_or_default();
        writeln!(out, "{}", text)?;
        return Ok(());
    }

    let count_of = |original: &str| {
        colors
            .iter()
            .find(|c: &&ColorCount| c.color == original)
            .map_or(0, |c| c.count)
    };
    let rows: Vec<MappingRow> = engine
        .state()
        .color_mappings
        .iter()
        .map(|(original, replacement)| MappingRow {
            original,
            replacement,
            count: count_of(original),
            inline_matches: engine.page().inline_matches(original),
        })
        .collect();

    emit(out, mode, &rows, |w| {
        if rows.is_empty() {
            return writeln!(w, "no mappings");
        }
        for row in &rows {
            writeln!(
                w,
                "{}  {:<10} → {}  {:<10}  {:>6} sampled  {:>4} inline",
                swatch(row.original),
                row.original,
                swatch(row.replacement),
                row.replacement,
                row.count,
                row.inline_matches
            )?;
        }
        Ok(())
    })
}

pub fn css<W: Write>(store: &PrefsStore, preset: Option<&str>, out: &mut W) -> Result<()> {
    let registry = store.registry()?;
    let style = match preset {
        Some(name) => {
            let palette = registry
                .get(name)
                .cloned()
                .ok_or_else(|| unknown_preset(name, registry.names()))?;
            PresetStyle::new(palette)
        }
        None => {
            let prefs = store.load()?;
            PresetStyle::from_preferences(&registry, &prefs.active_preset, &prefs.custom_colors)
        }
    };
    writeln!(out, "{}", style.style_text()?)?;
    Ok(())
}

#[derive(Debug, Serialize)]
struct PresetRow<'a> {
    name: &'a str,
    active: bool,
    #[serde(flatten)]
    palette: &'a Palette,
}

pub fn presets<W: Write>(store: &PrefsStore, mode: OutputMode, out: &mut W) -> Result<()> {
    let registry = store.registry()?;
    let prefs = store.load()?;
    let rows: Vec<PresetRow> = registry
        .iter()
        .map(|(name, palette)| PresetRow {
            name,
            active: name.eq_ignore_ascii_case(&prefs.active_preset),
            palette,
        })
        .collect();

    emit(out, mode, &rows, |w| {
        for row in &rows {
            let marker = if row.active { "*" } else { " " };
            let swatches: Vec<String> = Slot::ALL
                .iter()
                .map(|slot| swatch(row.palette.get(*slot)))
                .collect();
            writeln!(w, "{} {:<12} {}", marker, row.name, swatches.join(" "))?;
        }
        Ok(())
    })
}

pub fn prefs<W: Write>(
    store: &PrefsStore,
    action: PrefsAction,
    mode: OutputMode,
    out: &mut W,
) -> Result<()> {
    let mut prefs = store.load()?;
    match action {
        PrefsAction::Show => {
            let registry = store.registry()?;
            let palette = prefs.palette(&registry);
            return emit(out, mode, &prefs, |w| show_prefs(w, &prefs, &palette));
        }
        PrefsAction::Toggle => {
            let enabled = prefs.toggle();
            store.save(&prefs)?;
            writeln!(out, "dark mode {}", if enabled { "enabled" } else { "disabled" })?;
        }
        PrefsAction::Preset { name } => {
            let registry = store.registry()?;
            let canonical = registry
                .names()
                .find(|preset| preset.eq_ignore_ascii_case(&name))
                .ok_or_else(|| unknown_preset(&name, registry.names()))?
                .to_string();
            prefs.select_preset(&canonical);
            store.save(&prefs)?;
            writeln!(out, "preset set to {}", canonical)?;
        }
        PrefsAction::Color { slot, value } => {
            if color::parse(&value).is_none() {
                bail!("'{}' is not a color", value);
            }
            prefs.set_custom_color(slot, value.trim());
            store.save(&prefs)?;
            writeln!(out, "{} set to {}", slot, value.trim())?;
        }
        PrefsAction::Reset => {
            store.save(&Preferences::default())?;
            writeln!(out, "preferences reset")?;
        }
    }
    Ok(())
}

fn show_prefs<W: Write>(w: &mut W, prefs: &Preferences, palette: &Palette) -> std::io::Result<()> {
    writeln!(w, "enabled: {}", if prefs.enabled { "yes" } else { "no" })?;
    writeln!(w, "preset:  {}", prefs.active_preset)?;
    for slot in Slot::ALL {
        let custom = if prefs.custom_colors.get(slot).is_some() {
            "  (custom)"
        } else {
            ""
        };
        let value = palette.get(slot);
        writeln!(w, "  {:<10} {} {}{}", slot.name(), swatch(value), value, custom)?;
    }
    Ok(())
}

fn unknown_preset<'a>(name: &str, known: impl Iterator<Item = &'a str>) -> anyhow::Error {
    anyhow!(
        "unknown preset '{}' (available: {})",
        name,
        known.collect::<Vec<_>>().join(", ")
    )
}

pub async fn serve<W: Write>(snapshot: &Path, input: Option<&Path>, out: &mut W) -> Result<()> {
    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        )),
        None => Box::new(std::io::stdin().lock()),
    };

    let (handle, task) = start_engine(snapshot)?;
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = match serde_json::from_str::<Command>(&line) {
            Ok(command) => serde_json::to_string(&handle.request(command).await?)?,
            Err(err) => {
                warn!(%err, "rejecting malformed command");
                json!({"type": "ERROR", "data": {"message": err.to_string()}}).to_string()
            }
        };
        writeln!(out, "{}", response)?;
        out.flush()?;
    }
    stop_engine(handle, task).await?;
    Ok(())
}
