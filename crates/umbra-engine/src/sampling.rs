//! Frequency sampling of a page's rendered colors.
//!
//! The scan walks every element in document order, in batches of
//! [`BATCH_SIZE`], and yields to the runtime between batches so a page with
//! tens of thousands of nodes never monopolizes the executor. Elements with
//! an empty bounding box are skipped. Each remaining element contributes its
//! computed `color` and `background-color`, normalized to `#rrggbb`.
//!
//! The result is ranked by descending count, ties kept in first-seen order,
//! and capped at [`MAX_COLORS`] entries.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;
use umbra_render::color;

use crate::error::AccessError;
use crate::page::{ColorSource, Property};

/// Elements read between two yields.
pub const BATCH_SIZE: usize = 100;

/// Longest ranked list a scan returns.
pub const MAX_COLORS: usize = 50;

/// One ranked color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorCount {
    /// Normalized `#rrggbb`.
    pub color: String,
    pub count: usize,
}

#[derive(Default)]
struct Tally {
    ranked: Vec<ColorCount>,
    index: HashMap<String, usize>,
}

impl Tally {
    fn record(&mut self, color: String) {
        match self.index.get(&color) {
            Some(&slot) => self.ranked[slot].count += 1,
            None => {
                self.index.insert(color.clone(), self.ranked.len());
                self.ranked.push(ColorCount { color, count: 1 });
            }
        }
    }

    fn into_ranked(self) -> Vec<ColorCount> {
        let mut ranked = self.ranked;
        // sort_by is stable: equal counts keep first-seen order
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(MAX_COLORS);
        ranked
    }
}

/// Scans `source` and returns its most frequent rendered colors.
///
/// Elements that cannot be read are skipped; the scan itself never fails.
/// An empty page yields an empty list.
pub async fn extract_colors<S: ColorSource>(source: &S) -> Vec<ColorCount> {
    let elements = source.elements();
    debug!(elements = elements.len(), "extracting colors");

    let mut tally = Tally::default();
    let mut skipped = 0usize;
    let mut batches = elements.chunks(BATCH_SIZE).peekable();
    while let Some(batch) = batches.next() {
        for element in batch {
            if let Err(err) = sample_element(source, element, &mut tally) {
                skipped += 1;
                debug!(%err, "skipping element");
            }
        }
        if batches.peek().is_some() {
            tokio::task::yield_now().await;
        }
    }

    let ranked = tally.into_ranked();
    debug!(colors = ranked.len(), skipped, "extraction finished");
    ranked
}

fn sample_element<S: ColorSource>(
    source: &S,
    element: &S::Element,
    tally: &mut Tally,
) -> Result<(), AccessError> {
    if source.bounding_box(element)?.is_empty() {
        return Ok(());
    }
    for property in Property::SAMPLED {
        let Some(value) = source.computed_value(element, property)? else {
            continue;
        };
        if let Some(hex) = color::normalize(&value) {
            tally.record(hex);
        }
    }
    Ok(())
}
