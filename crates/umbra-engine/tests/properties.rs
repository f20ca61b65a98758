//! Property-based tests for sampling and style application.

use proptest::prelude::*;
use umbra_engine::{extract_colors, ColorCount, Engine, SnapshotElement, SnapshotPage, MAX_COLORS};
use umbra_render::{ColorMappings, STYLE_ELEMENT_ID};

// ============================================================================
// Test helpers
// ============================================================================

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

fn element(color: Option<String>, background: Option<String>, width: f64, height: f64) -> SnapshotElement {
    SnapshotElement {
        tag: "div".into(),
        width,
        height,
        color,
        background_color: background,
        ..SnapshotElement::default()
    }
}

fn rgb_strategy() -> impl Strategy<Value = String> {
    (any::<u8>(), any::<u8>(), any::<u8>()).prop_map(|(r, g, b)| format!("rgb({r}, {g}, {b})"))
}

fn element_strategy() -> impl Strategy<Value = SnapshotElement> {
    (
        prop::option::of(rgb_strategy()),
        prop::option::of(rgb_strategy()),
        prop_oneof![Just(0.0), 1.0..500.0f64],
        prop_oneof![Just(0.0), 1.0..500.0f64],
    )
        .prop_map(|(color, background, w, h)| element(color, background, w, h))
}

fn mapping_strategy() -> impl Strategy<Value = ColorMappings> {
    prop::collection::btree_map("#[0-9a-f]{6}", "#[0-9a-f]{6}", 0..8)
        .prop_map(ColorMappings::from)
}

// ============================================================================
// Sampling
// ============================================================================

proptest! {
    /// A page where every element shares one background collapses to one entry.
    #[test]
    fn shared_background_collapses(n in 1usize..400, background in rgb_strategy()) {
        let elements = (0..n)
            .map(|_| element(None, Some(background.clone()), 10.0, 10.0))
            .collect();
        let colors = block_on(extract_colors(&SnapshotPage::new(elements)));
        prop_assert_eq!(colors.len(), 1);
        prop_assert!(colors[0].count >= n);
    }

    /// Results are capped and ranked non-increasing.
    #[test]
    fn ranking_is_capped_and_sorted(elements in prop::collection::vec(element_strategy(), 0..300)) {
        let colors = block_on(extract_colors(&SnapshotPage::new(elements)));
        prop_assert!(colors.len() <= MAX_COLORS);
        prop_assert!(colors.windows(2).all(|w| w[0].count >= w[1].count));
    }

    /// Counts never exceed two samples per element.
    #[test]
    fn counts_are_bounded(elements in prop::collection::vec(element_strategy(), 0..300)) {
        let n = elements.len();
        let colors = block_on(extract_colors(&SnapshotPage::new(elements)));
        let total: usize = colors.iter().map(|c: &ColorCount| c.count).sum();
        prop_assert!(total <= 2 * n);
        prop_assert!(colors.iter().all(|c| c.count > 0));
    }
}

// ============================================================================
// Style application
// ============================================================================

proptest! {
    /// enable, disable, enable leaves the same text as one enable.
    #[test]
    fn reenable_is_idempotent(mappings in mapping_strategy()) {
        let mut once = Engine::new(SnapshotPage::default());
        once.apply(true, mappings.clone());

        let mut toggled = Engine::new(SnapshotPage::default());
        toggled.apply(true, mappings.clone());
        toggled.apply(false, mappings.clone());
        toggled.apply(true, mappings);

        prop_assert_eq!(
            toggled.page().style_text(STYLE_ELEMENT_ID),
            once.page().style_text(STYLE_ELEMENT_ID)
        );
        prop_assert_eq!(toggled.page().style_elements().len(), 1);
    }

    /// Updates made while disabled change nothing on the page.
    #[test]
    fn disabled_updates_are_invisible(
        mappings in mapping_strategy(),
        original in "#[0-9a-f]{6}",
        replacement in "#[0-9a-f]{6}",
    ) {
        let mut engine = Engine::new(SnapshotPage::default());
        engine.apply(true, mappings.clone());
        engine.apply(false, mappings);
        let before = engine.page().clone();

        prop_assert!(engine.update_color_mapping(&original, &replacement));
        prop_assert_eq!(engine.page(), &before);
        prop_assert_eq!(engine.state().color_mappings.get(&original), Some(replacement.as_str()));
    }
}
