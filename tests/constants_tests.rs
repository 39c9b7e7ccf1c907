// Host-side tests for the web front-end constants.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}

use constants::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn pixel_ratio_bounds_are_ordered() {
    assert!(MIN_DEVICE_PIXEL_RATIO >= 1.0);
    assert!(MAX_DEVICE_PIXEL_RATIO > MIN_DEVICE_PIXEL_RATIO);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn label_font_range_is_usable() {
    assert!(LABEL_MIN_FONT_PX > 0.0);
    assert!(LABEL_MAX_FONT_PX > LABEL_MIN_FONT_PX);
    assert!(LABEL_ALPHA_SCALE > 0.0 && LABEL_ALPHA_SCALE <= 1.0);
}

#[test]
fn dom_ids_are_distinct_and_plain() {
    let ids = [CANVAS_ID, LABEL_CANVAS_ID, HINT_ID];
    for (i, a) in ids.iter().enumerate() {
        assert!(!a.is_empty());
        assert!(!a.contains(' ') && !a.starts_with('#'));
        for b in &ids[i + 1..] {
            assert_ne!(a, b);
        }
    }
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn hint_refreshes_at_a_human_pace() {
    assert!(HINT_REFRESH_SECS >= 0.25 && HINT_REFRESH_SECS <= 5.0);
}
