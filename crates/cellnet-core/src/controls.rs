//! Keyboard shortcuts shared by both front-ends.
//!
//! Keys are matched on their logical value as a string (`KeyboardEvent.key` on
//! the web, winit's logical key natively) so both sides agree on one table.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    TogglePause,
    ToggleLabels,
    ToggleHint,
    Reseed,
    Quit,
}

#[inline]
pub fn action_for_key(key: &str) -> Option<KeyAction> {
    match key {
        " " | "Spacebar" => Some(KeyAction::TogglePause),
        "l" | "L" => Some(KeyAction::ToggleLabels),
        "h" | "H" => Some(KeyAction::ToggleHint),
        "r" | "R" => Some(KeyAction::Reseed),
        "Escape" => Some(KeyAction::Quit),
        _ => None,
    }
}

/// One-line help text for overlays and the native startup log.
pub const CONTROLS_HELP: &str = "Space pause · L labels · H hint · R reseed";
