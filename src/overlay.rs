use crate::constants::HINT_ID;
use cellnet_core::{Session, CONTROLS_HELP};
use web_sys as web;

#[inline]
pub fn show(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(HINT_ID) {
        _ = el.class_list().remove_1("hidden");
        // fallback for pages without the CSS class
        _ = el.set_attribute("style", "");
    }
}

#[inline]
pub fn hide(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(HINT_ID) {
        _ = el.class_list().add_1("hidden");
        _ = el.set_attribute("style", "display:none");
    }
}

#[inline]
pub fn is_hidden(document: &web::Document) -> bool {
    if let Some(el) = document.get_element_by_id(HINT_ID) {
        if el.class_list().contains("hidden") {
            return true;
        }
        return el
            .get_attribute("style")
            .map(|s| s.contains("display:none"))
            .unwrap_or(false);
    }
    true
}

#[inline]
pub fn toggle(document: &web::Document) {
    if is_hidden(document) {
        show(document);
    } else {
        hide(document);
    }
}

/// Refresh the hint text with the session's tier, scene counts and state.
pub fn update_hint(document: &web::Document, session: &Session) {
    let Some(el) = document.get_element_by_id(HINT_ID) else {
        return;
    };
    let scene = session.scene();
    let state = if session.clock().is_paused() {
        "paused"
    } else {
        "running"
    };
    let hint_html = format!(
        "<div style='color: #cfe7ff; font: 13px system-ui; background: rgba(10, 14, 24, 0.8); padding: 8px 12px; border-radius: 6px; border: 1px solid rgba(80, 110, 150, 0.35);'>Quality: {} • Rings: {} • Lines: {} + {} bloom • Labels: {} • {:.0} fps • {}<br>{}</div>",
        session.tier(),
        scene.rings.len(),
        scene.line_segments.len(),
        scene.bloom_line_segments.len(),
        scene.text_labels.len(),
        session.fps(),
        state,
        CONTROLS_HELP
    );
    el.set_inner_html(&hint_html);
}
