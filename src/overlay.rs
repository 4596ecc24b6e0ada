use crate::constants::{HUD_ID, OVERLAY_ID};
use web_sys as web;

#[inline]
pub fn show(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(OVERLAY_ID) {
        _ = el.class_list().remove_1("hidden");
        // fallback for environments without CSS class
        _ = el.set_attribute("style", "");
    }
}

#[inline]
pub fn hide(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(OVERLAY_ID) {
        _ = el.class_list().add_1("hidden");
        _ = el.set_attribute("style", "display:none");
    }
}

pub fn is_hidden(document: &web::Document) -> bool {
    let Some(el) = document.get_element_by_id(OVERLAY_ID) else {
        return false;
    };
    el.class_list().contains("hidden")
        || el
            .get_attribute("style")
            .map(|s| s.contains("display:none"))
            .unwrap_or(false)
}

#[inline]
pub fn toggle(document: &web::Document) {
    if is_hidden(document) {
        show(document);
    } else {
        hide(document);
    }
}

/// Replace the HUD contents; skipped when unchanged to spare layout work.
pub fn update_hud(document: &web::Document, html: &str) {
    if let Some(el) = document.get_element_by_id(HUD_ID) {
        if el.inner_html() != html {
            el.set_inner_html(html);
        }
    }
}
