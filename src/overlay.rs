use crate::constants::{HINT_ID, HINT_TEXT};
use web_sys as web;

#[inline]
pub fn show_hint(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(HINT_ID) {
        _ = el.class_list().remove_1("hidden");
        // fallback for environments without CSS class
        _ = el.set_attribute("style", "");
    }
}

#[inline]
pub fn hide_hint(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(HINT_ID) {
        _ = el.class_list().add_1("hidden");
        _ = el.set_attribute("style", "display:none");
    }
}

/// Reset the bottom hint to its idle text.
pub fn set_ready(document: &web::Document) {
    set_hint_text(document, HINT_TEXT);
}

/// Replace the hint text, e.g. with a degraded-mode notice.
pub fn set_hint_text(document: &web::Document, text: &str) {
    if let Some(el) = document.get_element_by_id(HINT_ID) {
        el.set_text_content(Some(text));
    }
    show_hint(document);
}
