use web_sys as web;

const OVERLAY_ID: &str = "start-overlay";

#[inline]
pub fn show(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(OVERLAY_ID) {
        let _ = el.set_attribute("style", "");
    }
}

#[inline]
pub fn hide(document: &web::Document) {
    if let Some(el) = document.get_element_by_id(OVERLAY_ID) {
        let _ = el.set_attribute("style", "display:none");
    }
}

/// Shows a failure in the overlay so the player can retry.
pub fn show_error(document: &web::Document, message: &str) {
    crate::dom::set_text(document, "overlay-message", message);
    show(document);
}
