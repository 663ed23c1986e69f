use crate::constants::{OVERLAY_CLASS, OVERLAY_STYLE};
use wasm_bindgen::JsCast;
use web_sys as web;

/// Create the click-through layer the effect draws into and attach it as
/// the first child of `host`.
pub fn mount(document: &web::Document, host: &web::Element) -> anyhow::Result<web::HtmlElement> {
    let el: web::HtmlElement = document
        .create_element("div")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    el.set_class_name(OVERLAY_CLASS);
    _ = el.set_attribute("style", OVERLAY_STYLE);
    _ = el.set_attribute("aria-hidden", "true");
    host.prepend_with_node_1(&el)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok(el)
}

#[inline]
pub fn hide(overlay: &web::HtmlElement) {
    _ = overlay.class_list().add_1("hidden");
    _ = overlay.style().set_property("display", "none");
}

/// Drop every child (markers or canvas) but keep the layer itself.
pub fn clear(overlay: &web::HtmlElement) {
    while let Some(child) = overlay.first_child() {
        _ = overlay.remove_child(&child);
    }
}

pub fn remove(overlay: &web::HtmlElement) {
    overlay.remove();
}
