use super::helpers::{filter_css, opacity_css, paired_nodes, percent_css};
use crate::constants::{MARKER_BASE_STYLE, MARKER_CLASS, PALM_GLYPH};
use crate::overlay;
use glow_core::{Marker, Render};
use wasm_bindgen::JsCast;
use web_sys as web;

/// One palm element per marker, styled in place. `nodes[i]` belongs to
/// marker `i`; `None` where creating the element failed.
pub struct DomRenderer {
    document: web::Document,
    overlay: web::HtmlElement,
    nodes: Vec<Option<web::HtmlElement>>,
}

impl DomRenderer {
    pub fn new(document: &web::Document, overlay: &web::HtmlElement) -> Self {
        Self {
            document: document.clone(),
            overlay: overlay.clone(),
            nodes: Vec::new(),
        }
    }

    pub fn rebuild(&mut self, markers: &[Marker]) {
        overlay::clear(&self.overlay);
        self.nodes.clear();
        for m in markers {
            let Some(el) = self
                .document
                .create_element("span")
                .ok()
                .and_then(|e| e.dyn_into::<web::HtmlElement>().ok())
            else {
                log::warn!("[render] could not create element for marker {}", m.id);
                self.nodes.push(None);
                continue;
            };
            el.set_class_name(MARKER_CLASS);
            el.set_text_content(Some(PALM_GLYPH));
            _ = el.set_attribute("style", MARKER_BASE_STYLE);
            let pos = m.position;
            let style = el.style();
            _ = style.set_property("left", &percent_css(pos.x));
            _ = style.set_property("top", &percent_css(pos.y));
            _ = style.set_property("font-size", &format!("{:.1}px", m.size));
            _ = self.overlay.append_child(&el);
            self.nodes.push(Some(el));
        }
    }
}

impl Render for DomRenderer {
    fn render(&mut self, markers: &[Marker]) {
        for (m, el) in paired_nodes(markers, &self.nodes) {
            let style = el.style();
            let b = m.brightness();
            _ = style.set_property("opacity", &opacity_css(b));
            _ = style.set_property("filter", &filter_css(b));
        }
    }
}
