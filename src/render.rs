//! Render adapters. These are the only code that touches presentation
//! APIs; each reads the marker list after the scheduler update and writes
//! opacity and glow for every marker.

mod canvas;
mod dom_style;
pub mod helpers;

use glow_core::{Marker, Render};
use web_sys as web;

pub use canvas::CanvasRenderer;
pub use dom_style::DomRenderer;
pub use helpers::RendererKind;

pub enum Renderer {
    Dom(DomRenderer),
    Canvas(CanvasRenderer),
}

impl Renderer {
    pub fn new(
        kind: RendererKind,
        document: &web::Document,
        overlay: &web::HtmlElement,
    ) -> anyhow::Result<Self> {
        Ok(match kind {
            RendererKind::Dom => Renderer::Dom(DomRenderer::new(document, overlay)),
            RendererKind::Canvas => Renderer::Canvas(CanvasRenderer::new(document, overlay)?),
        })
    }

    /// Build presentation nodes for a fresh marker set.
    pub fn rebuild(&mut self, markers: &[Marker]) {
        match self {
            Renderer::Dom(r) => r.rebuild(markers),
            // the canvas redraws everything every frame
            Renderer::Canvas(_) => {}
        }
    }
}

impl Render for Renderer {
    fn render(&mut self, markers: &[Marker]) {
        match self {
            Renderer::Dom(r) => r.render(markers),
            Renderer::Canvas(r) => r.render(markers),
        }
    }
}
