use super::helpers::{glow_radius_px, rgba_css, to_canvas_px};
use crate::constants::GLOW_COLOR;
use crate::dom;
use glow_core::{Marker, Render};
use std::f64::consts::TAU;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Radial-gradient glows on a full-viewport 2D canvas.
pub struct CanvasRenderer {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
}

impl CanvasRenderer {
    pub fn new(document: &web::Document, overlay: &web::HtmlElement) -> anyhow::Result<Self> {
        let canvas: web::HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(|e| anyhow::anyhow!("{:?}", e))?
            .dyn_into()
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        _ = canvas.set_attribute("style", "position:absolute;inset:0;width:100%;height:100%;");
        overlay
            .append_child(&canvas)
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| anyhow::anyhow!("{:?}", e))?
            .ok_or_else(|| anyhow::anyhow!("no 2d context"))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        dom::sync_canvas_backing_size(&canvas);
        Ok(Self { canvas, ctx })
    }

    fn draw_glow(&self, m: &Marker, dpr: f32) -> Result<(), wasm_bindgen::JsValue> {
        let b = m.brightness();
        let center = to_canvas_px(m.position, self.canvas.width(), self.canvas.height());
        let radius = (glow_radius_px(m.size, b) * dpr).max(1.0) as f64;
        let (x, y) = (center.x as f64, center.y as f64);
        let gradient = self.ctx.create_radial_gradient(x, y, 0.0, x, y, radius)?;
        gradient.add_color_stop(0.0, &rgba_css(GLOW_COLOR, b))?;
        gradient.add_color_stop(0.4, &rgba_css(GLOW_COLOR, b * 0.45))?;
        gradient.add_color_stop(1.0, &rgba_css(GLOW_COLOR, 0.0))?;
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.begin_path();
        self.ctx.arc(x, y, radius, 0.0, TAU)?;
        self.ctx.fill();
        Ok(())
    }
}

impl Render for CanvasRenderer {
    fn render(&mut self, markers: &[Marker]) {
        dom::sync_canvas_backing_size(&self.canvas);
        let (w, h) = (self.canvas.width() as f64, self.canvas.height() as f64);
        self.ctx.clear_rect(0.0, 0.0, w, h);
        let dpr = dom::device_pixel_ratio() as f32;
        for m in markers.iter().filter(|m| m.is_lit()) {
            if let Err(e) = self.draw_glow(m, dpr) {
                log::error!("[render] canvas draw error: {:?}", e);
                return;
            }
        }
    }
}
