// Pure brightness-to-style mappings shared by the DOM and canvas renderers.
// No web APIs here so the host test suite can include this file directly.

use crate::constants::{
    GLOW_BLUR_BASE_PX, GLOW_BLUR_SPAN_PX, GLOW_COLOR, GLOW_RADIUS_MIN_FRACTION, GLOW_RADIUS_SCALE,
};
use glam::Vec2;
use glow_core::Marker;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RendererKind {
    #[default]
    Dom,
    Canvas,
}

#[inline]
pub fn parse_renderer_kind(value: Option<&str>) -> RendererKind {
    match value.map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) if v == "canvas" => RendererKind::Canvas,
        _ => RendererKind::Dom,
    }
}

#[inline]
fn unit(brightness: f32) -> f32 {
    if brightness.is_finite() {
        brightness.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Drop-shadow blur radius; grows with brightness.
#[inline]
pub fn glow_blur_px(brightness: f32) -> f32 {
    GLOW_BLUR_BASE_PX + GLOW_BLUR_SPAN_PX * unit(brightness)
}

/// Canvas glow radius for a marker of `size_px`; grows with brightness.
#[inline]
pub fn glow_radius_px(size_px: f32, brightness: f32) -> f32 {
    let b = unit(brightness);
    size_px.max(0.0) * GLOW_RADIUS_SCALE * (GLOW_RADIUS_MIN_FRACTION + (1.0 - GLOW_RADIUS_MIN_FRACTION) * b)
}

pub fn rgba_css(color: [u8; 3], alpha: f32) -> String {
    format!(
        "rgba({},{},{},{:.3})",
        color[0],
        color[1],
        color[2],
        unit(alpha)
    )
}

pub fn opacity_css(brightness: f32) -> String {
    format!("{:.3}", unit(brightness))
}

pub fn filter_css(brightness: f32) -> String {
    let b = unit(brightness);
    if b <= 0.0 {
        return "none".to_string();
    }
    format!(
        "drop-shadow(0 0 {:.1}px {})",
        glow_blur_px(b),
        rgba_css(GLOW_COLOR, b)
    )
}

#[inline]
pub fn percent_css(fraction: f32) -> String {
    format!("{:.3}%", fraction * 100.0)
}

/// Pair each marker with its presentation node by index. Markers whose node
/// could not be created are skipped without shifting the rest.
pub fn paired_nodes<'a, T>(
    markers: &'a [Marker],
    nodes: &'a [Option<T>],
) -> impl Iterator<Item = (&'a Marker, &'a T)> {
    markers
        .iter()
        .zip(nodes)
        .filter_map(|(m, node)| node.as_ref().map(|n| (m, n)))
}

/// Normalized position to backing-store pixels.
#[inline]
pub fn to_canvas_px(position: Vec2, width: u32, height: u32) -> Vec2 {
    Vec2::new(position.x * width as f32, position.y * height as f32)
}
