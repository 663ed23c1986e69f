// Host-side tests for the pure brightness-to-style mappings.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod constants {
    include!("../src/constants.rs");
}
mod helpers {
    include!("../src/render/helpers.rs");
}

use glam::Vec2;
use helpers::*;

#[test]
fn renderer_kind_defaults_to_dom() {
    assert_eq!(parse_renderer_kind(None), RendererKind::Dom);
    assert_eq!(parse_renderer_kind(Some("dom")), RendererKind::Dom);
    assert_eq!(parse_renderer_kind(Some(" Canvas ")), RendererKind::Canvas);
    assert_eq!(parse_renderer_kind(Some("webgl")), RendererKind::Dom);
}

#[test]
fn glow_grows_monotonically_with_brightness() {
    let mut prev_blur = glow_blur_px(0.0);
    let mut prev_radius = glow_radius_px(20.0, 0.0);
    for i in 1..=100 {
        let b = i as f32 / 100.0;
        let blur = glow_blur_px(b);
        let radius = glow_radius_px(20.0, b);
        assert!(blur > prev_blur);
        assert!(radius > prev_radius);
        prev_blur = blur;
        prev_radius = radius;
    }
}

#[test]
fn out_of_range_brightness_is_clamped() {
    assert_eq!(glow_blur_px(2.0), glow_blur_px(1.0));
    assert_eq!(glow_blur_px(-1.0), glow_blur_px(0.0));
    assert_eq!(glow_blur_px(f32::NAN), glow_blur_px(0.0));
    assert_eq!(opacity_css(1.7), "1.000");
    assert_eq!(opacity_css(-0.2), "0.000");
}

#[test]
fn unlit_markers_get_no_filter() {
    assert_eq!(filter_css(0.0), "none");
    let lit = filter_css(0.5);
    assert!(lit.starts_with("drop-shadow(0 0 9.0px rgba(255,214,120,0.500))"), "{lit}");
}

#[test]
fn css_helpers_format_compactly() {
    assert_eq!(rgba_css([1, 2, 3], 0.25), "rgba(1,2,3,0.250)");
    assert_eq!(percent_css(0.125), "12.500%");
    assert_eq!(opacity_css(0.3333), "0.333");
}

#[test]
fn canvas_positions_scale_with_backing_store() {
    let p = to_canvas_px(Vec2::new(0.25, 0.5), 800, 600);
    assert_eq!(p, Vec2::new(200.0, 300.0));
}

#[test]
fn missing_nodes_do_not_shift_later_markers() {
    let markers: Vec<glow_core::Marker> = (0..4)
        .map(|i| glow_core::Marker::new(i, Vec2::splat(0.5), 20.0, 0.0))
        .collect();
    let nodes = vec![Some("a"), None, Some("c"), Some("d")];
    let pairs: Vec<(u32, &str)> = paired_nodes(&markers, &nodes)
        .map(|(m, n)| (m.id, *n))
        .collect();
    assert_eq!(pairs, vec![(0, "a"), (2, "c"), (3, "d")]);
}
