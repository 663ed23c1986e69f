use crate::constants::{ATTR_PREFIX, AVOID_SELECTOR_ATTR, OPTION_KEYS};
use crate::dom;
use glam::Vec2;
use glow_core::{AvoidRect, GlowConfig};
use web_sys as web;

/// Avoid regions that follow page content. Measured at mount and again on
/// every resize, since reflow moves the content they cover.
pub struct AvoidSource {
    document: web::Document,
    selector: String,
    // from `data-glow-avoid`, in viewport percent
    fixed: Vec<AvoidRect>,
}

impl AvoidSource {
    pub fn measure(&self) -> Vec<AvoidRect> {
        let mut rects = self.fixed.clone();
        rects.extend(dom::avoid_rects_for(&self.document, &self.selector));
        rects
    }
}

/// Build the configuration for one host element from its `data-glow-*`
/// attributes. Bad values are logged and skipped; the effect always mounts.
pub fn read_config(
    document: &web::Document,
    host: &web::Element,
    viewport: Vec2,
) -> (GlowConfig, Option<AvoidSource>) {
    let mut config = GlowConfig::default();
    // Unseeded hosts get a fresh layout per page load.
    config.seed = rand::random();
    for key in OPTION_KEYS {
        let attr = format!("{}{}", ATTR_PREFIX, key);
        if let Some(value) = host.get_attribute(&attr) {
            if let Err(e) = config.apply_attribute(key, &value) {
                log::warn!("[glow] ignoring {}=\"{}\": {}", attr, value, e);
            }
        }
    }
    let avoid = host
        .get_attribute(AVOID_SELECTOR_ATTR)
        .filter(|_| config.layout.is_grid())
        .map(|selector| AvoidSource {
            document: document.clone(),
            selector,
            fixed: config.layout.avoid_rects().to_vec(),
        });
    if let Some(source) = &avoid {
        let rects = source.measure();
        log::info!("[glow] avoiding {} content regions", rects.len());
        config.set_avoid_rects(rects);
    }
    config.fit_to_viewport(viewport.x, viewport.y);
    (config, avoid)
}
