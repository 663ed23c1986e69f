#![cfg(target_arch = "wasm32")]
use glow_core::GlowAnimation;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod constants;
mod dom;
mod frame;
mod options;
mod overlay;
mod price;
mod render;

use constants::{HOST_SELECTOR, REDUCED_MOTION_QUERY, RENDERER_ATTR};

thread_local! {
    static INSTANCES: RefCell<Vec<frame::LoopHandle>> = const { RefCell::new(Vec::new()) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("glow-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

/// Stop every running glow loop. Safe to call repeatedly.
#[wasm_bindgen]
pub fn stop_all() {
    INSTANCES.with(|list| {
        for handle in list.borrow_mut().iter_mut() {
            handle.stop();
        }
    });
}

/// Stop every instance and remove the overlay layers from the page.
#[wasm_bindgen]
pub fn unmount_all() {
    INSTANCES.with(|list| {
        for mut handle in list.borrow_mut().drain(..) {
            handle.stop();
            overlay::remove(&handle.context().borrow().overlay);
        }
    });
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let hosts = dom::query_all(&document, HOST_SELECTOR);
    if hosts.is_empty() {
        log::info!("no {} hosts on this page", HOST_SELECTOR);
    }
    let reduced_motion = dom::prefers_reduced_motion(REDUCED_MOTION_QUERY);
    for host in &hosts {
        // one broken host must not take the others down
        if let Err(e) = mount(&document, host, reduced_motion) {
            log::error!("[glow] mount failed: {:?}", e);
        }
    }

    spawn_local(price::fill_estimates(document));
    Ok(())
}

fn mount(document: &web::Document, host: &web::Element, reduced_motion: bool) -> anyhow::Result<()> {
    let viewport = dom::viewport_size();
    let (config, avoid) = options::read_config(document, host, viewport);
    let kind = render::helpers::parse_renderer_kind(host.get_attribute(RENDERER_ATTR).as_deref());

    let layer = overlay::mount(document, host)?;
    let renderer = render::Renderer::new(kind, document, &layer)?;
    let ctx = Rc::new(RefCell::new(frame::FrameContext::new(
        GlowAnimation::new(config),
        renderer,
        layer,
        avoid,
    )));

    let handle = if reduced_motion {
        log::info!("[glow] reduced motion requested; drawing a still frame");
        frame::render_still(ctx)
    } else {
        frame::start_loop(ctx)
    };
    INSTANCES.with(|list| list.borrow_mut().push(handle));
    Ok(())
}
