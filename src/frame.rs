use crate::dom;
use crate::options::AvoidSource;
use crate::overlay;
use crate::render::Renderer;
use glow_core::{FrameLoop, FrameRequester, GlowAnimation};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// `requestAnimationFrame` behind the core frame-loop contract.
pub struct RafRequester {
    callback: FrameCallback,
}

impl RafRequester {
    /// Drop the frame callback, breaking the closure's reference cycle.
    fn release(&mut self) {
        self.callback.borrow_mut().take();
    }
}

impl FrameRequester for RafRequester {
    type Handle = i32;

    fn request_frame(&mut self) -> Option<i32> {
        let window = web::window()?;
        let cb = self.callback.borrow();
        let f = cb.as_ref()?;
        window
            .request_animation_frame(f.as_ref().unchecked_ref())
            .map_err(|e| log::error!("[frame] requestAnimationFrame failed: {:?}", e))
            .ok()
    }

    fn cancel_frame(&mut self, handle: i32) {
        if let Some(w) = web::window() {
            _ = w.cancel_animation_frame(handle);
        }
    }
}

pub struct FrameContext {
    pub animation: GlowAnimation,
    pub renderer: Renderer,
    pub overlay: web::HtmlElement,
    avoid: Option<AvoidSource>,
    built_generation: Option<u64>,
}

impl FrameContext {
    pub fn new(
        animation: GlowAnimation,
        renderer: Renderer,
        overlay: web::HtmlElement,
        avoid: Option<AvoidSource>,
    ) -> Self {
        Self {
            animation,
            renderer,
            overlay,
            avoid,
            built_generation: None,
        }
    }

    pub fn frame(&mut self, now_ms: f64) {
        let generation = self.animation.generation();
        if self.built_generation != Some(generation) {
            self.renderer.rebuild(self.animation.markers());
            self.built_generation = Some(generation);
        }
        self.animation.frame(now_ms, &mut self.renderer);
    }

    pub fn resize(&mut self) {
        let viewport = dom::viewport_size();
        let avoid = self.avoid.as_ref().map(AvoidSource::measure);
        if self.animation.resize(viewport.x, viewport.y, avoid) {
            log::debug!(
                "[frame] viewport {}x{}: markers regenerated",
                viewport.x,
                viewport.y
            );
        }
    }
}

/// A mounted glow instance, animated or still. Stopping is idempotent and
/// releases the frame callback and the resize listener.
pub struct LoopHandle {
    frame_loop: Rc<RefCell<FrameLoop<RafRequester>>>,
    ctx: Rc<RefCell<FrameContext>>,
    resize: Option<dom::WindowListener>,
}

impl LoopHandle {
    pub fn stop(&mut self) {
        let mut fl = self.frame_loop.borrow_mut();
        if fl.is_stopped() {
            return;
        }
        fl.stop();
        fl.requester_mut().release();
        drop(fl);
        self.resize = None;
        overlay::hide(&self.ctx.borrow().overlay);
        log::info!("[frame] glow loop stopped");
    }

    pub fn context(&self) -> &Rc<RefCell<FrameContext>> {
        &self.ctx
    }
}

pub fn start_loop(ctx: Rc<RefCell<FrameContext>>) -> LoopHandle {
    let callback: FrameCallback = Rc::new(RefCell::new(None));
    let frame_loop = Rc::new(RefCell::new(FrameLoop::new(RafRequester {
        callback: callback.clone(),
    })));

    let loop_tick = frame_loop.clone();
    let ctx_tick = ctx.clone();
    *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |now_ms: f64| {
        if !loop_tick.borrow_mut().on_frame() {
            return;
        }
        ctx_tick.borrow_mut().frame(now_ms);
        loop_tick.borrow_mut().schedule_next();
    }) as Box<dyn FnMut(f64)>));

    let ctx_resize = ctx.clone();
    let resize = dom::WindowListener::new("resize", move || {
        ctx_resize.borrow_mut().resize();
    });

    frame_loop.borrow_mut().start();
    LoopHandle {
        frame_loop,
        ctx,
        resize,
    }
}

/// Draw a single still frame and schedule nothing, for visitors who ask
/// for reduced motion. The handle's loop is never started.
pub fn render_still(ctx: Rc<RefCell<FrameContext>>) -> LoopHandle {
    {
        let mut c = ctx.borrow_mut();
        // advance to the top of the fade-in so the still frame shows the set lit
        let config = c.animation.config();
        let peak = config.cycle_duration.mul_f32(config.fade_boundary);
        c.animation.tick(peak);
        c.frame(instant::now());
    }
    let requester = RafRequester {
        callback: Rc::new(RefCell::new(None)),
    };
    LoopHandle {
        frame_loop: Rc::new(RefCell::new(FrameLoop::new(requester))),
        ctx,
        resize: None,
    }
}
