use crate::constants::*;
use crate::core::{
    Camera, DetectionGate, ParticleField, ParticleInstance, PresentationController,
    SharedHandState,
};
use crate::glyph::CanvasRasterizer;
use crate::render;
use crate::speech::Speech;
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use web_sys as web;

pub struct FrameContext<'a> {
    pub field: ParticleField,
    pub presentation: Rc<RefCell<PresentationController>>,
    pub hand: SharedHandState,
    pub gate: DetectionGate,

    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<render::GpuState<'a>>,
    pub rasterizer: CanvasRasterizer,
    pub speech: Rc<Speech>,

    pub started: Instant,
    pub instances: Vec<ParticleInstance>,
}

impl<'a> FrameContext<'a> {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let time_sec = (now - self.started).as_secs_f32();

        let (w, h) = (self.canvas.width().max(1), self.canvas.height().max(1));
        let mut camera =
            Camera::looking_at_origin(CAMERA_Z, CAMERA_FOV_DEG.to_radians(), w as f32 / h as f32);
        camera.znear = CAMERA_ZNEAR;
        camera.zfar = CAMERA_ZFAR;
        let viewport = camera.viewport();

        // Only an empty cell skips the tick. Startup publishes a neutral
        // state, so the idle scatter animates before any detection arrives.
        let Some(state) = self.hand.snapshot() else {
            self.draw(&camera);
            return;
        };
        self.field
            .tick(Some(&state), time_sec, &viewport, &mut self.rasterizer);
        let said = self.presentation.borrow_mut().update(&state);
        if let Some(announcement) = said {
            log::info!("[voice] {}", announcement.text);
            self.speech.say(&announcement);
        }
        self.draw(&camera);
    }

    fn draw(&mut self, camera: &Camera) {
        let Some(g) = &mut self.gpu else {
            return;
        };
        g.resize_if_needed(self.canvas.width(), self.canvas.height());
        self.field.write_instances(&mut self.instances);
        let look = self.presentation.borrow().look();
        match g.render(camera.view_projection(), &look, &self.instances) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => g.reconfigure(),
            Err(e) => log::error!("render error: {:?}", e),
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    particle_capacity: usize,
) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas, particle_capacity).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

/// Render loop driven by requestAnimationFrame; stops rescheduling once the
/// gate is cancelled.
pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    let frame_ctx_tick = frame_ctx.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let mut ctx = frame_ctx_tick.borrow_mut();
        if !ctx.gate.should_continue() {
            return;
        }
        ctx.frame();
        drop(ctx);
        crate::tracker::request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    crate::tracker::request_frame(&tick);
}
