#![cfg(target_arch = "wasm32")]
use crate::constants::{CANVAS_ID, VIDEO_ID};
use crate::core::{
    DetectionGate, FieldParams, ParticleField, PresentationController, SharedHandState,
};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod capture;
mod constants;
mod core;
mod dom;
mod frame;
mod glyph;
mod overlay;
mod render;
mod speech;
mod tracker;

/// Handles that `stop()` needs to tear the session down.
#[derive(Default)]
struct Session {
    gate: Option<DetectionGate>,
    stream: Option<web::MediaStream>,
    speech: Option<Rc<speech::Speech>>,
}

thread_local! {
    static SESSION: RefCell<Session> = RefCell::new(Session::default());
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("gesture-swarm starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
        }
    });
    Ok(())
}

/// Stop both loops, release the camera and silence speech.
#[wasm_bindgen]
pub fn stop() {
    SESSION.with(|s| {
        let mut s = s.borrow_mut();
        if let Some(gate) = s.gate.take() {
            gate.cancel();
        }
        if let Some(stream) = s.stream.take() {
            capture::stop_camera(&stream);
        }
        if let Some(speech) = s.speech.take() {
            speech.cancel();
        }
    });
    if let Some(document) = dom::window_document() {
        overlay::hide_hint(&document);
    }
    log::info!("gesture-swarm stopped");
}

async fn init() -> anyhow::Result<()> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let canvas: web::HtmlCanvasElement = dom::element_by_id(&document, CANVAS_ID)?;
    let video: web::HtmlVideoElement = dom::element_by_id(&document, VIDEO_ID)?;

    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    dom::wire_canvas_resize(&canvas);

    let hand = SharedHandState::neutral();
    let gate = DetectionGate::new();
    let speech = Rc::new(speech::Speech::new());
    let presentation = Rc::new(RefCell::new(PresentationController::new()));
    SESSION.with(|s| {
        let mut s = s.borrow_mut();
        s.gate = Some(gate.clone());
        s.speech = Some(speech.clone());
    });

    let params = FieldParams::default();
    let field = ParticleField::new(params);
    let gpu = frame::init_gpu(&canvas, field.len()).await;
    if gpu.is_none() {
        log::warn!("[gpu] unavailable; formations run without drawing");
    }

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        field,
        presentation: presentation.clone(),
        hand: hand.clone(),
        gate: gate.clone(),
        canvas: canvas.clone(),
        gpu,
        rasterizer: glyph::CanvasRasterizer::new(&document),
        speech: speech.clone(),
        started: Instant::now(),
        instances: Vec::new(),
    }));
    frame::start_loop(frame_ctx);

    // Browsers only allow speech after a user gesture.
    {
        let presentation = presentation.clone();
        let speech = speech.clone();
        dom::add_window_click_listener(move || {
            let greeting = presentation.borrow_mut().unlock_voice();
            if let Some(greeting) = greeting {
                speech.say(&greeting);
            }
        });
    }
    overlay::set_ready(&document);

    if let Err(e) = start_tracking(&video, hand, gate).await {
        // Without a camera or detector the idle formation keeps running.
        log::error!("[detect] hand tracking unavailable: {:?}", e);
    }
    Ok(())
}

async fn start_tracking(
    video: &web::HtmlVideoElement,
    hand: SharedHandState,
    gate: DetectionGate,
) -> anyhow::Result<()> {
    let stream = capture::start_camera(video).await?;
    SESSION.with(|s| s.borrow_mut().stream = Some(stream));
    let detector = tracker::load_detector().await?;
    if gate.is_cancelled() {
        return Ok(());
    }
    tracker::wire_results(&detector, hand, gate.clone());
    tracker::start_detection_loop(detector, video.clone(), gate);
    log::info!("[detect] hand tracking started");
    Ok(())
}
