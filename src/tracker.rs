//! Bridge to the JS hand-tracking engine.
//!
//! The engine is created by `window.createHandDetector()` (see
//! `www/hand_detector.js`). Frames are submitted from a dedicated animation
//! loop, one at a time; results arrive on the registered callback, get
//! validated into a `HandFrame`, classified, and published into the shared
//! `HandState`.

use crate::capture;
use crate::core::{DetectionGate, GestureClassifier, HandFrame, Landmark, SharedHandState};
use js_sys::{Array, Reflect};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys as web;

#[wasm_bindgen]
extern "C" {
    #[derive(Clone, Debug)]
    pub type HandDetector;

    #[wasm_bindgen(catch, js_name = createHandDetector)]
    fn create_hand_detector() -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn send(this: &HandDetector, video: &web::HtmlVideoElement) -> Result<js_sys::Promise, JsValue>;

    #[wasm_bindgen(method, js_name = onResults)]
    fn on_results(this: &HandDetector, callback: &Closure<dyn FnMut(JsValue)>);
}

/// Load the detection engine. Failure here is not fatal: the caller keeps
/// the idle formation running.
pub async fn load_detector() -> anyhow::Result<HandDetector> {
    let promise = create_hand_detector().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let detector = JsFuture::from(promise)
        .await
        .map_err(|e| anyhow::anyhow!("hand detector failed to load: {:?}", e))?;
    Ok(detector.unchecked_into())
}

fn get(target: &JsValue, key: &str) -> anyhow::Result<JsValue> {
    Reflect::get(target, &JsValue::from_str(key)).map_err(|e| anyhow::anyhow!("{:?}", e))
}

fn coord(point: &JsValue, key: &str) -> anyhow::Result<f32> {
    get(point, key)?
        .as_f64()
        .map(|v| v as f32)
        .ok_or_else(|| anyhow::anyhow!("landmark field {} is not a number", key))
}

/// Parse a MediaPipe-shaped result object (`multiHandLandmarks`) into a
/// validated frame. A missing landmark list means no hands.
pub fn parse_results(results: &JsValue) -> anyhow::Result<HandFrame> {
    let list = get(results, "multiHandLandmarks")?;
    if list.is_undefined() || list.is_null() {
        return Ok(HandFrame::empty());
    }
    let hands = list
        .dyn_into::<Array>()
        .map_err(|_| anyhow::anyhow!("multiHandLandmarks is not an array"))?;
    let mut points = Vec::with_capacity(hands.length() as usize);
    for hand in hands.iter() {
        let hand = hand
            .dyn_into::<Array>()
            .map_err(|_| anyhow::anyhow!("hand is not an array"))?;
        let pts = hand
            .iter()
            .map(|p| Ok(Landmark::new(coord(&p, "x")?, coord(&p, "y")?, coord(&p, "z")?)))
            .collect::<anyhow::Result<Vec<_>>>()?;
        points.push(pts);
    }
    Ok(HandFrame::from_points(&points)?)
}

/// Register the result callback: classify every well-formed frame and
/// publish it; malformed frames are logged and skipped so the previous
/// state persists.
pub fn wire_results(detector: &HandDetector, hand: SharedHandState, gate: DetectionGate) {
    let classifier = GestureClassifier::new();
    let callback = Closure::wrap(Box::new(move |results: JsValue| {
        if gate.is_cancelled() {
            return;
        }
        match parse_results(&results) {
            Ok(frame) => {
                hand.apply(&classifier, &frame);
            }
            Err(e) => log::warn!("[detect] skipping frame: {}", e),
        }
    }) as Box<dyn FnMut(JsValue)>);
    detector.on_results(&callback);
    callback.forget();
}

fn submit(detector: &HandDetector, video: &web::HtmlVideoElement, gate: &DetectionGate) {
    if !capture::has_frame(video) || !gate.try_begin() {
        return;
    }
    let promise = match detector.send(video) {
        Ok(p) => p,
        Err(e) => {
            log::warn!("[detect] send failed: {:?}", e);
            gate.finish();
            return;
        }
    };
    let gate = gate.clone();
    spawn_local(async move {
        if let Err(e) = JsFuture::from(promise).await {
            log::warn!("[detect] frame failed: {:?}", e);
        }
        gate.finish();
    });
}

/// Submission loop: one animation callback per display frame, at most one
/// detector request in flight, stops rescheduling once the gate is
/// cancelled.
pub fn start_detection_loop(detector: HandDetector, video: web::HtmlVideoElement, gate: DetectionGate) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !gate.should_continue() {
            return;
        }
        submit(&detector, &video, &gate);
        request_frame(&tick_clone);
    }) as Box<dyn FnMut()>));
    request_frame(&tick);
}

pub(crate) fn request_frame(tick: &Rc<RefCell<Option<Closure<dyn FnMut()>>>>) {
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
