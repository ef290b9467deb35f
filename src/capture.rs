use crate::constants::{CAPTURE_FACING_MODE, VIDEO_READY_STATE};
use crate::core::constants::{CAPTURE_HEIGHT, CAPTURE_WIDTH};
use js_sys::{Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

fn video_constraints() -> anyhow::Result<Object> {
    let video = Object::new();
    let set = |k: &str, v: JsValue| {
        Reflect::set(&video, &JsValue::from_str(k), &v).map_err(|e| anyhow::anyhow!("{:?}", e))
    };
    set("width", JsValue::from(CAPTURE_WIDTH))?;
    set("height", JsValue::from(CAPTURE_HEIGHT))?;
    set("facingMode", JsValue::from_str(CAPTURE_FACING_MODE))?;
    Ok(video)
}

/// Request the user-facing webcam and attach it to `video`. Resolves once
/// playback has started.
pub async fn start_camera(video: &web::HtmlVideoElement) -> anyhow::Result<web::MediaStream> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let devices = window
        .navigator()
        .media_devices()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let constraints = web::MediaStreamConstraints::new();
    constraints.set_video(&video_constraints()?.into());
    constraints.set_audio(&JsValue::FALSE);
    let promise = devices
        .get_user_media_with_constraints(&constraints)
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let stream: web::MediaStream = JsFuture::from(promise)
        .await
        .map_err(|e| anyhow::anyhow!("camera access denied: {:?}", e))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    video.set_muted(true);
    video.set_autoplay(true);
    _ = video.set_attribute("playsinline", "");
    video.set_src_object(Some(&stream));
    let play = video.play().map_err(|e| anyhow::anyhow!("{:?}", e))?;
    JsFuture::from(play)
        .await
        .map_err(|e| anyhow::anyhow!("video play failed: {:?}", e))?;
    log::info!(
        "[capture] camera {}x{}",
        video.video_width(),
        video.video_height()
    );
    Ok(stream)
}

/// Whether the element has a decodable current frame.
#[inline]
pub fn has_frame(video: &web::HtmlVideoElement) -> bool {
    video.ready_state() >= VIDEO_READY_STATE
}

pub fn stop_camera(stream: &web::MediaStream) {
    for track in stream.get_tracks().iter() {
        if let Ok(track) = track.dyn_into::<web::MediaStreamTrack>() {
            track.stop();
        }
    }
}
