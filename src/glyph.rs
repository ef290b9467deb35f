use crate::constants::GLYPH_FONT;
use crate::core::{BitmapFont, GlyphBitmap, GlyphRasterizer, SwarmError};
use wasm_bindgen::JsCast;
use web_sys as web;

/// Draws digits with the browser's text renderer into an offscreen 2D
/// canvas. Falls back to the built-in bitmap font when no 2D context can be
/// created.
pub struct CanvasRasterizer {
    canvas: Option<(web::HtmlCanvasElement, web::CanvasRenderingContext2d)>,
    fallback: BitmapFont,
}

impl CanvasRasterizer {
    pub fn new(document: &web::Document) -> Self {
        let canvas = match create_context(document) {
            Ok(c) => Some(c),
            Err(e) => {
                log::warn!("[glyph] 2d canvas unavailable ({}); using bitmap font", e);
                None
            }
        };
        Self {
            canvas,
            fallback: BitmapFont,
        }
    }
}

fn create_context(
    document: &web::Document,
) -> anyhow::Result<(web::HtmlCanvasElement, web::CanvasRenderingContext2d)> {
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .dyn_into()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    let ctx = canvas
        .get_context("2d")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .ok_or_else(|| anyhow::anyhow!("no 2d context"))?
        .dyn_into::<web::CanvasRenderingContext2d>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
    Ok((canvas, ctx))
}

fn raster_err(e: wasm_bindgen::JsValue) -> SwarmError {
    SwarmError::Raster(format!("{:?}", e))
}

impl GlyphRasterizer for CanvasRasterizer {
    fn rasterize(&mut self, text: &str, size: u32) -> crate::core::Result<GlyphBitmap> {
        let Some((canvas, ctx)) = &self.canvas else {
            return self.fallback.rasterize(text, size);
        };
        canvas.set_width(size);
        canvas.set_height(size);
        let s = size as f64;
        ctx.set_fill_style_str("black");
        ctx.fill_rect(0.0, 0.0, s, s);
        ctx.set_font(GLYPH_FONT);
        ctx.set_fill_style_str("white");
        ctx.set_text_align("center");
        ctx.set_text_baseline("middle");
        ctx.fill_text(text, s / 2.0, s / 2.0).map_err(raster_err)?;
        let rgba = ctx.get_image_data(0.0, 0.0, s, s).map_err(raster_err)?.data();
        // White on black, so the red channel is the luminance.
        let luma = rgba.0.chunks_exact(4).map(|px| px[0]).collect();
        Ok(GlyphBitmap { size, luma })
    }
}
