//! Digit glyph formation: rasterize text into a small luminance bitmap and
//! scatter the particles over its lit pixels.

use crate::constants::*;
use crate::error::{Result, SwarmError};
use glam::Vec3;
use rand::Rng;

/// Square single-channel bitmap, row-major, one byte per pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphBitmap {
    pub size: u32,
    pub luma: Vec<u8>,
}

impl GlyphBitmap {
    pub fn blank(size: u32) -> Self {
        Self {
            size,
            luma: vec![0; (size * size) as usize],
        }
    }

    /// Luminance at (x, y); pixels outside the buffer read as dark.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.luma
            .get((y * self.size + x) as usize)
            .copied()
            .unwrap_or(0)
    }

    /// Reject bitmaps whose buffer does not hold `size * size` pixels.
    pub fn check(&self) -> Result<()> {
        let expected = self.size as usize * self.size as usize;
        if self.luma.len() != expected {
            return Err(SwarmError::Raster(format!(
                "bitmap of size {} has {} pixels, expected {}",
                self.size,
                self.luma.len(),
                expected
            )));
        }
        Ok(())
    }

    /// Bright pixels on a `GLYPH_SAMPLE_STRIDE` grid, in world units centered
    /// on the bitmap middle with +y up.
    pub fn lit_points(&self) -> Vec<Vec3> {
        let size = self.size as f32;
        let mut out = Vec::new();
        for y in (0..self.size).step_by(GLYPH_SAMPLE_STRIDE) {
            for x in (0..self.size).step_by(GLYPH_SAMPLE_STRIDE) {
                if self.get(x, y) > GLYPH_LUMA_THRESHOLD {
                    out.push(Vec3::new(
                        (x as f32 / size - 0.5) * GLYPH_WORLD_SPAN,
                        -(y as f32 / size - 0.5) * GLYPH_WORLD_SPAN,
                        0.0,
                    ));
                }
            }
        }
        out
    }
}

/// Anything that can draw a short string (a digit) into a bitmap.
pub trait GlyphRasterizer {
    fn rasterize(&mut self, text: &str, size: u32) -> Result<GlyphBitmap>;
}

// 5x7 digit font, one row per byte, bit 4 is the leftmost column.
static DIGITS_5X7: [[u8; 7]; 10] = [
    [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E], // 0
    [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E], // 1
    [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F], // 2
    [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E], // 3
    [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02], // 4
    [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E], // 5
    [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E], // 6
    [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08], // 7
    [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E], // 8
    [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C], // 9
];

/// Platform-independent rasterizer using a built-in 5x7 digit font scaled
/// to roughly the footprint of an 80px bold face in a 100px box.
#[derive(Clone, Copy, Debug, Default)]
pub struct BitmapFont;

impl BitmapFont {
    const COLS: u32 = 5;
    const ROWS: u32 = 7;

    fn rows_for(ch: char) -> Option<&'static [u8; 7]> {
        ch.to_digit(10).map(|d| &DIGITS_5X7[d as usize])
    }
}

impl GlyphRasterizer for BitmapFont {
    fn rasterize(&mut self, text: &str, size: u32) -> Result<GlyphBitmap> {
        let glyphs: Vec<&[u8; 7]> = text
            .chars()
            .map(|c| {
                Self::rows_for(c)
                    .ok_or_else(|| SwarmError::Raster(format!("no glyph for {c:?}")))
            })
            .collect::<Result<_>>()?;
        let mut bmp = GlyphBitmap::blank(size);
        if glyphs.is_empty() || size == 0 {
            return Ok(bmp);
        }
        let box_h = size as f32 * 0.7;
        let cell = box_h / Self::ROWS as f32;
        let glyph_w = cell * Self::COLS as f32;
        let gap = cell;
        let total_w = glyphs.len() as f32 * glyph_w + (glyphs.len() - 1) as f32 * gap;
        let x0 = (size as f32 - total_w) * 0.5;
        let y0 = (size as f32 - box_h) * 0.5;
        for py in 0..size {
            let fy = (py as f32 + 0.5 - y0) / cell;
            if fy < 0.0 || fy >= Self::ROWS as f32 {
                continue;
            }
            for px in 0..size {
                let fx = px as f32 + 0.5 - x0;
                if fx < 0.0 {
                    continue;
                }
                let slot = (fx / (glyph_w + gap)) as usize;
                let Some(rows) = glyphs.get(slot) else {
                    continue;
                };
                let col = (fx - slot as f32 * (glyph_w + gap)) / cell;
                if col >= Self::COLS as f32 {
                    continue;
                }
                let bit = Self::COLS - 1 - col as u32;
                if (rows[fy as usize] >> bit) & 1 == 1 {
                    bmp.luma[(py * size + px) as usize] = 255;
                }
            }
        }
        Ok(bmp)
    }
}

/// Glyph target cache: one offset per particle for the digit currently shown.
/// Regenerated in place, and only when the digit changes.
#[derive(Clone, Debug)]
pub struct GlyphTargets {
    digit: Option<u8>,
    targets: Vec<Vec3>,
    regenerations: u64,
}

impl GlyphTargets {
    pub fn new(count: usize) -> Self {
        Self {
            digit: None,
            targets: vec![Vec3::ZERO; count],
            regenerations: 0,
        }
    }

    #[inline]
    pub fn digit(&self) -> Option<u8> {
        self.digit
    }

    #[inline]
    pub fn targets(&self) -> &[Vec3] {
        &self.targets
    }

    /// Number of times the target set has been rebuilt.
    #[inline]
    pub fn regenerations(&self) -> u64 {
        self.regenerations
    }

    /// Make sure the cache holds `digit`; returns true when it was rebuilt.
    pub fn ensure<R: Rng + ?Sized>(
        &mut self,
        digit: u8,
        rasterizer: &mut dyn GlyphRasterizer,
        rng: &mut R,
    ) -> bool {
        if self.digit == Some(digit) {
            return false;
        }
        self.regenerate(&digit.to_string(), rasterizer, rng);
        self.digit = Some(digit);
        true
    }

    fn regenerate<R: Rng + ?Sized>(
        &mut self,
        text: &str,
        rasterizer: &mut dyn GlyphRasterizer,
        rng: &mut R,
    ) {
        let raster = rasterizer
            .rasterize(text, GLYPH_BITMAP_SIZE)
            .and_then(|bmp| bmp.check().map(|()| bmp));
        let points = match raster {
            Ok(bmp) => bmp.lit_points(),
            Err(e) => {
                log::warn!("[glyph] {e}; using jitter");
                Vec::new()
            }
        };
        if points.is_empty() {
            log::warn!("[glyph] no lit pixels for {text:?}; using jitter");
        }
        for t in self.targets.iter_mut() {
            *t = if points.is_empty() {
                Vec3::new(
                    (rng.gen::<f32>() - 0.5) * GLYPH_WORLD_SPAN,
                    (rng.gen::<f32>() - 0.5) * GLYPH_WORLD_SPAN,
                    0.0,
                )
            } else {
                points[rng.gen_range(0..points.len())]
            };
        }
        self.regenerations += 1;
        log::debug!("[glyph] regenerated {text:?} from {} points", points.len());
    }
}
