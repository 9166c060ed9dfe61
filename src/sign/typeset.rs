//! Measuring and rasterizing single lines of label text.
//!
//! The label compositor only needs two things from a font: how wide a line
//! will be and how to put its pixels onto the surface. [`Typesetter`] is that
//! seam; [`FontTypesetter`] implements it with cosmic-text (re-exported by
//! glyphon) for the custom font face the sign uses.

use glyphon::{
    Attrs, Buffer, Family, FontSystem, Metrics, Shaping, SwashCache,
    cosmic_text::{self, fontdb},
};
use image::{Rgba, RgbaImage};

use crate::error::SignError;

/// Horizontal extent and vertical reach of one set line, in pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineMetrics {
    pub width: f32,
    /// Distance from the baseline up to the top of the line box.
    pub ascent: f32,
    /// Distance from the baseline down to the bottom of the line box.
    pub descent: f32,
}

pub trait Typesetter {
    fn measure(&mut self, text: &str, font_px: f32) -> LineMetrics;

    /// Draw `text` with its left edge at `x` and its baseline at `baseline`.
    ///
    /// Pixels falling outside `canvas` are dropped.
    fn draw(
        &mut self,
        text: &str,
        font_px: f32,
        x: f32,
        baseline: f32,
        colour: Rgba<u8>,
        canvas: &mut RgbaImage,
    );
}

/// Typesets with one font face loaded from memory (no system fonts).
pub struct FontTypesetter {
    font_system: FontSystem,
    cache: SwashCache,
    family: String,
}

impl FontTypesetter {
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, SignError> {
        let mut db = fontdb::Database::new();
        db.load_font_data(data);
        let family = db
            .faces()
            .next()
            .and_then(|face| face.families.first())
            .map(|(name, _)| name.clone())
            .ok_or_else(|| SignError::FontLoad("the font data holds no usable face".to_string()))?;
        log::info!("Loaded font family `{}`", family);
        let font_system = FontSystem::new_with_locale_and_db("en-US".to_string(), db);
        Ok(Self {
            font_system,
            cache: SwashCache::new(),
            family,
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    fn shape(&mut self, text: &str, font_px: f32) -> Buffer {
        let mut buffer = Buffer::new(&mut self.font_system, Metrics::new(font_px, font_px * 1.2));
        buffer.set_size(&mut self.font_system, None, None);
        let attrs = Attrs::new().family(Family::Name(&self.family));
        buffer.set_text(&mut self.font_system, text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(&mut self.font_system, false);
        buffer
    }
}

impl Typesetter for FontTypesetter {
    fn measure(&mut self, text: &str, font_px: f32) -> LineMetrics {
        let buffer = self.shape(text, font_px);
        let mut metrics = LineMetrics {
            width: 0.0,
            ascent: font_px * 0.8,
            descent: font_px * 0.2,
        };
        // A single line without wrapping yields at most one run.
        if let Some(run) = buffer.layout_runs().next() {
            metrics.width = run.line_w;
            metrics.ascent = run.line_y - run.line_top;
            metrics.descent = run.line_top + run.line_height - run.line_y;
        }
        metrics
    }

    fn draw(
        &mut self,
        text: &str,
        font_px: f32,
        x: f32,
        baseline: f32,
        colour: Rgba<u8>,
        canvas: &mut RgbaImage,
    ) {
        let buffer = self.shape(text, font_px);
        let Rgba([r, g, b, a]) = colour;
        let base = cosmic_text::Color::rgba(r, g, b, a);
        for run in buffer.layout_runs() {
            let offset_y = baseline - run.line_y;
            for glyph in run.glyphs.iter() {
                let physical = glyph.physical((x, offset_y), 1.0);
                self.cache.with_pixels(
                    &mut self.font_system,
                    physical.cache_key,
                    base,
                    |gx, gy, pixel| {
                        let (r, g, b, a) = pixel.as_rgba_tuple();
                        blend_over(
                            canvas,
                            physical.x + gx,
                            run.line_y as i32 + physical.y + gy,
                            Rgba([r, g, b, a]),
                        );
                    },
                );
            }
        }
    }
}

/// Source-over blend of `src` onto the pixel at (`x`, `y`), ignoring
/// coordinates outside the image.
pub(crate) fn blend_over(canvas: &mut RgbaImage, x: i32, y: i32, src: Rgba<u8>) {
    if x < 0 || y < 0 || x as u32 >= canvas.width() || y as u32 >= canvas.height() {
        return;
    }
    let dst = canvas.get_pixel_mut(x as u32, y as u32);
    let alpha = src[3] as f32 / 255.0;
    for channel in 0..3 {
        let blended = src[channel] as f32 * alpha + dst[channel] as f32 * (1.0 - alpha);
        dst[channel] = blended.round() as u8;
    }
    let dst_alpha = dst[3] as f32 / 255.0;
    dst[3] = ((alpha + dst_alpha * (1.0 - alpha)) * 255.0).round() as u8;
}

/// Typesetters for tests.
#[cfg(any(test, feature = "integration-tests"))]
pub mod testing {
    use super::*;

    /// Sets every visible character as a solid block with a fixed advance.
    ///
    /// Deterministic and font-free, so label tests can inspect real pixels.
    pub struct BlockTypesetter;

    impl BlockTypesetter {
        pub const ADVANCE: f32 = 0.6;
        pub const ASCENT: f32 = 0.75;
    }

    impl Typesetter for BlockTypesetter {
        fn measure(&mut self, text: &str, font_px: f32) -> LineMetrics {
            LineMetrics {
                width: text.chars().count() as f32 * font_px * Self::ADVANCE,
                ascent: font_px * Self::ASCENT,
                descent: 0.0,
            }
        }

        fn draw(
            &mut self,
            text: &str,
            font_px: f32,
            x: f32,
            baseline: f32,
            colour: Rgba<u8>,
            canvas: &mut RgbaImage,
        ) {
            let advance = font_px * Self::ADVANCE;
            let top = (baseline - font_px * Self::ASCENT).round() as i32;
            let bottom = baseline.round() as i32;
            for (idx, ch) in text.chars().enumerate() {
                if ch.is_whitespace() {
                    continue;
                }
                let left = (x + idx as f32 * advance).round() as i32;
                let right = (x + (idx as f32 + 0.8) * advance).round() as i32;
                for py in top..bottom {
                    for px in left..right {
                        blend_over(canvas, px, py, colour);
                    }
                }
            }
        }
    }

    /// Tuffy, a public domain face kept with the test fixtures.
    #[cfg(test)]
    pub(crate) fn fixture_font() -> FontTypesetter {
        let data = include_bytes!(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/Tuffy.ttf"));
        FontTypesetter::from_bytes(data.to_vec()).expect("fixture font loads")
    }
}
