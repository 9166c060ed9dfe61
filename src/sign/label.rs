//! Label surface: the wood grain with the sign's text drawn on top.
//!
//! The surface is the wood image blown up by a fixed magnification so the
//! text stays crisp however large the plank ends up on screen. The device's
//! texture size limit caps that magnification. Lines are centered
//! horizontally and stacked around the vertical middle; if the natural layout
//! would leave the surface it is shifted, and shrunk when shifting alone
//! cannot make it fit.

use image::{Rgba, RgbaImage, imageops::FilterType};

use crate::{resources::texture::fitted_size, sign::typeset::Typesetter};

pub const TEXT_COLOUR: Rgba<u8> = Rgba([0, 0, 0, 255]);

const FONT_FRACTION: f32 = 0.025;
const FONT_PADDING_PX: f32 = 10.0;
const FIRST_LINE_LIFT_PX: f32 = 30.0;
const FIT_MARGIN: f32 = 0.95;

/// Where one line of text sits on the surface, in pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct LineBand {
    pub index: usize,
    pub left: f32,
    pub width: f32,
    pub baseline: f32,
    pub top: f32,
    pub bottom: f32,
}

impl LineBand {
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    fn shift(&mut self, dy: f32) {
        self.baseline += dy;
        self.top += dy;
        self.bottom += dy;
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LabelLayout {
    pub width: u32,
    pub height: u32,
    pub font_px: f32,
    pub line_height: f32,
    pub bands: Vec<LineBand>,
}

impl LabelLayout {
    pub fn compute(
        width: u32,
        height: u32,
        magnification: u32,
        lines: &[String],
        typesetter: &mut dyn Typesetter,
    ) -> Self {
        let (w, h) = (width as f32, height as f32);
        let font_size = w.min(h) * FONT_FRACTION * magnification as f32;
        let mut font_px = font_size + FONT_PADDING_PX;
        let mut line_height = font_size * 2.0;
        let first_baseline = h / 2.0 - line_height - FIRST_LINE_LIFT_PX;

        let mut bands = place(w, font_px, line_height, first_baseline, lines, typesetter);
        let widest = bands.iter().map(|band| band.width).fold(0.0, f32::max);
        let (top, bottom) = vertical_extent(&bands);

        if widest > w || bottom - top > h {
            let scale = (w / widest).min(h / (bottom - top)) * FIT_MARGIN;
            log::debug!("Label text does not fit the surface, scaling it by {:.3}", scale);
            font_px *= scale;
            line_height *= scale;
            bands = place(w, font_px, line_height, 0.0, lines, typesetter);
            let (top, bottom) = vertical_extent(&bands);
            let dy = (h - (bottom - top)) / 2.0 - top;
            bands.iter_mut().for_each(|band| band.shift(dy));
        } else if top < 0.0 {
            bands.iter_mut().for_each(|band| band.shift(-top));
        } else if bottom > h {
            bands.iter_mut().for_each(|band| band.shift(h - bottom));
        }

        Self {
            width,
            height,
            font_px,
            line_height,
            bands,
        }
    }
}

fn place(
    width: f32,
    font_px: f32,
    line_height: f32,
    first_baseline: f32,
    lines: &[String],
    typesetter: &mut dyn Typesetter,
) -> Vec<LineBand> {
    lines
        .iter()
        .enumerate()
        .map(|(index, line)| {
            let metrics = typesetter.measure(line, font_px);
            let baseline = first_baseline + index as f32 * line_height;
            LineBand {
                index,
                left: (width - metrics.width) / 2.0,
                width: metrics.width,
                baseline,
                top: baseline - metrics.ascent,
                bottom: baseline + metrics.descent,
            }
        })
        .collect()
}

fn vertical_extent(bands: &[LineBand]) -> (f32, f32) {
    if bands.is_empty() {
        return (0.0, 0.0);
    }
    let top = bands.iter().map(|band| band.top).fold(f32::INFINITY, f32::min);
    let bottom = bands
        .iter()
        .map(|band| band.bottom)
        .fold(f32::NEG_INFINITY, f32::max);
    (top, bottom)
}

/// The composited surface together with the layout that produced it.
#[derive(Clone, Debug, PartialEq)]
pub struct ComposedLabel {
    pub image: RgbaImage,
    pub layout: LabelLayout,
}

/// Size of the label surface for a `width` x `height` wood image and the
/// magnification it ends up with.
///
/// The magnification drops until neither side exceeds `max_side`. Wood that
/// is too large even unmagnified is scaled down to the limit.
pub fn surface_size(
    width: u32,
    height: u32,
    magnification: u32,
    max_side: u32,
) -> (u32, u32, u32) {
    let (width, height) = (width.max(1), height.max(1));
    let max_side = max_side.max(1);
    let longest = width.max(height);
    let fitting = (max_side / longest).min(magnification.max(1));
    if fitting == 0 {
        let (width, height) = fitted_size(width, height, max_side).unwrap_or((width, height));
        return (width, height, 1);
    }
    if fitting < magnification {
        log::debug!(
            "Label magnification lowered from {} to {} to stay within {} px",
            magnification,
            fitting,
            max_side
        );
    }
    (width * fitting, height * fitting, fitting)
}

/// Scale `wood` by up to `magnification` and draw `lines` onto it in black.
/// Neither side of the result exceeds `max_side`.
pub fn compose_label(
    wood: &RgbaImage,
    magnification: u32,
    max_side: u32,
    lines: &[String],
    typesetter: &mut dyn Typesetter,
) -> ComposedLabel {
    let (width, height, magnification) =
        surface_size(wood.width(), wood.height(), magnification, max_side);
    let mut image = if wood.width() == 0 || wood.height() == 0 {
        RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]))
    } else {
        image::imageops::resize(wood, width, height, FilterType::Triangle)
    };

    let layout = LabelLayout::compute(width, height, magnification, lines, typesetter);
    for band in layout.bands.iter() {
        let text = &lines[band.index];
        if text.is_empty() {
            continue;
        }
        typesetter.draw(
            text,
            layout.font_px,
            band.left,
            band.baseline,
            TEXT_COLOUR,
            &mut image,
        );
    }

    ComposedLabel { image, layout }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign::typeset::testing::{BlockTypesetter, fixture_font};

    const WOOD: Rgba<u8> = Rgba([150, 110, 60, 255]);
    const LIMIT: u32 = 8192;

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|line| line.to_string()).collect()
    }

    fn greeting() -> Vec<String> {
        lines(&["Hello !", "How are you ?!", "This is...", "OUR BASE :D"])
    }

    fn is_ink(pixel: &Rgba<u8>) -> bool {
        pixel[0] < 50 && pixel[1] < 50 && pixel[2] < 50
    }

    /// Contiguous row ranges that contain ink, with their column extents.
    fn ink_bands(image: &RgbaImage) -> Vec<(u32, u32, u32, u32)> {
        let mut bands = Vec::new();
        let mut current: Option<(u32, u32, u32, u32)> = None;
        for y in 0..image.height() {
            let columns: Vec<u32> = (0..image.width())
                .filter(|&x| is_ink(image.get_pixel(x, y)))
                .collect();
            let found = columns.first().zip(columns.last());
            match (found, current) {
                (Some((&min, &max)), Some((top, _, left, right))) => {
                    current = Some((top, y, left.min(min), right.max(max)));
                }
                (Some((&min, &max)), None) => current = Some((y, y, min, max)),
                (None, Some(band)) => {
                    bands.push(band);
                    current = None;
                }
                (None, None) => (),
            }
        }
        if let Some(band) = current {
            bands.push(band);
        }
        bands
    }

    #[test]
    fn greeting_produces_four_centered_bands_inside_the_surface() {
        let wood = RgbaImage::from_pixel(128, 64, WOOD);
        let label = compose_label(&wood, 4, LIMIT, &greeting(), &mut BlockTypesetter);

        assert_eq!(label.image.dimensions(), (512, 256));
        let bands = ink_bands(&label.image);
        assert_eq!(bands.len(), 4, "{:?}", bands);

        let advance = label.layout.font_px * BlockTypesetter::ADVANCE;
        for (top, bottom, left, right) in bands.iter() {
            assert!(top < bottom);
            assert!(*right < 512 && *bottom < 256);
            let center = (*left + *right) as f32 / 2.0;
            assert!(
                (center - 256.0).abs() <= advance * 0.25,
                "band centered at {} instead of 256",
                center
            );
        }
        for pair in bands.windows(2) {
            assert!(pair[0].1 < pair[1].0, "bands overlap: {:?}", pair);
        }
    }

    #[test]
    fn natural_layout_follows_the_line_rhythm() {
        let mut typesetter = BlockTypesetter;
        let layout = LabelLayout::compute(512, 256, 4, &greeting(), &mut typesetter);
        let font_size = 256.0 * FONT_FRACTION * 4.0;
        assert_eq!(layout.font_px, font_size + FONT_PADDING_PX);
        assert_eq!(layout.line_height, font_size * 2.0);
        let first = 128.0 - layout.line_height - FIRST_LINE_LIFT_PX;
        for band in layout.bands.iter() {
            let expected = first + band.index as f32 * layout.line_height;
            assert!((band.baseline - expected).abs() < 1e-3);
        }
    }

    #[test]
    fn block_above_the_surface_is_shifted_down() {
        let mut typesetter = BlockTypesetter;
        let layout = LabelLayout::compute(256, 64, 4, &greeting(), &mut typesetter);
        assert_eq!(layout.font_px, 64.0 * FONT_FRACTION * 4.0 + FONT_PADDING_PX);
        assert!(layout.bands[0].top.abs() < 1e-3, "{:?}", layout.bands[0]);
        for band in layout.bands.iter() {
            assert!(band.bottom <= 64.0, "{:?}", band);
        }
    }

    #[test]
    fn small_surface_keeps_text_inside() {
        let mut typesetter = BlockTypesetter;
        let layout = LabelLayout::compute(128, 64, 4, &greeting(), &mut typesetter);
        for band in layout.bands.iter() {
            assert!(band.top >= -1e-3 && band.bottom <= 64.0 + 1e-3, "{:?}", band);
            assert!(band.left >= 0.0 && band.right() <= 128.0, "{:?}", band);
        }
    }

    #[test]
    fn oversized_text_is_shrunk_to_fit() {
        let mut typesetter = BlockTypesetter;
        let layout = LabelLayout::compute(160, 16, 4, &greeting(), &mut typesetter);
        let natural_px = 16.0 * FONT_FRACTION * 4.0 + FONT_PADDING_PX;
        assert!(layout.font_px < natural_px);
        for band in layout.bands.iter() {
            assert!(band.top >= -1e-3 && band.bottom <= 16.0 + 1e-3, "{:?}", band);
            assert!(band.left >= 0.0 && band.right() <= 160.0, "{:?}", band);
        }
    }

    #[test]
    fn empty_lines_keep_their_slot_but_draw_nothing() {
        let wood = RgbaImage::from_pixel(128, 64, WOOD);
        let text = lines(&["", "middle", "", ""]);
        let label = compose_label(&wood, 4, LIMIT, &text, &mut BlockTypesetter);
        assert_eq!(ink_bands(&label.image).len(), 1);
        assert_eq!(label.layout.bands.len(), 4);
        assert_eq!(label.layout.bands[0].width, 0.0);
    }

    #[test]
    fn composing_twice_is_identical() {
        let wood = RgbaImage::from_pixel(64, 32, WOOD);
        let first = compose_label(&wood, 4, LIMIT, &greeting(), &mut BlockTypesetter);
        let second = compose_label(&wood, 4, LIMIT, &greeting(), &mut BlockTypesetter);
        assert_eq!(first, second);
    }

    #[test]
    fn no_text_leaves_plain_wood() {
        let wood = RgbaImage::from_pixel(16, 8, WOOD);
        let label = compose_label(&wood, 4, LIMIT, &[], &mut BlockTypesetter);
        assert!(label.image.pixels().all(|pixel| *pixel == WOOD));
    }

    #[test]
    fn large_wood_stays_within_the_webgl2_limit() {
        let limit = wgpu::Limits::downlevel_webgl2_defaults().max_texture_dimension_2d;
        let wood = RgbaImage::from_pixel(1024, 512, WOOD);
        let label = compose_label(&wood, 4, limit, &greeting(), &mut BlockTypesetter);
        assert_eq!(label.image.dimensions(), (2048, 1024));
        assert_eq!(ink_bands(&label.image).len(), 4);
    }

    #[test]
    fn magnification_drops_to_the_largest_that_fits() {
        assert_eq!(surface_size(128, 64, 4, 8192), (512, 256, 4));
        assert_eq!(surface_size(700, 300, 4, 2048), (1400, 600, 2));
        assert_eq!(surface_size(1500, 20, 4, 2048), (1500, 20, 1));
    }

    #[test]
    fn wood_beyond_the_limit_is_scaled_down() {
        assert_eq!(surface_size(4096, 1024, 4, 2048), (2048, 512, 1));
        assert_eq!(surface_size(100, 9000, 4, 2048), (23, 2048, 1));

        let wood = RgbaImage::from_pixel(300, 60, WOOD);
        let label = compose_label(&wood, 4, 150, &greeting(), &mut BlockTypesetter);
        assert_eq!(label.image.dimensions(), (150, 30));
    }

    #[test]
    fn greeting_in_a_real_font_fits_the_surface() {
        let wood = RgbaImage::from_pixel(128, 64, WOOD);
        let mut font = fixture_font();
        let label = compose_label(&wood, 4, LIMIT, &greeting(), &mut font);

        assert_eq!(label.image.dimensions(), (512, 256));
        for band in label.layout.bands.iter() {
            assert!(band.width > 0.0, "{:?}", band);
            assert!(band.left >= 0.0 && band.right() <= 512.0, "{:?}", band);
            assert!(band.top >= 0.0 && band.bottom <= 256.0, "{:?}", band);
        }
        let bands = ink_bands(&label.image);
        assert_eq!(bands.len(), 4, "{:?}", bands);
        for pair in bands.windows(2) {
            assert!(pair[0].1 < pair[1].0, "bands overlap: {:?}", pair);
        }
    }
}
