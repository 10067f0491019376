use image::{GrayImage, RgbaImage};
use rayon::prelude::*;

use crate::chroma::hsv::Hsv;
use crate::video::types::{CompositedImage, Frame};

/// Inclusive HSV bounds, in 8-bit HSV space (hue 0..180)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HsvRange {
    pub lower: Hsv,
    pub upper: Hsv,
}

impl HsvRange {
    /// The green-screen band: hue 40–80, saturation and value 50–255
    pub const GREEN: HsvRange = HsvRange {
        lower: Hsv { h: 40, s: 50, v: 50 },
        upper: Hsv { h: 80, s: 255, v: 255 },
    };

    pub fn contains(&self, hsv: Hsv) -> bool {
        (self.lower.h..=self.upper.h).contains(&hsv.h)
            && (self.lower.s..=self.upper.s).contains(&hsv.s)
            && (self.lower.v..=self.upper.v).contains(&hsv.v)
    }
}

/// Makes pixels inside a hue band transparent
///
/// The band is fixed to [`HsvRange::GREEN`].
#[derive(Debug, Clone, Copy)]
pub struct ChromaKey {
    range: HsvRange,
}

impl Default for ChromaKey {
    fn default() -> Self {
        Self::green()
    }
}

impl ChromaKey {
    pub fn green() -> Self {
        Self { range: HsvRange::GREEN }
    }

    pub fn range(&self) -> HsvRange {
        self.range
    }

    pub fn is_keyed(&self, rgb: [u8; 3]) -> bool {
        self.range.contains(Hsv::from_rgb(rgb))
    }

    /// Threshold `frame` against the band: 255 where the pixel is keyed, 0 elsewhere
    pub fn mask(&self, frame: &Frame) -> GrayImage {
        let image = frame.as_image();
        let mut mask = GrayImage::new(image.width(), image.height());
        let pixels: &mut [u8] = &mut mask;

        pixels.par_iter_mut()
            .zip(image.as_raw().par_chunks_exact(3))
            .for_each(|(dst, rgb)| {
                *dst = if self.is_keyed([rgb[0], rgb[1], rgb[2]]) { 255 } else { 0 };
            });

        mask
    }

    /// Merge the frame's RGB with an alpha channel derived from `mask`.
    ///
    /// Alpha starts fully opaque and drops to zero wherever the mask is set.
    pub fn merge_alpha(frame: &Frame, mask: &GrayImage) -> CompositedImage {
        let image = frame.as_image();
        let mut rgba = RgbaImage::new(image.width(), image.height());
        let pixels: &mut [u8] = &mut rgba;

        pixels.par_chunks_exact_mut(4)
            .zip(image.as_raw().par_chunks_exact(3))
            .zip(mask.as_raw().par_iter())
            .for_each(|((dst, rgb), &keyed)| {
                dst[..3].copy_from_slice(rgb);
                dst[3] = if keyed != 0 { 0 } else { 255 };
            });

        CompositedImage::new(rgba)
    }

    /// Key `frame` into a composited image
    pub fn apply(&self, frame: &Frame) -> CompositedImage {
        let mask = self.mask(frame);
        Self::merge_alpha(frame, &mask)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_of(pixels: &[[u8; 3]]) -> Frame {
        let mut frame = Frame::new_filled(pixels.len() as u32, 1, [0, 0, 0]);
        for (x, &color) in pixels.iter().enumerate() {
            frame.set_pixel(x as u32, 0, color);
        }
        frame
    }

    #[test]
    fn test_green_is_transparent_and_red_is_opaque() {
        let frame = frame_of(&[[0, 255, 0], [255, 0, 0]]);
        let image = ChromaKey::green().apply(&frame);

        assert_eq!(image.get_pixel(0, 0), [0, 255, 0, 0]);
        assert_eq!(image.get_pixel(1, 0), [255, 0, 0, 255]);
    }

    #[test]
    fn test_hue_band_edges_are_inclusive() {
        let key = ChromaKey::green();

        // Hue 40 and 80 are inside, 39 and 81 are outside.
        assert!(key.is_keyed([170, 255, 0]));
        assert!(!key.is_keyed([180, 255, 0]));
        assert!(key.is_keyed([0, 255, 170]));
        assert!(!key.is_keyed([0, 255, 180]));
    }

    #[test]
    fn test_dark_and_washed_out_greens_stay_opaque() {
        let key = ChromaKey::green();

        assert!(key.is_keyed([0, 50, 0]));
        assert!(!key.is_keyed([0, 49, 0]));
        assert!(!key.is_keyed([200, 220, 200]));
        assert!(!key.is_keyed([128, 128, 128]));
    }

    #[test]
    fn test_mask_marks_only_keyed_pixels() {
        let frame = frame_of(&[[0, 255, 0], [0, 0, 255], [40, 200, 60], [255, 255, 255]]);
        let mask = ChromaKey::green().mask(&frame);

        assert_eq!(mask.as_raw(), &vec![255, 0, 255, 0]);
    }

    #[test]
    fn test_rgb_is_preserved_under_alpha() {
        let frame = frame_of(&[[10, 20, 30], [0, 200, 0]]);
        let image = ChromaKey::green().apply(&frame);

        assert_eq!(image.get_pixel(0, 0), [10, 20, 30, 255]);
        assert_eq!(image.get_pixel(1, 0), [0, 200, 0, 0]);
        assert_eq!(image.transparent_pixels(), 1);
    }
}
