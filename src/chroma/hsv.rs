//! 8-bit RGB to HSV conversion.
//!
//! Uses the same fixed-point quantization as OpenCV's `COLOR_RGB2HSV` for
//! 8-bit images: hue is halved to fit `0..180`, saturation and value span
//! `0..=255`. Keeping the quantization identical keeps the green band at
//! exactly 80°–160° of the hue circle.

use std::sync::OnceLock;

const HUE_RANGE: i32 = 180;
const SHIFT: u32 = 12;
const ROUND: i32 = 1 << (SHIFT - 1);

/// A color in 8-bit HSV space (hue 0..180)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

struct DivTables {
    saturation: [i32; 256],
    hue: [i32; 256],
}

fn div_tables() -> &'static DivTables {
    static TABLES: OnceLock<DivTables> = OnceLock::new();
    TABLES.get_or_init(|| {
        let mut saturation = [0i32; 256];
        let mut hue = [0i32; 256];
        for i in 1..256 {
            saturation[i] = (255.0 * (1 << SHIFT) as f64 / i as f64).round() as i32;
            hue[i] = (HUE_RANGE as f64 * (1 << SHIFT) as f64 / (6.0 * i as f64)).round() as i32;
        }
        DivTables { saturation, hue }
    })
}

impl Hsv {
    pub fn from_rgb(rgb: [u8; 3]) -> Self {
        let tables = div_tables();
        let [r, g, b] = rgb.map(i32::from);

        let v = r.max(g).max(b);
        let min = r.min(g).min(b);
        let diff = v - min;

        let s = (diff * tables.saturation[v as usize] + ROUND) >> SHIFT;

        let h = if diff == 0 {
            0
        } else if v == r {
            g - b
        } else if v == g {
            b - r + 2 * diff
        } else {
            r - g + 4 * diff
        };
        let mut h = (h * tables.hue[diff as usize] + ROUND) >> SHIFT;
        if h < 0 {
            h += HUE_RANGE;
        }

        Self {
            h: h as u8,
            s: s as u8,
            v: v as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primaries() {
        assert_eq!(Hsv::from_rgb([255, 0, 0]), Hsv { h: 0, s: 255, v: 255 });
        assert_eq!(Hsv::from_rgb([0, 255, 0]), Hsv { h: 60, s: 255, v: 255 });
        assert_eq!(Hsv::from_rgb([0, 0, 255]), Hsv { h: 120, s: 255, v: 255 });
    }

    #[test]
    fn test_secondaries() {
        assert_eq!(Hsv::from_rgb([255, 255, 0]).h, 30);
        assert_eq!(Hsv::from_rgb([0, 255, 255]).h, 90);
        assert_eq!(Hsv::from_rgb([255, 0, 255]).h, 150);
    }

    #[test]
    fn test_grays_have_no_hue_or_saturation() {
        for level in [0u8, 1, 77, 128, 255] {
            let hsv = Hsv::from_rgb([level, level, level]);
            assert_eq!(hsv, Hsv { h: 0, s: 0, v: level });
        }
    }

    #[test]
    fn test_negative_hue_wraps() {
        // Red with a touch of blue sits just below 360 degrees.
        let hsv = Hsv::from_rgb([255, 0, 10]);
        assert_eq!(hsv.h, 179);
    }

    #[test]
    fn test_partial_saturation() {
        let hsv = Hsv::from_rgb([100, 200, 100]);
        assert_eq!(hsv.v, 200);
        assert_eq!(hsv.s, 127);
        assert_eq!(hsv.h, 60);
    }
}
