//! Display sizing and frame pacing.

use std::time::Duration;

/// Size a video is drawn at, fitted into the window's bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySize {
    pub width: u32,
    pub height: u32,
}

impl DisplaySize {
    /// Fit `source_width x source_height` into `max_width x max_height`,
    /// preserving the aspect ratio.
    ///
    /// `scale = min(max_w / src_w, max_h / src_h)` and each side is
    /// `floor(src * scale)`, clamped to at least one pixel. Callers guarantee
    /// non-zero source dimensions.
    pub fn fit_within(source_width: u32, source_height: u32, max_width: u32, max_height: u32) -> Self {
        let width_ratio = max_width as f64 / source_width as f64;
        let height_ratio = max_height as f64 / source_height as f64;
        let scale = width_ratio.min(height_ratio);

        let width = (source_width as f64 * scale).floor() as u32;
        let height = (source_height as f64 * scale).floor() as u32;

        Self {
            width: width.clamp(1, max_width.max(1)),
            height: height.clamp(1, max_height.max(1)),
        }
    }
}

/// Delay between ticks for a source running at `fps`.
///
/// Returns `None` when the frame rate is zero, negative, or not a number.
pub fn frame_delay(fps: f64, numerator_ms: f64) -> Option<Duration> {
    if !fps.is_finite() || fps <= 0.0 {
        return None;
    }

    let millis = (numerator_ms / fps).round();
    Some(Duration::from_millis(millis as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DELAY_NUMERATOR_MS;

    #[test]
    fn test_small_landscape_is_capped_by_width() {
        let size = DisplaySize::fit_within(64, 48, 500, 600);
        assert_eq!(size, DisplaySize { width: 500, height: 375 });
    }

    #[test]
    fn test_portrait_hd_is_capped_by_height() {
        let size = DisplaySize::fit_within(1080, 1920, 500, 600);
        assert_eq!(size, DisplaySize { width: 337, height: 600 });
    }

    #[test]
    fn test_exact_fit_is_unchanged() {
        assert_eq!(
            DisplaySize::fit_within(500, 600, 500, 600),
            DisplaySize { width: 500, height: 600 }
        );
    }

    #[test]
    fn test_fit_stays_in_bounds_and_keeps_aspect() {
        let sources = [
            (1, 1), (3, 7), (7, 3), (640, 480), (1920, 1080), (1080, 1920),
            (4096, 2160), (123, 457), (999, 1), (1, 999), (500, 601), (501, 600),
        ];

        for (w, h) in sources {
            let size = DisplaySize::fit_within(w, h, 500, 600);
            assert!(size.width <= 500 && size.height <= 600, "{}x{} -> {:?}", w, h, size);
            assert!(size.width >= 1 && size.height >= 1);

            // Aspect is preserved within one pixel of rounding on either axis.
            let expected_height = size.width as f64 * h as f64 / w as f64;
            let expected_width = size.height as f64 * w as f64 / h as f64;
            assert!(
                (expected_height - size.height as f64).abs() <= 1.0
                    || (expected_width - size.width as f64).abs() <= 1.0,
                "{}x{} -> {:?}", w, h, size
            );
        }
    }

    #[test]
    fn test_delay_for_common_rates() {
        assert_eq!(frame_delay(24.0, DELAY_NUMERATOR_MS), Some(Duration::from_millis(19)));
        assert_eq!(frame_delay(30.0, DELAY_NUMERATOR_MS), Some(Duration::from_millis(15)));
        assert_eq!(frame_delay(60.0, DELAY_NUMERATOR_MS), Some(Duration::from_millis(8)));
    }

    #[test]
    fn test_delay_rejects_unusable_rates() {
        assert_eq!(frame_delay(0.0, DELAY_NUMERATOR_MS), None);
        assert_eq!(frame_delay(-25.0, DELAY_NUMERATOR_MS), None);
        assert_eq!(frame_delay(f64::NAN, DELAY_NUMERATOR_MS), None);
        assert_eq!(frame_delay(f64::INFINITY, DELAY_NUMERATOR_MS), None);
    }
}
