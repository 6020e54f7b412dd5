//! Linear progress bar widget.

use super::{IndicatorColors, IndicatorState, Widget};
use crate::render::Canvas;

const BAR_HEIGHT_DP: f32 = 4.0;
const PULSE_WIDTH: f32 = 0.3;

/// A thin horizontal bar spanning the ribbon.
pub struct ProgressBar {
    x: i32,
    y: i32,
    width: u32,
    height: u32,
}

impl ProgressBar {
    pub fn new(width: u32, density: f32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height: (BAR_HEIGHT_DP * density).round().max(1.0) as u32,
        }
    }

    /// Horizontal span `(x, width)` of a segment starting `start` of the way
    /// along the bar, mirrored for right-to-left layouts.
    fn span(&self, start: f32, len: f32, rtl: bool) -> (f32, f32) {
        let w = self.width as f32;
        let from = if rtl { 1.0 - start - len } else { start };
        (self.x as f32 + w * from, w * len)
    }
}

impl Widget for ProgressBar {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    fn draw(&self, canvas: &mut Canvas, colors: &IndicatorColors, state: &IndicatorState) {
        let radius = self.height as f32 / 2.0;
        let y = self.y as f32;
        let h = self.height as f32;

        canvas.fill_rounded_rect(self.x as f32, y, self.width as f32, h, radius, colors.track);

        if state.indeterminate {
            // The pulse slides in from one end and out the other
            let start = state.phase * (1.0 + PULSE_WIDTH) - PULSE_WIDTH;
            let visible_start = start.max(0.0);
            let visible_len = (start + PULSE_WIDTH).min(1.0) - visible_start;
            if visible_len > 0.0 {
                let (px, pw) = self.span(visible_start, visible_len, state.right_to_left);
                canvas.fill_rounded_rect(px, y, pw, h, radius, colors.fill);
            }
            return;
        }

        if state.secondary > 0.0 {
            let (sx, sw) = self.span(0.0, state.secondary, state.right_to_left);
            canvas.fill_rounded_rect(sx, y, sw, h, radius, colors.secondary);
        }
        if state.fraction > 0.0 {
            let (fx, fw) = self.span(0.0, state.fraction, state.right_to_left);
            canvas.fill_rounded_rect(fx, y, fw.max(radius * 2.0), h, radius, colors.fill);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Rgba, rgb};

    const COLORS: IndicatorColors = IndicatorColors {
        track: Rgba::new(0, 0, 0, 0),
        fill: rgb(255, 0, 0),
        secondary: rgb(0, 0, 255),
    };

    fn state(fraction: f32, rtl: bool) -> IndicatorState {
        IndicatorState {
            fraction,
            secondary: 0.0,
            indeterminate: false,
            phase: 0.0,
            right_to_left: rtl,
        }
    }

    #[test]
    fn fill_grows_from_the_leading_edge() {
        let mut canvas = Canvas::new(100, 4).unwrap();
        let bar = ProgressBar::new(100, 1.0);
        bar.draw(&mut canvas, &COLORS, &state(0.5, false));
        assert!(canvas.pixel(10, 2).unwrap().a > 0);
        assert_eq!(canvas.pixel(90, 2).unwrap().a, 0);

        let mut canvas = Canvas::new(100, 4).unwrap();
        bar.draw(&mut canvas, &COLORS, &state(0.5, true));
        assert_eq!(canvas.pixel(10, 2).unwrap().a, 0);
        assert!(canvas.pixel(90, 2).unwrap().a > 0);
    }
}
