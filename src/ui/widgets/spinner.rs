//! Circular progress indicator.

use super::{IndicatorColors, IndicatorState, Widget};
use crate::render::Canvas;

const SIZE_DP: f32 = 48.0;
const STROKE_DP: f32 = 4.0;
/// Length of the spinning arc in indeterminate mode, in degrees.
const SPIN_SWEEP: f32 = 270.0;

pub struct Spinner {
    x: i32,
    y: i32,
    size: u32,
    stroke: f32,
}

impl Spinner {
    pub fn new(density: f32) -> Self {
        Self {
            x: 0,
            y: 0,
            size: (SIZE_DP * density).round().max(1.0) as u32,
            stroke: (STROKE_DP * density).max(1.0),
        }
    }
}

impl Widget for Spinner {
    fn width(&self) -> u32 {
        self.size
    }

    fn height(&self) -> u32 {
        self.size
    }

    fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    fn draw(&self, canvas: &mut Canvas, colors: &IndicatorColors, state: &IndicatorState) {
        let half = self.size as f32 / 2.0;
        let cx = self.x as f32 + half;
        let cy = self.y as f32 + half;
        let radius = half - self.stroke / 2.0;
        // Counter-clockwise sweeps for right-to-left layouts
        let dir = if state.right_to_left { -1.0 } else { 1.0 };

        canvas.stroke_arc(cx, cy, radius, 0.0, 360.0, colors.track, self.stroke);

        if state.indeterminate {
            // Arc breathes between short and long while it rotates
            let breath = (state.phase * std::f32::consts::TAU).sin().abs();
            let sweep = 30.0 + (SPIN_SWEEP - 30.0) * breath;
            let start = state.phase * 720.0;
            canvas.stroke_arc(cx, cy, radius, dir * start, dir * sweep, colors.fill, self.stroke);
            return;
        }

        if state.secondary > 0.0 {
            let sweep = dir * 360.0 * state.secondary;
            canvas.stroke_arc(cx, cy, radius, 0.0, sweep, colors.secondary, self.stroke);
        }
        if state.fraction > 0.0 {
            let sweep = dir * 360.0 * state.fraction;
            canvas.stroke_arc(cx, cy, radius, 0.0, sweep, colors.fill, self.stroke);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::rgb;

    #[test]
    fn size_follows_density() {
        assert_eq!(Spinner::new(1.0).width(), 48);
        assert_eq!(Spinner::new(2.0).height(), 96);
    }

    #[test]
    fn quarter_progress_fills_top_right() {
        let colors = IndicatorColors {
            track: rgb(0, 0, 0).with_alpha(0),
            fill: rgb(255, 0, 0),
            secondary: rgb(0, 255, 0),
        };
        let state = IndicatorState {
            fraction: 0.25,
            secondary: 0.0,
            indeterminate: false,
            phase: 0.0,
            right_to_left: false,
        };
        let mut canvas = Canvas::new(48, 48).unwrap();
        Spinner::new(1.0).draw(&mut canvas, &colors, &state);

        // Right-hand side at 3 o'clock is the end of a quarter turn
        let right = canvas.pixel(45, 20).unwrap();
        let left = canvas.pixel(2, 30).unwrap();
        assert!(right.r > 0);
        assert_eq!(left.r, 0);
    }
}
