//! Progress indicators drawn inside the ribbon.

pub(crate) mod progress_bar;
pub(crate) mod spinner;

use crate::render::{Canvas, Rgba};

/// Colors shared by both indicator styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct IndicatorColors {
    pub track: Rgba,
    pub fill: Rgba,
    pub secondary: Rgba,
}

/// What an indicator shows on a given frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct IndicatorState {
    /// Primary progress, 0.0 to 1.0.
    pub fraction: f32,
    /// Secondary progress, 0.0 to 1.0.
    pub secondary: f32,
    pub indeterminate: bool,
    /// Position in the indeterminate cycle, 0.0 to 1.0.
    pub phase: f32,
    pub right_to_left: bool,
}

/// Trait for UI widgets.
pub(crate) trait Widget {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn set_position(&mut self, x: i32, y: i32);
    fn draw(&self, canvas: &mut Canvas, colors: &IndicatorColors, state: &IndicatorState);
}

/// Check if a point is within a rectangle.
pub(crate) fn point_in_rect(px: i32, py: i32, x: i32, y: i32, w: u32, h: u32) -> bool {
    px >= x && px < x + w as i32 && py >= y && py < y + h as i32
}

/// Where `value` sits between `min` and `max`, as 0.0 to 1.0.
pub(crate) fn fraction(value: u32, min: u32, max: u32) -> f32 {
    if max <= min {
        return 0.0;
    }
    (value.saturating_sub(min) as f32 / (max - min) as f32).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_handles_empty_range() {
        assert_eq!(fraction(5, 10, 10), 0.0);
        assert_eq!(fraction(30, 10, 50), 0.5);
        assert_eq!(fraction(90, 10, 50), 1.0);
    }

    #[test]
    fn point_in_rect_excludes_far_edge() {
        assert!(point_in_rect(0, 0, 0, 0, 10, 10));
        assert!(!point_in_rect(10, 5, 0, 0, 10, 10));
    }
}
