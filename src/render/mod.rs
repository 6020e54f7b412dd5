mod text;

pub use text::Font;
use tiny_skia::{
    Color, FillRule, FilterQuality, LineCap, Paint, PathBuilder, Pixmap, PixmapPaint, PixmapRef,
    Rect, Stroke, Transform,
};

use crate::error::{Error, Result};

/// Arcs are flattened into this many segments per full turn.
const ARC_SEGMENTS: f32 = 96.0;

/// Premultiplied RGBA drawing surface the ribbon renders into.
pub struct Canvas {
    pub(crate) pixmap: Pixmap,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(Error::InvalidSize {
            width,
            height,
        })?;
        Ok(Self {
            pixmap,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Returns the color at a pixel with alpha divided back out, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let p = self.pixmap.pixel(x, y)?.demultiply();
        Some(Rgba::new(p.red(), p.green(), p.blue(), p.alpha()))
    }

    /// Paints every pixel with `color`.
    pub fn fill(&mut self, color: Rgba) {
        self.pixmap.fill(color.into());
    }

    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgba) {
        let Some(rect) = Rect::from_xywh(x, y, w, h) else {
            return;
        };
        self.pixmap
            .fill_rect(rect, &paint(color), Transform::identity(), None);
    }

    /// Corner radii are clamped to half the shorter side.
    pub fn fill_rounded_rect(&mut self, x: f32, y: f32, w: f32, h: f32, radius: f32, color: Rgba) {
        let Some(path) = rounded_rect_path(x, y, w, h, radius) else {
            return;
        };
        self.pixmap.fill_path(
            &path,
            &paint(color),
            FillRule::Winding,
            Transform::identity(),
            None,
        );
    }

    #[allow(clippy::too_many_arguments)]
    pub fn stroke_rounded_rect(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        radius: f32,
        color: Rgba,
        width: f32,
    ) {
        let Some(path) = rounded_rect_path(x, y, w, h, radius) else {
            return;
        };
        let stroke = Stroke {
            width,
            ..Default::default()
        };
        self.pixmap
            .stroke_path(&path, &paint(color), &stroke, Transform::identity(), None);
    }

    /// Strokes part of a circle. Angles are in degrees, clockwise from 12 o'clock.
    #[allow(clippy::too_many_arguments)]
    pub fn stroke_arc(
        &mut self,
        cx: f32,
        cy: f32,
        radius: f32,
        start: f32,
        sweep: f32,
        color: Rgba,
        width: f32,
    ) {
        let Some(path) = arc_path(cx, cy, radius, start, sweep) else {
            return;
        };
        let stroke = Stroke {
            width,
            line_cap: LineCap::Round,
            ..Default::default()
        };
        self.pixmap
            .stroke_path(&path, &paint(color), &stroke, Transform::identity(), None);
    }

    /// Draws a soft drop shadow under a rounded rectangle. `elevation` sets
    /// how far the shadow spreads below the shape.
    #[allow(clippy::too_many_arguments)]
    pub fn fill_shadow(
        &mut self,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        radius: f32,
        elevation: f32,
        color: Rgba,
    ) {
        if elevation <= 0.0 || color.a == 0 {
            return;
        }
        let layers = (elevation / 4.0).ceil().clamp(1.0, 6.0) as u32;
        let step = elevation / 2.0 / layers as f32;
        let alpha = (color.a as u32 / layers).max(1) as u8;
        for i in 1..=layers {
            let spread = step * i as f32;
            self.fill_rounded_rect(
                x - spread / 2.0,
                y + spread / 2.0,
                w + spread,
                h + spread / 2.0,
                radius + spread / 2.0,
                color.with_alpha(alpha),
            );
        }
    }

    /// Composites `other` with its top-left corner at `(x, y)`.
    pub fn draw_canvas(&mut self, other: &Canvas, x: i32, y: i32) {
        self.draw_pixmap(other.pixmap.as_ref(), x, y);
    }

    pub fn draw_pixmap(&mut self, src: PixmapRef, x: i32, y: i32) {
        self.pixmap.draw_pixmap(
            x,
            y,
            src,
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
    }

    /// Draws another canvas at `(x, y)` with the given opacity, scaled around
    /// the point `(pivot_x, pivot_y)` of this canvas.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_canvas_faded(
        &mut self,
        other: &Canvas,
        x: i32,
        y: i32,
        opacity: f32,
        scale: f32,
        pivot_x: f32,
        pivot_y: f32,
    ) {
        if opacity <= 0.0 || scale <= 0.0 {
            return;
        }
        let pixmap_paint = PixmapPaint {
            opacity: opacity.min(1.0),
            quality: FilterQuality::Bilinear,
            ..Default::default()
        };
        let transform = Transform::from_translate(pivot_x, pivot_y)
            .pre_scale(scale, scale)
            .pre_translate(-pivot_x, -pivot_y);
        self.pixmap
            .draw_pixmap(x, y, other.pixmap.as_ref(), &pixmap_paint, transform, None);
    }

    /// Pixel bytes in the BGRA order a 24-bit X11 ZPixmap expects.
    pub fn as_argb(&self) -> Vec<u8> {
        self.pixmap
            .data()
            .chunks_exact(4)
            .flat_map(|p| [p[2], p[1], p[0], p[3]])
            .collect()
    }
}

fn paint(color: Rgba) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color.into());
    paint.anti_alias = true;
    paint
}

fn rounded_rect_path(x: f32, y: f32, w: f32, h: f32, r: f32) -> Option<tiny_skia::Path> {
    let mut pb = PathBuilder::new();

    let r = r.min(w / 2.0).min(h / 2.0).max(0.0);

    pb.move_to(x + r, y);
    pb.line_to(x + w - r, y);
    pb.quad_to(x + w, y, x + w, y + r);
    pb.line_to(x + w, y + h - r);
    pb.quad_to(x + w, y + h, x + w - r, y + h);
    pb.line_to(x + r, y + h);
    pb.quad_to(x, y + h, x, y + h - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);

    pb.close();
    pb.finish()
}

fn arc_path(cx: f32, cy: f32, radius: f32, start: f32, sweep: f32) -> Option<tiny_skia::Path> {
    if radius <= 0.0 || sweep == 0.0 {
        return None;
    }
    let sweep = sweep.clamp(-360.0, 360.0);
    let segments = ((sweep.abs() / 360.0) * ARC_SEGMENTS).ceil().max(1.0) as u32;
    let point = |deg: f32| {
        let rad = (deg - 90.0).to_radians();
        (cx + radius * rad.cos(), cy + radius * rad.sin())
    };

    let mut pb = PathBuilder::new();
    let (x, y) = point(start);
    pb.move_to(x, y);
    for i in 1..=segments {
        let (x, y) = point(start + sweep * i as f32 / segments as f32);
        pb.line_to(x, y);
    }
    pb.finish()
}

/// Straight (non-premultiplied) 8-bit color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r,
            g,
            b,
            a,
        }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r,
            g,
            b,
            a: 255,
        }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self {
            a,
            ..self
        }
    }

    /// Unpacks `0xAARRGGBB`.
    pub const fn from_argb(argb: u32) -> Self {
        Self {
            a: (argb >> 24) as u8,
            r: (argb >> 16) as u8,
            g: (argb >> 8) as u8,
            b: argb as u8,
        }
    }

    /// Packs into `0xAARRGGBB`.
    pub const fn to_argb(self) -> u32 {
        (self.a as u32) << 24 | (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }
}

impl From<Rgba> for Color {
    fn from(c: Rgba) -> Self {
        Color::from_rgba8(c.r, c.g, c.b, c.a)
    }
}

/// Opaque color shorthand, usable in `const` context.
pub const fn rgb(r: u8, g: u8, b: u8) -> Rgba {
    Rgba::rgb(r, g, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argb_packing() {
        let c = Rgba::new(0x12, 0x34, 0x56, 0x78);
        assert_eq!(c.to_argb(), 0x7812_3456);
        assert_eq!(Rgba::from_argb(0x7812_3456), c);
    }

    #[test]
    fn zero_sized_canvas_is_an_error() {
        assert!(matches!(
            Canvas::new(0, 10),
            Err(Error::InvalidSize { width: 0, height: 10 })
        ));
    }

    #[test]
    fn faded_draw_is_translucent() {
        let mut src = Canvas::new(4, 4).unwrap();
        src.fill(rgb(255, 0, 0));
        let mut dst = Canvas::new(4, 4).unwrap();
        dst.draw_canvas_faded(&src, 0, 0, 0.5, 1.0, 2.0, 2.0);

        let p = dst.pixel(1, 1).unwrap();
        assert!(p.a > 100 && p.a < 160, "alpha was {}", p.a);
        // straight color survives the fade
        assert!(p.r >= 240, "red was {}", p.r);
        assert_eq!((p.g, p.b), (0, 0));
    }

    #[test]
    fn full_arc_touches_the_top() {
        let mut canvas = Canvas::new(40, 40).unwrap();
        canvas.stroke_arc(20.0, 20.0, 15.0, 0.0, 360.0, rgb(0, 0, 255), 4.0);
        assert!(canvas.pixel(20, 5).unwrap().a > 0);
        assert_eq!(canvas.pixel(20, 20).unwrap().a, 0);
    }
}
