use std::{
    fs,
    path::{Path, PathBuf},
};

use ab_glyph::{Font as _, FontVec, Glyph, OutlinedGlyph, PxScaleFont, ScaleFont, point};
use tiny_skia::{Pixmap, PremultipliedColorU8};
use tracing::debug;

use super::{Canvas, Rgba};
use crate::error::{Error, Result};

/// Overrides the font lookup with a specific file.
pub const FONT_ENV: &str = "PROGRESS_RIBBON_FONT";

/// Preferred faces, tried in order before any other font on the system.
const PREFERRED: &[&str] = &[
    "Cantarell-Regular",
    "NotoSans-Regular",
    "DejaVuSans",
    "LiberationSans-Regular",
    "Roboto-Regular",
];

const MAX_SCAN_DEPTH: usize = 4;

pub struct Font {
    font: PxScaleFont<FontVec>,
    path: PathBuf,
}

impl Font {
    /// Loads a system sans-serif face at `size` pixels.
    pub fn load(size: f32) -> Result<Self> {
        let path = find_font().ok_or(Error::NoFont)?;
        Self::from_file(&path, size)
    }

    pub fn from_file(path: &Path, size: f32) -> Result<Self> {
        let data = fs::read(path)?;
        let font = FontVec::try_from_vec(data).map_err(|_| Error::NoFont)?;
        debug!(path = %path.display(), size, "font loaded");
        Ok(Self {
            font: font.into_scaled(size.max(1.0)),
            path: path.to_path_buf(),
        })
    }

    /// Same face at another pixel size.
    pub fn resized(&self, size: f32) -> Result<Self> {
        Self::from_file(&self.path, size)
    }

    pub fn size(&self) -> f32 {
        self.font.scale.y
    }

    /// Starts a white, unwrapped label.
    pub fn render<'a>(&'a self, text: &'a str) -> TextRenderer<'a> {
        TextRenderer {
            font: self,
            text,
            color: Rgba::rgb(255, 255, 255),
            max_width: f32::INFINITY,
        }
    }
}

fn find_font() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(FONT_ENV).map(PathBuf::from) {
        if path.is_file() {
            return Some(path);
        }
        debug!(path = %path.display(), "font override does not exist");
    }

    let mut roots = Vec::new();
    if let Some(dir) = dirs::font_dir() {
        roots.push(dir);
    }
    if let Some(dir) = dirs::data_dir() {
        roots.push(dir.join("fonts"));
    }
    roots.push(PathBuf::from("/usr/share/fonts"));
    roots.push(PathBuf::from("/usr/local/share/fonts"));

    let mut candidates = Vec::new();
    for root in &roots {
        collect_fonts(root, 0, &mut candidates);
    }

    PREFERRED
        .iter()
        .find_map(|name| {
            candidates
                .iter()
                .find(|p| p.file_stem().is_some_and(|s| s == *name))
        })
        .or_else(|| candidates.first())
        .cloned()
}

fn collect_fonts(dir: &Path, depth: usize, out: &mut Vec<PathBuf>) {
    if depth > MAX_SCAN_DEPTH {
        return;
    }
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    let mut entries: Vec<_> = entries.flatten().map(|e| e.path()).collect();
    entries.sort();
    for path in entries {
        if path.is_dir() {
            collect_fonts(&path, depth + 1, out);
        } else if path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"))
        {
            out.push(path);
        }
    }
}

/// A label ready to be measured or rasterized.
pub struct TextRenderer<'a> {
    font: &'a Font,
    text: &'a str,
    color: Rgba,
    max_width: f32,
}

impl TextRenderer<'_> {
    pub fn with_color(self, color: Rgba) -> Self {
        Self {
            color,
            ..self
        }
    }

    /// Wraps at spaces once a line grows past `max_width` pixels.
    pub fn with_max_width(self, max_width: f32) -> Self {
        Self {
            max_width,
            ..self
        }
    }

    /// Size of the inked area in pixels.
    pub fn measure(&self) -> (f32, f32) {
        ink_bounds(&self.outlines())
            .map(|r| (r.width(), r.height()))
            .unwrap_or_default()
    }

    /// Rasterizes into a canvas just big enough for the ink plus a 1px
    /// border. `None` when nothing would be drawn.
    pub fn finish(self) -> Option<Canvas> {
        let outlines = self.outlines();
        let ink = ink_bounds(&outlines)?;
        let width = ink.width().ceil() as u32 + 2;
        let height = ink.height().ceil() as u32 + 2;
        let mut pixmap = Pixmap::new(width, height)?;
        let origin = (1 - ink.min.x.floor() as i32, 1 - ink.min.y.floor() as i32);

        let pixels = pixmap.pixels_mut();
        for outline in &outlines {
            let corner = outline.px_bounds().min;
            let left = corner.x.floor() as i32 + origin.0;
            let top = corner.y.floor() as i32 + origin.1;
            outline.draw(|gx, gy, coverage| {
                let (px, py) = (left + gx as i32, top + gy as i32);
                if px < 0 || py < 0 || px as u32 >= width || py as u32 >= height {
                    return;
                }
                if let Some(dst) = pixels.get_mut((py as u32 * width + px as u32) as usize) {
                    if let Some(out) = src_over(self.color, coverage, *dst) {
                        *dst = out;
                    }
                }
            });
        }

        Some(Canvas {
            pixmap,
        })
    }

    fn outlines(&self) -> Vec<OutlinedGlyph> {
        let font = &self.font.font;
        let advance = font.height() + font.line_gap();
        let mut placed = Vec::new();
        let mut baseline = 0.0_f32;

        for paragraph in self.text.lines() {
            let mut pen = 0.0_f32;
            let mut prev = None;
            // Index into `placed` where the current word starts
            let mut word_start: Option<usize> = None;

            for ch in paragraph.chars() {
                let mut glyph: Glyph = font.scaled_glyph(ch);
                if let Some(prev) = prev {
                    pen += font.kern(prev, glyph.id);
                }
                prev = Some(glyph.id);
                glyph.position = point(pen.round(), baseline.round());
                pen += font.h_advance(glyph.id);

                if ch.is_whitespace() || ch == ZERO_WIDTH_SPACE {
                    word_start = Some(placed.len());
                    continue;
                }
                placed.push(glyph);

                if pen <= self.max_width {
                    continue;
                }
                let Some(start) = word_start.take() else {
                    continue;
                };
                let Some(shift) = placed.get(start).map(|g: &Glyph| g.position.x) else {
                    continue;
                };
                baseline += advance;
                for moved in &mut placed[start..] {
                    moved.position.x -= shift;
                    moved.position.y = baseline.round();
                }
                pen -= shift;
            }
            baseline += advance;
        }

        placed
            .into_iter()
            .filter_map(|g| font.outline_glyph(g))
            .collect()
    }
}

/// Blends `color` at `coverage` over an already written pixel.
fn src_over(
    color: Rgba,
    coverage: f32,
    dst: PremultipliedColorU8,
) -> Option<PremultipliedColorU8> {
    let a = (coverage.clamp(0.0, 1.0) * color.a as f32).round() as u32;
    if a == 0 {
        return None;
    }
    let keep = 255 - a;
    let alpha = (a + dst.alpha() as u32 * keep / 255).min(255) as u8;
    let mix = |src: u8, under: u8| {
        ((src as u32 * a + under as u32 * keep) / 255).min(alpha as u32) as u8
    };
    PremultipliedColorU8::from_rgba(
        mix(color.r, dst.red()),
        mix(color.g, dst.green()),
        mix(color.b, dst.blue()),
        alpha,
    )
}

fn ink_bounds(outlines: &[OutlinedGlyph]) -> Option<ab_glyph::Rect> {
    let mut rects = outlines.iter().map(|g| g.px_bounds());
    let first = rects.next()?;
    Some(rects.fold(first, |acc, r| ab_glyph::Rect {
        min: point(acc.min.x.min(r.min.x), acc.min.y.min(r.min.y)),
        max: point(acc.max.x.max(r.max.x), acc.max.y.max(r.max.y)),
    }))
}

const ZERO_WIDTH_SPACE: char = '\u{200b}';
