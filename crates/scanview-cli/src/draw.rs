//! Rasterize overlay shapes onto a rendered frame.
//!
//! Text needs a TrueType/OpenType font; without one, text items are skipped
//! and only reach the scene dump.

use std::path::Path;

use ab_glyph::{point, Font, FontArc, GlyphId, ScaleFont};
use anyhow::{anyhow, Context, Result};
use image::{Rgb, RgbImage};
use scanview_core::geometry::CanvasPoint;
use scanview_core::overlay::{OverlayItem, OverlayShape};
use tracing::debug;

/// Fonts tried, in order, when no font file is given.
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Font used for defect labels and measurement read-outs.
pub struct LabelFont(FontArc);

impl LabelFont {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read font {}", path.display()))?;
        let font = FontArc::try_from_vec(bytes)
            .map_err(|_| anyhow!("Invalid font file {}", path.display()))?;
        Ok(Self(font))
    }

    /// First loadable font from the usual system locations.
    pub fn find_system() -> Option<Self> {
        SYSTEM_FONTS
            .iter()
            .map(Path::new)
            .filter(|p| p.is_file())
            .find_map(|p| {
                let font = Self::load(p).ok()?;
                debug!(path = %p.display(), "Using system label font");
                Some(font)
            })
    }

    /// `path` when given, otherwise a system font if one exists.
    pub fn resolve(path: Option<&Path>) -> Result<Option<Self>> {
        match path {
            Some(p) => Self::load(p).map(Some),
            None => Ok(Self::find_system()),
        }
    }
}

/// Draw every item with canvas coordinates shifted by `-origin`. Text is
/// drawn only when `font` is given. Returns the number of text items skipped.
pub fn draw_items(
    frame: &mut RgbImage,
    items: &[OverlayItem],
    origin: CanvasPoint,
    font: Option<&LabelFont>,
) -> usize {
    let local = |p: CanvasPoint| CanvasPoint::new(p.x - origin.x, p.y - origin.y);
    let mut skipped = 0;
    for item in items {
        match &item.shape {
            OverlayShape::Polygon {
                points,
                outline,
                width,
            } => {
                let color = outline.to_rgb();
                for (i, p) in points.iter().enumerate() {
                    let q = points[(i + 1) % points.len()];
                    segment(frame, local(*p), local(q), *width, color);
                }
            }
            OverlayShape::Dot {
                center,
                radius,
                color,
            } => disc(frame, local(*center), *radius, color.to_rgb()),
            OverlayShape::Circle {
                center,
                radius,
                outline,
                width,
            } => circle(frame, local(*center), *radius, *width, outline.to_rgb()),
            OverlayShape::Line {
                from,
                to,
                color,
                width,
            } => segment(frame, local(*from), local(*to), *width, color.to_rgb()),
            OverlayShape::Text {
                anchor,
                text: s,
                font_size,
                color,
            } => match font {
                Some(f) => text(frame, &f.0, local(*anchor), s, *font_size, color.to_rgb()),
                None => skipped += 1,
            },
        }
    }
    skipped
}

fn put(frame: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u64) < frame.width() as u64 && (y as u64) < frame.height() as u64 {
        frame.put_pixel(x as u32, y as u32, color);
    }
}

/// Filled disc; always at least the centre pixel.
fn disc(frame: &mut RgbImage, c: CanvasPoint, radius: f64, color: Rgb<u8>) {
    let r = radius.max(0.0);
    let cx = c.x.round() as i64;
    let cy = c.y.round() as i64;
    let reach = r.ceil() as i64;
    for dy in -reach..=reach {
        for dx in -reach..=reach {
            if (dx * dx + dy * dy) as f64 <= r * r {
                put(frame, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Stroke from `a` to `b` by stamping discs one pixel apart.
fn segment(frame: &mut RgbImage, a: CanvasPoint, b: CanvasPoint, width: f64, color: Rgb<u8>) {
    let half = (width / 2.0).floor();
    let steps = (b.x - a.x).abs().max((b.y - a.y).abs()).ceil().max(1.0) as usize;
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let p = CanvasPoint::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t);
        disc(frame, p, half, color);
    }
}

/// Single-line text centred on `anchor`, `size` pixels high.
fn text(frame: &mut RgbImage, font: &FontArc, anchor: CanvasPoint, s: &str, size: u32, color: Rgb<u8>) {
    let size = size.max(1) as f32;
    let scaled = font.as_scaled(size);

    let mut glyphs = Vec::with_capacity(s.len());
    let mut cursor = 0.0f32;
    let mut prev: Option<GlyphId> = None;
    for ch in s.chars() {
        let id = font.glyph_id(ch);
        if let Some(p) = prev {
            cursor += scaled.kern(p, id);
        }
        glyphs.push((id, cursor));
        cursor += scaled.h_advance(id);
        prev = Some(id);
    }

    let left = anchor.x as f32 - cursor / 2.0;
    // descent is negative; this puts the middle of the line box on the anchor.
    let baseline = anchor.y as f32 + (scaled.ascent() + scaled.descent()) / 2.0;
    for (id, x) in glyphs {
        let glyph = id.with_scale_and_position(size, point(left + x, baseline));
        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        let (bx, by) = (bounds.min.x.floor() as i64, bounds.min.y.floor() as i64);
        outlined.draw(|px, py, coverage| {
            blend(frame, bx + px as i64, by + py as i64, color, coverage);
        });
    }
}

fn blend(frame: &mut RgbImage, x: i64, y: i64, color: Rgb<u8>, coverage: f32) {
    if x < 0 || y < 0 || x >= frame.width() as i64 || y >= frame.height() as i64 {
        return;
    }
    let a = coverage.clamp(0.0, 1.0);
    let px = frame.get_pixel_mut(x as u32, y as u32);
    for (dst, src) in px.0.iter_mut().zip(color.0) {
        *dst = (*dst as f32 * (1.0 - a) + src as f32 * a).round() as u8;
    }
}

fn circle(frame: &mut RgbImage, c: CanvasPoint, radius: f64, width: f64, color: Rgb<u8>) {
    let n = (std::f64::consts::TAU * radius).ceil().max(8.0) as usize;
    let at = |i: usize| {
        let theta = std::f64::consts::TAU * i as f64 / n as f64;
        CanvasPoint::new(c.x + radius * theta.cos(), c.y + radius * theta.sin())
    };
    for i in 0..n {
        segment(frame, at(i), at(i + 1), width, color);
    }
}
