//! Software rasterizer behind PNG export.

use crate::surface::DrawSurface;
use estatevision_graph::{Color, Vec2, Viewport};
use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub const FONT_DIR_ENV: &str = "ESTATEVISION_FONT_DIR";

pub struct RasterSurface {
    image: RgbaImage,
    font: Option<fontdue::Font>,
    viewport: Viewport,
}

impl RasterSurface {
    /// Zero dimensions are bumped to one pixel.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width.max(1), height.max(1), Rgba([0, 0, 0, 0])),
            font: None,
            viewport: Viewport::new(),
        }
    }

    pub fn with_font(mut self, font: Option<fontdue::Font>) -> Self {
        self.font = font;
        self
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.image.width() || y >= self.image.height() {
            return None;
        }
        let [r, g, b, a] = self.image.get_pixel(x, y).0;
        Some(Color::rgba(r, g, b, a))
    }

    pub fn encode_png(&self) -> Result<Vec<u8>, image::ImageError> {
        let mut cursor = Cursor::new(Vec::new());
        self.image.write_to(&mut cursor, ImageFormat::Png)?;
        Ok(cursor.into_inner())
    }

    fn to_screen(&self, point: Vec2) -> Vec2 {
        self.viewport.graph_to_screen(point)
    }

    fn to_screen_len(&self, len: f32) -> f32 {
        len * self.viewport.scale()
    }
}

impl DrawSurface for RasterSurface {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn clear(&mut self, background: Color) {
        let fill = Rgba(background.to_array());
        for pixel in self.image.pixels_mut() {
            *pixel = fill;
        }
    }

    fn set_transform(&mut self, viewport: &Viewport) {
        self.viewport = *viewport;
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, color: Color, width: f32) {
        let a = self.to_screen(from);
        let b = self.to_screen(to);
        let thickness = self.to_screen_len(width).round().max(1.0) as i32;
        draw_line(&mut self.image, a, b, color, thickness);
    }

    fn fill_triangle(&mut self, points: [Vec2; 3], color: Color) {
        let screen = points.map(|p| self.to_screen(p));
        draw_triangle_filled(&mut self.image, screen, color);
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let c = self.to_screen(center);
        let r = self.to_screen_len(radius);
        draw_circle_filled(&mut self.image, c, r, color);
    }

    fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, width: f32) {
        let c = self.to_screen(center);
        let r = self.to_screen_len(radius);
        let t = self.to_screen_len(width);
        draw_circle_stroke(&mut self.image, c, r, t, color);
    }

    fn fill_text(&mut self, text: &str, anchor: Vec2, size: f32, color: Color) {
        if text.is_empty() {
            return;
        }
        let a = self.to_screen(anchor);
        let px = self.to_screen_len(size);
        draw_text(&mut self.image, &self.font, text, px, a.x, a.y, color);
    }
}

/// Load the first `.ttf`/`.otf` font found in `configured`, falling back to the
/// directory named by `ESTATEVISION_FONT_DIR`.
pub fn load_font(configured: Option<&Path>) -> Option<fontdue::Font> {
    let Some(dir) = find_font_dir(configured) else {
        tracing::debug!("No font directory found; labels will not be rasterized");
        return None;
    };
    let mut candidates: Vec<PathBuf> = std::fs::read_dir(&dir)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("ttf") || ext.eq_ignore_ascii_case("otf"))
        })
        .collect();
    candidates.sort();

    for path in candidates {
        let Ok(bytes) = std::fs::read(&path) else {
            continue;
        };
        match fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default()) {
            Ok(font) => {
                tracing::debug!("Loaded label font {}", path.display());
                return Some(font);
            }
            Err(err) => tracing::warn!("Skipping unreadable font {}: {}", path.display(), err),
        }
    }
    tracing::debug!("No usable font in {}", dir.display());
    None
}

fn find_font_dir(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = configured.filter(|dir| dir.is_dir()) {
        return Some(dir.to_path_buf());
    }
    if let Ok(dir) = std::env::var(FONT_DIR_ENV) {
        let path = PathBuf::from(dir);
        if path.is_dir() {
            return Some(path);
        }
    }
    None
}

fn draw_text(
    image: &mut RgbaImage,
    font: &Option<fontdue::Font>,
    text: &str,
    size: f32,
    center_x: f32,
    baseline: f32,
    color: Color,
) {
    let Some(font) = font.as_ref() else {
        return;
    };
    let ascent = font
        .horizontal_line_metrics(size)
        .map(|metrics| metrics.ascent)
        .unwrap_or(size * 0.8);

    let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
    let mut settings = LayoutSettings::default();
    settings.x = 0.0;
    settings.y = baseline - ascent;
    layout.reset(&settings);
    layout.append(&[font], &TextStyle::new(text, size, 0));

    let mut min_x = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    for glyph in layout.glyphs() {
        min_x = min_x.min(glyph.x);
        max_x = max_x.max(glyph.x + glyph.width as f32);
    }
    if !min_x.is_finite() || !max_x.is_finite() {
        return;
    }
    let shift = center_x - (min_x + max_x) * 0.5;

    for glyph in layout.glyphs() {
        if glyph.width == 0 || glyph.height == 0 {
            continue;
        }
        let (metrics, bitmap) = font.rasterize_indexed(glyph.key.glyph_index, glyph.key.px);
        blend_glyph(
            image,
            (glyph.x + shift).floor() as i32,
            glyph.y.floor() as i32,
            metrics.width,
            &bitmap,
            color,
        );
    }
}

fn blend_glyph(
    image: &mut RgbaImage,
    origin_x: i32,
    origin_y: i32,
    width: usize,
    coverage: &[u8],
    color: Color,
) {
    if width == 0 {
        return;
    }
    for (row, line) in coverage.chunks_exact(width).enumerate() {
        let Ok(y) = u32::try_from(origin_y + row as i32) else {
            continue;
        };
        for (col, &alpha) in line.iter().enumerate() {
            let Ok(x) = u32::try_from(origin_x + col as i32) else {
                continue;
            };
            if alpha > 0 {
                composite(image, x, y, color, alpha);
            }
        }
    }
}

/// Pixel rectangle `[x0, x1) x [y0, y1)`, already clipped to the image.
struct PixelBounds {
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl PixelBounds {
    /// Pixels touched by the box `min..=max`, or `None` when it misses the image.
    fn clipped(image: &RgbaImage, min: Vec2, max: Vec2) -> Option<Self> {
        let (width, height) = image.dimensions();
        let x0 = min.x.floor().max(0.0);
        let y0 = min.y.floor().max(0.0);
        let x1 = (max.x.ceil() + 1.0).min(width as f32);
        let y1 = (max.y.ceil() + 1.0).min(height as f32);
        // Written so NaN bounds fall through to `None`.
        if !(x0 < x1 && y0 < y1) {
            return None;
        }
        Some(Self {
            x0: x0 as u32,
            y0: y0 as u32,
            x1: x1 as u32,
            y1: y1 as u32,
        })
    }

    fn pixels(self) -> impl Iterator<Item = (u32, u32)> {
        let (x0, x1) = (self.x0, self.x1);
        (self.y0..self.y1).flat_map(move |y| (x0..x1).map(move |x| (x, y)))
    }
}

fn pixel_center(x: u32, y: u32) -> Vec2 {
    Vec2::new(x as f32 + 0.5, y as f32 + 0.5)
}

fn draw_circle_filled(image: &mut RgbaImage, center: Vec2, radius: f32, color: Color) {
    fill_ring(image, center, 0.0, radius.max(1.0), color);
}

/// The stroke straddles the outline: half inside, half outside.
fn draw_circle_stroke(
    image: &mut RgbaImage,
    center: Vec2,
    radius: f32,
    thickness: f32,
    color: Color,
) {
    let half = thickness.max(1.0) * 0.5;
    fill_ring(
        image,
        center,
        (radius - half).max(0.0),
        radius.max(1.0) + half,
        color,
    );
}

/// Paint every pixel whose center lies between `inner` and `outer` from `center`.
fn fill_ring(image: &mut RgbaImage, center: Vec2, inner: f32, outer: f32, color: Color) {
    let reach = Vec2::new(outer, outer);
    let Some(bounds) = PixelBounds::clipped(image, center - reach, center + reach) else {
        return;
    };
    let (inner_sq, outer_sq) = (inner * inner, outer * outer);
    for (x, y) in bounds.pixels() {
        let offset = pixel_center(x, y) - center;
        let dist_sq = offset.x * offset.x + offset.y * offset.y;
        if (inner_sq..=outer_sq).contains(&dist_sq) {
            paint(image, x, y, color);
        }
    }
}

fn draw_triangle_filled(image: &mut RgbaImage, points: [Vec2; 3], color: Color) {
    let [a, b, c] = points;
    let area = edge_function(a, b, c);
    if area.abs() < f32::EPSILON {
        return;
    }
    let min = Vec2::new(a.x.min(b.x).min(c.x), a.y.min(b.y).min(c.y));
    let max = Vec2::new(a.x.max(b.x).max(c.x), a.y.max(b.y).max(c.y));
    let Some(bounds) = PixelBounds::clipped(image, min, max) else {
        return;
    };
    let winding = area.signum();
    for (x, y) in bounds.pixels() {
        let p = pixel_center(x, y);
        let inside = [(b, c), (c, a), (a, b)]
            .iter()
            .all(|&(from, to)| edge_function(from, to, p) * winding >= 0.0);
        if inside {
            paint(image, x, y, color);
        }
    }
}

fn edge_function(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Clip the segment to the image (grown by the brush) and walk it with Bresenham.
/// Endpoints far off-canvas cost nothing beyond the visible part.
fn draw_line(image: &mut RgbaImage, from: Vec2, to: Vec2, color: Color, thickness: i32) {
    let margin = thickness.max(1) as f32;
    let (width, height) = image.dimensions();
    let min = Vec2::new(-margin, -margin);
    let max = Vec2::new(width as f32 + margin, height as f32 + margin);
    let Some((from, to)) = clip_segment(from, to, min, max) else {
        return;
    };

    let (mut x, mut y) = (from.x.round() as i32, from.y.round() as i32);
    let (end_x, end_y) = (to.x.round() as i32, to.y.round() as i32);
    let dx = (end_x - x).abs();
    let dy = -(end_y - y).abs();
    let step_x = if x < end_x { 1 } else { -1 };
    let step_y = if y < end_y { 1 } else { -1 };
    let mut err = dx + dy;
    loop {
        draw_thick_point(image, x, y, color, thickness);
        if x == end_x && y == end_y {
            break;
        }
        let doubled = 2 * err;
        if doubled >= dy {
            err += dy;
            x += step_x;
        }
        if doubled <= dx {
            err += dx;
            y += step_y;
        }
    }
}

/// Liang-Barsky clip of `a`-`b` against the box `min..=max`. Runs in `f64` so a huge
/// segment still lands on the right pixels after clipping.
fn clip_segment(a: Vec2, b: Vec2, min: Vec2, max: Vec2) -> Option<(Vec2, Vec2)> {
    if ![a.x, a.y, b.x, b.y].iter().all(|v| v.is_finite()) {
        return None;
    }
    let (ax, ay) = (a.x as f64, a.y as f64);
    let (dx, dy) = (b.x as f64 - ax, b.y as f64 - ay);
    let mut enter = 0.0f64;
    let mut leave = 1.0f64;
    for (p, q) in [
        (-dx, ax - min.x as f64),
        (dx, max.x as f64 - ax),
        (-dy, ay - min.y as f64),
        (dy, max.y as f64 - ay),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            enter = enter.max(t);
        } else {
            leave = leave.min(t);
        }
        if enter > leave {
            return None;
        }
    }
    let at = |t: f64| Vec2::new((ax + dx * t) as f32, (ay + dy * t) as f32);
    Some((at(enter), at(leave)))
}

/// Square brush exactly `thickness` pixels wide.
fn draw_thick_point(image: &mut RgbaImage, x: i32, y: i32, color: Color, thickness: i32) {
    let thickness = thickness.max(1);
    let lo = -(thickness - 1) / 2;
    let hi = thickness / 2;
    for dy in lo..=hi {
        for dx in lo..=hi {
            let (Ok(px), Ok(py)) = (u32::try_from(x + dx), u32::try_from(y + dy)) else {
                continue;
            };
            paint(image, px, py, color);
        }
    }
}

/// Write an opaque color, compositing anything translucent. Out-of-range pixels are
/// ignored.
fn paint(image: &mut RgbaImage, x: u32, y: u32, color: Color) {
    if color.a < 255 {
        composite(image, x, y, color, 255);
    } else if let Some(pixel) = image.get_pixel_mut_checked(x, y) {
        *pixel = Rgba(color.to_array());
    }
}

/// Source-over in straight alpha, the source scaled by `coverage`. A translucent color
/// over a transparent pixel keeps its own channels.
fn composite(image: &mut RgbaImage, x: u32, y: u32, color: Color, coverage: u8) {
    let Some(pixel) = image.get_pixel_mut_checked(x, y) else {
        return;
    };
    let src_a = color.a as f32 / 255.0 * (coverage as f32 / 255.0);
    if src_a <= 0.0 {
        return;
    }
    let [r, g, b, a] = pixel.0;
    let dst_a = a as f32 / 255.0 * (1.0 - src_a);
    let out_a = src_a + dst_a;
    let mix = |src: u8, dst: u8| {
        ((src as f32 * src_a + dst as f32 * dst_a) / out_a)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    *pixel = Rgba([
        mix(color.r, r),
        mix(color.g, g),
        mix(color.b, b),
        (out_a * 255.0).round() as u8,
    ]);
}
