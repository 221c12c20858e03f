//! Braille dot canvas with an affine transform stack.
//!
//! The plant is laid out in a continuous 2D space and rasterized into a
//! grid of 2x4 braille dots per terminal cell, so strokes can be thinner
//! than a character and rotate smoothly. The transform stack mirrors a 2D
//! raster canvas: the origin sits at bottom-center after `prepare`, the y
//! axis grows downward, and stroke widths scale with the transform.

use crate::terminal::{colors, Style, Terminal};
use image::{Rgb, RgbImage};

// Braille cell geometry (2x4 dot grid per character)
pub const DOTS_X: usize = 2;
pub const DOTS_Y: usize = 4;
const BRAILLE_BASE: u32 = 0x2800;

// Samples per Bezier segment when flattening an outline
const CURVE_STEPS: usize = 16;

// Cells with this many lit dots render with the light/bold palette entry
const DENSE_DOTS: u32 = 5;

const IMAGE_BG: Rgb<u8> = Rgb([18, 18, 18]);

/// Paint class for a dot; rendering maps classes to palette colors.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Paint {
    Wood,
    Foliage,
    Berry,
}

impl Paint {
    fn index(self) -> usize {
        match self {
            Paint::Wood => 0,
            Paint::Foliage => 1,
            Paint::Berry => 2,
        }
    }
}

const PAINTS: [Paint; 3] = [Paint::Wood, Paint::Foliage, Paint::Berry];

/// Current affine transform, 2D-canvas layout:
/// `x' = a*x + c*y + e`, `y' = b*x + d*y + f`
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Transform {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Transform {
    pub fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.e += self.a * dx + self.c * dy;
        self.f += self.b * dx + self.d * dy;
    }

    fn rotate(&mut self, radians: f32) {
        let (sin, cos) = radians.sin_cos();
        let (a, b, c, d) = (self.a, self.b, self.c, self.d);
        self.a = a * cos + c * sin;
        self.b = b * cos + d * sin;
        self.c = c * cos - a * sin;
        self.d = d * cos - b * sin;
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.a *= sx;
        self.b *= sx;
        self.c *= sy;
        self.d *= sy;
    }

    /// Average stretch of the linear part; scales stroke widths and radii.
    pub fn scale_factor(&self) -> f32 {
        (self.a * self.d - self.c * self.b).abs().sqrt()
    }
}

/// One cubic Bezier segment of a closed outline
#[derive(Clone, Copy)]
pub struct Bezier {
    pub from: (f32, f32),
    pub ctrl1: (f32, f32),
    pub ctrl2: (f32, f32),
    pub to: (f32, f32),
}

/// Counts of primitive draw calls since the last `prepare`
#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct DrawStats {
    pub lines: u32,
    pub arcs: u32,
    pub curves: u32,
}

pub struct Canvas {
    dot_w: usize,
    dot_h: usize,
    dots: Vec<Option<Paint>>,
    transform: Transform,
    stack: Vec<Transform>,
    stroke_width: f32,
    paint: Paint,
    stats: DrawStats,
}

impl Canvas {
    /// Canvas covering `cols` x `rows` terminal cells
    pub fn new(cols: u16, rows: u16) -> Self {
        let dot_w = cols as usize * DOTS_X;
        let dot_h = rows as usize * DOTS_Y;
        Self {
            dot_w,
            dot_h,
            dots: vec![None; dot_w * dot_h],
            transform: Transform::identity(),
            stack: Vec::new(),
            stroke_width: 1.0,
            paint: Paint::Wood,
            stats: DrawStats::default(),
        }
    }

    /// Width in dots
    pub fn width(&self) -> usize {
        self.dot_w
    }

    /// Height in dots
    pub fn height(&self) -> usize {
        self.dot_h
    }

    /// Reset for a fresh draw pass: every dot cleared, the transform stack
    /// emptied, and the origin re-homed to horizontal-center, bottom edge.
    pub fn prepare(&mut self, stroke_width: f32) {
        self.dots.fill(None);
        self.stack.clear();
        self.transform = Transform::identity();
        self.transform
            .translate(self.dot_w as f32 / 2.0, self.dot_h as f32);
        self.stroke_width = stroke_width;
        self.paint = Paint::Wood;
        self.stats = DrawStats::default();
    }

    pub fn set_stroke_width(&mut self, width: f32) {
        self.stroke_width = width;
    }

    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    pub fn set_paint(&mut self, paint: Paint) {
        self.paint = paint;
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn stats(&self) -> DrawStats {
        self.stats
    }

    /// Number of lit dots
    pub fn dot_count(&self) -> usize {
        self.dots.iter().filter(|dot| dot.is_some()).count()
    }

    /// Run `body` with the current transform saved; the transform is
    /// restored before the result (Ok or Err alike) is handed back, so no
    /// translate/rotate/scale can leak out of the scope.
    pub fn with_save<R>(&mut self, body: impl FnOnce(&mut Canvas) -> R) -> R {
        self.stack.push(self.transform);
        let result = body(self);
        if let Some(saved) = self.stack.pop() {
            self.transform = saved;
        }
        result
    }

    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.transform.translate(dx, dy);
    }

    pub fn rotate(&mut self, radians: f32) {
        self.transform.rotate(radians);
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.transform.scale(sx, sy);
    }

    /// Stroke a connected polyline through `points` (local coordinates)
    /// with the current stroke width.
    pub fn stroke_line(&mut self, points: &[(f32, f32)]) {
        if points.len() < 2 {
            return;
        }
        let radius = (self.stroke_width * self.transform.scale_factor() / 2.0).max(0.5);
        for pair in points.windows(2) {
            let (x0, y0) = self.transform.apply(pair[0].0, pair[0].1);
            let (x1, y1) = self.transform.apply(pair[1].0, pair[1].1);
            self.stamp_segment(x0, y0, x1, y1, radius);
        }
        self.stats.lines += 1;
    }

    /// Fill a circle of `radius` centred at local (cx, cy)
    pub fn fill_arc(&mut self, cx: f32, cy: f32, radius: f32) {
        let (px, py) = self.transform.apply(cx, cy);
        self.stamp_disk(px, py, radius * self.transform.scale_factor());
        self.stats.arcs += 1;
    }

    /// Fill the region enclosed by the outline's Bezier segments
    pub fn fill_closed_curve(&mut self, outline: &[Bezier]) {
        let mut polygon: Vec<(f32, f32)> = Vec::with_capacity(outline.len() * CURVE_STEPS);
        for segment in outline {
            for i in 0..CURVE_STEPS {
                let t = i as f32 / CURVE_STEPS as f32;
                let (x, y) = cubic_point(segment, t);
                polygon.push(self.transform.apply(x, y));
            }
        }
        self.fill_polygon(&polygon);
        self.stats.curves += 1;
    }

    fn stamp_segment(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, radius: f32) {
        let length = (x1 - x0).hypot(y1 - y0);
        let steps = (length * 2.0).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            self.stamp_disk(x0 + (x1 - x0) * t, y0 + (y1 - y0) * t, radius);
        }
    }

    fn stamp_disk(&mut self, cx: f32, cy: f32, radius: f32) {
        // tiny radii still land one dot, so far-tip ornaments stay visible
        self.set_dot(cx.round() as i32, cy.round() as i32);
        let r = radius.max(0.0);
        let x_min = (cx - r).floor() as i32;
        let x_max = (cx + r).ceil() as i32;
        let y_min = (cy - r).floor() as i32;
        let y_max = (cy + r).ceil() as i32;
        for y in y_min..=y_max {
            for x in x_min..=x_max {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                if dx * dx + dy * dy <= r * r {
                    self.set_dot(x, y);
                }
            }
        }
    }

    fn fill_polygon(&mut self, polygon: &[(f32, f32)]) {
        if polygon.len() < 3 {
            return;
        }
        let y_min = polygon
            .iter()
            .fold(f32::MAX, |acc, p| acc.min(p.1))
            .floor() as i32;
        let y_max = polygon
            .iter()
            .fold(f32::MIN, |acc, p| acc.max(p.1))
            .ceil() as i32;

        for y in y_min..=y_max {
            let yc = y as f32;
            let mut crossings: Vec<f32> = Vec::new();
            for i in 0..polygon.len() {
                let (x0, y0) = polygon[i];
                let (x1, y1) = polygon[(i + 1) % polygon.len()];
                if (y0 <= yc) != (y1 <= yc) {
                    crossings.push(x0 + (yc - y0) / (y1 - y0) * (x1 - x0));
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));
            for pair in crossings.chunks(2) {
                if let [xa, xb] = pair {
                    for x in xa.round() as i32..=xb.round() as i32 {
                        self.set_dot(x, y);
                    }
                }
            }
        }
    }

    fn set_dot(&mut self, x: i32, y: i32) {
        if x >= 0 && (x as usize) < self.dot_w && y >= 0 && (y as usize) < self.dot_h {
            self.dots[y as usize * self.dot_w + x as usize] = Some(self.paint);
        }
    }

    fn dot(&self, x: usize, y: usize) -> Option<Paint> {
        if x < self.dot_w && y < self.dot_h {
            self.dots[y * self.dot_w + x]
        } else {
            None
        }
    }

    /// Encode the dot grid into braille characters on the terminal back
    /// buffer, coloring each cell by its dominant paint class.
    pub fn render_to(&self, term: &mut Terminal) {
        term.clear();
        let (cols, rows) = term.size();

        for cy in 0..rows as usize {
            for cx in 0..cols as usize {
                let mut bits: u32 = 0;
                let mut counts = [0u32; PAINTS.len()];
                let mut total = 0u32;

                for dy in 0..DOTS_Y {
                    for dx in 0..DOTS_X {
                        if let Some(paint) = self.dot(cx * DOTS_X + dx, cy * DOTS_Y + dy) {
                            bits |= braille_bit(dx, dy);
                            counts[paint.index()] += 1;
                            total += 1;
                        }
                    }
                }

                if total == 0 {
                    continue;
                }

                let ch = char::from_u32(BRAILLE_BASE + bits).unwrap_or(' ');
                let mut dominant = Paint::Wood;
                let mut best = 0u32;
                for paint in PAINTS {
                    // ties go to the later class, so berries stay visible
                    if counts[paint.index()] >= best {
                        best = counts[paint.index()];
                        dominant = paint;
                    }
                }
                term.set(cx as i32, cy as i32, ch, cell_style(dominant, total));
            }
        }
    }

    /// Rasterize the dot grid into an RGB image, `dot_px` pixels per dot
    pub fn to_image(&self, dot_px: u32) -> RgbImage {
        let scale = dot_px.max(1);
        let mut img = RgbImage::from_pixel(
            self.dot_w as u32 * scale,
            self.dot_h as u32 * scale,
            IMAGE_BG,
        );
        for y in 0..self.dot_h {
            for x in 0..self.dot_w {
                if let Some(paint) = self.dot(x, y) {
                    let rgb = paint_rgb(paint);
                    for py in 0..scale {
                        for px in 0..scale {
                            img.put_pixel(x as u32 * scale + px, y as u32 * scale + py, rgb);
                        }
                    }
                }
            }
        }
        img
    }
}

/// Braille dot positions within a cell:
/// bit 0..2 = left column rows 0-2, bit 3..5 = right column rows 0-2,
/// bit 6 = left row 3, bit 7 = right row 3
fn braille_bit(dx: usize, dy: usize) -> u32 {
    match (dx, dy) {
        (0, 0) => 1 << 0,
        (0, 1) => 1 << 1,
        (0, 2) => 1 << 2,
        (1, 0) => 1 << 3,
        (1, 1) => 1 << 4,
        (1, 2) => 1 << 5,
        (0, 3) => 1 << 6,
        _ => 1 << 7,
    }
}

fn cubic_point(segment: &Bezier, t: f32) -> (f32, f32) {
    let u = 1.0 - t;
    let w0 = u * u * u;
    let w1 = 3.0 * u * u * t;
    let w2 = 3.0 * u * t * t;
    let w3 = t * t * t;
    (
        w0 * segment.from.0 + w1 * segment.ctrl1.0 + w2 * segment.ctrl2.0 + w3 * segment.to.0,
        w0 * segment.from.1 + w1 * segment.ctrl1.1 + w2 * segment.ctrl2.1 + w3 * segment.to.1,
    )
}

fn cell_style(paint: Paint, dots: u32) -> Style {
    let dense = dots >= DENSE_DOTS;
    match paint {
        Paint::Wood if dense => Style::bold(colors::WOOD_LIGHT),
        Paint::Wood => Style::fg(colors::WOOD_DARK),
        Paint::Foliage if dense => Style::bold(colors::FOLIAGE_LIGHT),
        Paint::Foliage => Style::fg(colors::FOLIAGE_DARK),
        Paint::Berry if dense => Style::bold(colors::BERRY_LIGHT),
        Paint::Berry => Style::fg(colors::BERRY_DARK),
    }
}

fn paint_rgb(paint: Paint) -> Rgb<u8> {
    match paint {
        Paint::Wood => Rgb([139, 90, 43]),
        Paint::Foliage => Rgb([50, 205, 50]),
        Paint::Berry => Rgb([205, 50, 70]),
    }
}

#[cfg(test)]
mod tests {
    use super::{Bezier, Canvas, Paint, Transform};
    use std::io;

    fn fresh_canvas() -> Canvas {
        let mut canvas = Canvas::new(40, 20);
        canvas.prepare(2.0);
        canvas
    }

    #[test]
    fn transform_composes_translate_then_rotate() {
        let mut t = Transform::identity();
        t.translate(10.0, 20.0);
        assert_eq!(t.apply(0.0, 0.0), (10.0, 20.0));

        t.rotate(std::f32::consts::FRAC_PI_2);
        let (x, y) = t.apply(1.0, 0.0);
        assert!((x - 10.0).abs() < 1e-4);
        assert!((y - 21.0).abs() < 1e-4);
    }

    #[test]
    fn scale_factor_tracks_uniform_scale() {
        let mut t = Transform::identity();
        t.scale(0.9, 0.9);
        t.rotate(0.7);
        assert!((t.scale_factor() - 0.9).abs() < 1e-4);
    }

    #[test]
    fn with_save_restores_on_normal_exit() {
        let mut canvas = fresh_canvas();
        let before = canvas.transform();
        canvas.with_save(|c| {
            c.rotate(0.4);
            c.translate(5.0, -12.0);
            c.scale(0.9, 0.9);
        });
        assert_eq!(before, canvas.transform());
    }

    #[test]
    fn with_save_restores_when_body_errors() {
        let mut canvas = fresh_canvas();
        let before = canvas.transform();
        let result: io::Result<()> = canvas.with_save(|c| {
            c.rotate(1.0);
            c.translate(3.0, 4.0);
            Err(io::Error::other("draw failed"))
        });
        assert!(result.is_err());
        assert_eq!(before, canvas.transform());
    }

    #[test]
    fn with_save_nests() {
        let mut canvas = fresh_canvas();
        let before = canvas.transform();
        canvas.with_save(|c| {
            c.translate(0.0, -10.0);
            let mid = c.transform();
            c.with_save(|c| c.rotate(0.3));
            assert_eq!(mid, c.transform());
        });
        assert_eq!(before, canvas.transform());
    }

    #[test]
    fn prepare_clears_dots_and_rehomes_origin() {
        let mut canvas = fresh_canvas();
        canvas.stroke_line(&[(0.0, 0.0), (0.0, -20.0)]);
        assert!(canvas.dot_count() > 0);
        assert_eq!(canvas.stats().lines, 1);

        canvas.prepare(2.0);
        assert_eq!(canvas.dot_count(), 0);
        assert_eq!(canvas.stats(), super::DrawStats::default());

        // origin back at bottom-center
        let (x, y) = canvas.transform().apply(0.0, 0.0);
        assert!((x - canvas.width() as f32 / 2.0).abs() < 1e-4);
        assert!((y - canvas.height() as f32).abs() < 1e-4);
    }

    #[test]
    fn stroke_marks_dots_along_the_segment() {
        let mut canvas = fresh_canvas();
        canvas.stroke_line(&[(0.0, 0.0), (0.0, -30.0)]);
        let marked = canvas.dot_count();
        assert!(marked >= 30, "too sparse: {}", marked);
    }

    #[test]
    fn scaling_down_thins_the_stroke() {
        let mut wide = fresh_canvas();
        wide.set_stroke_width(4.0);
        wide.stroke_line(&[(0.0, 0.0), (0.0, -30.0)]);

        let mut thin = fresh_canvas();
        thin.set_stroke_width(4.0);
        thin.scale(0.5, 0.5);
        thin.stroke_line(&[(0.0, 0.0), (0.0, -30.0)]);

        assert!(thin.dot_count() < wide.dot_count());
    }

    #[test]
    fn fill_arc_covers_roughly_pi_r_squared() {
        let mut canvas = fresh_canvas();
        let h = canvas.height() as f32;
        canvas.fill_arc(0.0, -(h / 2.0), 3.0);
        let area = canvas.dot_count() as f32;
        assert!(
            (20.0..=40.0).contains(&area),
            "disk area out of bounds: {}",
            area
        );
        assert_eq!(canvas.stats().arcs, 1);
    }

    #[test]
    fn fill_closed_curve_fills_a_leaf_shape() {
        let mut canvas = fresh_canvas();
        canvas.set_paint(Paint::Foliage);
        let base = (0.0, -20.0);
        let apex = (10.0, -24.0);
        let outline = [
            Bezier {
                from: base,
                ctrl1: (2.0, -26.0),
                ctrl2: (7.0, -28.0),
                to: apex,
            },
            Bezier {
                from: apex,
                ctrl1: (7.0, -18.0),
                ctrl2: (2.0, -16.0),
                to: base,
            },
        ];
        canvas.fill_closed_curve(&outline);
        assert!(canvas.dot_count() > 10);
        assert_eq!(canvas.stats().curves, 1);
    }

    #[test]
    fn to_image_scales_dots_to_pixels() {
        let mut canvas = fresh_canvas();
        canvas.stroke_line(&[(0.0, 0.0), (0.0, -10.0)]);
        let img = canvas.to_image(2);
        assert_eq!(img.width(), canvas.width() as u32 * 2);
        assert_eq!(img.height(), canvas.height() as u32 * 2);
        let lit = img
            .pixels()
            .filter(|p| p.0 != super::IMAGE_BG.0)
            .count();
        assert!(lit > 0);
    }
}
