//! Branch-tip ornaments: berry clusters and single leaves.
//!
//! Both renderers draw relative to the local origin left at the far end of
//! the segment that was just stroked; `segment_length` is negative because
//! branches grow against the y axis.

use crate::canvas::{Bezier, Canvas, Paint};
use crate::config::{OrnamentStyle, PlantConfig};
use crate::random;
use rand::Rng;

/// Stroke width for leaf stems, before transform scaling
const STEM_WIDTH: f32 = 0.6;

// Leaf blade proportions relative to the configured leaf length
const BLADE_DROP: f32 = 0.35;
const BLADE_BULGE: f32 = 0.35;
const STEM_RISE: f32 = 0.15;

impl OrnamentStyle {
    /// Span of one segment's length as a fraction of canvas height.
    /// Wider segments for the berry style, shorter for the leaf style.
    pub fn segment_length_span(self) -> (f32, f32) {
        match self {
            OrnamentStyle::Berries => (-0.108, -0.100),
            OrnamentStyle::Leaves => (-0.078, -0.072),
        }
    }

    /// Rotation jitter applied to every segment, in degrees
    pub fn jitter_degrees(self) -> (f32, f32) {
        match self {
            OrnamentStyle::Berries => (10.0, 27.0),
            OrnamentStyle::Leaves => (8.0, 22.0),
        }
    }

    /// Draw this style's ornament for the segment that was just stroked.
    /// Returns how many ornaments were placed.
    pub fn render_ornament<R: Rng>(
        self,
        canvas: &mut Canvas,
        rng: &mut R,
        config: &PlantConfig,
        segment_length: f32,
        size: f32,
    ) -> u32 {
        match self {
            OrnamentStyle::Berries => render_berries(canvas, rng, config, segment_length, size),
            OrnamentStyle::Leaves => render_leaf(canvas, rng, segment_length, size),
        }
    }
}

/// A cluster of up to `max_ornaments_per_segment` filled circles hugging
/// the outer edge of the stroke, scattered along the distal half.
fn render_berries<R: Rng>(
    canvas: &mut Canvas,
    rng: &mut R,
    config: &PlantConfig,
    segment_length: f32,
    size: f32,
) -> u32 {
    let count = rng.gen_range(0..=config.max_ornaments_per_segment);
    canvas.set_paint(Paint::Berry);
    for _ in 0..count {
        let lateral = random::signed_uniform(
            rng,
            config.start_line_width,
            config.start_line_width + 2.0,
        );
        let along = random::uniform(rng, segment_length, segment_length / 2.0);
        let jitter_x = random::signed_uniform(rng, 0.0, 0.8);
        let jitter_y = random::signed_uniform(rng, 0.0, 0.8);
        canvas.fill_arc(lateral + jitter_x, along + jitter_y, size / 2.0);
    }
    canvas.set_paint(Paint::Wood);
    count
}

/// One leaf: a thin stem out to a signed lateral point, then a blade of two
/// Bezier arcs mirrored about the stem axis, flipped by the offset's sign.
fn render_leaf<R: Rng>(canvas: &mut Canvas, rng: &mut R, segment_length: f32, size: f32) -> u32 {
    let along = random::uniform(rng, segment_length, segment_length / 2.0);
    let lateral = random::signed_uniform(rng, size * 0.4, size * 0.8);
    let side = lateral.signum();

    let stem_from = (0.0, along);
    let stem_to = (lateral, along - size * STEM_RISE);

    let saved_width = canvas.stroke_width();
    canvas.set_stroke_width(STEM_WIDTH);
    canvas.stroke_line(&[stem_from, stem_to]);
    canvas.set_stroke_width(saved_width);

    let base = stem_to;
    let apex = (base.0 + side * size, base.1 - size * BLADE_DROP);
    let dx = apex.0 - base.0;
    let dy = apex.1 - base.1;
    // perpendicular to the stem axis, scaled down to the blade's half-width
    let px = -dy * BLADE_BULGE;
    let py = dx * BLADE_BULGE;

    let outline = [
        Bezier {
            from: base,
            ctrl1: (base.0 + dx * 0.25 + px, base.1 + dy * 0.25 + py),
            ctrl2: (base.0 + dx * 0.75 + px, base.1 + dy * 0.75 + py),
            to: apex,
        },
        Bezier {
            from: apex,
            ctrl1: (base.0 + dx * 0.75 - px, base.1 + dy * 0.75 - py),
            ctrl2: (base.0 + dx * 0.25 - px, base.1 + dy * 0.25 - py),
            to: base,
        },
    ];

    canvas.set_paint(Paint::Foliage);
    canvas.fill_closed_curve(&outline);
    canvas.set_paint(Paint::Wood);
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GrowthOverrides;
    use crate::settings::Settings;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn centered_canvas() -> Canvas {
        let mut canvas = Canvas::new(40, 20);
        canvas.prepare(3.0);
        // move off the bottom edge so ornaments land inside the grid
        canvas.translate(0.0, -40.0);
        canvas
    }

    #[test]
    fn berry_cluster_respects_the_per_segment_cap() {
        let config = PlantConfig::resolve(
            OrnamentStyle::Berries,
            &GrowthOverrides::default(),
            &Settings::default(),
        );
        for seed in 0..50 {
            let mut canvas = centered_canvas();
            let mut rng = StdRng::seed_from_u64(seed);
            let placed =
                OrnamentStyle::Berries.render_ornament(&mut canvas, &mut rng, &config, -16.0, 2.0);
            assert!(placed <= config.max_ornaments_per_segment);
            assert_eq!(canvas.stats().arcs, placed);
        }
    }

    #[test]
    fn leaf_draws_stem_and_blade_and_restores_width() {
        let config = PlantConfig::resolve(
            OrnamentStyle::Leaves,
            &GrowthOverrides::default(),
            &Settings::default(),
        );
        let mut canvas = centered_canvas();
        let mut rng = StdRng::seed_from_u64(5);
        let placed =
            OrnamentStyle::Leaves.render_ornament(&mut canvas, &mut rng, &config, -14.0, 6.0);
        assert_eq!(placed, 1);
        assert_eq!(canvas.stats().lines, 1);
        assert_eq!(canvas.stats().curves, 1);
        assert!(canvas.dot_count() > 0);
        assert!((canvas.stroke_width() - 3.0).abs() < f32::EPSILON);
    }
}
