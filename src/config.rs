use crate::settings::Settings;
use std::path::PathBuf;

// Built-in growth defaults, matching the classic berry plant tuning.
const DEFAULT_SEGMENTS: u32 = 32;
const DEFAULT_VARIABILITY: u32 = 2;
const DEFAULT_BRANCHES: u32 = 2;
const DEFAULT_LINE_WIDTH: f32 = 3.0;
const DEFAULT_BRANCH_PROBABILITY: f32 = 0.6;
const DEFAULT_PROBABILITY_DECAY: f32 = 0.92;
const DEFAULT_BERRY_SIZE: f32 = 2.0;
const DEFAULT_MAX_PER_SEGMENT: u32 = 4;
const DEFAULT_LEAF_SIZE: f32 = 6.0;

/// Which ornament decorates the branch tips
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OrnamentStyle {
    Berries,
    Leaves,
}

/// Growth knobs passed explicitly on the command line. Kept around so a
/// regenerate can re-resolve against a freshly loaded settings file without
/// losing the explicit flags.
#[derive(Clone, Default)]
pub struct GrowthOverrides {
    pub segments: Option<u32>,
    pub variability: Option<u32>,
    pub branches: Option<u32>,
    pub line_width: Option<f32>,
    pub branch_probability: Option<f32>,
    pub probability_decay: Option<f32>,
    pub size: Option<f32>,
    pub max_per_segment: Option<u32>,
}

/// Configuration for one plant draw pass
#[derive(Clone)]
pub struct PlantConfig {
    pub style: OrnamentStyle,
    pub average_segments: i32,
    pub segment_variability: u32,
    pub max_sibling_branches: u32,
    pub start_line_width: f32,
    pub branch_probability: f32,
    pub probability_decay: f32,
    /// Berry diameter or leaf length, in canvas dots
    pub ornament_size: f32,
    /// Berries only; one leaf is drawn per eligible segment
    pub max_ornaments_per_segment: u32,
    pub live: bool,
    pub infinite: bool,
    pub print: bool,
    pub time_step: f32,
    pub time_wait: f64,
    pub seed: Option<u64>,
    pub output: Option<PathBuf>,
}

impl PlantConfig {
    /// Layer built-in defaults under the settings file under explicit CLI
    /// values, then clamp everything into its valid range.
    pub fn resolve(style: OrnamentStyle, cli: &GrowthOverrides, settings: &Settings) -> Self {
        let plant = &settings.plant;
        let (size_default, size_setting, max_setting) = match style {
            OrnamentStyle::Berries => (
                DEFAULT_BERRY_SIZE,
                settings.berries.size,
                settings.berries.max_per_segment,
            ),
            OrnamentStyle::Leaves => (DEFAULT_LEAF_SIZE, settings.leaves.size, None),
        };

        let segments = cli.segments.or(plant.segments).unwrap_or(DEFAULT_SEGMENTS);
        let variability = cli
            .variability
            .or(plant.variability)
            .unwrap_or(DEFAULT_VARIABILITY);
        let branches = cli.branches.or(plant.branches).unwrap_or(DEFAULT_BRANCHES);
        let line_width = finite_or(
            cli.line_width.or(plant.line_width).unwrap_or(DEFAULT_LINE_WIDTH),
            DEFAULT_LINE_WIDTH,
        );
        let probability = finite_or(
            cli.branch_probability
                .or(plant.branch_probability)
                .unwrap_or(DEFAULT_BRANCH_PROBABILITY),
            DEFAULT_BRANCH_PROBABILITY,
        );
        let decay = finite_or(
            cli.probability_decay
                .or(plant.probability_decay)
                .unwrap_or(DEFAULT_PROBABILITY_DECAY),
            DEFAULT_PROBABILITY_DECAY,
        );
        let size = finite_or(cli.size.or(size_setting).unwrap_or(size_default), size_default);
        let max_per_segment = cli
            .max_per_segment
            .or(max_setting)
            .unwrap_or(DEFAULT_MAX_PER_SEGMENT);

        Self {
            style,
            average_segments: segments.clamp(1, 128) as i32,
            segment_variability: variability.min(32),
            max_sibling_branches: branches.min(8),
            start_line_width: line_width.clamp(0.5, 12.0),
            branch_probability: probability.clamp(0.0, 1.0),
            probability_decay: decay.clamp(0.05, 1.0),
            ornament_size: size.clamp(0.5, 24.0),
            max_ornaments_per_segment: max_per_segment.min(16),
            live: false,
            infinite: false,
            print: false,
            time_step: 0.04,
            time_wait: 4.0,
            seed: None,
            output: None,
        }
    }

    /// Rebuild the growth knobs from a freshly loaded settings file while
    /// keeping this run's mode flags.
    pub fn reresolved(&self, cli: &GrowthOverrides, settings: &Settings) -> Self {
        let mut next = Self::resolve(self.style, cli, settings);
        next.live = self.live;
        next.infinite = self.infinite;
        next.print = self.print;
        next.time_step = self.time_step;
        next.time_wait = self.time_wait;
        next.output = self.output.clone();
        next
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

/// Counters for tracking generation progress
#[derive(Default)]
pub struct Counters {
    pub segments: u32,
    pub branches: u32,
    pub ornaments: u32,
    pub max_depth: u32,
}
