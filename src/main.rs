mod canvas;
mod config;
mod help;
mod ornament;
mod plant;
mod random;
mod settings;
mod terminal;

use clap::{Args, Parser, Subcommand};
use config::{GrowthOverrides, OrnamentStyle, PlantConfig};
use settings::Settings;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "plantart")]
#[command(author = "Terminal Art Generator")]
#[command(version = "0.3.0")]
#[command(about = "Terminal-based generative art: stochastic branching plants", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grow a plant tipped with berry clusters
    Berries {
        #[command(flatten)]
        growth: GrowthArgs,

        /// Berry diameter in canvas dots
        #[arg(short = 'S', long)]
        size: Option<f32>,

        /// Maximum berries per eligible segment
        #[arg(short = 'm', long)]
        max_per_segment: Option<u32>,
    },

    /// Grow a plant tipped with single leaves
    Leaves {
        #[command(flatten)]
        growth: GrowthArgs,

        /// Leaf length in canvas dots
        #[arg(short = 'S', long)]
        size: Option<f32>,
    },
}

/// Growth knobs shared by every plant style. Values left unset fall back to
/// the settings file, then to built-in defaults.
#[derive(Args)]
struct GrowthArgs {
    /// Average number of segments per branch
    #[arg(short = 'n', long)]
    segments: Option<u32>,

    /// Random +/- swing on the segment count
    #[arg(short = 'v', long)]
    variability: Option<u32>,

    /// Maximum branches forking from one joint
    #[arg(short = 'b', long)]
    branches: Option<u32>,

    /// Trunk stroke width in canvas dots
    #[arg(short = 'w', long)]
    line_width: Option<f32>,

    /// Probability (0-1) that a joint forks a sibling branch
    #[arg(short = 'p', long)]
    branch_probability: Option<f32>,

    /// Per-segment decay factor applied to the fork probability
    #[arg(short = 'd', long)]
    probability_decay: Option<f32>,

    /// Show live growth animation
    #[arg(short, long)]
    live: bool,

    /// Keep regenerating plants on a timer
    #[arg(short, long)]
    infinite: bool,

    /// Print the plant to stdout (no interactive display)
    #[arg(long)]
    print: bool,

    /// Animation step delay in seconds
    #[arg(short, long, default_value = "0.04")]
    time: f32,

    /// Wait time between plants in infinite mode (seconds)
    #[arg(long, default_value = "4.0")]
    wait: f64,

    /// Random seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Also save the plant as a PNG (print mode)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load();

    let (style, growth, size, max_per_segment) = match cli.command {
        Commands::Berries {
            growth,
            size,
            max_per_segment,
        } => (OrnamentStyle::Berries, growth, size, max_per_segment),
        Commands::Leaves { growth, size } => (OrnamentStyle::Leaves, growth, size, None),
    };

    let overrides = GrowthOverrides {
        segments: growth.segments,
        variability: growth.variability,
        branches: growth.branches,
        line_width: growth.line_width,
        branch_probability: growth.branch_probability,
        probability_decay: growth.probability_decay,
        size,
        max_per_segment,
    };

    let mut config = PlantConfig::resolve(style, &overrides, &settings);
    config.live = growth.live;
    config.infinite = growth.infinite;
    config.print = growth.print;
    config.time_step = growth.time;
    config.time_wait = growth.wait;
    config.seed = growth.seed;
    config.output = growth.output;

    plant::run(config, overrides, settings)
}
