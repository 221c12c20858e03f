//! The branching-plant generator and its run loop.
//!
//! One draw pass is a single recursive walk: each call strokes a segment
//! under a scoped transform, may hang an ornament near the tip, continues
//! the branch at a reduced scale, and may fork a sibling branch from the
//! joint it grew out of.

use crate::canvas::Canvas;
use crate::config::{Counters, GrowthOverrides, PlantConfig};
use crate::help::show_help_modal;
use crate::random;
use crate::settings::Settings;
use crate::terminal::Terminal;
use crossterm::event::KeyCode;
use rand::prelude::*;
use std::io;
use std::time::Duration;

const HELP: &str = "\
PLANT
─────────────────
r      Regenerate
q/Esc  Quit
?      Close help";

/// Ornaments only appear on the distal `1/CROWN_DIVISOR` of the average
/// segment budget, never near the trunk.
const CROWN_DIVISOR: f32 = 2.0;
/// Shrink applied before every continued segment
const SEGMENT_SCALE: f32 = 0.9;
/// Ornament growth per continued segment, offsetting the shrink
const ORNAMENT_GROWTH: f32 = 1.08;

/// One recursion frame of the branch walk
#[derive(Clone, Copy)]
struct BranchCall {
    remaining_segments: i32,
    remaining_siblings: u32,
    branch_probability: f32,
    ornament_size: f32,
}

/// Run the plant generator
pub fn run(config: PlantConfig, overrides: GrowthOverrides, settings: Settings) -> io::Result<()> {
    let seed = config.seed.unwrap_or_else(now_seed);

    if config.print {
        run_print_mode(&config, seed)
    } else {
        run_interactive(config, overrides, settings, seed)
    }
}

fn now_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0) // fallback seed for misconfigured system clocks
}

fn run_print_mode(config: &PlantConfig, initial_seed: u64) -> io::Result<()> {
    let mut seed = initial_seed;

    loop {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut term = Terminal::new(false)?;
        let (cols, rows) = term.size();
        let mut canvas = Canvas::new(cols, rows);
        let mut counters = Counters::default();

        grow_plant(&mut canvas, config, &mut counters, &mut rng, None)?;
        canvas.render_to(&mut term);
        term.print_to_stdout();

        if let Some(path) = &config.output {
            canvas.to_image(4).save(path).map_err(io::Error::other)?;
        }

        if !config.infinite {
            break;
        }

        std::thread::sleep(Duration::from_secs_f64(config.time_wait));
        seed = now_seed();
    }

    Ok(())
}

fn run_interactive(
    mut config: PlantConfig,
    overrides: GrowthOverrides,
    mut settings: Settings,
    initial_seed: u64,
) -> io::Result<()> {
    let mut term = Terminal::new(true)?;
    let (cols, rows) = term.size();
    let mut canvas = Canvas::new(cols, rows);
    let mut seed = initial_seed;

    loop {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut counters = Counters::default();
        term.clear_screen()?;

        let live = if config.live { Some(&mut term) } else { None };
        let interrupted = grow_plant(&mut canvas, &config, &mut counters, &mut rng, live)?;
        if interrupted {
            break;
        }

        canvas.render_to(&mut term);
        term.render()?;

        match next_step(&mut term, &config)? {
            NextStep::Quit => break,
            NextStep::Regenerate => {
                settings = Settings::reload_or(&settings);
                config = config.reresolved(&overrides, &settings);
                seed = now_seed();
            }
        }
    }

    Ok(())
}

enum NextStep {
    Quit,
    Regenerate,
}

/// Wait for the next command. In infinite mode the timer doubles as a
/// regenerate trigger; otherwise only a keypress moves things along.
fn next_step(term: &mut Terminal, config: &PlantConfig) -> io::Result<NextStep> {
    if config.infinite {
        let wait_ms = (config.time_wait * 1000.0) as u64;
        if let Some(code) = term.wait_key(wait_ms)? {
            match code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(NextStep::Quit),
                KeyCode::Char('?') => {
                    if show_help_modal(term, HELP)? {
                        return Ok(NextStep::Quit);
                    }
                }
                _ => {}
            }
        }
        return Ok(NextStep::Regenerate);
    }

    loop {
        if let Some(code) = term.wait_key(100)? {
            match code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(NextStep::Quit),
                KeyCode::Char('r') => return Ok(NextStep::Regenerate),
                KeyCode::Char('?') => {
                    if show_help_modal(term, HELP)? {
                        return Ok(NextStep::Quit);
                    }
                }
                _ => {}
            }
        }
    }
}

/// One full draw pass: reset the canvas, then walk the trunk. The trunk
/// starts with no sibling budget; every continued segment gets a fresh one.
/// Returns true if a live-mode keypress interrupted the walk.
fn grow_plant(
    canvas: &mut Canvas,
    config: &PlantConfig,
    counters: &mut Counters,
    rng: &mut StdRng,
    live: Option<&mut Terminal>,
) -> io::Result<bool> {
    canvas.prepare(config.start_line_width);
    let trunk = BranchCall {
        remaining_segments: config.average_segments,
        remaining_siblings: 0,
        branch_probability: config.branch_probability,
        ornament_size: config.ornament_size,
    };
    grow_branch(canvas, config, counters, rng, trunk, 1, live)
}

/// Draw one branch segment, then conditionally an ornament, a continued
/// segment at reduced scale, and a sibling branch from the same joint.
fn grow_branch(
    canvas: &mut Canvas,
    config: &PlantConfig,
    counters: &mut Counters,
    rng: &mut StdRng,
    call: BranchCall,
    depth: u32,
    mut live: Option<&mut Terminal>,
) -> io::Result<bool> {
    counters.max_depth = counters.max_depth.max(depth);

    let segment_variation = random::signed_uniform(rng, 0.0, config.segment_variability as f32);
    let (span_min, span_max) = config.style.segment_length_span();
    let unit = canvas.height() as f32;
    let segment_length = random::uniform(rng, span_min * unit, span_max * unit);
    let (jitter_min, jitter_max) = config.style.jitter_degrees();

    let live_inner = live.as_deref_mut();
    let interrupted = canvas.with_save(|canvas| -> io::Result<bool> {
        let mut live = live_inner;

        canvas.rotate(random::angle_radians(rng, jitter_min, jitter_max, true));
        canvas.stroke_line(&[(0.0, 0.0), (0.0, segment_length)]);
        canvas.translate(0.0, segment_length);
        counters.segments += 1;

        if let Some(term) = live.as_deref_mut() {
            canvas.render_to(term);
            term.render()?;
            term.sleep(config.time_step);
            if let Some(code) = term.check_key()? {
                if matches!(code, KeyCode::Char('q') | KeyCode::Esc) {
                    return Ok(true);
                }
            }
        }

        if crown_reached(call.remaining_segments, config.average_segments) {
            counters.ornaments += config.style.render_ornament(
                canvas,
                rng,
                config,
                segment_length,
                call.ornament_size,
            );
        }

        let remaining = call.remaining_segments - 1;
        if remaining as f32 + segment_variation > 0.0 {
            canvas.scale(SEGMENT_SCALE, SEGMENT_SCALE);
            let next = BranchCall {
                remaining_segments: remaining,
                remaining_siblings: config.max_sibling_branches,
                branch_probability: call.branch_probability * config.probability_decay,
                ornament_size: call.ornament_size * ORNAMENT_GROWTH,
            };
            if grow_branch(canvas, config, counters, rng, next, depth + 1, live)? {
                return Ok(true);
            }
        }

        Ok(false)
    })?;
    if interrupted {
        return Ok(true);
    }

    // Siblings fork from the pre-rotation joint this segment grew out of,
    // keeping the undecayed probability and ornament size.
    if call.remaining_siblings > 1 && random::uniform(rng, 0.0, 1.0) <= call.branch_probability {
        let sibling = BranchCall {
            remaining_segments: call.remaining_segments - 1,
            remaining_siblings: call.remaining_siblings - 1,
            branch_probability: call.branch_probability,
            ornament_size: call.ornament_size,
        };
        counters.branches += 1;
        if grow_branch(canvas, config, counters, rng, sibling, depth, live)? {
            return Ok(true);
        }
    }

    Ok(false)
}

/// Ornament gate: true once the branch has consumed enough of its budget
/// to be in the crown.
fn crown_reached(remaining_segments: i32, average_segments: i32) -> bool {
    remaining_segments as f32 <= average_segments as f32 / CROWN_DIVISOR
}
