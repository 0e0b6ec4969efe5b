//! The `h2trainer simulate` command.

use std::fmt::Write as _;
use std::io::Write;
use std::time::Duration;

use anyhow::Result;
use comfy_table::{Cell, Table};

use h2trainer_report::heatmap::write_heatmap_svg;
use h2trainer_sim::render::ColorField;
use h2trainer_sim::scheduler::{ManualScheduler, TickScheduler, TokioScheduler};
use h2trainer_sim::{DispersionParams, DispersionSimulator, RoomLayout, SimulationDriver};

use crate::config::load_config_from;
use crate::SimulateArgs;

/// Rows counted as "near the ceiling" / "near the floor" in the stats.
const BAND_ROWS: usize = 5;

pub async fn execute(args: SimulateArgs) -> Result<()> {
    let config = load_config_from(args.config.as_deref())?;

    let base = config.simulation.params();
    let params = DispersionParams {
        leak_rate: args.leak_rate.unwrap_or(base.leak_rate),
        vent_strength: args.vent_strength.unwrap_or(base.vent_strength),
        buoyancy: args.buoyancy.unwrap_or(base.buoyancy),
        diffusion: args.diffusion.unwrap_or(base.diffusion),
    }
    .clamped();
    let period = Duration::from_millis(
        args.interval_ms
            .unwrap_or(config.simulation.tick_interval_ms)
            .max(1),
    );

    let sim = DispersionSimulator::new(RoomLayout::default(), params);
    tracing::info!(
        "simulating {} ticks: leak {:.2}, vent {:.2}, buoyancy {:.2}, diffusion {:.2}",
        args.ticks,
        params.leak_rate,
        params.vent_strength,
        params.buoyancy,
        params.diffusion
    );

    let sim = if args.live {
        let mut driver = SimulationDriver::new(sim, TokioScheduler::new(), period);
        run_live(&mut driver, args.ticks).await?;
        driver.sim().clone()
    } else {
        let mut driver = SimulationDriver::new(sim, ManualScheduler::new(), period);
        run_headless(&mut driver, args.ticks);
        driver.sim().clone()
    };

    print_stats(&sim);

    if let Some(path) = &args.svg {
        write_heatmap_svg(&sim.render(), sim.layout(), &sim.params(), path)?;
        println!("Heat-map: {}", path.display());
    }

    Ok(())
}

/// Run `ticks` passes without waiting between them.
pub fn run_headless(driver: &mut SimulationDriver<ManualScheduler>, ticks: u64) {
    if ticks == 0 {
        return;
    }
    driver.start();
    while driver.sim().ticks() < ticks {
        let Some(tick) = driver.scheduler().fire() else {
            break;
        };
        driver.on_tick(tick);
    }
    driver.pause();
}

async fn run_live(driver: &mut SimulationDriver<TokioScheduler>, ticks: u64) -> Result<()> {
    run_live_on(&mut std::io::stdout(), driver, ticks).await
}

/// Animate the run on `out`. The cursor is shown again and the driver
/// paused on every exit path, including write errors.
async fn run_live_on(
    out: &mut impl Write,
    driver: &mut SimulationDriver<TokioScheduler>,
    ticks: u64,
) -> Result<()> {
    if ticks == 0 {
        return Ok(());
    }
    // Clear the screen and hide the cursor.
    write!(out, "\x1b[2J\x1b[?25l")?;

    driver.start();
    let result = animate(out, driver, ticks).await;
    driver.pause();

    let restored = write!(out, "\x1b[?25h").and_then(|()| out.flush());
    result?;
    restored?;
    Ok(())
}

async fn animate(
    out: &mut impl Write,
    driver: &mut SimulationDriver<TokioScheduler>,
    ticks: u64,
) -> Result<()> {
    draw_frame(out, driver)?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    while driver.sim().ticks() < ticks {
        tokio::select! {
            tick = driver.scheduler_mut().next_tick() => {
                let Some(tick) = tick else { break };
                if driver.on_tick(tick) {
                    draw_frame(out, driver)?;
                }
            }
            _ = &mut ctrl_c => {
                tracing::info!("interrupted");
                break;
            }
        }
    }
    Ok(())
}

fn draw_frame<S: TickScheduler>(out: &mut impl Write, driver: &SimulationDriver<S>) -> Result<()> {
    let sim = driver.sim();
    let p = sim.params();
    let mut frame = String::from("\x1b[H");
    frame.push_str(&ansi_frame(&sim.render()));
    let _ = writeln!(
        frame,
        "tick {:>5} | leak {:.2} | vent {:.2} | buoyancy {:.2} | diffusion {:.2}",
        sim.ticks(),
        p.leak_rate,
        p.vent_strength,
        p.buoyancy,
        p.diffusion
    );
    out.write_all(frame.as_bytes())?;
    out.flush()?;
    Ok(())
}

/// Render the colour field with truecolor half blocks: each text line shows
/// two grid rows, the upper one as foreground and the lower as background.
pub fn ansi_frame(colors: &ColorField) -> String {
    let mut frame = String::new();
    let mut row = 0;
    while row < colors.ny() {
        for col in 0..colors.nx() {
            let top = colors.color(row, col);
            let _ = write!(frame, "\x1b[38;2;{};{};{}m", top.r, top.g, top.b);
            if row + 1 < colors.ny() {
                let bottom = colors.color(row + 1, col);
                let _ = write!(frame, "\x1b[48;2;{};{};{}m", bottom.r, bottom.g, bottom.b);
            } else {
                frame.push_str("\x1b[49m");
            }
            frame.push('▀');
        }
        frame.push_str("\x1b[0m\n");
        row += 2;
    }
    frame
}

/// Mass summary of the field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldStats {
    pub total: f64,
    pub peak: f64,
    pub ceiling: f64,
    pub floor: f64,
}

pub fn field_stats(sim: &DispersionSimulator) -> FieldStats {
    let field = sim.field();
    let band = BAND_ROWS.min(field.ny());
    FieldStats {
        total: field.total(),
        peak: field.max_value(),
        ceiling: field.rows().take(band).flatten().sum(),
        floor: field.rows().skip(field.ny() - band).flatten().sum(),
    }
}

fn print_stats(sim: &DispersionSimulator) {
    let stats = field_stats(sim);
    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![Cell::new("Ticks"), Cell::new(sim.ticks())]);
    table.add_row(vec![Cell::new("Total mass"), Cell::new(format!("{:.3}", stats.total))]);
    table.add_row(vec![Cell::new("Peak concentration"), Cell::new(format!("{:.3}", stats.peak))]);
    table.add_row(vec![
        Cell::new(format!("Top {BAND_ROWS} rows")),
        Cell::new(format!("{:.3}", stats.ceiling)),
    ]);
    table.add_row(vec![
        Cell::new(format!("Bottom {BAND_ROWS} rows")),
        Cell::new(format!("{:.3}", stats.floor)),
    ]);
    println!("{table}");
}
