use crate::snapshot::save_vorticity;
use lbm_wake::conditions::*;
use lbm_wake::{LbmError, Result, Simulation};
use log::info;
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use std::time::Instant;

const OBSTACLE_COLOR: u32 = 0x202020;

// Diverging map: blue for clockwise, white at rest, red for counter-clockwise
pub fn vorticity_rgb(w: f64, scale: f64) -> (u8, u8, u8) {
    let t = (w / scale).clamp(-1.0, 1.0);
    let fade = (255.0 * (1.0 - t.abs())) as u8;
    if t >= 0.0 { (255, fade, fade) } else { (fade, fade, 255) }
}

fn pack(rgb: (u8, u8, u8)) -> u32 {
    ((rgb.0 as u32) << 16) | ((rgb.1 as u32) << 8) | rgb.2 as u32
}

// Fill the pixel buffer, one CELL_PIXELS square per cell, y pointing up
fn draw(sim: &Simulation, buffer: &mut [u32], width: usize) {
    let (nx, ny) = (sim.nx(), sim.ny());
    let fields = sim.fields();
    let vorticity = fields.vorticity();
    let scale = fields.vorticity_max().max(1e-12);

    for y in 0..ny {
        for x in 0..nx {
            let color = if sim.is_obstacle(x, y) {
                OBSTACLE_COLOR
            } else {
                pack(vorticity_rgb(vorticity[fields.at(x, y)], scale))
            };

            let px = x * CELL_PIXELS;
            let py = (ny - 1 - y) * CELL_PIXELS;
            for dy in 0..CELL_PIXELS {
                let row = (py + dy) * width;
                buffer[row + px..row + px + CELL_PIXELS].fill(color);
            }
        }
    }
}

// Open a window and step the simulation once per frame until it is closed.
// S writes a snapshot of the current vorticity.
pub fn run_simulation(sim: &mut Simulation) -> Result<()> {
    let width = sim.nx() * CELL_PIXELS;
    let height = sim.ny() * CELL_PIXELS;
    let mut buffer: Vec<u32> = vec![0; width * height];

    let mut window = Window::new(
        "Lattice Boltzmann wake",
        width,
        height,
        WindowOptions::default(),
    )
    .map_err(|e| LbmError::Render(e.to_string()))?;
    window.set_target_fps(TARGET_FPS);

    let start = Instant::now();
    let mut frames: u64 = 0;

    while window.is_open() && !window.is_key_down(Key::Escape) {
        for _ in 0..STEPS_PER_FRAME {
            sim.step()?;
        }

        draw(sim, &mut buffer, width);
        window
            .update_with_buffer(&buffer, width, height)
            .map_err(|e| LbmError::Render(e.to_string()))?;

        if window.is_key_pressed(Key::S, KeyRepeat::No) {
            save_vorticity(sim, SNAPSHOT_PATH, SNAPSHOT_PIXELS)?;
            info!("Snapshot written to {} at tick {}", SNAPSHOT_PATH, sim.tick());
        }

        frames += 1;
        if frames == 100 {
            info!("100 frames in {:?}", start.elapsed());
        }
    }

    Ok(())
}
