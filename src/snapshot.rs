use crate::visualization::vorticity_rgb;
use lbm_wake::{LbmError, Result, Simulation};
use plotters::prelude::*;

fn render_error<E: std::fmt::Display>(e: E) -> LbmError {
    LbmError::Render(e.to_string())
}

/// Write the vorticity field as a bitmap, `pixels` square pixels per cell.
pub fn save_vorticity(sim: &Simulation, path: &str, pixels: u32) -> Result<()> {
    let (nx, ny) = (sim.nx() as u32, sim.ny() as u32);
    let root = BitMapBackend::new(path, (nx * pixels, ny * pixels)).into_drawing_area();
    root.fill(&WHITE).map_err(render_error)?;

    let fields = sim.fields();
    let vorticity = fields.vorticity();
    let scale = fields.vorticity_max().max(1e-12);

    for y in 0..ny {
        for x in 0..nx {
            let color = if sim.is_obstacle(x as usize, y as usize) {
                BLACK
            } else {
                let (r, g, b) = vorticity_rgb(vorticity[fields.at(x as usize, y as usize)], scale);
                RGBColor(r, g, b)
            };
            let x0 = (x * pixels) as i32;
            let y0 = ((ny - 1 - y) * pixels) as i32;
            let side = pixels as i32;
            root.draw(&Rectangle::new([(x0, y0), (x0 + side, y0 + side)], color.filled()))
                .map_err(render_error)?;
        }
    }

    root.present().map_err(render_error)?;
    Ok(())
}
