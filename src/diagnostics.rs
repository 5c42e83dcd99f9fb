use crate::lattice::{Lattice, Q, moments};
use crate::objects::ObstacleMask;
use rayon::prelude::*;

/// Macroscopic fields derived from the populations: the only values the
/// solver hands to a renderer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MacroscopicFields {
    nx: usize,
    ny: usize,
    density: Vec<f64>,
    velocity: Vec<(f64, f64)>,
    vorticity: Vec<f64>,
}

impl MacroscopicFields {
    /// Density and velocity of every cell, then vorticity by central
    /// differences on interior cells (edges hold 0). Solid cells report no
    /// density and no velocity.
    pub fn compute(lattice: &Lattice, mask: &ObstacleMask) -> Self {
        let nx = lattice.nx();
        let ny = lattice.ny();

        let (density, velocity): (Vec<f64>, Vec<(f64, f64)>) = lattice
            .populations()
            .par_chunks(Q)
            .zip(mask.as_slice().par_iter())
            .map(|(cell, &solid)| if solid { (0.0, (0.0, 0.0)) } else { moments(cell) })
            .unzip();

        let vorticity: Vec<f64> = (0..nx * ny)
            .into_par_iter()
            .map(|idx| {
                let (x, y) = (idx % nx, idx / nx);
                if x == 0 || y == 0 || x + 1 >= nx || y + 1 >= ny {
                    return 0.0;
                }
                let duy_dx = (velocity[idx + 1].1 - velocity[idx - 1].1) * 0.5;
                let dux_dy = (velocity[idx + nx].0 - velocity[idx - nx].0) * 0.5;
                duy_dx - dux_dy
            })
            .collect();

        Self {
            nx,
            ny,
            density,
            velocity,
            vorticity,
        }
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn density(&self) -> &[f64] {
        &self.density
    }

    pub fn velocity(&self) -> &[(f64, f64)] {
        &self.velocity
    }

    pub fn vorticity(&self) -> &[f64] {
        &self.vorticity
    }

    #[inline]
    pub fn at(&self, x: usize, y: usize) -> usize {
        y * self.nx + x
    }

    pub fn total_density(&self) -> f64 {
        self.density.iter().sum()
    }

    /// Largest speed in the domain.
    pub fn speed_max(&self) -> f64 {
        self.velocity
            .iter()
            .map(|&(ux, uy)| (ux * ux + uy * uy).sqrt())
            .fold(0.0, f64::max)
    }

    /// Largest absolute vorticity in the domain.
    pub fn vorticity_max(&self) -> f64 {
        self.vorticity.iter().map(|w| w.abs()).fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::equilibrium_cell;
    use approx::assert_relative_eq;

    #[test]
    fn test_uniform_flow_has_no_vorticity() {
        let lattice = Lattice::initialize(6, 5, 1.0, (0.08, 0.01));
        let fields = MacroscopicFields::compute(&lattice, &ObstacleMask::new(6, 5));
        assert!(fields.vorticity().iter().all(|w| w.abs() < 1e-15));
        for &(ux, uy) in fields.velocity() {
            assert_relative_eq!(ux, 0.08, epsilon = 1e-14);
            assert_relative_eq!(uy, 0.01, epsilon = 1e-14);
        }
        assert_relative_eq!(fields.total_density(), 30.0, epsilon = 1e-12);
    }

    #[test]
    fn test_shear_vorticity() {
        // ux = 0.01 * y, so the curl is -0.01 on interior cells
        let (nx, ny) = (5, 6);
        let mut lattice = Lattice::new(nx, ny);
        for y in 0..ny {
            for x in 0..nx {
                lattice.set_cell(x, y, equilibrium_cell(1.0, (0.01 * y as f64, 0.0))).unwrap();
            }
        }
        let fields = MacroscopicFields::compute(&lattice, &ObstacleMask::new(nx, ny));
        assert_relative_eq!(fields.vorticity()[fields.at(2, 3)], -0.01, epsilon = 1e-12);
        assert_eq!(fields.vorticity()[fields.at(0, 3)], 0.0);
        assert_eq!(fields.vorticity()[fields.at(2, ny - 1)], 0.0);
    }

    #[test]
    fn test_solid_cells_report_nothing() {
        let mut mask = ObstacleMask::new(3, 3);
        mask.set_solid(1, 1);
        let lattice = Lattice::initialize(3, 3, 1.0, (0.05, 0.0));
        let fields = MacroscopicFields::compute(&lattice, &mask);
        assert_eq!(fields.density()[fields.at(1, 1)], 0.0);
        assert_eq!(fields.velocity()[fields.at(1, 1)], (0.0, 0.0));
        assert_relative_eq!(fields.speed_max(), 0.05, epsilon = 1e-14);
    }
}
