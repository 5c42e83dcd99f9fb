use crate::lattice::{Lattice, Q, equilibrium, moments};
use crate::objects::ObstacleMask;
use rayon::prelude::*;

/// BGK collision: relax every fluid cell toward its local equilibrium.
///
/// Density and velocity are recomputed from the current populations of the
/// cell, then `f_i += omega * (f_i^eq - f_i)`. Solid cells are left untouched.
/// The update only reads the cell it writes, so cells run in parallel.
pub fn collide(lattice: &mut Lattice, mask: &ObstacleMask, omega: f64) {
    lattice
        .populations_mut()
        .par_chunks_mut(Q)
        .zip(mask.as_slice().par_iter())
        .for_each(|(cell, &solid)| {
            if solid {
                return;
            }
            let (rho, u) = moments(cell);
            for (i, f) in cell.iter_mut().enumerate() {
                *f += omega * (equilibrium(i, rho, u) - *f);
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::equilibrium_cell;
    use approx::assert_relative_eq;

    #[test]
    fn test_equilibrium_is_fixed_point() {
        let mut lattice = Lattice::new(4, 3);
        let mask = ObstacleMask::new(4, 3);
        for y in 0..3 {
            for x in 0..4 {
                let rho = 1.0 + 0.01 * (x + y) as f64;
                let u = (0.02 * x as f64, -0.01 * y as f64);
                lattice.set_cell(x, y, equilibrium_cell(rho, u)).unwrap();
            }
        }
        let before = lattice.clone();
        collide(&mut lattice, &mask, 1.7);
        for (a, b) in before.populations().iter().zip(lattice.populations()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_omega_one_reaches_equilibrium() {
        let mut lattice = Lattice::new(1, 1);
        let mask = ObstacleMask::new(1, 1);
        let f = [0.4, 0.15, 0.1, 0.05, 0.1, 0.04, 0.02, 0.01, 0.03];
        lattice.set_cell(0, 0, f).unwrap();
        let (rho, u) = moments(&f);
        collide(&mut lattice, &mask, 1.0);
        let feq = equilibrium_cell(rho, u);
        for (a, b) in lattice.cell(0, 0).iter().zip(feq.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_collision_conserves_mass_and_momentum() {
        let mut lattice = Lattice::new(1, 1);
        let mask = ObstacleMask::new(1, 1);
        let f = [0.3, 0.2, 0.1, 0.05, 0.12, 0.06, 0.01, 0.02, 0.04];
        lattice.set_cell(0, 0, f).unwrap();
        let (rho0, u0) = moments(&f);
        collide(&mut lattice, &mask, 1.4);
        let (rho1, u1) = moments(lattice.cell(0, 0));
        assert_relative_eq!(rho0, rho1, epsilon = 1e-14);
        assert_relative_eq!(u0.0, u1.0, epsilon = 1e-14);
        assert_relative_eq!(u0.1, u1.1, epsilon = 1e-14);
    }

    #[test]
    fn test_solid_cells_are_skipped() {
        let mut lattice = Lattice::new(2, 1);
        let mut mask = ObstacleMask::new(2, 1);
        mask.set_solid(1, 0);
        let f = [0.3, 0.2, 0.1, 0.05, 0.12, 0.06, 0.01, 0.02, 0.04];
        lattice.set_cell(1, 0, f).unwrap();
        collide(&mut lattice, &mask, 1.0);
        assert_eq!(lattice.get_cell(1, 0).unwrap(), f);
    }
}
