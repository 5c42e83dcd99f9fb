use crate::config::{SideBoundary, SimConfig};
use crate::lattice::{Lattice, Q, equilibrium_cell};
use crate::objects::ObstacleMask;

/// What the boundary handler enforces after streaming.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundarySpec {
    pub sides: SideBoundary,
    pub inflow_density: f64,
    pub inflow_velocity: (f64, f64),
}

impl From<&SimConfig> for BoundarySpec {
    fn from(config: &SimConfig) -> Self {
        Self {
            sides: config.sides,
            inflow_density: config.inflow_density,
            inflow_velocity: config.inflow_velocity,
        }
    }
}

// Inflow: column 0 is overwritten with the equilibrium of the configured state
pub fn apply_inflow(lattice: &mut Lattice, mask: &ObstacleMask, rho: f64, u: (f64, f64)) {
    let feq = equilibrium_cell(rho, u);
    for y in 0..lattice.ny() {
        if !mask.is_obstacle(0, y) {
            lattice.cell_mut(0, y).copy_from_slice(&feq);
        }
    }
}

// Outflow: zero gradient, the last column copies the one before it
pub fn apply_outflow(lattice: &mut Lattice, mask: &ObstacleMask) {
    let last = lattice.nx() - 1;
    for y in 0..lattice.ny() {
        if mask.is_obstacle(last, y) || mask.is_obstacle(last - 1, y) {
            continue;
        }
        let mut f = [0.0; Q];
        f.copy_from_slice(lattice.cell(last - 1, y));
        lattice.cell_mut(last, y).copy_from_slice(&f);
    }
}

/// Enforce the left/right edge conditions. Periodic edges need nothing here,
/// streaming already wrapped them. Top and bottom are handled by streaming too.
pub fn apply(lattice: &mut Lattice, mask: &ObstacleMask, spec: &BoundarySpec) {
    match spec.sides {
        SideBoundary::Periodic => {}
        SideBoundary::InflowOutflow => {
            apply_inflow(lattice, mask, spec.inflow_density, spec.inflow_velocity);
            apply_outflow(lattice, mask);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::moments;
    use approx::assert_relative_eq;

    fn spec() -> BoundarySpec {
        BoundarySpec {
            sides: SideBoundary::InflowOutflow,
            inflow_density: 1.0,
            inflow_velocity: (0.1, 0.0),
        }
    }

    #[test]
    fn test_inflow_overrides_column() {
        let mut lattice = Lattice::initialize(5, 4, 0.8, (-0.05, 0.03));
        let mask = ObstacleMask::new(5, 4);
        apply(&mut lattice, &mask, &spec());
        for y in 0..4 {
            let (rho, u) = moments(lattice.cell(0, y));
            assert_relative_eq!(rho, 1.0, epsilon = 1e-14);
            assert_relative_eq!(u.0, 0.1, epsilon = 1e-14);
            assert_relative_eq!(u.1, 0.0, epsilon = 1e-14);
        }
        // interior untouched
        let (rho, _) = moments(lattice.cell(2, 1));
        assert_relative_eq!(rho, 0.8, epsilon = 1e-14);
    }

    #[test]
    fn test_outflow_copies_previous_column() {
        let mut lattice = Lattice::new(4, 2);
        let f = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9];
        lattice.set_cell(2, 1, f).unwrap();
        let mask = ObstacleMask::new(4, 2);
        apply_outflow(&mut lattice, &mask);
        assert_eq!(lattice.get_cell(3, 1).unwrap(), f);
        assert_eq!(lattice.get_cell(3, 0).unwrap(), [0.0; Q]);
    }

    #[test]
    fn test_periodic_sides_untouched() {
        let mut lattice = Lattice::initialize(4, 3, 1.1, (0.02, 0.0));
        let before = lattice.clone();
        let mask = ObstacleMask::new(4, 3);
        let spec = BoundarySpec { sides: SideBoundary::Periodic, ..spec() };
        apply(&mut lattice, &mask, &spec);
        assert_eq!(lattice, before);
    }

    #[test]
    fn test_outflow_skips_solid_source() {
        let mut lattice = Lattice::initialize(4, 1, 1.0, (0.0, 0.0));
        let mut mask = ObstacleMask::new(4, 1);
        mask.set_solid(2, 0);
        lattice.set_cell(2, 0, [0.0; Q]).unwrap();
        apply_outflow(&mut lattice, &mask);
        let (rho, _) = moments(lattice.cell(3, 0));
        assert_relative_eq!(rho, 1.0, epsilon = 1e-14);
    }
}
