use crate::boundary::{self, BoundarySpec};
use crate::collision::collide;
use crate::conditions::DIVERGENCE_FACTOR;
use crate::config::{SideBoundary, SimConfig};
use crate::diagnostics::MacroscopicFields;
use crate::error::{LbmError, Result};
use crate::lattice::{C_S, Lattice, Q};
use crate::objects::ObstacleMask;
use crate::streaming::stream;
use log::{info, trace, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Anything a host loop can advance one tick at a time.
pub trait Steppable {
    type Error;

    fn step(&mut self) -> std::result::Result<(), Self::Error>;

    /// Step `steps` times, stopping at the first error.
    fn run(&mut self, steps: u64) -> std::result::Result<(), Self::Error> {
        for _ in 0..steps {
            self.step()?;
        }
        Ok(())
    }
}

/// A D2Q9 simulation: lattice, ping-pong buffer, obstacle mask and the
/// fields derived after the last tick.
///
/// Each `step()` runs collision, streaming (with bounce-back), the boundary
/// handler and the diagnostics, strictly in that order.
#[derive(Clone, Debug)]
pub struct Simulation {
    config: SimConfig,
    boundary: BoundarySpec,
    lattice: Lattice,
    scratch: Lattice,
    mask: ObstacleMask,
    fields: MacroscopicFields,
    speed_limit: f64,
    tick: u64,
}

impl Simulation {
    /// Validate the config, build the obstacle mask and seed the lattice at
    /// equilibrium with the inflow state.
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;
        let (nx, ny) = (config.nx, config.ny);

        let mut mask = ObstacleMask::new(nx, ny);
        for circle in &config.obstacles {
            mask.circle(circle);
        }
        let mut rng = StdRng::seed_from_u64(config.seed);
        mask.place_circular_obstacles(
            config.obstacle_count,
            config.obstacle_radius_range,
            &mut rng,
        );
        if config.sides == SideBoundary::InflowOutflow {
            // The boundary handler owns the first and last columns
            mask.clear_column(0);
            mask.clear_column(nx - 1);
        }

        let mut lattice = Lattice::new(nx, ny);
        lattice.seed(&mask, config.inflow_density, config.inflow_velocity);
        let scratch = Lattice::new(nx, ny);
        let fields = MacroscopicFields::compute(&lattice, &mask);

        let (ux, uy) = config.inflow_velocity;
        let inflow_speed = (ux * ux + uy * uy).sqrt();
        // Never below the sound speed: a periodic run only seeds with the inflow state
        let speed_limit = (DIVERGENCE_FACTOR * inflow_speed).max(C_S);

        info!(
            "Lattice {}x{} ready: omega {}, inflow {:?}, {} solid cells",
            nx,
            ny,
            config.omega,
            config.inflow_velocity,
            mask.solid_count()
        );

        Ok(Self {
            boundary: BoundarySpec::from(&config),
            config,
            lattice,
            scratch,
            mask,
            fields,
            speed_limit,
            tick: 0,
        })
    }

    /// Advance one tick. Fails if the new state has diverged.
    pub fn step(&mut self) -> Result<()> {
        collide(&mut self.lattice, &self.mask, self.config.omega);
        let (sides, walls) = (self.config.sides, self.config.walls);
        stream(&self.lattice, &mut self.scratch, &self.mask, sides, walls);
        std::mem::swap(&mut self.lattice, &mut self.scratch);
        boundary::apply(&mut self.lattice, &self.mask, &self.boundary);
        self.fields = MacroscopicFields::compute(&self.lattice, &self.mask);
        self.tick += 1;
        trace!("tick {}", self.tick);
        self.check_divergence()
    }

    // First fluid cell with a non-physical density or a runaway speed
    fn check_divergence(&self) -> Result<()> {
        let density = self.fields.density();
        let velocity = self.fields.velocity();
        for idx in 0..density.len() {
            if self.mask.is_solid_index(idx) {
                continue;
            }
            let rho = density[idx];
            let (ux, uy) = velocity[idx];
            let speed = (ux * ux + uy * uy).sqrt();
            if !(rho.is_finite() && rho > 0.0) || !(speed <= self.speed_limit) {
                let (x, y) = (idx % self.config.nx, idx / self.config.nx);
                warn!(
                    "Divergence at tick {} in cell ({}, {}): density {}, speed {}",
                    self.tick, x, y, rho, speed
                );
                return Err(LbmError::NumericalDivergence {
                    tick: self.tick,
                    x,
                    y,
                    density: rho,
                    speed,
                });
            }
        }
        Ok(())
    }

    pub fn nx(&self) -> usize {
        self.config.nx
    }

    pub fn ny(&self) -> usize {
        self.config.ny
    }

    /// Number of completed ticks.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }

    pub fn mask(&self) -> &ObstacleMask {
        &self.mask
    }

    pub fn fields(&self) -> &MacroscopicFields {
        &self.fields
    }

    pub fn density_field(&self) -> &[f64] {
        self.fields.density()
    }

    pub fn velocity_field(&self) -> &[(f64, f64)] {
        self.fields.velocity()
    }

    pub fn vorticity_field(&self) -> &[f64] {
        self.fields.vorticity()
    }

    pub fn is_obstacle(&self, x: usize, y: usize) -> bool {
        self.mask.is_obstacle(x, y)
    }

    pub fn get_cell(&self, x: usize, y: usize) -> Result<[f64; Q]> {
        self.lattice.get_cell(x, y)
    }

    /// Overwrite one cell and refresh the fields. Solid cells stay empty
    /// whatever is written to them.
    pub fn set_cell(&mut self, x: usize, y: usize, f: [f64; Q]) -> Result<()> {
        let f = if self.mask.is_obstacle(x, y) { [0.0; Q] } else { f };
        self.lattice.set_cell(x, y, f)?;
        self.fields = MacroscopicFields::compute(&self.lattice, &self.mask);
        Ok(())
    }

    /// Sum of all populations.
    pub fn total_density(&self) -> f64 {
        self.lattice.total_density()
    }
}

impl Steppable for Simulation {
    type Error = LbmError;

    fn step(&mut self) -> Result<()> {
        Simulation::step(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WallBoundary;
    use crate::lattice::equilibrium_cell;
    use crate::objects::Circle;
    use approx::assert_relative_eq;

    fn channel() -> SimConfig {
        SimConfig {
            nx: 30,
            ny: 16,
            omega: 1.2,
            inflow_velocity: (0.05, 0.0),
            inflow_density: 1.0,
            obstacle_count: 0,
            obstacle_radius_range: (1.0, 2.0),
            seed: 3,
            obstacles: Vec::new(),
            sides: SideBoundary::InflowOutflow,
            walls: WallBoundary::Periodic,
        }
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = Simulation::new(SimConfig { omega: 2.0, ..channel() });
        assert!(matches!(result, Err(LbmError::Configuration(_))));
    }

    #[test]
    fn test_seeded_state() {
        let sim = Simulation::new(channel()).unwrap();
        assert_eq!(sim.tick(), 0);
        assert_eq!(sim.density_field().len(), 30 * 16);
        assert_relative_eq!(sim.total_density(), 30.0 * 16.0, max_relative = 1e-12);
        for &(ux, uy) in sim.velocity_field() {
            assert_relative_eq!(ux, 0.05, epsilon = 1e-14);
            assert_relative_eq!(uy, 0.0, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_edge_columns_stay_fluid() {
        let cfg = channel().with_obstacle(Circle::new(0.0, 8.0, 4.0));
        let sim = Simulation::new(cfg).unwrap();
        assert!((0..16).all(|y| !sim.is_obstacle(0, y)));
        assert!(sim.is_obstacle(1, 8));
    }

    #[test]
    fn test_step_counts_ticks() {
        let mut sim = Simulation::new(channel()).unwrap();
        sim.run(5).unwrap();
        assert_eq!(sim.tick(), 5);
    }

    #[test]
    fn test_nan_is_reported() {
        let mut sim = Simulation::new(channel()).unwrap();
        sim.set_cell(10, 8, [f64::NAN; Q]).unwrap();
        let err = sim.step().unwrap_err();
        assert!(matches!(err, LbmError::NumericalDivergence { tick: 1, .. }));
    }

    #[test]
    fn test_runaway_speed_is_reported() {
        let cfg = SimConfig { sides: SideBoundary::Periodic, ..channel() };
        let mut sim = Simulation::new(cfg).unwrap();
        // pushes neighbours well past the sound speed
        let mut f = equilibrium_cell(1.0, (0.0, 0.0));
        f[1] += 20.0;
        sim.set_cell(10, 8, f).unwrap();
        assert!(matches!(sim.step(), Err(LbmError::NumericalDivergence { .. })));
    }

    #[test]
    fn test_set_cell_out_of_range() {
        let mut sim = Simulation::new(channel()).unwrap();
        assert!(matches!(sim.set_cell(30, 0, [0.0; Q]), Err(LbmError::Index { .. })));
        assert!(matches!(sim.get_cell(0, 16), Err(LbmError::Index { .. })));
    }

    #[test]
    fn test_periodic_flow_faster_than_seed_is_valid() {
        let cfg = SimConfig {
            nx: 32,
            ny: 24,
            omega: 1.0,
            inflow_velocity: (0.001, 0.0),
            sides: SideBoundary::Periodic,
            ..channel()
        };
        let mut sim = Simulation::new(cfg).unwrap();
        // 30 times the seed speed, still far below the sound speed
        sim.set_cell(9, 10, equilibrium_cell(1.0, (0.03, 0.0))).unwrap();
        sim.run(20).unwrap();
        assert_eq!(sim.tick(), 20);
    }

    #[test]
    fn test_set_cell_keeps_solid_cells_empty() {
        let cfg = channel().with_obstacle(Circle::new(15.0, 8.0, 2.0));
        let mut sim = Simulation::new(cfg).unwrap();
        assert!(sim.is_obstacle(15, 8));
        let mass = sim.total_density();

        sim.set_cell(15, 8, equilibrium_cell(1.0, (0.05, 0.0))).unwrap();

        assert_eq!(sim.get_cell(15, 8).unwrap(), [0.0; Q]);
        assert_eq!(sim.total_density(), mass);
        assert_eq!(sim.density_field()[sim.fields().at(15, 8)], 0.0);
    }
}
