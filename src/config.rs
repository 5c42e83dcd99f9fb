use crate::conditions::*;
use crate::error::{LbmError, Result};
use crate::lattice::C_S;
use crate::objects::Circle;

/// Left and right edges of the domain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SideBoundary {
    /// Fixed inflow at x = 0, zero-gradient outflow at x = nx - 1.
    #[default]
    InflowOutflow,
    /// x wraps around.
    Periodic,
}

/// Top and bottom edges of the domain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WallBoundary {
    /// y wraps around.
    #[default]
    Periodic,
    /// No-slip walls just outside the grid (bounce-back).
    Reflective,
}

/// Construction-time parameters of a simulation. Nothing here can change
/// once the simulation is built.
#[derive(Clone, Debug, PartialEq)]
pub struct SimConfig {
    pub nx: usize,
    pub ny: usize,
    pub omega: f64,
    pub inflow_velocity: (f64, f64),
    pub inflow_density: f64,
    pub obstacle_count: usize,
    pub obstacle_radius_range: (f64, f64),
    pub seed: u64,
    /// Circles placed before the random ones.
    pub obstacles: Vec<Circle>,
    pub sides: SideBoundary,
    pub walls: WallBoundary,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            nx: NX,
            ny: NY,
            omega: OMEGA,
            inflow_velocity: INFLOW_VELOCITY,
            inflow_density: INFLOW_DENSITY,
            obstacle_count: OBSTACLE_COUNT,
            obstacle_radius_range: OBSTACLE_RADIUS_RANGE,
            seed: SEED,
            obstacles: Vec::new(),
            sides: SideBoundary::default(),
            walls: WallBoundary::default(),
        }
    }
}

fn invalid(msg: impl Into<String>) -> LbmError {
    LbmError::Configuration(msg.into())
}

impl SimConfig {
    pub fn with_obstacle(mut self, circle: Circle) -> Self {
        self.obstacles.push(circle);
        self
    }

    pub fn with_sides(mut self, sides: SideBoundary) -> Self {
        self.sides = sides;
        self
    }

    pub fn with_walls(mut self, walls: WallBoundary) -> Self {
        self.walls = walls;
        self
    }

    /// Largest radius an obstacle may have on this grid (exclusive).
    pub fn max_obstacle_radius(&self) -> f64 {
        self.nx.min(self.ny) as f64 / 2.0
    }

    /// Check every parameter. A simulation is only built from a config that passes.
    pub fn validate(&self) -> Result<()> {
        if self.nx == 0 || self.ny == 0 {
            return Err(invalid(format!(
                "lattice dimensions must be positive, got {}x{}",
                self.nx, self.ny
            )));
        }
        if self.sides == SideBoundary::InflowOutflow && self.nx < 3 {
            return Err(invalid(format!(
                "inflow/outflow edges need at least 3 columns, got {}",
                self.nx
            )));
        }
        if !(self.omega > 0.0 && self.omega < 2.0) {
            return Err(invalid(format!("omega must lie in (0, 2), got {}", self.omega)));
        }

        let (ux, uy) = self.inflow_velocity;
        if !ux.is_finite() || !uy.is_finite() {
            return Err(invalid("inflow velocity must be finite"));
        }
        let speed = (ux * ux + uy * uy).sqrt();
        if speed >= C_S {
            return Err(invalid(format!(
                "inflow speed {} must stay below the lattice sound speed {:.4}",
                speed, C_S
            )));
        }
        if !(self.inflow_density.is_finite() && self.inflow_density > 0.0) {
            return Err(invalid(format!(
                "inflow density must be positive, got {}",
                self.inflow_density
            )));
        }

        let max_radius = self.max_obstacle_radius();
        if self.obstacle_count > 0 {
            let (min_r, max_r) = self.obstacle_radius_range;
            if !(min_r.is_finite() && max_r.is_finite() && min_r > 0.0 && min_r <= max_r) {
                return Err(invalid(format!(
                    "obstacle radius range must satisfy 0 < min <= max, got ({}, {})",
                    min_r, max_r
                )));
            }
            if max_r >= max_radius {
                return Err(invalid(format!(
                    "obstacle radius {} must be below half the smaller grid dimension ({})",
                    max_r, max_radius
                )));
            }
        }
        for c in &self.obstacles {
            if !(c.cx.is_finite() && c.cy.is_finite() && c.radius.is_finite()) {
                return Err(invalid("obstacle circle must have finite centre and radius"));
            }
            if c.radius <= 0.0 || c.radius >= max_radius {
                return Err(invalid(format!(
                    "obstacle radius {} must lie in (0, {})",
                    c.radius, max_radius
                )));
            }
        }

        Ok(())
    }
}
