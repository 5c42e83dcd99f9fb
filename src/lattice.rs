//! D2Q9 lattice: discrete velocities, weights, equilibrium and the flat
//! population buffer.
//!
//! ```text
//!   6   2   5
//!    \  |  /
//!   3 - 0 - 1
//!    /  |  \
//!   7   4   8
//! ```

use crate::error::{LbmError, Result};
use crate::objects::ObstacleMask;

/// Number of discrete velocities per cell.
pub const Q: usize = 9;

/// D2Q9 discrete velocities: [ex, ey]
pub const E: [[i32; 2]; Q] = [
    [0, 0],   // 0: rest
    [1, 0],   // 1: east
    [0, 1],   // 2: north
    [-1, 0],  // 3: west
    [0, -1],  // 4: south
    [1, 1],   // 5: northeast
    [-1, 1],  // 6: northwest
    [-1, -1], // 7: southwest
    [1, -1],  // 8: southeast
];

/// D2Q9 weights
pub const W: [f64; Q] = [
    4.0 / 9.0, // 0: rest
    1.0 / 9.0, // 1-4: axis
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 36.0, // 5-8: diagonal
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
];

/// Opposite direction of each index, used by bounce-back.
pub const OPP: [usize; Q] = [0, 3, 4, 1, 2, 7, 8, 5, 6];

/// Lattice sound speed: c_s = 1/sqrt(3)
pub const C_S: f64 = 0.577350269189626;

// Below this density a cell is treated as empty when deriving velocity
const RHO_EPS: f64 = 1e-12;

/// Equilibrium population f_i^eq for density `rho` and velocity `u`.
///
/// f_i^eq = w_i ρ [1 + 3(e_i·u) + 9/2(e_i·u)² - 3/2(u·u)]
#[inline]
pub fn equilibrium(i: usize, rho: f64, u: (f64, f64)) -> f64 {
    let eu = E[i][0] as f64 * u.0 + E[i][1] as f64 * u.1;
    let uu = u.0 * u.0 + u.1 * u.1;
    W[i] * rho * (1.0 + 3.0 * eu + 4.5 * eu * eu - 1.5 * uu)
}

/// All nine equilibrium populations of one cell.
#[inline]
pub fn equilibrium_cell(rho: f64, u: (f64, f64)) -> [f64; Q] {
    std::array::from_fn(|i| equilibrium(i, rho, u))
}

/// Density and velocity carried by one cell's populations.
#[inline]
pub fn moments(f: &[f64]) -> (f64, (f64, f64)) {
    let mut rho = 0.0;
    let mut mx = 0.0;
    let mut my = 0.0;
    for (i, &fi) in f.iter().enumerate().take(Q) {
        rho += fi;
        mx += fi * E[i][0] as f64;
        my += fi * E[i][1] as f64;
    }
    if rho < RHO_EPS {
        return (rho, (0.0, 0.0));
    }
    (rho, (mx / rho, my / rho))
}

/// Populations of an `nx` x `ny` grid, stored row-major with the nine
/// directions of a cell next to each other.
#[derive(Clone, Debug, PartialEq)]
pub struct Lattice {
    nx: usize,
    ny: usize,
    f: Vec<f64>,
}

impl Lattice {
    /// Zeroed lattice.
    pub fn new(nx: usize, ny: usize) -> Self {
        Self {
            nx,
            ny,
            f: vec![0.0; nx * ny * Q],
        }
    }

    /// Lattice with every cell at equilibrium for the given density and velocity.
    pub fn initialize(
        nx: usize,
        ny: usize,
        initial_density: f64,
        initial_velocity: (f64, f64),
    ) -> Self {
        let mut lattice = Self::new(nx, ny);
        let feq = equilibrium_cell(initial_density, initial_velocity);
        for cell in lattice.f.chunks_exact_mut(Q) {
            cell.copy_from_slice(&feq);
        }
        lattice
    }

    // Fluid cells get the equilibrium, solid cells are emptied
    pub fn seed(&mut self, mask: &ObstacleMask, rho: f64, u: (f64, f64)) {
        let feq = equilibrium_cell(rho, u);
        for (idx, cell) in self.f.chunks_exact_mut(Q).enumerate() {
            if mask.is_solid_index(idx) {
                cell.fill(0.0);
            } else {
                cell.copy_from_slice(&feq);
            }
        }
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    /// Position of population `i` of cell (x, y) in the flat buffer.
    #[inline]
    pub fn index(&self, x: usize, y: usize, i: usize) -> usize {
        (y * self.nx + x) * Q + i
    }

    #[inline]
    pub fn in_bounds(&self, x: usize, y: usize) -> bool {
        x < self.nx && y < self.ny
    }

    fn check_bounds(&self, x: usize, y: usize) -> Result<()> {
        if self.in_bounds(x, y) {
            Ok(())
        } else {
            Err(LbmError::Index {
                x,
                y,
                nx: self.nx,
                ny: self.ny,
            })
        }
    }

    /// Copy of the populations of cell (x, y).
    pub fn get_cell(&self, x: usize, y: usize) -> Result<[f64; Q]> {
        self.check_bounds(x, y)?;
        let mut out = [0.0; Q];
        out.copy_from_slice(self.cell(x, y));
        Ok(out)
    }

    /// Overwrite the populations of cell (x, y).
    pub fn set_cell(&mut self, x: usize, y: usize, f: [f64; Q]) -> Result<()> {
        self.check_bounds(x, y)?;
        self.cell_mut(x, y).copy_from_slice(&f);
        Ok(())
    }

    /// Populations of cell (x, y). Panics outside the grid.
    #[inline]
    pub fn cell(&self, x: usize, y: usize) -> &[f64] {
        let start = self.index(x, y, 0);
        &self.f[start..start + Q]
    }

    #[inline]
    pub fn cell_mut(&mut self, x: usize, y: usize) -> &mut [f64] {
        let start = self.index(x, y, 0);
        &mut self.f[start..start + Q]
    }

    pub fn populations(&self) -> &[f64] {
        &self.f
    }

    pub fn populations_mut(&mut self) -> &mut [f64] {
        &mut self.f
    }

    /// Sum of every population in the grid.
    pub fn total_density(&self) -> f64 {
        self.f.iter().sum()
    }
}
