//! D2Q9 Lattice Boltzmann solver for 2D flow past static obstacles.
//!
//! The lattice evolves nine particle populations per cell with a BGK
//! collision, double-buffered streaming with bounce-back on obstacles, and an
//! inflow/outflow boundary handler. Density, velocity and vorticity are
//! derived after every tick for whatever renders them.
//!
//! # Example
//!
//! ```
//! use lbm_wake::{Circle, SimConfig, Simulation};
//!
//! let config = SimConfig {
//!     nx: 50,
//!     ny: 30,
//!     obstacle_count: 0,
//!     ..SimConfig::default()
//! }
//! .with_obstacle(Circle::new(25.0, 15.0, 5.0));
//!
//! let mut sim = Simulation::new(config).unwrap();
//! for _ in 0..10 {
//!     sim.step().unwrap();
//! }
//! assert!(sim.is_obstacle(25, 15));
//! println!("max |w| = {:.4}", sim.fields().vorticity_max());
//! ```

pub mod boundary;
pub mod collision;
pub mod conditions;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod lattice;
pub mod objects;
pub mod simulation;
pub mod streaming;

pub use config::{SideBoundary, SimConfig, WallBoundary};
pub use diagnostics::MacroscopicFields;
pub use error::{LbmError, Result};
pub use lattice::{Lattice, Q};
pub use objects::{Circle, ObstacleMask};
pub use simulation::{Simulation, Steppable};
