// Default parameters of the wake demo. `SimConfig::default()` reads them.


// Window parameters
pub const CELL_PIXELS: usize = 4; // Size of a cell (in pixel) // IT MUST BE > 0 \\
pub const TARGET_FPS: usize = 60;
pub const STEPS_PER_FRAME: usize = 4; // Lattice ticks between two redraws



// Headless mode: run without a window and write a snapshot
pub const HEADLESS: bool = false;
pub const HEADLESS_STEPS: u64 = 2000;
pub const SNAPSHOT_PATH: &str = "vorticity.png";
pub const SNAPSHOT_PIXELS: u32 = 4;



// Grid parameters
pub const NX: usize = 200;
pub const NY: usize = 80;



// Fluid parameters
// Relaxation parameter, must stay in (0, 2). Near 2 is unstable, near 0 is very viscous.
pub const OMEGA: f64 = 1.7;
pub const INFLOW_DENSITY: f64 = 1.0;
pub const INFLOW_VELOCITY: (f64, f64) = (0.1, 0.0);



// Obstacle parameters
pub const OBSTACLE_COUNT: usize = 3;
pub const OBSTACLE_RADIUS_RANGE: (f64, f64) = (3.0, 8.0);
pub const SEED: u64 = 42;



// Stability
// A speed above DIVERGENCE_FACTOR * |inflow| (and above the sound speed) means the run blew up
pub const DIVERGENCE_FACTOR: f64 = 10.0;
