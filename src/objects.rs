use crate::error::{LbmError, Result};
use log::debug;
use rand::Rng;

/*
    Obstacle mask of the lattice

    Solid cells never collide nor stream. They only reflect the populations of
    their fluid neighbours (bounce-back). The mask is built once, before the
    lattice is seeded, and is read-only afterwards.

    Random placement draws from an RNG handed in by the caller, so the same
    seed always gives the same mask.
*/


/// A circular obstacle in lattice units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
}

impl Circle {
    pub fn new(cx: f64, cy: f64, radius: f64) -> Self {
        Self { cx, cy, radius }
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        let dx = x as f64 - self.cx;
        let dy = y as f64 - self.cy;
        dx * dx + dy * dy <= self.radius * self.radius
    }
}


#[derive(Clone, Debug, PartialEq)]
pub struct ObstacleMask {
    nx: usize,
    ny: usize,
    solid: Vec<bool>,
}

impl ObstacleMask {
    /// All-fluid mask.
    pub fn new(nx: usize, ny: usize) -> Self {
        Self {
            nx,
            ny,
            solid: vec![false; nx * ny],
        }
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    #[inline]
    fn to_index(&self, x: usize, y: usize) -> usize {
        y * self.nx + x
    }

    /// Solid flag of a cell given its row-major index.
    #[inline]
    pub fn is_solid_index(&self, idx: usize) -> bool {
        self.solid[idx]
    }

    /// True if (x, y) is a solid cell. Cells outside the grid are not solid.
    #[inline]
    pub fn is_obstacle(&self, x: usize, y: usize) -> bool {
        x < self.nx && y < self.ny && self.solid[self.to_index(x, y)]
    }

    /// Bounds-checked version of `is_obstacle`.
    pub fn get(&self, x: usize, y: usize) -> Result<bool> {
        if x < self.nx && y < self.ny {
            Ok(self.solid[self.to_index(x, y)])
        } else {
            Err(LbmError::Index {
                x,
                y,
                nx: self.nx,
                ny: self.ny,
            })
        }
    }

    pub fn set_solid(&mut self, x: usize, y: usize) {
        if x < self.nx && y < self.ny {
            let idx = self.to_index(x, y);
            self.solid[idx] = true;
        }
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.solid
    }

    pub fn solid_count(&self) -> usize {
        self.solid.iter().filter(|&&s| s).count()
    }

    /// Mark every cell inside the circle as solid.
    pub fn circle(&mut self, circle: &Circle) {
        // Only scan the bounding box of the circle
        let x0 = (circle.cx - circle.radius).floor().max(0.0) as usize;
        let x1 = (circle.cx + circle.radius).ceil().max(0.0) as usize;
        let x1 = x1.min(self.nx.saturating_sub(1));
        let y0 = (circle.cy - circle.radius).floor().max(0.0) as usize;
        let y1 = (circle.cy + circle.radius).ceil().max(0.0) as usize;
        let y1 = y1.min(self.ny.saturating_sub(1));

        for y in y0..=y1 {
            for x in x0..=x1 {
                if circle.contains(x, y) {
                    self.set_solid(x, y);
                }
            }
        }
    }

    /// Place `count` circles with random centres and radii drawn from `radius_range`.
    /// Each circle is kept inside the grid when it fits. Returns the placed circles.
    pub fn place_circular_obstacles<R: Rng>(
        &mut self,
        count: usize,
        radius_range: (f64, f64),
        rng: &mut R,
    ) -> Vec<Circle> {
        let (min_radius, max_radius) = radius_range;
        let mut placed = Vec::with_capacity(count);

        for _ in 0..count {
            let radius = rng.random_range(min_radius..=max_radius);
            let cx = random_center(rng, radius, self.nx);
            let cy = random_center(rng, radius, self.ny);
            let circle = Circle::new(cx, cy, radius);
            self.circle(&circle);
            debug!("Placed obstacle at ({:.2}, {:.2}) with radius {:.2}", cx, cy, radius);
            placed.push(circle);
        }

        placed
    }

    /// Turn every cell of column `x` back into fluid.
    pub fn clear_column(&mut self, x: usize) {
        if x >= self.nx {
            return;
        }
        for y in 0..self.ny {
            let idx = self.to_index(x, y);
            self.solid[idx] = false;
        }
    }
}

// Centre coordinate along an axis of `len` cells so that the circle stays inside
fn random_center<R: Rng>(rng: &mut R, radius: f64, len: usize) -> f64 {
    let lo = radius;
    let hi = len as f64 - 1.0 - radius;
    if lo <= hi {
        rng.random_range(lo..=hi)
    } else {
        (len as f64 - 1.0) / 2.0
    }
}
