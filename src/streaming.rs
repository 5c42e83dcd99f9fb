use crate::config::{SideBoundary, WallBoundary};
use crate::lattice::{E, Lattice, OPP, Q};
use crate::objects::ObstacleMask;
use rayon::prelude::*;

// Where the population arriving in a cell along one direction comes from
enum Source {
    Cell(usize),
    // Reflected by a solid neighbour or a reflective wall
    Reflected,
    // Outside an open edge, the boundary handler owns the value
    Open,
}

fn wrap(v: isize, len: usize) -> usize {
    v.rem_euclid(len as isize) as usize
}

fn upstream(
    x: usize,
    y: usize,
    i: usize,
    mask: &ObstacleMask,
    sides: SideBoundary,
    walls: WallBoundary,
) -> Source {
    let nx = mask.nx();
    let ny = mask.ny();
    let sx = x as isize - E[i][0] as isize;
    let sy = y as isize - E[i][1] as isize;

    let sx = if sx < 0 || sx >= nx as isize {
        match sides {
            SideBoundary::Periodic => wrap(sx, nx),
            SideBoundary::InflowOutflow => return Source::Open,
        }
    } else {
        sx as usize
    };
    let sy = if sy < 0 || sy >= ny as isize {
        match walls {
            WallBoundary::Periodic => wrap(sy, ny),
            WallBoundary::Reflective => return Source::Reflected,
        }
    } else {
        sy as usize
    };

    let s = sy * nx + sx;
    if mask.is_solid_index(s) {
        Source::Reflected
    } else {
        Source::Cell(s)
    }
}

/// Move every population one cell along its direction, from `src` into `dst`.
///
/// `src` is only read and `dst` is only written, so no cell can see a value
/// streamed during the same pass. Populations headed into a solid cell (or a
/// reflective wall) come back to the cell they left, along the opposite
/// direction. Solid cells end up empty. Slots fed from outside an open edge
/// keep the source cell's own value and must be overwritten by the boundary
/// handler.
pub fn stream(
    src: &Lattice,
    dst: &mut Lattice,
    mask: &ObstacleMask,
    sides: SideBoundary,
    walls: WallBoundary,
) {
    let nx = src.nx();
    let f = src.populations();

    dst.populations_mut()
        .par_chunks_mut(Q)
        .enumerate()
        .for_each(|(idx, out)| {
            if mask.is_solid_index(idx) {
                out.fill(0.0);
                return;
            }
            let (x, y) = (idx % nx, idx / nx);
            let here = idx * Q;
            for (i, slot) in out.iter_mut().enumerate() {
                *slot = match upstream(x, y, i, mask, sides, walls) {
                    Source::Cell(s) => f[s * Q + i],
                    Source::Reflected => f[here + OPP[i]],
                    Source::Open => f[here + i],
                };
            }
        });
}
