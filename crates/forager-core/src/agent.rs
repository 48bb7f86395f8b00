use crate::constants::{EAT_QUANTUM, EAT_THRESHOLD};
use crate::environment::Environment;
use rand::Rng;

/// A point forager on the grid.
///
/// `x` indexes grid columns and `y` grid rows. Agents never leave the grid:
/// movement wraps around each edge.
#[derive(Clone, Debug, PartialEq)]
pub struct Agent {
    pub id: u32,
    pub x: usize,
    pub y: usize,
    pub store: f64,
}

impl Agent {
    pub fn new(id: u32, x: usize, y: usize) -> Self {
        Self {
            id,
            x,
            y,
            store: 0.0,
        }
    }

    /// Take one diagonal step on a `width` x `height` torus.
    ///
    /// Each axis independently moves +1 or -1 with equal probability (y is
    /// drawn first). There is no option to stay put.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R, width: usize, height: usize) {
        self.y = wrap_step(self.y, rng.random_bool(0.5), height);
        self.x = wrap_step(self.x, rng.random_bool(0.5), width);
    }

    /// Move `EAT_QUANTUM` from the occupied cell into the store if the cell
    /// holds more than `EAT_THRESHOLD`. Returns the amount transferred.
    pub fn eat(&mut self, environment: &mut Environment) -> f64 {
        if environment.get(self.y, self.x) > EAT_THRESHOLD {
            environment.subtract(self.y, self.x, EAT_QUANTUM);
            self.store += EAT_QUANTUM;
            EAT_QUANTUM
        } else {
            0.0
        }
    }

    /// Planar Euclidean distance to `other`. Does not wrap around grid edges.
    pub fn distance_to(&self, other: &Agent) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

fn wrap_step(coord: usize, forward: bool, extent: usize) -> usize {
    if forward {
        (coord + 1) % extent
    } else {
        (coord + extent - 1) % extent
    }
}

/// Create `count` agents with ids `0..count`.
///
/// Agent `i` takes `coords[i]` (as `[x, y]`) when supplied; the rest are placed
/// uniformly at random inside the grid.
pub fn spawn_agents<R: Rng + ?Sized>(
    count: usize,
    coords: &[[usize; 2]],
    width: usize,
    height: usize,
    rng: &mut R,
) -> Vec<Agent> {
    (0..count)
        .map(|i| {
            let [x, y] = coords
                .get(i)
                .copied()
                .unwrap_or_else(|| [rng.random_range(0..width), rng.random_range(0..height)]);
            Agent::new(i as u32, x, y)
        })
        .collect()
}
