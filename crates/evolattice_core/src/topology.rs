//! Neighbour lookup on a ring or a square torus.
//!
//! Sites are flat indices. On the torus, site `y * size + x` sits in row `y`
//! and column `x`; north decreases `y`. All arithmetic wraps around.

use rand::Rng;

/// Direction along the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction1D {
    West,
    East,
}

/// Von Neumann directions, clockwise from north.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction2D {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Direction2D {
    pub const ALL: [Direction2D; 4] = [
        Direction2D::North,
        Direction2D::East,
        Direction2D::South,
        Direction2D::West,
    ];
}

/// Site `distance` steps from `site` along a ring of `size` sites.
#[inline]
#[must_use]
pub fn neighbor_1d(site: usize, direction: Direction1D, distance: usize, size: usize) -> usize {
    let distance = distance % size;
    match direction {
        Direction1D::West => (site + size - distance) % size,
        Direction1D::East => (site + distance) % size,
    }
}

/// Unit step from `site` on a `size` x `size` torus.
#[inline]
#[must_use]
pub fn neighbor_2d(site: usize, direction: Direction2D, size: usize) -> usize {
    let x = site % size;
    let y = site / size;
    let (nx, ny) = match direction {
        Direction2D::North => (x, (y + size - 1) % size),
        Direction2D::East => ((x + 1) % size, y),
        Direction2D::South => (x, (y + 1) % size),
        Direction2D::West => ((x + size - 1) % size, y),
    };
    ny * size + nx
}

/// Lattice geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    /// `size` sites, each interacting with `range` sites on either side.
    Ring { size: usize, range: usize },
    /// `size * size` sites with four nearest neighbours.
    Torus { size: usize },
}

impl Topology {
    #[must_use]
    pub fn size(&self) -> usize {
        match *self {
            Topology::Ring { size, .. } | Topology::Torus { size } => size,
        }
    }

    #[must_use]
    pub fn site_count(&self) -> usize {
        match *self {
            Topology::Ring { size, .. } => size,
            Topology::Torus { size } => size * size,
        }
    }

    #[must_use]
    pub fn neighbor_count(&self) -> usize {
        match *self {
            Topology::Ring { range, .. } => 2 * range,
            Topology::Torus { .. } => 4,
        }
    }

    /// The `k`-th neighbour of `site`, `k < neighbor_count()`.
    ///
    /// On the torus `k` follows [`Direction2D::ALL`]. On the ring the first
    /// `range` entries are west at distance `1..=range`, the rest east.
    #[inline]
    #[must_use]
    pub fn neighbor(&self, site: usize, k: usize) -> usize {
        match *self {
            Topology::Ring { size, range } => {
                if k < range {
                    neighbor_1d(site, Direction1D::West, k + 1, size)
                } else {
                    neighbor_1d(site, Direction1D::East, k - range + 1, size)
                }
            }
            Topology::Torus { size } => neighbor_2d(site, Direction2D::ALL[k % 4], size),
        }
    }

    /// All neighbours of `site`, in the order used by [`Topology::neighbor`].
    pub fn neighbors(&self, site: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.neighbor_count()).map(move |k| self.neighbor(site, k))
    }

    /// A uniformly chosen neighbour of `site`.
    pub fn random_neighbor<R: Rng + ?Sized>(&self, site: usize, rng: &mut R) -> usize {
        self.neighbor(site, rng.gen_range(0..self.neighbor_count()))
    }

    /// A uniformly chosen site.
    pub fn random_site<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.gen_range(0..self.site_count())
    }
}
