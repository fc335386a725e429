/// Periodic square lattice (2-D torus) of side `size`.
///
/// Sites are indexed by a flat `idx` with `i = idx % size` running fastest,
/// so `idx = i + j * size`. Neighbors are not stored; they are derived from
/// `size` on every lookup with `rem_euclid` on each axis independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquareTorus {
    /// Side length.
    pub size: usize,
    /// Total number of sites (`size * size`).
    pub n_spins: usize,
}

impl SquareTorus {
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "lattice size must be positive");
        Self {
            size,
            n_spins: size * size,
        }
    }

    /// Split a flat index into `(i, j)`. Panics if `idx` is out of range.
    #[inline]
    pub fn coords(&self, idx: usize) -> (usize, usize) {
        assert!(
            idx < self.n_spins,
            "site index {idx} out of range for {} spins",
            self.n_spins
        );
        (idx % self.size, idx / self.size)
    }

    /// Flat index of `(i, j)`. Panics if either coordinate is out of range.
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        assert!(
            i < self.size && j < self.size,
            "coordinates ({i}, {j}) out of range for size {}",
            self.size
        );
        i + j * self.size
    }

    /// Neighbor of `idx` along `axis` (0 moves `i`, 1 moves `j`).
    /// `forward = true` means +1, `forward = false` means −1, with wraparound.
    #[inline]
    pub fn neighbor(&self, idx: usize, axis: usize, forward: bool) -> usize {
        let (i, j) = self.coords(idx);
        let size = self.size as isize;
        let step = if forward { 1isize } else { -1isize };
        match axis {
            0 => ((i as isize + step).rem_euclid(size)) as usize + j * self.size,
            1 => i + ((j as isize + step).rem_euclid(size)) as usize * self.size,
            _ => panic!("axis {axis} out of range for a 2-D lattice"),
        }
    }

    /// The four neighbors of `idx`: `[left, right, down, up]`.
    #[inline]
    pub fn neighbors(&self, idx: usize) -> [usize; 4] {
        [
            self.neighbor(idx, 0, false),
            self.neighbor(idx, 0, true),
            self.neighbor(idx, 1, false),
            self.neighbor(idx, 1, true),
        ]
    }
}
