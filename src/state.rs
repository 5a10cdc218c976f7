use crate::error::{ConfigError, ConfigResult};

/// Largest interior side length accepted by the grid.
pub const MAX_N: usize = 256;

/// Interior side lengths offered by the resolution selector.
pub const GRID_SIZES: [usize; 4] = [48, 64, 96, 128];

pub struct Xor128 {
    x: u32,
    y: u32,
    z: u32,
    w: u32,
}

impl Xor128 {
    pub fn new(seed: u32) -> Self {
        Self {
            x: seed,
            y: seed.wrapping_mul(1812433253).wrapping_add(1),
            z: seed.wrapping_mul(1812433253).wrapping_mul(2).wrapping_add(2),
            w: seed.wrapping_mul(1812433253).wrapping_mul(3).wrapping_add(3),
        }
    }

    pub fn next(&mut self) -> u32 {
        let t = self.x ^ (self.x << 11);
        self.x = self.y;
        self.y = self.z;
        self.z = self.w;
        self.w = self.w ^ (self.w >> 19) ^ (t ^ (t >> 8));
        self.w
    }

    /// Returns a float in [-1.0, 1.0]
    pub fn next_f64(&mut self) -> f64 {
        (self.next() as f64 / u32::MAX as f64) * 2.0 - 1.0
    }
}

/// Linear index of cell (i, j) on a grid with interior side `n` and a one-cell halo.
/// Valid for 0 <= i, j <= n + 1.
#[inline(always)]
pub const fn idx(i: usize, j: usize, n: usize) -> usize {
    i + j * (n + 2)
}

/// Reject interior sizes the solver cannot (or should not) allocate.
pub fn check_grid_size(n: usize) -> ConfigResult<()> {
    if n == 0 || n > MAX_N {
        return Err(ConfigError::GridSize { n, max: MAX_N });
    }
    Ok(())
}

/// Next larger entry of `GRID_SIZES`, or the largest one.
pub fn next_grid_size(n: usize) -> usize {
    GRID_SIZES
        .iter()
        .copied()
        .find(|&s| s > n)
        .unwrap_or(GRID_SIZES[GRID_SIZES.len() - 1])
}

/// Next smaller entry of `GRID_SIZES`, or the smallest one.
pub fn prev_grid_size(n: usize) -> usize {
    GRID_SIZES
        .iter()
        .rev()
        .copied()
        .find(|&s| s < n)
        .unwrap_or(GRID_SIZES[0])
}

/// Complete solver state for one simulation instance.
pub struct SimState {
    /// Interior side length.
    pub n: usize,
    pub u: Vec<f64>,
    pub v: Vec<f64>,
    pub u_prev: Vec<f64>,
    pub v_prev: Vec<f64>,
    pub dens: Vec<f64>,
    pub dens_prev: Vec<f64>,
    /// Snapshot of `u` before diffusion/advection. Holds pressure during projection.
    pub u0: Vec<f64>,
    /// Snapshot of `v` before diffusion/advection. Holds divergence during projection.
    pub v0: Vec<f64>,
    pub dens0: Vec<f64>,
    /// Interior average of `dens` measured at the start of the latest tick.
    pub avg_density: f64,
    /// Average from the tick before; the buoyancy baseline.
    pub prev_avg_density: f64,
    /// Ticks completed since construction, reset or resize.
    pub ticks: u64,
    /// Jitter source for the cooling model.
    pub rng: Xor128,
    seed: u32,
}

impl SimState {
    pub fn new(n: usize, ambient: f64, seed: u32) -> ConfigResult<Self> {
        check_grid_size(n)?;
        let size = (n + 2) * (n + 2);
        Ok(Self {
            n,
            u: vec![0.0; size],
            v: vec![0.0; size],
            u_prev: vec![0.0; size],
            v_prev: vec![0.0; size],
            dens: vec![ambient; size],
            dens_prev: vec![0.0; size],
            u0: vec![0.0; size],
            v0: vec![0.0; size],
            dens0: vec![ambient; size],
            avg_density: ambient,
            prev_avg_density: ambient,
            ticks: 0,
            rng: Xor128::new(seed),
            seed,
        })
    }

    /// Side length including the halo.
    pub fn size(&self) -> usize {
        self.n + 2
    }

    /// Reinitialize every field in place: scalar to ambient, velocity and
    /// sources to zero, statistics to ambient, jitter reseeded.
    pub fn reset(&mut self, ambient: f64) {
        for buf in [
            &mut self.u,
            &mut self.v,
            &mut self.u_prev,
            &mut self.v_prev,
            &mut self.dens_prev,
            &mut self.u0,
            &mut self.v0,
        ] {
            buf.fill(0.0);
        }
        self.dens.fill(ambient);
        self.dens0.fill(ambient);
        self.avg_density = ambient;
        self.prev_avg_density = ambient;
        self.ticks = 0;
        self.rng = Xor128::new(self.seed);
    }

    /// Allocating snapshot convenience method.
    pub fn snapshot(&self) -> FrameSnapshot {
        let mut snap = FrameSnapshot::new_empty(self.n);
        self.snapshot_into(&mut snap);
        snap
    }

    /// Copy the interior scalar field into a pre-allocated snapshot.
    /// The buffer is resized if the grid changed since it was allocated.
    pub fn snapshot_into(&self, dst: &mut FrameSnapshot) {
        let n = self.n;
        dst.density.resize(n * n, 0.0);
        for j in 1..=n {
            let row = idx(1, j, n);
            dst.density[(j - 1) * n..j * n].copy_from_slice(&self.dens[row..row + n]);
        }
        dst.n = n;
        dst.average_density = self.avg_density;
        dst.ticks = self.ticks;
    }
}

/// Interior scalar field handed to the renderer. Row-major, `density[0]` is
/// cell (1, 1); row index grows with j.
pub struct FrameSnapshot {
    pub n: usize,
    pub density: Vec<f64>,
    pub average_density: f64,
    pub ticks: u64,
}

impl FrameSnapshot {
    pub fn new_empty(n: usize) -> Self {
        Self {
            n,
            density: vec![0.0; n * n],
            average_density: 0.0,
            ticks: 0,
        }
    }

    /// Value of interior cell (i, j), both in 1..=n.
    pub fn at(&self, i: usize, j: usize) -> f64 {
        self.density[(j - 1) * self.n + (i - 1)]
    }
}
