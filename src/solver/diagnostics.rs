use crate::state::idx;

/// Sum of the scalar field over interior cells.
pub fn total_scalar(dens: &[f64], n: usize) -> f64 {
    let mut sum = 0.0;
    for j in 1..=n {
        for i in 1..=n {
            sum += dens[idx(i, j, n)];
        }
    }
    sum
}

/// Mean of the scalar field over interior cells.
pub fn interior_average(dens: &[f64], n: usize) -> f64 {
    total_scalar(dens, n) / (n * n) as f64
}

/// Compute volume-averaged kinetic energy: KE = 0.5 * <u² + v²>.
pub fn kinetic_energy(u: &[f64], v: &[f64], n: usize) -> f64 {
    let mut sum = 0.0;
    for j in 1..=n {
        for i in 1..=n {
            let ii = idx(i, j, n);
            sum += u[ii] * u[ii] + v[ii] * v[ii];
        }
    }
    0.5 * sum / (n * n) as f64
}

/// Largest |central-difference divergence| over interior cells, in grid units.
pub fn max_divergence(u: &[f64], v: &[f64], n: usize) -> f64 {
    let half_n = 0.5 * n as f64;
    let mut max: f64 = 0.0;
    for j in 1..=n {
        for i in 1..=n {
            let d = half_n
                * (u[idx(i + 1, j, n)] - u[idx(i - 1, j, n)] + v[idx(i, j + 1, n)] - v[idx(i, j - 1, n)]);
            max = max.max(d.abs());
        }
    }
    max
}
