use crate::input::{InjectMode, Interaction};
use crate::state::{idx, Xor128};
use super::params::SolverParams;

/// Rows below the top edge affected by the cooling model.
pub const COOLING_ROWS: usize = 3;

/// Gaussian stamp of heat (or cold) around the interaction cell, written into
/// the scalar source buffer. Cells outside the interior are skipped.
pub fn inject_heat(dens_prev: &mut [f64], interaction: &Interaction, params: &SolverParams, n: usize) {
    if !interaction.active {
        return;
    }
    let r = i64::try_from(params.heat_radius).unwrap_or(i64::MAX);
    let r_f = params.heat_radius as f64;
    let r2 = r_f * r_f;
    let two_r2 = 2.0 * r2;
    let sign = match interaction.mode {
        InjectMode::Heat => 1.0,
        InjectMode::Cool => -1.0,
    };
    let amp = sign * params.heat_gain * params.heat_amplitude;
    let (cx, cy) = (interaction.grid_x as i64, interaction.grid_y as i64);
    let hi = n as i64;

    // Offsets clipped to the interior so the loop never outgrows the grid
    for dj in (-r).max(1 - cy)..=r.min(hi - cy) {
        let jj = (cy + dj) as usize;
        for di in (-r).max(1 - cx)..=r.min(hi - cx) {
            let ii = (cx + di) as usize;
            let (fx, fy) = (di as f64, dj as f64);
            let d2 = fx * fx + fy * fy;
            if d2 > r2 {
                continue;
            }
            let w = (-d2 / two_r2).exp();
            dens_prev[idx(ii, jj, n)] += amp * w;
        }
    }
}

/// Buoyancy: vertical force proportional to each interior cell's deviation
/// from `baseline`, accumulated into `v_prev`. Returns the interior average
/// of `dens` so the caller can use it as the next tick's baseline.
pub fn apply_buoyancy(v_prev: &mut [f64], dens: &[f64], buoyancy: f64, baseline: f64, n: usize) -> f64 {
    let mut sum = 0.0;
    for j in 1..=n {
        for i in 1..=n {
            let ii = idx(i, j, n);
            sum += dens[ii];
            v_prev[ii] += buoyancy * (dens[ii] - baseline);
        }
    }
    sum / (n * n) as f64
}

/// Exponential decay in the rows nearest the top edge (j = N, N-1, N-2),
/// strongest at the edge. Values are clamped at zero.
pub fn apply_cooling(dens: &mut [f64], params: &SolverParams, rng: &mut Xor128, n: usize) {
    let base = params.cool_gain * params.cooling_rate / 100.0;
    for k in 0..COOLING_ROWS.min(n) {
        let j = n - k;
        let gradient = 1.0 / (k as f64 + 1.0);
        for i in 1..=n {
            let noise = if params.cooling_jitter { 1.0 + 0.1 * rng.next_f64() } else { 1.0 };
            let ii = idx(i, j, n);
            dens[ii] = (dens[ii] * (1.0 - base * gradient * noise)).max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const N: usize = 16;
    const SIZE: usize = (N + 2) * (N + 2);

    fn params() -> SolverParams {
        SolverParams { heat_gain: 1.0, heat_amplitude: 1.0, heat_radius: 2, ..SolverParams::default() }
    }

    #[test]
    fn test_inject_inactive_is_noop() {
        let mut src = vec![0.0; SIZE];
        let interaction = Interaction { active: false, ..Interaction::at(8, 8, InjectMode::Heat) };
        inject_heat(&mut src, &interaction, &params(), N);
        assert!(src.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_inject_gaussian_weights() {
        let mut src = vec![0.0; SIZE];
        inject_heat(&mut src, &Interaction::at(8, 8, InjectMode::Heat), &params(), N);
        assert!((src[idx(8, 8, N)] - 1.0).abs() < 1e-12, "centre weight should be 1");
        let w1 = (-1.0f64 / 8.0).exp();
        assert!((src[idx(9, 8, N)] - w1).abs() < 1e-12);
        let w4 = (-4.0f64 / 8.0).exp();
        assert!((src[idx(8, 10, N)] - w4).abs() < 1e-12);
        // (2, 2) offset lies outside the radius
        assert_eq!(src[idx(10, 10, N)], 0.0);
        assert_eq!(src[idx(11, 8, N)], 0.0);
    }

    #[test]
    fn test_inject_cool_subtracts() {
        let mut src = vec![0.0; SIZE];
        inject_heat(&mut src, &Interaction::at(8, 8, InjectMode::Cool), &params(), N);
        assert!((src[idx(8, 8, N)] + 1.0).abs() < 1e-12);
        assert!(src.iter().all(|&s| s <= 0.0));
    }

    #[test]
    fn test_inject_heat_gain_scales() {
        let mut src = vec![0.0; SIZE];
        let p = SolverParams { heat_gain: 1.25, heat_amplitude: 0.5, ..params() };
        inject_heat(&mut src, &Interaction::at(4, 4, InjectMode::Heat), &p, N);
        assert!((src[idx(4, 4, N)] - 0.625).abs() < 1e-12);
    }

    #[test]
    fn test_inject_clips_at_edges() {
        let mut src = vec![0.0; SIZE];
        inject_heat(&mut src, &Interaction::at(1, 1, InjectMode::Heat), &params(), N);
        // Halo cells never receive source
        for k in 0..N + 2 {
            assert_eq!(src[idx(0, k, N)], 0.0);
            assert_eq!(src[idx(k, 0, N)], 0.0);
        }
        assert!(src[idx(1, 1, N)] > 0.0);
    }

    #[test]
    fn test_inject_far_outside_is_noop() {
        let mut src = vec![0.0; SIZE];
        inject_heat(&mut src, &Interaction::at(-50, 400, InjectMode::Heat), &params(), N);
        assert!(src.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_inject_huge_radius_is_clipped_to_grid() {
        let mut src = vec![0.0; SIZE];
        let p = SolverParams { heat_radius: 3_100_000_000, ..params() };
        inject_heat(&mut src, &Interaction::at(8, 8, InjectMode::Heat), &p, N);
        for j in 0..N + 2 {
            for i in 0..N + 2 {
                let s = src[idx(i, j, N)];
                if (1..=N).contains(&i) && (1..=N).contains(&j) {
                    assert!((s - 1.0).abs() < 1e-9, "interior ({},{}) = {}", i, j, s);
                } else {
                    assert_eq!(s, 0.0, "halo ({},{}) touched", i, j);
                }
            }
        }
    }

    #[test]
    fn test_buoyancy_uses_given_baseline() {
        let mut v_prev = vec![0.0; SIZE];
        let mut dens = vec![0.5; SIZE];
        dens[idx(4, 4, N)] = 0.9;
        dens[idx(5, 5, N)] = 0.1;
        let avg = apply_buoyancy(&mut v_prev, &dens, 2.0, 0.5, N);
        assert!((v_prev[idx(4, 4, N)] - 0.8).abs() < 1e-12, "hot cell should rise");
        assert!((v_prev[idx(5, 5, N)] + 0.8).abs() < 1e-12, "cold cell should sink");
        assert_eq!(v_prev[idx(6, 6, N)], 0.0);
        assert!((avg - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_buoyancy_lagged_baseline_differs_from_average() {
        let mut v_prev = vec![0.0; SIZE];
        let dens = vec![0.7; SIZE];
        // Baseline from a previous tick, not the current mean
        let avg = apply_buoyancy(&mut v_prev, &dens, 1.0, 0.5, N);
        assert!((avg - 0.7).abs() < 1e-12);
        assert!((v_prev[idx(3, 3, N)] - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_cooling_decays_top_rows_only() {
        let mut dens = vec![0.5; SIZE];
        let p = SolverParams { cooling_rate: 50.0, cooling_jitter: false, ..SolverParams::default() };
        let mut rng = Xor128::new(1);
        apply_cooling(&mut dens, &p, &mut rng, N);
        assert!((dens[idx(3, N, N)] - 0.25).abs() < 1e-12, "edge row: factor 1 - 0.5");
        assert!((dens[idx(3, N - 1, N)] - 0.375).abs() < 1e-12, "second row: factor 1 - 0.25");
        assert!((dens[idx(3, N - 2, N)] - 0.5 * (1.0 - 0.5 / 3.0)).abs() < 1e-12);
        assert_eq!(dens[idx(3, N - 3, N)], 0.5, "fourth row untouched");
        assert_eq!(dens[idx(3, 1, N)], 0.5);
    }

    #[test]
    fn test_cooling_clamps_at_zero() {
        let mut dens = vec![0.5; SIZE];
        let p = SolverParams { cooling_rate: 100.0, cool_gain: 3.0, cooling_jitter: false, ..SolverParams::default() };
        let mut rng = Xor128::new(1);
        apply_cooling(&mut dens, &p, &mut rng, N);
        assert_eq!(dens[idx(5, N, N)], 0.0);
    }

    #[test]
    fn test_cooling_jitter_bounds() {
        let p = SolverParams { cooling_rate: 100.0, cooling_jitter: true, ..SolverParams::default() };
        let mut dens = vec![1.0; SIZE];
        let mut rng = Xor128::new(9);
        apply_cooling(&mut dens, &p, &mut rng, N);
        // Edge row factor is 1 - noise with noise in [0.9, 1.1], clamped at 0
        for i in 1..=N {
            let val = dens[idx(i, N, N)];
            assert!((0.0..=0.1 + 1e-12).contains(&val), "jittered edge value {} out of range", val);
        }
        // Third row factor is 1 - noise / 3
        for i in 1..=N {
            let val = dens[idx(i, N - 2, N)];
            assert!(val >= 1.0 - 1.1 / 3.0 - 1e-12 && val <= 1.0 - 0.9 / 3.0 + 1e-12);
        }
    }

    #[test]
    fn test_cooling_zero_rate_is_identity() {
        let mut dens = vec![0.6; SIZE];
        let p = SolverParams { cooling_rate: 0.0, ..SolverParams::default() };
        let mut rng = Xor128::new(3);
        apply_cooling(&mut dens, &p, &mut rng, N);
        assert!(dens.iter().all(|&d| d == 0.6));
    }

    #[test]
    fn test_cooling_small_grid() {
        let n = 2;
        let mut dens = vec![1.0; (n + 2) * (n + 2)];
        let p = SolverParams { cooling_rate: 50.0, cooling_jitter: false, ..SolverParams::default() };
        let mut rng = Xor128::new(3);
        apply_cooling(&mut dens, &p, &mut rng, n);
        assert!((dens[idx(1, 2, n)] - 0.5).abs() < 1e-12);
        assert!((dens[idx(1, 1, n)] - 0.75).abs() < 1e-12);
    }
}
