use crate::state::idx;
use super::boundary::{set_bnd, FieldType};

/// Gauss-Seidel relaxation, a fixed number of sweeps.
/// Solves: x[i,j] = (x0[i,j] + a * (neighbors)) / c
pub fn lin_solve(field_type: FieldType, x: &mut [f64], x0: &[f64], a: f64, c: f64, iter: usize, n: usize) {
    let c_inv = 1.0 / c;
    let stride = n + 2;
    for _ in 0..iter {
        for j in 1..=n {
            for i in 1..=n {
                let ii = idx(i, j, n);
                let neighbors = x[ii - 1] + x[ii + 1] + x[ii - stride] + x[ii + stride];
                x[ii] = (x0[ii] + a * neighbors) * c_inv;
            }
        }
        set_bnd(field_type, x, n);
    }
}

/// Implicit diffusion step: spreads the field over time.
/// a = dt * rate * N^2, c = 1 + 4a
pub fn diffuse(field_type: FieldType, x: &mut [f64], x0: &[f64], rate: f64, dt: f64, iter: usize, n: usize) {
    let n_f = n as f64;
    let a = dt * rate * n_f * n_f;
    x.copy_from_slice(x0);
    lin_solve(field_type, x, x0, a, 1.0 + 4.0 * a, iter, n);
}

/// Semi-Lagrangian advection: traces each cell centre backwards through the
/// velocity field and samples `d0` bilinearly at the origin.
pub fn advect(field_type: FieldType, d: &mut [f64], d0: &[f64], u: &[f64], v: &[f64], dt: f64, n: usize) {
    let dt0 = dt * n as f64;
    let hi = n as f64 + 0.5;

    for j in 1..=n {
        for i in 1..=n {
            let ii = idx(i, j, n);
            let x = (i as f64 - dt0 * u[ii]).clamp(0.5, hi);
            let y = (j as f64 - dt0 * v[ii]).clamp(0.5, hi);

            let i0 = x.floor() as usize;
            let j0 = y.floor() as usize;
            let s1 = x - i0 as f64;
            let s0 = 1.0 - s1;
            let t1 = y - j0 as f64;
            let t0 = 1.0 - t1;

            d[ii] = s0 * (t0 * d0[idx(i0, j0, n)] + t1 * d0[idx(i0, j0 + 1, n)])
                + s1 * (t0 * d0[idx(i0 + 1, j0, n)] + t1 * d0[idx(i0 + 1, j0 + 1, n)]);
        }
    }
    set_bnd(field_type, d, n);
}

/// Pressure projection: removes the divergent part of (u, v).
/// `p` and `div` are scratch; their previous contents are discarded.
pub fn project(u: &mut [f64], v: &mut [f64], p: &mut [f64], div: &mut [f64], iter: usize, n: usize) {
    let n_f = n as f64;
    let h = 1.0 / n_f;
    let stride = n + 2;

    for j in 1..=n {
        for i in 1..=n {
            let ii = idx(i, j, n);
            div[ii] = -0.5 * h * (u[ii + 1] - u[ii - 1] + v[ii + stride] - v[ii - stride]);
            p[ii] = 0.0;
        }
    }
    set_bnd(FieldType::Scalar, div, n);
    set_bnd(FieldType::Scalar, p, n);

    lin_solve(FieldType::Scalar, p, div, 1.0, 4.0, iter, n);

    let half_n = 0.5 * n_f;
    for j in 1..=n {
        for i in 1..=n {
            let ii = idx(i, j, n);
            u[ii] -= half_n * (p[ii + 1] - p[ii - 1]);
            v[ii] -= half_n * (p[ii + stride] - p[ii - stride]);
        }
    }
    set_bnd(FieldType::Vx, u, n);
    set_bnd(FieldType::Vy, v, n);
}

/// x += dt * s over the whole array, halo included.
pub fn add_source(x: &mut [f64], s: &[f64], dt: f64) {
    for (xi, si) in x.iter_mut().zip(s) {
        *xi += dt * si;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::diagnostics::max_divergence;

    const N: usize = 16;
    const SIZE: usize = (N + 2) * (N + 2);

    #[test]
    fn test_lin_solve_spreads_spike() {
        let mut x = vec![0.0; SIZE];
        let mut x0 = vec![0.0; SIZE];
        let mid = N / 2;
        x0[idx(mid, mid, N)] = 100.0;
        x.copy_from_slice(&x0);

        lin_solve(FieldType::Scalar, &mut x, &x0, 1.0, 5.0, 20, N);

        let center = x[idx(mid, mid, N)];
        let neighbor = x[idx(mid + 1, mid, N)];
        assert!(center > 0.0, "Center should still be positive");
        assert!(neighbor > 0.0, "Neighbors should get some value");
        assert!(center > neighbor, "Center should be larger than neighbor");
    }

    #[test]
    fn test_diffuse_smooths() {
        let mut x0 = vec![0.0; SIZE];
        let mut x = vec![0.0; SIZE];
        let mid = N / 2;
        x0[idx(mid, mid, N)] = 100.0;

        diffuse(FieldType::Scalar, &mut x, &x0, 0.01, 0.1, 4, N);

        let center = x[idx(mid, mid, N)];
        let neighbor = x[idx(mid + 1, mid, N)];
        assert!(center < 100.0, "Center should be less than the initial spike");
        assert!(neighbor > 0.0, "Neighbors should gain some value");
    }

    #[test]
    fn test_diffuse_zero_rate_is_identity() {
        let mut x0 = vec![0.0; SIZE];
        for (k, val) in x0.iter_mut().enumerate() {
            *val = (k % 7) as f64 * 0.1;
        }
        set_bnd(FieldType::Scalar, &mut x0, N);
        let mut x = vec![0.0; SIZE];
        diffuse(FieldType::Scalar, &mut x, &x0, 0.0, 0.02, 4, N);
        assert_eq!(x, x0);
    }

    #[test]
    fn test_diffuse_stays_within_bounds() {
        let mut x0 = vec![0.2; SIZE];
        for j in 5..9 {
            for i in 5..9 {
                x0[idx(i, j, N)] = 0.9;
            }
        }
        let mut x = vec![0.0; SIZE];
        diffuse(FieldType::Scalar, &mut x, &x0, 0.5, 0.1, 4, N);
        for j in 1..=N {
            for i in 1..=N {
                let val = x[idx(i, j, N)];
                assert!(val >= 0.2 - 1e-12 && val <= 0.9 + 1e-12, "value {} out of range at ({},{})", val, i, j);
            }
        }
    }

    #[test]
    fn test_advect_zero_velocity_preserves() {
        let mut d0 = vec![0.0; SIZE];
        let mut d = vec![0.0; SIZE];
        let u = vec![0.0; SIZE];
        let v = vec![0.0; SIZE];

        for j in 1..=N {
            for i in 1..=N {
                d0[idx(i, j, N)] = i as f64 / N as f64;
            }
        }

        advect(FieldType::Scalar, &mut d, &d0, &u, &v, 0.02, N);

        for j in 1..=N {
            for i in 1..=N {
                let orig = d0[idx(i, j, N)];
                let advected = d[idx(i, j, N)];
                assert!(
                    (orig - advected).abs() < 1e-12,
                    "Zero velocity should preserve field at ({}, {}): {} vs {}",
                    i, j, orig, advected
                );
            }
        }
    }

    #[test]
    fn test_advect_uniform_field_unchanged() {
        let d0 = vec![5.0; SIZE];
        let mut d = vec![0.0; SIZE];
        let u = vec![0.3; SIZE];
        let v = vec![-0.2; SIZE];

        advect(FieldType::Scalar, &mut d, &d0, &u, &v, 0.02, N);

        for j in 1..=N {
            for i in 1..=N {
                let val = d[idx(i, j, N)];
                assert!((val - 5.0).abs() < 1e-9, "Uniform field should stay uniform: got {} at ({}, {})", val, i, j);
            }
        }
    }

    #[test]
    fn test_advect_shifts_by_whole_cell() {
        // dt * N * u = 1 cell: each cell takes its left neighbour's value
        let dt = 0.05;
        let speed = 1.0 / (dt * N as f64);
        let mut d0 = vec![0.0; SIZE];
        for j in 1..=N {
            for i in 1..=N {
                d0[idx(i, j, N)] = i as f64;
            }
        }
        let u = vec![speed; SIZE];
        let v = vec![0.0; SIZE];
        let mut d = vec![0.0; SIZE];

        advect(FieldType::Scalar, &mut d, &d0, &u, &v, dt, N);

        for i in 2..=N {
            let got = d[idx(i, N / 2, N)];
            assert!((got - (i - 1) as f64).abs() < 1e-9, "cell {} should read {}, got {}", i, i - 1, got);
        }
    }

    #[test]
    fn test_advect_clamps_backtrace() {
        let d0 = vec![1.0; SIZE];
        let mut d = vec![0.0; SIZE];
        // Backtrace far outside the domain on both axes
        let u = vec![100.0; SIZE];
        let v = vec![-100.0; SIZE];

        advect(FieldType::Scalar, &mut d, &d0, &u, &v, 0.1, N);

        for j in 1..=N {
            for i in 1..=N {
                let val = d[idx(i, j, N)];
                assert!((val - 1.0).abs() < 1e-12, "clamped sample should stay in range at ({},{}): {}", i, j, val);
            }
        }
    }

    #[test]
    fn test_project_reduces_divergence() {
        let mut u = vec![0.0; SIZE];
        let mut v = vec![0.0; SIZE];
        let mut p = vec![0.0; SIZE];
        let mut div = vec![0.0; SIZE];

        let c = (N / 2) as f64;
        for j in 1..=N {
            for i in 1..=N {
                let dx = i as f64 - c;
                let dy = j as f64 - c;
                let g = (-(dx * dx + dy * dy) / 16.0).exp();
                u[idx(i, j, N)] = dx * 0.01 * g;
                v[idx(i, j, N)] = dy * 0.01 * g;
            }
        }
        set_bnd(FieldType::Vx, &mut u, N);
        set_bnd(FieldType::Vy, &mut v, N);

        let div_before = max_divergence(&u, &v, N);
        assert!(div_before > 0.0, "Should have some initial divergence");

        project(&mut u, &mut v, &mut p, &mut div, 40, N);

        let div_after = max_divergence(&u, &v, N);
        assert!(
            div_after < div_before,
            "Divergence should be reduced: before={}, after={}",
            div_before, div_after
        );
    }

    #[test]
    fn test_project_zero_velocity_stays_zero() {
        let mut u = vec![0.0; SIZE];
        let mut v = vec![0.0; SIZE];
        let mut p = vec![7.0; SIZE];
        let mut div = vec![7.0; SIZE];
        project(&mut u, &mut v, &mut p, &mut div, 4, N);
        assert!(u.iter().chain(v.iter()).all(|&x| x == 0.0));
        assert!(p.iter().all(|&x| x == 0.0), "pressure scratch should be cleared");
    }

    #[test]
    fn test_add_source_scales_by_dt() {
        let mut x = vec![1.0; 4];
        let s = vec![0.0, 1.0, -2.0, 10.0];
        add_source(&mut x, &s, 0.5);
        assert_eq!(x, vec![1.0, 1.5, 0.0, 6.0]);
    }
}
