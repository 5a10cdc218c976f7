use crate::state::idx;

/// Field type for boundary condition dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// Zero-gradient on every wall (density, pressure, divergence).
    Scalar,
    /// Horizontal velocity: reflected at the left/right walls.
    Vx,
    /// Vertical velocity: reflected at the top/bottom walls.
    Vy,
}

/// Fill the halo ring of `x` from its interior.
///   - `FieldType::Scalar`: copy the adjacent interior cell
///   - `FieldType::Vx`: negate at left/right, copy at top/bottom
///   - `FieldType::Vy`: negate at top/bottom, copy at left/right
///
/// Corners take the average of their two edge neighbours. Reads only the
/// interior for the edges, so applying it twice equals applying it once.
pub fn set_bnd(field_type: FieldType, x: &mut [f64], n: usize) {
    let sx = if field_type == FieldType::Vx { -1.0 } else { 1.0 };
    let sy = if field_type == FieldType::Vy { -1.0 } else { 1.0 };

    for k in 1..=n {
        // Left/right walls
        x[idx(0, k, n)] = sx * x[idx(1, k, n)];
        x[idx(n + 1, k, n)] = sx * x[idx(n, k, n)];
        // Bottom/top walls
        x[idx(k, 0, n)] = sy * x[idx(k, 1, n)];
        x[idx(k, n + 1, n)] = sy * x[idx(k, n, n)];
    }

    x[idx(0, 0, n)] = 0.5 * (x[idx(1, 0, n)] + x[idx(0, 1, n)]);
    x[idx(0, n + 1, n)] = 0.5 * (x[idx(1, n + 1, n)] + x[idx(0, n, n)]);
    x[idx(n + 1, 0, n)] = 0.5 * (x[idx(n, 0, n)] + x[idx(n + 1, 1, n)]);
    x[idx(n + 1, n + 1, n)] = 0.5 * (x[idx(n, n + 1, n)] + x[idx(n + 1, n, n)]);
}
