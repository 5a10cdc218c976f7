mod boundary;
mod core;
pub mod diagnostics;
mod params;
mod thermal;

// Re-export public API
pub use boundary::{set_bnd, FieldType};
pub use self::core::{add_source, advect, diffuse, lin_solve, project};
pub use params::{SolverParams, RELAX_ITER};
pub use thermal::{apply_buoyancy, apply_cooling, inject_heat, COOLING_ROWS};

use crate::input::Interaction;
use crate::state::SimState;

/// One full tick of buoyant convection.
///
/// Every stage runs unconditionally; with no interaction the injector simply
/// writes nothing. `u0`/`v0` double as pressure/divergence scratch inside
/// `project`, so each velocity snapshot is retaken right before it is read.
pub fn fluid_step(state: &mut SimState, params: &SolverParams, interaction: &Interaction) {
    let n = state.n;
    let dt = params.dt;

    // 1. Fresh source buffers
    state.u_prev.fill(0.0);
    state.v_prev.fill(0.0);
    state.dens_prev.fill(0.0);

    // 2. Heat/cool stamp
    inject_heat(&mut state.dens_prev, interaction, params, n);

    // 3. Buoyancy against the previous tick's average
    let baseline = state.avg_density;
    let avg = apply_buoyancy(&mut state.v_prev, &state.dens, params.buoyancy, baseline, n);
    state.prev_avg_density = baseline;
    state.avg_density = avg;

    // 4. Velocity sources
    add_source(&mut state.u, &state.u_prev, dt);
    add_source(&mut state.v, &state.v_prev, dt);

    // 5. Diffuse velocity
    state.u0.copy_from_slice(&state.u);
    state.v0.copy_from_slice(&state.v);
    diffuse(FieldType::Vx, &mut state.u, &state.u0, params.visc, dt, params.diffuse_iter, n);
    diffuse(FieldType::Vy, &mut state.v, &state.v0, params.visc, dt, params.diffuse_iter, n);

    // 6. Project
    project(&mut state.u, &mut state.v, &mut state.u0, &mut state.v0, params.project_iter, n);

    // 7. Self-advect velocity from its projected snapshot
    state.u0.copy_from_slice(&state.u);
    state.v0.copy_from_slice(&state.v);
    advect(FieldType::Vx, &mut state.u, &state.u0, &state.u0, &state.v0, dt, n);
    advect(FieldType::Vy, &mut state.v, &state.v0, &state.u0, &state.v0, dt, n);

    // 8. Project again
    project(&mut state.u, &mut state.v, &mut state.u0, &mut state.v0, params.project_iter, n);

    // 9. Scalar source, clamped to the nominal range
    add_source(&mut state.dens, &state.dens_prev, dt);
    for d in state.dens.iter_mut() {
        *d = d.clamp(0.0, 1.0);
    }

    // 10. Diffuse scalar
    state.dens0.copy_from_slice(&state.dens);
    diffuse(FieldType::Scalar, &mut state.dens, &state.dens0, params.diff, dt, params.diffuse_iter, n);

    // 11. Advect scalar with the divergence-free velocity
    state.dens0.copy_from_slice(&state.dens);
    advect(FieldType::Scalar, &mut state.dens, &state.dens0, &state.u, &state.v, dt, n);

    // 12. Top-edge cooling
    apply_cooling(&mut state.dens, params, &mut state.rng, n);

    // 13. Halo
    set_bnd(FieldType::Scalar, &mut state.dens, n);

    state.ticks += 1;
}
