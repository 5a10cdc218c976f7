use serde::Deserialize;

use crate::error::{non_negative, positive, ConfigError, ConfigResult};
use crate::state::MAX_N;

/// Relaxation sweeps per diffusion/pressure solve. Empirically chosen; the
/// solver is never convergence-checked.
pub const RELAX_ITER: usize = 4;

/// Solver parameters for one tick. Updated only between ticks.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SolverParams {
    /// Velocity diffusion rate.
    pub visc: f64,
    /// Scalar diffusion rate.
    pub diff: f64,
    /// Physics timestep per tick.
    pub dt: f64,
    /// Vertical force per unit of scalar anomaly.
    pub buoyancy: f64,
    /// Baseline scalar value used for initial fill and reset.
    pub ambient: f64,
    pub diffuse_iter: usize,
    pub project_iter: usize,
    /// Injector stamp radius in cells, at most `MAX_N`.
    pub heat_radius: usize,
    pub heat_amplitude: f64,
    /// Multiplier applied to `heat_amplitude` for both heating and cooling strokes.
    pub heat_gain: f64,
    /// Top-edge decay strength, percent per tick (0..=100).
    pub cooling_rate: f64,
    pub cool_gain: f64,
    /// Randomize the decay factor by +/-10% per cell.
    pub cooling_jitter: bool,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            visc: 0.0001,
            diff: 0.0001,
            dt: 0.02,
            buoyancy: 1.0,
            ambient: 0.5,
            diffuse_iter: RELAX_ITER,
            project_iter: RELAX_ITER,
            heat_radius: 5,
            heat_amplitude: 0.5,
            heat_gain: 1.25,
            cooling_rate: 0.5,
            cool_gain: 1.0,
            cooling_jitter: true,
        }
    }
}

impl SolverParams {
    /// Check every field against the ranges the solver is built for.
    pub fn validate(&self) -> ConfigResult<()> {
        non_negative("visc", self.visc)?;
        non_negative("diff", self.diff)?;
        positive("dt", self.dt)?;
        non_negative("buoyancy", self.buoyancy)?;
        non_negative("ambient", self.ambient)?;
        non_negative("heat_amplitude", self.heat_amplitude)?;
        non_negative("heat_gain", self.heat_gain)?;
        non_negative("cool_gain", self.cool_gain)?;
        if self.diffuse_iter == 0 {
            return Err(ConfigError::ZeroCount { name: "diffuse_iter" });
        }
        if self.project_iter == 0 {
            return Err(ConfigError::ZeroCount { name: "project_iter" });
        }
        if self.heat_radius == 0 {
            return Err(ConfigError::ZeroRadius);
        }
        if self.heat_radius > MAX_N {
            return Err(ConfigError::RadiusTooLarge { radius: self.heat_radius, max: MAX_N });
        }
        if !(0.0..=100.0).contains(&self.cooling_rate) {
            return Err(ConfigError::CoolingRate(self.cooling_rate));
        }
        Ok(())
    }

    /// Parameters with every dissipative and stochastic term switched off.
    /// Useful as a baseline for deterministic checks.
    pub fn inviscid() -> Self {
        Self {
            visc: 0.0,
            diff: 0.0,
            cooling_rate: 0.0,
            cooling_jitter: false,
            ..Self::default()
        }
    }
}
