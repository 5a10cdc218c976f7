use crate::solver::SolverParams;

/// Number of adjustable parameters.
pub const PARAM_COUNT: usize = 4;

/// The values a user can tune while the simulation runs.
#[derive(Debug, Clone, PartialEq)]
pub struct Tunables {
    pub params: SolverParams,
    pub time_scale: f64,
}

/// Which parameter the arrow keys act on.
pub struct ControlState {
    pub selected: usize,
}

impl ControlState {
    pub fn new() -> Self {
        Self { selected: 0 }
    }

    pub fn navigate(&mut self, delta: isize) {
        let count = PARAM_COUNT as isize;
        self.selected = ((self.selected as isize + delta).rem_euclid(count)) as usize;
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new()
    }
}

/// Definition of an adjustable parameter.
pub struct ParamDef {
    pub name: &'static str,
    pub desc: &'static str,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub fine_step: f64,
    pub default: f64,
    pub get: fn(&Tunables) -> f64,
    pub set: fn(&mut Tunables, f64),
}

pub const PARAM_DEFS: [ParamDef; PARAM_COUNT] = [
    ParamDef {
        name: "speed",
        desc: "simulated seconds per second",
        min: 0.0,
        max: 10.0,
        step: 0.5,
        fine_step: 0.1,
        default: 2.5,
        get: |t| t.time_scale,
        set: |t, v| t.time_scale = v,
    },
    ParamDef {
        name: "radius",
        desc: "heat brush radius in cells",
        min: 1.0,
        max: 20.0,
        step: 1.0,
        fine_step: 1.0,
        default: 5.0,
        get: |t| t.params.heat_radius as f64,
        set: |t, v| t.params.heat_radius = v.round() as usize,
    },
    ParamDef {
        name: "amplitude",
        desc: "heat brush strength",
        min: 0.0,
        max: 2.0,
        step: 0.1,
        fine_step: 0.01,
        default: 0.5,
        get: |t| t.params.heat_amplitude,
        set: |t, v| t.params.heat_amplitude = v,
    },
    ParamDef {
        name: "cooling",
        desc: "top-edge decay, percent per tick",
        min: 0.0,
        max: 100.0,
        step: 1.0,
        fine_step: 0.1,
        default: 0.5,
        get: |t| t.params.cooling_rate,
        set: |t, v| t.params.cooling_rate = v,
    },
];

/// Adjust a parameter by delta steps (positive = increase, negative = decrease).
/// If `fine` is true, use fine_step instead of step.
/// Returns true if the value actually changed.
pub fn adjust_param(tunables: &mut Tunables, selected: usize, delta: i32, fine: bool) -> bool {
    let def = &PARAM_DEFS[selected];
    let old = (def.get)(tunables);
    let step = if fine { def.fine_step } else { def.step };
    let new_val = (old + delta as f64 * step).clamp(def.min, def.max);
    (def.set)(tunables, new_val);
    ((def.get)(tunables) - old).abs() > f64::EPSILON
}

/// Reset a parameter to its default value.
pub fn reset_param(tunables: &mut Tunables, selected: usize) {
    let def = &PARAM_DEFS[selected];
    (def.set)(tunables, def.default);
}

/// Short "name=value" label for the selected parameter.
pub fn status_label(tunables: &Tunables, selected: usize) -> String {
    let def = &PARAM_DEFS[selected];
    let value = (def.get)(tunables);
    if def.step >= 1.0 && def.fine_step >= 1.0 {
        format!("{}={}", def.name, value as i64)
    } else {
        format!("{}={:.2}", def.name, value)
    }
}
