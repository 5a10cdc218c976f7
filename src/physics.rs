use std::sync::mpsc;

use log::{debug, info, trace, warn};

use crate::config::{ClockConfig, Config};
use crate::error::{non_negative, ConfigResult};
use crate::input::Interaction;
use crate::solver::{self, diagnostics, SolverParams};
use crate::state::{check_grid_size, FrameSnapshot, SimState};

/// Fixed-timestep accumulator. Wall-clock frame gaps are capped, scaled and
/// converted into a whole number of ticks.
pub struct FrameClock {
    accumulator: f64,
    tick: f64,
    max_frame_delta: f64,
    max_ticks: usize,
    discarded: f64,
}

impl FrameClock {
    pub fn new(cfg: &ClockConfig) -> Self {
        Self {
            accumulator: 0.0,
            tick: 1.0 / cfg.tick_rate,
            max_frame_delta: cfg.max_frame_delta,
            max_ticks: cfg.max_ticks_per_frame,
            discarded: 0.0,
        }
    }

    /// Seconds of simulated time per tick.
    pub fn tick_seconds(&self) -> f64 {
        self.tick
    }

    /// Simulated time waiting for the next tick.
    pub fn pending(&self) -> f64 {
        self.accumulator
    }

    /// Simulated time dropped by the last `consume` because of the tick cap.
    pub fn discarded(&self) -> f64 {
        self.discarded
    }

    /// Feed one frame's elapsed wall time (seconds) and return how many ticks
    /// to run now. Whole ticks beyond the per-frame cap are thrown away; only
    /// the sub-tick remainder carries over.
    pub fn consume(&mut self, elapsed: f64, time_scale: f64) -> usize {
        let elapsed = if elapsed.is_finite() { elapsed.clamp(0.0, self.max_frame_delta) } else { 0.0 };
        self.accumulator += elapsed * time_scale.max(0.0);

        let due = (self.accumulator / self.tick).floor() as usize;
        let ticks = due.min(self.max_ticks);
        self.accumulator -= due as f64 * self.tick;
        self.accumulator = self.accumulator.max(0.0);
        self.discarded = (due - ticks) as f64 * self.tick;
        ticks
    }

    pub fn clear(&mut self) {
        self.accumulator = 0.0;
        self.discarded = 0.0;
    }
}

/// Requests from the host, applied between ticks.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    UpdateParams(SolverParams),
    SetTimeScale(f64),
    SetInteraction(Interaction),
    Resize(usize),
    Reset,
}

/// Cloneable handle for feeding commands into a `Simulation`.
#[derive(Clone)]
pub struct SimController {
    tx: mpsc::Sender<Command>,
}

impl SimController {
    pub fn update_params(&self, params: SolverParams) {
        self.send(Command::UpdateParams(params));
    }

    pub fn set_time_scale(&self, time_scale: f64) {
        self.send(Command::SetTimeScale(time_scale));
    }

    pub fn set_interaction(&self, interaction: Interaction) {
        self.send(Command::SetInteraction(interaction));
    }

    pub fn resize(&self, n: usize) {
        self.send(Command::Resize(n));
    }

    pub fn reset(&self) {
        self.send(Command::Reset);
    }

    fn send(&self, cmd: Command) {
        // The receiver lives as long as the simulation; nothing to do if it's gone.
        if self.tx.send(cmd).is_err() {
            debug!("simulation dropped; command ignored");
        }
    }
}

/// A convection simulation driven by wall-clock frames.
pub struct Simulation {
    state: SimState,
    params: SolverParams,
    time_scale: f64,
    interaction: Interaction,
    clock: FrameClock,
    seed: u32,
    ticks_per_second: u64,
    cmd_rx: mpsc::Receiver<Command>,
    cmd_tx: mpsc::Sender<Command>,
}

impl Simulation {
    pub fn new(config: &Config) -> ConfigResult<Self> {
        config.physics.validate()?;
        config.clock.validate()?;
        let state = SimState::new(config.grid.size, config.physics.ambient, config.grid.seed)?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        info!(
            "simulation created: {n}x{n} grid, dt={dt}, seed={seed}",
            n = config.grid.size,
            dt = config.physics.dt,
            seed = config.grid.seed
        );
        Ok(Self {
            state,
            params: config.physics.clone(),
            time_scale: config.clock.time_scale,
            interaction: Interaction::default(),
            clock: FrameClock::new(&config.clock),
            seed: config.grid.seed,
            ticks_per_second: config.clock.tick_rate.round().max(1.0) as u64,
            cmd_rx,
            cmd_tx,
        })
    }

    pub fn controller(&self) -> SimController {
        SimController { tx: self.cmd_tx.clone() }
    }

    /// Run the ticks owed for `elapsed` seconds of wall time. Pending commands
    /// are applied before the first tick and after each one. Returns the
    /// number of ticks run.
    pub fn advance(&mut self, elapsed: f64) -> usize {
        self.drain_commands();
        let ticks = self.clock.consume(elapsed, self.time_scale);
        for _ in 0..ticks {
            self.step();
            self.drain_commands();
        }
        trace!("frame: {} ticks, {:.4}s discarded", ticks, self.clock.discarded());
        ticks
    }

    /// Run exactly one tick with the current parameters and interaction.
    pub fn step(&mut self) {
        solver::fluid_step(&mut self.state, &self.params, &self.interaction);
        if self.state.ticks % self.ticks_per_second == 0 {
            let n = self.state.n;
            debug!(
                "tick {} (t={:.2}s): avg={:.4} total={:.3} ke={:.3e}",
                self.state.ticks,
                self.state.ticks as f64 * self.clock.tick_seconds(),
                diagnostics::interior_average(&self.state.dens, n),
                diagnostics::total_scalar(&self.state.dens, n),
                diagnostics::kinetic_energy(&self.state.u, &self.state.v, n)
            );
        }
    }

    fn drain_commands(&mut self) {
        while let Ok(cmd) = self.cmd_rx.try_recv() {
            self.apply(cmd);
        }
    }

    /// Apply one command immediately. Invalid requests are logged and dropped.
    pub fn apply(&mut self, cmd: Command) {
        let result = match cmd {
            Command::UpdateParams(params) => self.set_params(params),
            Command::SetTimeScale(scale) => self.set_time_scale(scale),
            Command::SetInteraction(interaction) => {
                self.set_interaction(interaction);
                Ok(())
            }
            Command::Resize(n) => self.resize(n),
            Command::Reset => {
                self.reset();
                Ok(())
            }
        };
        if let Err(e) = result {
            warn!("command rejected: {e}");
        }
    }

    pub fn set_params(&mut self, params: SolverParams) -> ConfigResult<()> {
        params.validate()?;
        self.params = params;
        Ok(())
    }

    pub fn set_time_scale(&mut self, time_scale: f64) -> ConfigResult<()> {
        non_negative("time_scale", time_scale)?;
        self.time_scale = time_scale;
        Ok(())
    }

    pub fn set_interaction(&mut self, interaction: Interaction) {
        self.interaction = interaction;
    }

    /// Reallocate at interior size `n`. Scalar returns to ambient, velocity to
    /// zero and the clock starts empty; an interaction keeps its relative position.
    pub fn resize(&mut self, n: usize) -> ConfigResult<()> {
        check_grid_size(n)?;
        let old_n = self.state.n;
        self.state = SimState::new(n, self.params.ambient, self.seed)?;
        self.interaction = self.interaction.remap(old_n, n);
        self.clock.clear();
        info!("resized grid {old_n} -> {n}");
        Ok(())
    }

    /// Return every field to its initial value and drop the interaction.
    pub fn reset(&mut self) {
        self.state.reset(self.params.ambient);
        self.interaction = Interaction::default();
        self.clock.clear();
        info!("simulation reset");
    }

    pub fn snapshot_into(&self, dst: &mut FrameSnapshot) {
        self.state.snapshot_into(dst);
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        self.state.snapshot()
    }

    /// Interior average of the scalar field, measured at the latest tick.
    pub fn average_density(&self) -> f64 {
        self.state.avg_density
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    pub fn grid_size(&self) -> usize {
        self.state.n
    }

    pub fn ticks(&self) -> u64 {
        self.state.ticks
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }
}
