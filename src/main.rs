use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::info;
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use convecta::config::{self, Config};
use convecta::controls::{self, ControlState, Tunables};
use convecta::input::{InjectMode, Interaction};
use convecta::physics::{SimController, Simulation};
use convecta::renderer::{self, ColorMap};
use convecta::solver::diagnostics;
use convecta::state::{next_grid_size, prev_grid_size, FrameSnapshot};

/// Run this many ticks without a window, then exit.
const HEADLESS_ENV: &str = "CONVECTA_HEADLESS";

fn headless_ticks() -> Option<u64> {
    std::env::var(HEADLESS_ENV).ok().and_then(|v| v.trim().parse().ok())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = config::load();
    cfg.validate().context("invalid configuration")?;

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("failed to set Ctrl+C handler")?;

    match headless_ticks() {
        Some(ticks) => run_headless(&cfg, ticks, &running),
        None => run_gui(&cfg, &running),
    }
}

fn run_headless(cfg: &Config, ticks: u64, running: &AtomicBool) -> Result<()> {
    let mut sim = Simulation::new(cfg).context("failed to create simulation")?;
    let n = sim.grid_size() as i32;
    sim.set_interaction(Interaction::at(n / 2 + 1, n / 4 + 1, InjectMode::Heat));
    info!("headless run: {ticks} ticks");

    let start = Instant::now();
    for _ in 0..ticks {
        if !running.load(Ordering::SeqCst) {
            break;
        }
        sim.step();
    }

    let state = sim.state();
    let n = state.n;
    info!(
        "done: {} ticks in {:.2?}, avg={:.4} total={:.3} ke={:.3e} max_div={:.3e}",
        state.ticks,
        start.elapsed(),
        diagnostics::interior_average(&state.dens, n),
        diagnostics::total_scalar(&state.dens, n),
        diagnostics::kinetic_energy(&state.u, &state.v, n),
        diagnostics::max_divergence(&state.u, &state.v, n)
    );
    Ok(())
}

fn push_tunables(ctl: &SimController, tunables: &Tunables) {
    ctl.update_params(tunables.params.clone());
    ctl.set_time_scale(tunables.time_scale);
}

fn format_title(fps: u32, snap: &FrameSnapshot, label: &str, colormap: ColorMap) -> String {
    format!(
        "convecta | {fps} fps | N={} | avg {:.1}% | {label} | {}",
        snap.n,
        snap.average_density * 100.0,
        colormap.label()
    )
}

fn run_gui(cfg: &Config, running: &AtomicBool) -> Result<()> {
    let mut sim = Simulation::new(cfg).context("failed to create simulation")?;
    let ctl = sim.controller();

    let mut tunables = Tunables {
        params: cfg.physics.clone(),
        time_scale: cfg.clock.time_scale,
    };
    let mut control_state = ControlState::new();
    let mut colormap = ColorMap::default();

    let mut w = cfg.display.width;
    let mut h = cfg.display.height;
    let mut window = Window::new(
        "convecta",
        w,
        h,
        WindowOptions {
            resize: true,
            ..WindowOptions::default()
        },
    )
    .context("failed to create window")?;
    window.set_target_fps(cfg.display.target_fps);

    let mut framebuf = vec![0u32; w * h];
    let mut rgba_buf: Vec<u8> = Vec::new();
    let mut snap = FrameSnapshot::new_empty(sim.grid_size());
    let mut last_interaction = Interaction::default();
    let mut last_frame = Instant::now();
    let mut frame_count = 0u32;
    let mut last_fps_time = Instant::now();

    while window.is_open() && running.load(Ordering::SeqCst) {
        // --- Keyboard handling ---
        if window.is_key_pressed(Key::Escape, KeyRepeat::No) {
            break;
        }

        if window.is_key_pressed(Key::Up, KeyRepeat::Yes) {
            control_state.navigate(-1);
        }
        if window.is_key_pressed(Key::Down, KeyRepeat::Yes) {
            control_state.navigate(1);
        }

        // Left/Right: normal step, Comma/Period: fine step
        let adjustments = [
            (Key::Left, -1, false),
            (Key::Right, 1, false),
            (Key::Comma, -1, true),
            (Key::Period, 1, true),
        ];
        for (key, delta, fine) in adjustments {
            if window.is_key_pressed(key, KeyRepeat::Yes)
                && controls::adjust_param(&mut tunables, control_state.selected, delta, fine)
            {
                push_tunables(&ctl, &tunables);
            }
        }

        if window.is_key_pressed(Key::R, KeyRepeat::No) {
            controls::reset_param(&mut tunables, control_state.selected);
            push_tunables(&ctl, &tunables);
        }

        if window.is_key_pressed(Key::LeftBracket, KeyRepeat::No) {
            ctl.resize(prev_grid_size(sim.grid_size()));
        }
        if window.is_key_pressed(Key::RightBracket, KeyRepeat::No) {
            ctl.resize(next_grid_size(sim.grid_size()));
        }

        if window.is_key_pressed(Key::Backspace, KeyRepeat::No) {
            ctl.reset();
        }

        if window.is_key_pressed(Key::V, KeyRepeat::No) {
            colormap = colormap.next();
        }

        // --- Check for window resize ---
        let (new_w, new_h) = window.get_size();
        if (new_w != w || new_h != h) && new_w > 0 && new_h > 0 {
            w = new_w;
            h = new_h;
            framebuf = vec![0u32; w * h];
        }

        // --- Pointer: left heats, right cools ---
        let mode = if window.get_mouse_down(MouseButton::Left) {
            Some(InjectMode::Heat)
        } else if window.get_mouse_down(MouseButton::Right) {
            Some(InjectMode::Cool)
        } else {
            None
        };
        let interaction = match (mode, window.get_mouse_pos(MouseMode::Discard)) {
            (Some(mode), Some((px, py))) => Interaction::from_pointer(px, py, w, h, sim.grid_size(), mode),
            _ => Interaction::default(),
        };
        if interaction != last_interaction {
            ctl.set_interaction(interaction);
            last_interaction = interaction;
        }

        // --- Physics ---
        let now = Instant::now();
        sim.advance(now.duration_since(last_frame).as_secs_f64());
        last_frame = now;

        // --- Render ---
        sim.snapshot_into(&mut snap);
        renderer::render_into(&mut rgba_buf, &snap, w, h, colormap);
        renderer::rgba_to_argb(&rgba_buf, &mut framebuf);
        window
            .update_with_buffer(&framebuf, w, h)
            .context("failed to present frame")?;

        frame_count += 1;
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            let label = controls::status_label(&tunables, control_state.selected);
            window.set_title(&format_title(frame_count, &snap, &label, colormap));
            frame_count = 0;
            last_fps_time = now;
        }
    }

    info!("shutting down after {} ticks", sim.ticks());
    Ok(())
}
