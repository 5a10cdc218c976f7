//! Interactive 2D buoyant convection on a stable-fluids grid.
//!
//! A heat brush stamps scalar into the field, buoyancy turns the scalar
//! anomaly into vertical force, and the velocity is kept near divergence-free
//! by two projection passes per tick. The top rows cool.

pub mod config;
pub mod controls;
pub mod error;
pub mod input;
pub mod physics;
pub mod renderer;
pub mod solver;
pub mod state;
