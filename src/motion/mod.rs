//! Motion integrators and the per-tick driver.
//!
//! - [`slope`]: projects horizontal displacement onto the standing surface.
//! - [`horizontal`]: sub-stepped collision sweep with slide/bounce response.
//! - [`vertical`]: gravity, buoyancy, liquid friction, floor/ceiling clamping.
//! - [`tick`]: per-actor driver sequencing the above with riding and
//!   state-machine bookkeeping.

pub mod config;
pub mod horizontal;
pub mod slope;
pub mod tick;
pub mod vertical;

pub use config::{CompatFlags, MotionConfig, TickContext};
